pub mod session;

pub use session::{SelectionError, Session};
