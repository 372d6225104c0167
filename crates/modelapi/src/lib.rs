//! Request/response types for the remote techno-economic model.
//!
//! The wire format follows the backend's FastAPI contract: camelCase price
//! fields, a 422 validation payload, and a GeoJSON `json_output` whose
//! feature properties replace the per-cell values.

pub mod error;
pub mod request;
pub mod response;

pub use error::*;
pub use request::*;
pub use response::*;

/// Model endpoint, POST with a JSON [`request::RunRequest`] body.
pub const MODEL_ENDPOINT: &str = "https://oae-dashboard-backend.onrender.com/api/run-model";
