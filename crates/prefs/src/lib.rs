//! Persisted UI preferences.
//!
//! The only preference today is the active variable, remembered across page
//! loads so a reload restores the layer the user was looking at.

/// localStorage key for the active variable.
pub const ACTIVE_VARIABLE_KEY: &str = "activeVar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefsError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::StorageUnavailable => write!(f, "browser storage unavailable"),
            PrefsError::Io(msg) => write!(f, "preference storage error: {msg}"),
        }
    }
}

impl std::error::Error for PrefsError {}

pub trait PrefsStore {
    fn active_variable(&self) -> Result<Option<String>, PrefsError>;
    fn set_active_variable(&mut self, key: &str) -> Result<(), PrefsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPrefs {
    active_variable: Option<String>,
}

impl InMemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsStore for InMemoryPrefs {
    fn active_variable(&self) -> Result<Option<String>, PrefsError> {
        Ok(self.active_variable.clone())
    }

    fn set_active_variable(&mut self, key: &str) -> Result<(), PrefsError> {
        self.active_variable = Some(key.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{ACTIVE_VARIABLE_KEY, PrefsError, PrefsStore};

    #[derive(Debug, Default)]
    pub struct LocalStoragePrefs;

    impl LocalStoragePrefs {
        pub fn new() -> Self {
            Self
        }
    }

    impl PrefsStore for LocalStoragePrefs {
        fn active_variable(&self) -> Result<Option<String>, PrefsError> {
            let storage = window_local_storage()?;
            storage
                .get_item(ACTIVE_VARIABLE_KEY)
                .map_err(|e| PrefsError::Io(format!("get_item failed: {e:?}")))
        }

        fn set_active_variable(&mut self, key: &str) -> Result<(), PrefsError> {
            let storage = window_local_storage()?;
            storage
                .set_item(ACTIVE_VARIABLE_KEY, key)
                .map_err(|e| PrefsError::Io(format!("set_item failed: {e:?}")))
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, PrefsError> {
        let win = web_sys::window().ok_or(PrefsError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| PrefsError::Io(format!("localStorage error: {e:?}")))?
            .ok_or(PrefsError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePrefs;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct LocalStoragePrefs;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePrefs {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PrefsStore for LocalStoragePrefs {
    fn active_variable(&self) -> Result<Option<String>, PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }

    fn set_active_variable(&mut self, _key: &str) -> Result<(), PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }
}
