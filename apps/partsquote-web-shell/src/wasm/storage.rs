use partsquote_client_core::CartStorage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum BrowserStorageError {
    #[error("window is unavailable")]
    NoWindow,
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("failed to {action} local storage key {key}")]
    Access { action: &'static str, key: String },
}

/// `window.localStorage`, looked up on every call so a storage area that
/// becomes available later (e.g. after a privacy prompt) is picked up.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BrowserLocalStorage;

impl BrowserLocalStorage {
    fn storage() -> Result<web_sys::Storage, BrowserStorageError> {
        let window = web_sys::window().ok_or(BrowserStorageError::NoWindow)?;
        window
            .local_storage()
            .map_err(|_| BrowserStorageError::Unavailable)?
            .ok_or(BrowserStorageError::Unavailable)
    }
}

impl CartStorage for BrowserLocalStorage {
    type Error = BrowserStorageError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| BrowserStorageError::Access {
                action: "read",
                key: key.to_string(),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| BrowserStorageError::Access {
                action: "write",
                key: key.to_string(),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| BrowserStorageError::Access {
                action: "remove",
                key: key.to_string(),
            })
    }
}
