#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub status_code: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub const STATUS_UNAUTHORIZED: u16 = 401;

    #[must_use]
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::http(Self::STATUS_UNAUTHORIZED, "sign in to continue")
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(Self::STATUS_UNAUTHORIZED)
    }

    /// Message suitable for a toast. Empty upstream messages fall back to a
    /// generic line so the UI never shows a blank alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            return "Something went wrong. Please try again.".to_string();
        }
        trimmed.to_string()
    }
}
