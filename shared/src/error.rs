use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    FeatureUnavailable,
    Network,
    Analysis,
    ImageProcessing,
    Storage,
    Configuration,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::FeatureUnavailable => "FEATURE_UNAVAILABLE",
            Self::Network => "NETWORK_ERROR",
            Self::Analysis => "ANALYSIS_ERROR",
            Self::ImageProcessing => "IMAGE_PROCESSING_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }

    /// Whether failures of this kind are shown to the user or only logged.
    #[must_use]
    pub const fn is_user_visible(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::Network | Self::Analysis | Self::FeatureUnavailable
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation | ErrorKind::FeatureUnavailable => self.message.clone(),
            ErrorKind::Network | ErrorKind::Analysis => {
                "Could not analyze image. Please ensure you are online.".into()
            }
            ErrorKind::ImageProcessing => {
                "Unable to process the image. Please try a different photo.".into()
            }
            ErrorKind::Storage => "Unable to save your name on this device.".into(),
            ErrorKind::Configuration | ErrorKind::InvalidState => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Blocking message the user has to acknowledge.
    Alert,
    Info,
}

/// A transient, dismissible message shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Alert,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Info,
        }
    }
}

impl From<&AppError> for Notice {
    fn from(e: &AppError) -> Self {
        Self::alert(e.user_facing_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_surface_their_own_message() {
        let err = AppError::new(ErrorKind::Validation, "Please upload a photo of the site.");
        assert_eq!(err.user_facing_message(), "Please upload a photo of the site.");
        assert!(err.kind.is_user_visible());
    }

    #[test]
    fn internal_detail_stays_out_of_user_message() {
        let err = AppError::new(ErrorKind::Network, "request failed")
            .with_internal("dns lookup failed");
        assert!(!err.user_facing_message().contains("dns"));
        assert_eq!(
            err.to_string(),
            "[NETWORK_ERROR] request failed (internal: dns lookup failed)"
        );
    }

    #[test]
    fn notice_from_error_is_an_alert() {
        let err = AppError::new(ErrorKind::Analysis, "encode failed");
        let notice = Notice::from(&err);
        assert_eq!(notice.kind, NoticeKind::Alert);
        assert_eq!(
            notice.message,
            "Could not analyze image. Please ensure you are online."
        );
    }

    #[test]
    fn storage_errors_are_logged_not_shown() {
        assert!(!ErrorKind::Storage.is_user_visible());
        assert!(!ErrorKind::Configuration.is_user_visible());
    }
}
