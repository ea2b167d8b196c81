use std::fmt;

use crate::constants::*;
use crate::customer::ApiError;

/// Form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    Email,
    Phone,
    Consent,
}

/// Field the server reported as already used for this wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Email,
    Phone,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinError {
    Configuration(String),
    Validation(FormField),
    VerificationConflict(ConflictField),
    Transport(String),
    NotVerified,
    VerificationPending,
    SpinInProgress,
    AlreadyPlayed,
}

impl SpinError {
    /// Text shown to the player for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            SpinError::Configuration(_) => WHEEL_UNAVAILABLE_ERROR,
            SpinError::Validation(field) => match field {
                FormField::FirstName => FIRST_NAME_REQUIRED_ERROR,
                FormField::Email => INVALID_EMAIL_ERROR,
                FormField::Phone => PHONE_REQUIRED_ERROR,
                FormField::Consent => CONSENT_REQUIRED_ERROR,
            },
            SpinError::VerificationConflict(field) => match field {
                ConflictField::Email => EMAIL_TAKEN_ERROR,
                ConflictField::Phone => PHONE_TAKEN_ERROR,
            },
            SpinError::Transport(_) => NETWORK_ERROR,
            SpinError::NotVerified => NOT_VERIFIED_ERROR,
            SpinError::VerificationPending => VERIFICATION_PENDING_ERROR,
            SpinError::SpinInProgress => SPIN_IN_PROGRESS_ERROR,
            SpinError::AlreadyPlayed => ALREADY_PLAYED_ERROR,
        }
    }

    /// Whether the player can fix this by editing the form and resubmitting.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SpinError::Validation(_) | SpinError::VerificationConflict(_) | SpinError::Transport(_)
        )
    }
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinError::Configuration(detail) => write!(f, "wheel configuration error: {}", detail),
            SpinError::Transport(detail) => write!(f, "transport error: {}", detail),
            other => f.write_str(other.user_message()),
        }
    }
}

impl std::error::Error for SpinError {}

impl From<ApiError> for SpinError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected(message) => match classify_server_error(&message) {
                Some(field) => SpinError::VerificationConflict(field),
                None => SpinError::Transport(message),
            },
            other => SpinError::Transport(other.to_string()),
        }
    }
}

/// Maps the `error` text of a verification response onto the conflicting field.
pub fn classify_server_error(message: &str) -> Option<ConflictField> {
    let message = message.trim();
    if message.eq_ignore_ascii_case(EMAIL_TAKEN_SERVER_ERROR) {
        Some(ConflictField::Email)
    } else if message.eq_ignore_ascii_case(PHONE_TAKEN_SERVER_ERROR) {
        Some(ConflictField::Phone)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_are_told_apart() {
        let email: SpinError = ApiError::Rejected("Email already registered".to_string()).into();
        let phone: SpinError = ApiError::Rejected("Phone number already registered".to_string()).into();
        assert_eq!(email, SpinError::VerificationConflict(ConflictField::Email));
        assert_eq!(phone, SpinError::VerificationConflict(ConflictField::Phone));
        assert_ne!(email.user_message(), phone.user_message());
    }

    #[test]
    fn test_other_failures_are_transport() {
        let err: SpinError = ApiError::Rejected("Wheel not found".to_string()).into();
        assert!(matches!(err, SpinError::Transport(_)));
        assert_eq!(err.user_message(), NETWORK_ERROR);

        let err: SpinError = ApiError::Status(502).into();
        assert!(matches!(err, SpinError::Transport(_)));
        assert!(err.is_retryable());
    }
}
