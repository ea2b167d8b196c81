use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{FormField, SpinError};

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !email.contains('@') {
        return Err(ValidationError::new("invalid_email_format"));
    }
    Ok(())
}

/// Raw contents of the play form, exactly as typed by the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(custom = "validate_email")]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub consent: bool,
}

/// Identity that passed the form checks. Values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub first_name: String,
    pub email: String,
    pub phone: String,
}

impl PlayerForm {
    pub fn new(first_name: &str, email: &str, phone: &str, consent: bool) -> Self {
        Self {
            first_name: first_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            consent,
        }
    }

    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            consent: self.consent,
        }
    }

    /// Checks the form and reports the first offending field, in form order.
    pub fn to_identity(&self) -> Result<PlayerIdentity, SpinError> {
        let form = self.trimmed();

        if let Err(errors) = form.validate() {
            let fields = errors.field_errors();
            let offending = [
                ("first_name", FormField::FirstName),
                ("email", FormField::Email),
                ("phone", FormField::Phone),
            ]
            .into_iter()
            .find(|(name, _)| fields.contains_key(name))
            .map(|(_, field)| field)
            .unwrap_or(FormField::FirstName);
            return Err(SpinError::Validation(offending));
        }

        if !form.consent {
            return Err(SpinError::Validation(FormField::Consent));
        }

        Ok(PlayerIdentity {
            first_name: form.first_name,
            email: form.email,
            phone: form.phone,
        })
    }
}
