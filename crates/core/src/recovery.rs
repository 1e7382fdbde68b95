//! Password recovery requests.
//!
//! Only the request bodies and their client-side checks live here; the reset
//! itself is the backend's business.

use crate::{ClaimsError, ClaimsResult};
use claims_types::NonEmptyText;
use serde::Serialize;

/// Body of `POST /auth/forgot-password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordRequest {
    email: NonEmptyText,
}

impl ForgotPasswordRequest {
    pub fn new(email: &str) -> ClaimsResult<Self> {
        let email = NonEmptyText::new(email)
            .map_err(|_| ClaimsError::InvalidInput("Email is required".into()))?;
        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Body of `POST /auth/reset-password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    token: NonEmptyText,
    new_password: String,
}

impl ResetPasswordRequest {
    /// Both password entries must match exactly. The password is not trimmed.
    pub fn new(token: &str, new_password: &str, confirm_password: &str) -> ClaimsResult<Self> {
        if new_password != confirm_password {
            return Err(ClaimsError::InvalidInput("Passwords do not match.".into()));
        }
        if new_password.is_empty() {
            return Err(ClaimsError::InvalidInput("Password is required".into()));
        }
        let token = NonEmptyText::new(token)
            .map_err(|_| ClaimsError::InvalidInput("Reset token is required".into()))?;

        Ok(Self {
            token,
            new_password: new_password.to_string(),
        })
    }
}
