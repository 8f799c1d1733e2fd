/*
 * Responsibility
 * - signup / login の request/response DTO
 * - パスワードポリシー (4..=10 文字) はここで強制 (AuthService は関知しない)
 */
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Validate, char_len_within};

const MAX_EMAIL_LEN: usize = 254;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !is_plausible_email(&self.email) {
            return Err("email is not a valid address");
        }
        if !char_len_within(&self.password, 4, 10) {
            return Err("password must be 4 to 10 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// OAuth2 password grant form (`username` carries the email).
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Validate for LoginForm {
    // Only shape is checked; policy checks would leak which accounts exist.
    fn validate(&self) -> Result<(), &'static str> {
        if self.username.is_empty() {
            return Err("username is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}
