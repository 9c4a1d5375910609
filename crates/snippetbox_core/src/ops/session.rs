//! Stand-in session issuer.
//!
//! Identity verification lives outside SnippetBox; login trusts the supplied
//! username and only issues a bearer token for it.

use super::validate;
use crate::access::require_caller;
use crate::models::{LoginRequest, LoginResponse};
use crate::{AppError, Database, UserId};

/// Open a session for `req.username`, registering the user on first login.
///
/// # Errors
/// Returns [`AppError::Validation`] for malformed usernames, or a storage error.
pub fn login(db: &Database, req: &LoginRequest) -> Result<LoginResponse, AppError> {
    let username = validate::username(&req.username)?;
    let user = db.users.get_or_create(&username)?;
    let session = db.users.create_session(user.id)?;
    tracing::info!("Opened session for user {}", user.id);
    Ok(LoginResponse {
        token: session.token,
        user,
    })
}

/// Revoke the session identified by `token`.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller, or a storage error.
pub fn logout(db: &Database, caller: Option<UserId>, token: &str) -> Result<(), AppError> {
    require_caller(caller)?;
    db.users.delete_session(token)?;
    Ok(())
}
