use aress_core::AppError;

/// Message for a missing or malformed `Authorization` header.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Returns the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. A missing header, another
/// scheme, or an empty token is `Unauthorized`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    Ok(token)
}
