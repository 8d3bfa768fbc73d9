//! Server-side role gate for the all-accounts listing. Callers authenticate
//! with Basic credentials; only BANKER and AUDITOR roles pass.

use crate::domain::Role;
use crate::error::AppError;
use crate::services;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub async fn listing_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing credentials".to_string()))?;

    let (email, password) = parse_basic_credentials(header)?;

    let account = match services::accounts::authenticate(&state.db, &email, &password).await {
        Ok(account) => account,
        Err(AppError::Database(e)) => return Err(AppError::Database(e)),
        // don't leak whether the email exists
        Err(_) => return Err(AppError::Unauthorized("invalid credentials".to_string())),
    };

    let role: Role = account
        .role
        .parse()
        .map_err(|_| AppError::Unauthorized("unknown role".to_string()))?;

    if !role.can_list_accounts() {
        return Err(AppError::Unauthorized(format!(
            "role {role} may not list accounts"
        )));
    }

    Ok(next.run(req).await)
}

fn parse_basic_credentials(header: &str) -> Result<(String, String), AppError> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| AppError::Unauthorized("expected Basic credentials".to_string()))?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::Unauthorized("malformed credentials".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Unauthorized("malformed credentials".to_string()))?;

    let (email, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Unauthorized("malformed credentials".to_string()))?;

    Ok((email.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn parses_basic_credentials() {
        let header = format!("Basic {}", STANDARD.encode("pparker@mit.edu:secret01"));
        let (email, password) = parse_basic_credentials(&header).unwrap();
        assert_eq!(email, "pparker@mit.edu");
        assert_eq!(password, "secret01");
    }

    #[test]
    fn password_may_contain_colons() {
        let header = format!("Basic {}", STANDARD.encode("a@b.c:pa:ss"));
        let (_, password) = parse_basic_credentials(&header).unwrap();
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn rejects_non_basic_and_malformed_headers() {
        assert!(parse_basic_credentials("Bearer token").is_err());
        assert!(parse_basic_credentials("Basic !!!notbase64!!!").is_err());
        let no_colon = format!("Basic {}", STANDARD.encode("no-separator"));
        assert!(parse_basic_credentials(&no_colon).is_err());
    }
}
