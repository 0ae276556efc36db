//! Bearer-token identity of the caller.

use std::future::{Ready, ready};

use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::models::config::ServerConfig;

/// Claims of a verified access token.
///
/// Tokens are issued by the identity service; this crate only checks them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Numeric user id as a string.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: u64,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        self.sub.parse()
    }

    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }

    /// Verifies the signature and expiry of `token`.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }

    /// Signs these claims with `secret`.
    pub fn to_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

/// Returns `true` when `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|candidate| candidate == role)
}

fn rejection(response: HttpResponse, message: &'static str) -> actix_web::Error {
    InternalError::from_response(message, response).into()
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered as app data");
            return ready(Err(rejection(
                HttpResponse::InternalServerError().finish(),
                "server misconfigured",
            )));
        };

        let Some(token) = bearer_token(req) else {
            return ready(Err(rejection(
                HttpResponse::Unauthorized().json(json!({ "error": "missing bearer token" })),
                "missing bearer token",
            )));
        };

        ready(Self::from_token(token, &config.secret).map_err(|err| {
            log::debug!("Rejected bearer token: {err}");
            rejection(
                HttpResponse::Unauthorized().json(json!({ "error": "invalid or expired token" })),
                "invalid or expired token",
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "3".to_string(),
            email: "hr@example.com".to_string(),
            name: "HR".to_string(),
            roles: vec![crate::ROLE_EMPLOYER.to_string()],
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trips_with_the_same_secret() {
        let token = claims().to_token("secret").unwrap();
        let decoded = AuthenticatedUser::from_token(&token, "secret").unwrap();

        assert_eq!(decoded, claims());
        assert_eq!(decoded.user_id().map(UserId::get), Ok(3));
        assert!(decoded.has_role(crate::ROLE_EMPLOYER));
        assert!(!decoded.has_role(crate::ROLE_ADMIN));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = claims().to_token("secret").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = AuthenticatedUser {
            exp: 1_000_000,
            ..claims()
        };
        let token = expired.to_token("secret").unwrap();
        assert!(AuthenticatedUser::from_token(&token, "secret").is_err());
    }
}
