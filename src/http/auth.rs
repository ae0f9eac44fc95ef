//! Shared-key guard for the bot-facing routes.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// The configured key; `None` leaves the routes open.
#[derive(Debug, Clone)]
pub struct ApiKeyConfig(pub Option<String>);

/// Extractor that succeeds when the request carries the configured key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequest for ApiKey {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let expected = req
            .app_data::<web::Data<ApiKeyConfig>>()
            .and_then(|cfg| cfg.0.clone());

        let res = match expected {
            None => Ok(ApiKey),
            Some(expected) => {
                let given = req
                    .headers()
                    .get(API_KEY_HEADER)
                    .and_then(|v| v.to_str().ok());
                if given.is_some_and(|g| keys_match(g.as_bytes(), expected.as_bytes())) {
                    Ok(ApiKey)
                } else {
                    Err(ApiError::Unauthorized)
                }
            }
        };
        ready(res)
    }
}

/// Byte comparison whose timing does not depend on where the keys differ.
fn keys_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
