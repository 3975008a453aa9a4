use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Action the admin search endpoints require a nonce for.
pub const SEARCH_ACTION: &str = "notice_bar_search";

#[derive(Debug, thiserror::Error)]
pub enum NonceError {
    #[error("nonce could not be signed: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("nonce is invalid or expired")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("nonce was issued for {0:?}")]
    WrongAction(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct NonceClaims {
    action: String,
    iat: usize,
    exp: usize,
}

/// Issues and checks short-lived anti-forgery tokens bound to an action.
#[derive(Clone)]
pub struct NonceService {
    secret: String,
    ttl_seconds: u64,
}

impl NonceService {
    pub fn new(secret: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    pub fn issue(&self, action: &str) -> Result<String, NonceError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let ttl = usize::try_from(self.ttl_seconds).unwrap_or(usize::MAX);
        let claims = NonceClaims {
            action: action.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(NonceError::Sign)
    }

    pub fn verify(&self, token: &str, action: &str) -> Result<(), NonceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<NonceClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(NonceError::Invalid)?;

        if data.claims.action != action {
            return Err(NonceError::WrongAction(data.claims.action));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let nonces = NonceService::new("secret", 3600);
        let token = nonces.issue(SEARCH_ACTION).unwrap();
        assert!(nonces.verify(&token, SEARCH_ACTION).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = NonceService::new("secret", 3600).issue(SEARCH_ACTION).unwrap();
        let result = NonceService::new("other", 3600).verify(&token, SEARCH_ACTION);
        assert!(matches!(result, Err(NonceError::Invalid(_))));
    }

    #[test]
    fn test_wrong_action_rejected() {
        let nonces = NonceService::new("secret", 3600);
        let token = nonces.issue("something_else").unwrap();
        assert!(matches!(
            nonces.verify(&token, SEARCH_ACTION),
            Err(NonceError::WrongAction(_))
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let nonces = NonceService::new("secret", 0);
        let claims = NonceClaims {
            action: SEARCH_ACTION.into(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(
            nonces.verify(&token, SEARCH_ACTION),
            Err(NonceError::Invalid(_))
        ));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let nonces = NonceService::new("secret", u64::MAX);
        let token = nonces.issue(SEARCH_ACTION).unwrap();
        assert!(nonces.verify(&token, SEARCH_ACTION).is_ok());
    }

    #[test]
    fn test_garbage_rejected() {
        let nonces = NonceService::new("secret", 3600);
        assert!(nonces.verify("not-a-token", SEARCH_ACTION).is_err());
    }
}
