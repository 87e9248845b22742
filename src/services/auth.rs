//! Bearer token validation. Tokens are issued elsewhere; this crate only reads them.

use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &str = "unit-test-secret";

    fn token(secret: &str, exp_offset: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: "student4".to_string(),
            user_id: "00000000-0000-0000-0000-000000000004".to_string(),
            role: "student".to_string(),
            token_type: "access".to_string(),
            exp: (now + exp_offset).timestamp(),
            iat: now.timestamp(),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let claims = validate_token(&token(SECRET, Duration::minutes(15)), SECRET).unwrap();
        assert_eq!(claims.role, "student");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let err = validate_token(&token("other", Duration::minutes(15)), SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let err = validate_token(&token(SECRET, Duration::hours(-2)), SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
