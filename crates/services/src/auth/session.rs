use super::ports::{AuthError, IssuedToken, SessionClaims, UserId};
use chrono::{DateTime, TimeDelta, Utc};
use config::AuthConfig;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

pub const TOKEN_ISSUER: &str = "vanish-vault-api";

/// Mints and verifies stateless HS256 session tokens
pub struct SessionTokenIssuer {
    keys: Option<(EncodingKey, DecodingKey)>,
    expiration_hours: i64,
}

impl SessionTokenIssuer {
    pub fn new(secret: Option<&str>, expiration_hours: i64) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|secret| {
            (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            )
        });

        Self {
            keys,
            expiration_hours,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_deref(), config.jwt_expiration_hours)
    }

    pub fn issue(&self, user_id: &UserId) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let (encoding_key, _) = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::TokenIssuanceFailed("JWT secret is not configured".into()))?;

        let lifetime = TimeDelta::try_hours(self.expiration_hours)
            .filter(|d| *d > TimeDelta::zero())
            .ok_or_else(|| {
                AuthError::TokenIssuanceFailed(format!(
                    "Invalid token lifetime of {} hours",
                    self.expiration_hours
                ))
            })?;

        let iat = now.timestamp();
        let exp = iat + lifetime.num_seconds();

        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat,
            exp,
            iss: TOKEN_ISSUER.to_string(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|e| AuthError::TokenIssuanceFailed(format!("Failed to sign token: {e}")))?;

        let expires_at = DateTime::from_timestamp(exp, 0).ok_or_else(|| {
            AuthError::TokenIssuanceFailed("Token expiry out of range".to_string())
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, issuer and expiry. No leeway is granted past `exp`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let (_, decoding_key) = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Unauthorized("JWT secret is not configured".into()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        jsonwebtoken::decode::<SessionClaims>(token, decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Unauthorized(format!("Invalid session token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_id() -> UserId {
        UserId(Uuid::new_v4())
    }

    #[test]
    fn test_issued_token_round_trips() {
        let issuer = SessionTokenIssuer::new(Some("test-secret"), 24);
        let user_id = user_id();

        let issued = issuer.issue(&user_id).unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_fails_verification() {
        let issuer = SessionTokenIssuer::new(Some("test-secret"), 1);
        let issued = issuer
            .issue_at(&user_id(), Utc::now() - TimeDelta::hours(2))
            .unwrap();

        let err = issuer.verify(&issued.token).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issued = SessionTokenIssuer::new(Some("secret-a"), 1)
            .issue(&user_id())
            .unwrap();

        let result = SessionTokenIssuer::new(Some("secret-b"), 1).verify(&issued.token);
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let issuer = SessionTokenIssuer::new(Some("test-secret"), 1);
        let issued = issuer.issue(&user_id()).unwrap();

        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert!(issuer.verify(&tampered).is_err());
        assert!(issuer.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let claims = SessionClaims {
            sub: user_id().to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
            iss: "someone-else".to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let issuer = SessionTokenIssuer::new(Some("test-secret"), 1);
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_missing_secret_fails_issuance() {
        for secret in [None, Some("")] {
            let issuer = SessionTokenIssuer::new(secret, 24);
            let err = issuer.issue(&user_id()).unwrap_err();
            assert!(matches!(err, AuthError::TokenIssuanceFailed(_)));
        }
    }

    #[test]
    fn test_non_positive_lifetime_fails_issuance() {
        let issuer = SessionTokenIssuer::new(Some("test-secret"), 0);
        assert!(matches!(
            issuer.issue(&user_id()),
            Err(AuthError::TokenIssuanceFailed(_))
        ));
    }
}
