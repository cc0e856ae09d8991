//! Admin authentication service.
//!
//! There is exactly one admin. Logging in exchanges the shared password for
//! a short-lived HS256 token, and every admin route verifies that token.
//!
//! Failed logins are not throttled or locked out. Anyone who can reach
//! `/api/admin/login` can guess passwords as fast as the server answers.

mod error;

pub use error::AuthError;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::AdminAuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Subject claim carried by every admin token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Claims inside an admin access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always [`ADMIN_SUBJECT`].
    pub sub: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Issued token returned from the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Verifies the admin password and issues and checks access tokens.
#[derive(Clone)]
pub struct AdminAuthenticator {
    /// HMAC keyed with the signing secret, used to compare passwords.
    mac: HmacSha256,
    /// `HMAC(secret, password)` for the configured password.
    password_tag: Vec<u8>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl std::fmt::Debug for AdminAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthenticator")
            .field("password_tag", &"[REDACTED]")
            .field("keys", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AdminAuthenticator {
    /// Build an authenticator from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the secret cannot key an HMAC.
    pub fn new(config: &AdminAuthConfig) -> Result<Self, AuthError> {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidKey)?;

        let mut tagger = mac.clone();
        tagger.update(config.password.expose_secret().as_bytes());
        let password_tag = tagger.finalize().into_bytes().to_vec();

        Ok(Self {
            mac,
            password_tag,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: Duration::minutes(i64::from(config.token_ttl_minutes)),
        })
    }

    /// Check a submitted password and issue a token on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    /// Returns `AuthError::Signing` if the token cannot be encoded.
    pub fn login(&self, password: &str) -> Result<AccessToken, AuthError> {
        self.verify_password(password)?;
        let access_token = self.issue_at(Utc::now())?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Compare a password against the configured one in constant time.
    ///
    /// Both sides are reduced to fixed-length HMAC tags first, so neither the
    /// content nor the length of the real password leaks through timing.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch.
    pub fn verify_password(&self, password: &str) -> Result<(), AuthError> {
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        mac.verify_slice(&self.password_tag)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    /// Sign a token as if issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Verify a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for an expired token and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        jsonwebtoken::decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn authenticator() -> AdminAuthenticator {
        AdminAuthenticator::new(&AdminAuthConfig {
            password: SecretString::from("correct horse battery"),
            jwt_secret: SecretString::from(SECRET),
            token_ttl_minutes: 480,
        })
        .unwrap()
    }

    #[test]
    fn test_login_with_correct_password() {
        let auth = authenticator();
        let token = auth.login("correct horse battery").unwrap();
        assert_eq!(token.token_type, "bearer");

        let claims = auth.verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.exp - claims.iat, 480 * 60);
    }

    #[test]
    fn test_login_rejects_other_passwords() {
        let auth = authenticator();
        for guess in ["", "correct horse", "correct horse battery ", "CORRECT HORSE BATTERY"] {
            assert!(matches!(
                auth.login(guess),
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn test_expired_token() {
        let auth = authenticator();
        let token = auth.issue_at(Utc::now() - Duration::days(2)).unwrap();
        assert!(matches!(auth.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token() {
        let auth = authenticator();
        assert!(matches!(
            auth.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(auth.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let other = AdminAuthenticator::new(&AdminAuthConfig {
            password: SecretString::from("correct horse battery"),
            jwt_secret: SecretString::from("zZ9(yY8)xX7_wW6+vV5=uU4~tT3`sS2!"),
            token_ttl_minutes: 480,
        })
        .unwrap();
        let forged = other.issue_at(Utc::now()).unwrap();

        assert!(matches!(
            authenticator().verify(&forged),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_subject_is_rejected() {
        let claims = AdminClaims {
            sub: "visitor".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            authenticator().verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let output = format!("{:?}", authenticator());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains(SECRET));
    }
}
