//! Signed, time-limited access tokens.
//!
//! Tokens are HS256 JWTs carrying the subject identity and an absolute
//! expiry set to issue time plus a fixed TTL. Verification treats bad
//! signatures, malformed input, and expiry uniformly: all yield
//! `None`, because hostile or stale tokens are an expected, frequent
//! outcome rather than an internal error.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity, the account email.
    pub sub: String,
    /// Issue time as a Unix timestamp.
    pub iat: i64,
    /// Absolute expiry as a Unix timestamp.
    pub exp: i64,
}

/// Issues and verifies access tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from the shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway keeps expiry exact; the default 60s grace period
        // would let stale tokens linger past the configured TTL.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Build a codec with the default 30-minute lifetime.
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, DEFAULT_TTL)
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the given subject, expiring TTL from now.
    pub fn issue(&self, subject: &str) -> Result<String, Error> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if at the given instant.
    ///
    /// Exposed so expiry behaviour can be tested without sleeping.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, Error> {
        let iat = issued_at.timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| Error::internal("token ttl exceeds representable range"))?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat,
            exp: iat + ttl,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("token encoding failed: {err}")))
    }

    /// Decode and check a token, returning its claims when the
    /// signature is valid and the expiry has not passed.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}
