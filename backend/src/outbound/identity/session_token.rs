//! RS256 session-token verification.
//!
//! Tokens are issued by the external identity provider and verified here
//! against its PEM public key. The principal id comes from `sub`; the compact
//! `fea` claim carries the plan's feature names.

use std::path::Path;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{IdentityError, IdentityProvider};
use crate::domain::{FeatureClaims, Principal, UserId};

/// Errors raised while loading the verification key.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("failed to read session public key {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session public key is not a valid RSA PEM: {message}")]
    Parse { message: String },
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    fea: Option<String>,
}

/// Verifies identity-provider session tokens.
#[derive(Clone)]
pub struct SessionTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionTokenVerifier {
    /// Build a verifier from PEM-encoded RSA public key bytes.
    pub fn from_pem(pem: &[u8], issuer: Option<&str>) -> Result<Self, SessionKeyError> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(|err| SessionKeyError::Parse {
            message: err.to_string(),
        })?;
        let mut validation = Validation::new(Algorithm::RS256);
        match issuer {
            Some(issuer) => {
                validation.set_required_spec_claims(&["exp", "sub", "iss"]);
                validation.set_issuer(&[issuer]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub"]),
        }
        Ok(Self { key, validation })
    }

    /// Read the PEM public key at `path`.
    pub fn from_pem_file(path: &Path, issuer: Option<&str>) -> Result<Self, SessionKeyError> {
        let pem = std::fs::read(path).map_err(|source| SessionKeyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_pem(&pem, issuer)
    }
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> IdentityError {
    match error.kind() {
        ErrorKind::ExpiredSignature => IdentityError::invalid_token("token expired"),
        ErrorKind::InvalidIssuer => IdentityError::invalid_token("unexpected issuer"),
        ErrorKind::InvalidSignature => IdentityError::invalid_token("bad signature"),
        ErrorKind::InvalidAlgorithm => IdentityError::invalid_token("unexpected algorithm"),
        ErrorKind::MissingRequiredClaim(claim) => {
            IdentityError::invalid_token(format!("missing claim {claim}"))
        }
        ErrorKind::InvalidKeyFormat => IdentityError::unavailable("verification key unusable"),
        _ => IdentityError::invalid_token("malformed token"),
    }
}

#[async_trait]
impl IdentityProvider for SessionTokenVerifier {
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|err| {
            debug!(error = %err, "session token rejected");
            map_jwt_error(err)
        })?;
        let SessionClaims { sub, fea } = data.claims;
        let user_id =
            UserId::new(&sub).map_err(|err| IdentityError::invalid_token(err.to_string()))?;
        let features = fea
            .as_deref()
            .map(FeatureClaims::parse_compact)
            .unwrap_or_default();
        Ok(Principal::new(user_id, features))
    }
}
