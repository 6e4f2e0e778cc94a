//! Session handling for bearer-token authentication.
//!
//! The backend issues a JWT at login. The client never verifies it (the backend
//! does); it only decodes the claims to show who is logged in. A session is
//! written once per login and read-only afterwards.

use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::models::Role;

/// Claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "crate::models::wire::opt_id::deserialize")]
    pub service_center_id: Option<String>,
    /// Expiry, seconds since the epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

/// Decode the payload segment of a JWT without checking its signature.
pub fn decode_claims(token: &str) -> Result<Claims, ClientError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ClientError::Session("Token is not a JWT".to_string()))?;
    // Tolerate issuers that pad the segment.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClientError::Session(format!("Token payload is not base64url: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::Session(format!("Token payload is not valid JSON: {}", e)))
}

/// A logged-in session.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    claims: Claims,
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self { token, claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Read a stored session. `Ok(None)` when nobody is logged in.
    pub async fn load(path: &Path) -> Result<Option<Self>, ClientError> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::Session(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let stored: StoredSession = serde_json::from_slice(&raw)
            .map_err(|e| ClientError::Session(format!("Corrupt session file: {}", e)))?;
        Self::from_token(stored.token).map(Some)
    }

    /// Persist the session, replacing any previous login.
    pub async fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let body = serde_json::to_vec_pretty(&StoredSession {
            token: self.token.clone(),
        })?;
        tokio::fs::write(path, body)
            .await
            .map_err(|e| {
                ClientError::Session(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    /// Remove the stored session. Returns whether one existed.
    pub async fn clear(path: &Path) -> Result<bool, ClientError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ClientError::Session(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Build an unsigned token with the given claims, for tests.
#[cfg(test)]
pub(crate) fn test_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
