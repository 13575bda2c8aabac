//! Bearer tokens for the Sheets API.
//!
//! Either a fixed token from configuration or one minted from a service-account
//! key through the OAuth JWT-bearer grant and cached until shortly before expiry.

use chrono::{DateTime, Duration, Utc};
use hornero_shared::{AppError, AppResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a service-account key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Account e-mail, the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

enum Source {
    Fixed(String),
    ServiceAccount {
        key: ServiceAccountKey,
        signer: EncodingKey,
        cache: Mutex<Option<CachedToken>>,
    },
}

/// Source of bearer tokens.
pub struct TokenProvider {
    source: Source,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Source::Fixed(_) => f.debug_tuple("Fixed").field(&"[hidden]").finish(),
            Source::ServiceAccount { key, .. } => f
                .debug_struct("ServiceAccount")
                .field("client_email", &key.client_email)
                .finish_non_exhaustive(),
        }
    }
}

impl TokenProvider {
    /// Uses `token` for every request.
    #[must_use]
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: Source::Fixed(token.into()),
        }
    }

    /// Builds a provider from a service-account key.
    pub fn service_account(key: ServiceAccountKey) -> AppResult<Self> {
        let signer = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AppError::Internal(format!("invalid service-account key: {e}")))?;
        Ok(Self {
            source: Source::ServiceAccount {
                key,
                signer,
                cache: Mutex::new(None),
            },
        })
    }

    /// Reads a service-account key file.
    pub fn from_key_file(path: &str) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Internal(format!("cannot read {path}: {e}")))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("invalid key file {path}: {e}")))?;
        info!(client_email = %key.client_email, "Using service-account credentials");
        Self::service_account(key)
    }

    /// Returns a token valid for at least the refresh margin.
    pub async fn bearer(&self, client: &Client) -> AppResult<String> {
        let (key, signer, cache) = match &self.source {
            Source::Fixed(token) => return Ok(token.clone()),
            Source::ServiceAccount { key, signer, cache } => (key, signer, cache),
        };

        let mut cached = cache.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref()
            && token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
        {
            return Ok(token.value.clone());
        }

        let assertion = sign_assertion(key, signer, now)?;
        let response = client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("token request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid token response: {e}")))?;

        debug!(expires_in = body.expires_in, "Obtained Sheets access token");
        let token = CachedToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in),
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

fn sign_assertion(
    key: &ServiceAccountKey,
    signer: &EncodingKey,
    now: DateTime<Utc>,
) -> AppResult<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now.timestamp(),
        exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
    };
    encode(&Header::new(Algorithm::RS256), &claims, signer)
        .map_err(|e| AppError::Internal(format!("failed to sign token assertion: {e}")))
}
