//! Media session credentials
//!
//! Mints LiveKit-compatible access tokens: HS256 JWTs signed with the media
//! server's API secret, carrying a `video` grant scoped to one room.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use consult_core::{CredentialIssuer, DomainError};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::MediaConfig;
use crate::error::AppError;

/// Default token lifetime (6 hours)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 6 * 60 * 60;

/// Room permissions granted to the participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room_join: bool,
    pub room: String,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl VideoGrant {
    /// Full participant grant for a room
    #[must_use]
    pub fn participant(room: impl Into<String>) -> Self {
        Self {
            room_join: true,
            room: room.into(),
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaClaims {
    /// Issuer (API key)
    pub iss: String,
    /// Participant identity
    pub sub: String,
    /// Participant display name
    pub name: String,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub video: VideoGrant,
}

/// Issues media-session join tokens
#[derive(Clone)]
pub struct MediaTokenIssuer {
    api_key: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for MediaTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaTokenIssuer")
            .field("api_key", &self.api_key)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl MediaTokenIssuer {
    /// Create an issuer for the given key pair
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: &str) -> Self {
        Self {
            api_key: api_key.into(),
            encoding_key: EncodingKey::from_secret(api_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(api_secret.as_bytes()),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Create an issuer from the media configuration
    #[must_use]
    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.api_key.clone(), &config.api_secret)
    }

    /// Override the token lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Mint a token for `identity` to join `room_name`
    ///
    /// # Errors
    /// Returns an error if no API key is configured or encoding fails
    pub fn mint(&self, room_name: &str, identity: &str, name: &str) -> Result<String, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Credential("media API key is not configured".to_string()));
        }

        let now = Utc::now();
        let claims = MediaClaims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            name: name.to_string(),
            nbf: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            video: VideoGrant::participant(room_name),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Credential(format!("failed to encode media token: {e}")))
    }

    /// Decode and validate a token minted by this issuer
    ///
    /// # Errors
    /// Returns an error if the signature, issuer, or lifetime is invalid
    pub fn verify(&self, token: &str) -> Result<MediaClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.api_key]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.validate_nbf = true;

        decode::<MediaClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Credential(format!("invalid media token: {e}")))
    }
}

#[async_trait]
impl CredentialIssuer for MediaTokenIssuer {
    async fn issue(
        &self,
        room_name: &str,
        participant_id: &str,
        participant_name: &str,
    ) -> Result<String, DomainError> {
        Ok(self.mint(room_name, participant_id, participant_name)?)
    }
}
