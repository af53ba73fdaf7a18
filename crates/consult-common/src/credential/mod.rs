//! Media credential issuance

mod media_token;

pub use media_token::{MediaClaims, MediaTokenIssuer, VideoGrant, DEFAULT_TOKEN_TTL_SECS};
