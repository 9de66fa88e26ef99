//! Score codec
//!
//! Moves score text in and out of the page address. The token is standard
//! base64 over the UTF-8 bytes of the score, which is the alphabet `btoa`
//! produces, so links shared by earlier builds keep working.

pub mod location;

pub use location::{Location, LocationError, Notifier};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::models::{ApplicationState, DEFAULT_SCORE};

/// Message shown when the address holds an unreadable score
pub const INVALID_URL_MESSAGE: &str = "URL not valid. Showing default score...";

/// Encoder: padded standard alphabet
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_encode_padding(true),
);

/// Decoder: accepts tokens with or without padding, as `atob` does
const LENIENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid score token: {0}")]
    InvalidToken(#[from] base64::DecodeError),

    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Serialize the state into the address token
pub fn serialize(state: &ApplicationState) -> String {
    encode_token(&state.score)
}

/// Rebuild a state from an address token
pub fn deserialize(token: &str) -> Result<ApplicationState, CodecError> {
    decode_token(token).map(ApplicationState::new)
}

pub fn encode_token(score: &str) -> String {
    TOKEN_ENGINE.encode(score.as_bytes())
}

/// Decode a token back into score text
///
/// ASCII whitespace inside the token is ignored. Bytes that are not valid
/// UTF-8 are read as Latin-1, matching what `atob` returned for old links.
pub fn decode_token(token: &str) -> Result<String, CodecError> {
    let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT_ENGINE.decode(compact.as_bytes())?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    })
}

/// Binds the token format to a named query parameter
#[derive(Debug, Clone)]
pub struct ScoreCodec {
    param: String,
    default_score: String,
}

impl ScoreCodec {
    pub fn new(param: impl Into<String>, default_score: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            default_score: default_score.into(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.score_param.clone(), config.default_score.clone())
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn default_score(&self) -> &str {
        &self.default_score
    }

    /// Score carried by the current address
    ///
    /// Falls back to the default score when the parameter is missing, and
    /// also when it cannot be decoded (after notifying the user once).
    pub fn decode(&self, location: &impl Location, notifier: &impl Notifier) -> String {
        let Some(token) = location.query_param(&self.param) else {
            return self.default_score.clone();
        };

        match decode_token(&token) {
            Ok(score) => score,
            Err(err) => {
                log::warn!("Discarding score from address: {}", err);
                notifier.notify(INVALID_URL_MESSAGE);
                self.default_score.clone()
            }
        }
    }

    /// Address for `score`, derived from the current one
    pub fn encode(&self, location: &impl Location, score: &str) -> Result<String, CodecError> {
        let url = location.with_query_param(&self.param, &encode_token(score))?;
        Ok(url)
    }
}

impl Default for ScoreCodec {
    fn default() -> Self {
        Self::new("s", DEFAULT_SCORE)
    }
}
