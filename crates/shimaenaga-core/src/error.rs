//! Error kinds returned by the engine.
//!
//! Every error is recoverable: the operation that produced it left the
//! caller's state untouched, so the caller can retry with different input.

use chrono::{DateTime, Utc};

use crate::config::ConfigError;

/// Errors from engine operations.
#[derive(Debug)]
pub enum PetError {
    /// Name was empty or whitespace-only.
    InvalidName,
    /// `now` is earlier than the last stamped update (clock moved backward).
    InvalidTime {
        last_updated: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    /// The action needs more energy than the pet has.
    InsufficientEnergy { energy: f64, required: f64 },
    /// A persisted record could not be decoded.
    Decode(DecodeError),
    /// Engine tuning failed validation.
    InvalidConfig(Vec<ConfigError>),
}

/// Errors from decoding a persisted pet record.
#[derive(Debug)]
pub enum DecodeError {
    /// Malformed JSON, a missing field, or a field of the wrong type.
    Json(serde_json::Error),
    /// Malformed binary save.
    Bincode(Box<bincode::ErrorKind>),
    /// A level was outside [0, 100].
    LevelOutOfRange { field: &'static str, value: f64 },
    /// The stored name was empty after trimming.
    EmptyName,
    /// Binary save written by an incompatible format version.
    VersionMismatch { expected: u32, found: u32 },
}

impl From<DecodeError> for PetError {
    fn from(e: DecodeError) -> Self {
        PetError::Decode(e)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e)
    }
}

impl From<Box<bincode::ErrorKind>> for DecodeError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        DecodeError::Bincode(e)
    }
}

/// A binary save could not be written. Wraps the encoder's error, which
/// carries any I/O failure from the writer.
#[derive(Debug)]
pub struct SaveError(Box<bincode::ErrorKind>);

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Save failed: {}", self.0)
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

impl std::fmt::Display for PetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetError::InvalidName => write!(f, "Pet name must not be empty"),
            PetError::InvalidTime { last_updated, now } => write!(
                f,
                "Clock moved backward: now {} is before last update {}",
                now.to_rfc3339(),
                last_updated.to_rfc3339()
            ),
            PetError::InsufficientEnergy { energy, required } => write!(
                f,
                "Not enough energy: have {:.1}, need at least {:.1}",
                energy, required
            ),
            PetError::Decode(e) => write!(f, "Decode error: {}", e),
            PetError::InvalidConfig(errors) => {
                write!(f, "Invalid engine config: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "Malformed record: {}", e),
            DecodeError::Bincode(e) => write!(f, "Malformed save: {}", e),
            DecodeError::LevelOutOfRange { field, value } => {
                write!(f, "Level {} out of range [0, 100]: {}", field, value)
            }
            DecodeError::EmptyName => write!(f, "Stored name is empty"),
            DecodeError::VersionMismatch { expected, found } => write!(
                f,
                "Save version mismatch: expected {}, found {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for PetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PetError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
            DecodeError::Bincode(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
