//! Save/Load functionality for persisting a pet.
//!
//! Two encodings of the same record:
//! - JSON (`serialize` / `deserialize`): the field-level contract the app's
//!   storage layer keeps. Timestamps are integer milliseconds since the
//!   Unix epoch.
//! - Binary (`save_pet` / `load_pet`): a versioned bincode envelope for
//!   compact save files.
//!
//! Both paths validate on decode: levels must lie in [0, 100] and the name
//! must be non-empty. Stored names are trimmed on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{DecodeError, SaveError};
use crate::pet::{is_valid_level, validate_name, Need, PetId, PetState};

/// Version number for binary save format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of one pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PetRecord {
    id: PetId,
    name: String,
    hunger: f64,
    energy: f64,
    affection: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    last_updated: DateTime<Utc>,
}

/// Binary save envelope.
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    pet: PetRecord,
}

impl From<&PetState> for PetRecord {
    fn from(state: &PetState) -> Self {
        Self {
            id: state.id(),
            name: state.name().to_string(),
            hunger: state.hunger(),
            energy: state.energy(),
            affection: state.affection(),
            last_updated: state.last_updated(),
        }
    }
}

impl TryFrom<PetRecord> for PetState {
    type Error = DecodeError;

    fn try_from(record: PetRecord) -> Result<Self, Self::Error> {
        for (need, value) in [
            (Need::Hunger, record.hunger),
            (Need::Energy, record.energy),
            (Need::Affection, record.affection),
        ] {
            if !is_valid_level(value) {
                return Err(DecodeError::LevelOutOfRange {
                    field: need.field_name(),
                    value,
                });
            }
        }
        let name = validate_name(&record.name).map_err(|_| DecodeError::EmptyName)?;
        Ok(PetState::from_parts(
            record.id,
            name,
            record.hunger,
            record.energy,
            record.affection,
            record.last_updated,
        ))
    }
}

/// Encode a pet as a JSON record.
pub fn serialize(state: &PetState) -> Vec<u8> {
    // Every field is a string, a finite float, or an integer, none of which
    // can fail to encode.
    let bytes = serde_json::to_vec(&PetRecord::from(state))
        .expect("pet record always encodes as JSON");
    log::trace!("serialized {} ({} bytes)", state.id(), bytes.len());
    bytes
}

/// Decode a pet from a JSON record.
pub fn deserialize(bytes: &[u8]) -> Result<PetState, DecodeError> {
    let record: PetRecord = serde_json::from_slice(bytes)?;
    let state = PetState::try_from(record)?;
    log::trace!("deserialized {} ({} bytes)", state.id(), bytes.len());
    Ok(state)
}

/// Save a pet to a writer in the binary format.
pub fn save_pet<W: Write>(writer: W, state: &PetState) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        pet: PetRecord::from(state),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a pet from a reader in the binary format.
pub fn load_pet<R: Read>(reader: R) -> Result<PetState, DecodeError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(DecodeError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    PetState::try_from(save_data.pet)
}
