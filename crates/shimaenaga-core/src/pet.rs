//! The pet record: identity, name, need levels, and the decay timestamp.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PetError;

/// Lower bound of every level.
pub const LEVEL_MIN: f64 = 0.0;
/// Upper bound of every level.
pub const LEVEL_MAX: f64 = 100.0;

/// Name given to a freshly hatched pet when the player has not chosen one.
pub const DEFAULT_PET_NAME: &str = "シマエナガ";

/// Opaque pet identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(Uuid);

impl PetId {
    pub(crate) fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three need levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Need {
    /// Fullness. Feeding raises it, time lowers it.
    Hunger,
    Energy,
    Affection,
}

impl Need {
    pub const ALL: [Need; 3] = [Need::Hunger, Need::Energy, Need::Affection];

    pub fn field_name(self) -> &'static str {
        match self {
            Need::Hunger => "hunger",
            Need::Energy => "energy",
            Need::Affection => "affection",
        }
    }
}

/// State of one virtual pet.
///
/// Fields are private so the invariants hold for every value that exists:
/// levels stay in [0, 100], the name is non-empty, and the id never changes.
/// Values are produced by [`crate::PetEngine`] or decoded by
/// [`crate::persistence`].
#[derive(Debug, Clone, PartialEq)]
pub struct PetState {
    id: PetId,
    name: String,
    hunger: f64,
    energy: f64,
    affection: f64,
    last_updated: DateTime<Utc>,
}

impl PetState {
    /// Fresh pet with every level at `initial_level`.
    pub(crate) fn new(
        name: &str,
        initial_level: f64,
        now: DateTime<Utc>,
    ) -> Result<Self, PetError> {
        let name = validate_name(name)?;
        let level = clamp_level(initial_level);
        Ok(Self {
            id: PetId::new_random(),
            name,
            hunger: level,
            energy: level,
            affection: level,
            last_updated: stamp(now),
        })
    }

    /// Rebuild a state from already-validated parts.
    pub(crate) fn from_parts(
        id: PetId,
        name: String,
        hunger: f64,
        energy: f64,
        affection: f64,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            hunger,
            energy,
            affection,
            last_updated,
        }
    }

    pub fn id(&self) -> PetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn affection(&self) -> f64 {
        self.affection
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn level(&self, need: Need) -> f64 {
        match need {
            Need::Hunger => self.hunger,
            Need::Energy => self.energy,
            Need::Affection => self.affection,
        }
    }

    /// Returns the lowest need strictly below `threshold`, if any.
    ///
    /// Ties resolve in [`Need::ALL`] order.
    pub fn most_urgent_need(&self, threshold: f64) -> Option<Need> {
        Need::ALL
            .iter()
            .map(|&n| (n, self.level(n)))
            .filter(|(_, v)| *v < threshold)
            .fold(None, |best: Option<(Need, f64)>, cur| match best {
                Some(b) if b.1 <= cur.1 => Some(b),
                _ => Some(cur),
            })
            .map(|(n, _)| n)
    }

    pub(crate) fn set_level(&mut self, need: Need, value: f64) {
        let value = clamp_level(value);
        match need {
            Need::Hunger => self.hunger = value,
            Need::Energy => self.energy = value,
            Need::Affection => self.affection = value,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Callers check `now >= last_updated` first.
    pub(crate) fn restamp(&mut self, now: DateTime<Utc>) {
        self.last_updated = stamp(now);
    }
}

/// Clamp to [0, 100]. NaN maps to the floor.
pub fn clamp_level(value: f64) -> f64 {
    if value.is_nan() {
        return LEVEL_MIN;
    }
    value.clamp(LEVEL_MIN, LEVEL_MAX)
}

/// Whether `value` is a legal stored level. Rejects NaN.
pub fn is_valid_level(value: f64) -> bool {
    (LEVEL_MIN..=LEVEL_MAX).contains(&value)
}

/// Trim and reject empty names.
pub fn validate_name(name: &str) -> Result<String, PetError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PetError::InvalidName);
    }
    Ok(trimmed.to_string())
}

/// Timestamps are kept at millisecond precision, the resolution of the
/// persisted record.
pub(crate) fn stamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(3)
}
