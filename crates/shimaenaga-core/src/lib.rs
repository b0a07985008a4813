//! Pure pet simulation logic for Shimaenaga.
//!
//! This crate owns the authoritative in-memory model of a single virtual
//! pet. Functions take plain values and return new values: no I/O, no
//! global state, no clocks read behind the caller's back (except
//! [`create`], which stamps the current time). The app shell owns storage
//! and scheduling and drives the engine through the operations below.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Feed / play / rest / rename and their level effects |
//! | [`config`] | Decay rates, action magnitudes, thresholds, validation |
//! | [`decay`] | Time-driven reduction of hunger and energy |
//! | [`engine`] | [`PetEngine`]: one validated config, every operation |
//! | [`error`] | [`PetError`] and [`DecodeError`] |
//! | [`persistence`] | JSON record and versioned binary save format |
//! | [`pet`] | [`PetState`], [`PetId`], [`Need`] |
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use shimaenaga_core::prelude::*;
//!
//! let engine = PetEngine::default();
//! let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//!
//! let pet = engine.create_at("Shima", t0).unwrap();
//! let pet = engine.feed(&pet, t0).unwrap();
//! let pet = engine.apply_decay(&pet, t0 + Duration::seconds(300)).unwrap();
//!
//! assert_eq!(pet.hunger(), 69.0);
//! assert_eq!(pet.energy(), 49.0);
//! ```

pub mod actions;
pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod pet;

use chrono::{DateTime, Utc};

pub use config::EngineConfig;
pub use engine::PetEngine;
pub use error::{DecodeError, PetError, SaveError};
pub use pet::{Need, PetId, PetState};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::actions::Action;
    pub use crate::config::EngineConfig;
    pub use crate::engine::PetEngine;
    pub use crate::error::{DecodeError, PetError, SaveError};
    pub use crate::pet::{Need, PetId, PetState};
}

/// Create a pet with default tuning, stamped with the current time.
pub fn create(name: &str) -> Result<PetState, PetError> {
    PetEngine::default().create(name)
}

/// Apply decay up to `now` with default tuning.
pub fn apply_decay(state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
    PetEngine::default().apply_decay(state, now)
}

/// Feed with default tuning.
pub fn feed(state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
    PetEngine::default().feed(state, now)
}

/// Play with default tuning.
pub fn play(state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
    PetEngine::default().play(state, now)
}

/// Rest with default tuning.
pub fn rest(state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
    PetEngine::default().rest(state, now)
}

/// Encode a pet as its JSON record.
pub fn serialize(state: &PetState) -> Vec<u8> {
    persistence::serialize(state)
}

/// Decode a pet from its JSON record.
pub fn deserialize(bytes: &[u8]) -> Result<PetState, DecodeError> {
    persistence::deserialize(bytes)
}
