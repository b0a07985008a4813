//! Pet engine: the entry point the app shell drives.

use chrono::{DateTime, Utc};

use crate::actions::{self, Action};
use crate::config::{self, EngineConfig};
use crate::decay;
use crate::error::PetError;
use crate::pet::PetState;

/// Holds one validated [`EngineConfig`] and exposes every pet operation.
///
/// The engine is stateless with respect to pets: each call takes a state
/// by reference and returns a new one. The caller owns the state and
/// serializes access to it.
#[derive(Debug, Clone, Default)]
pub struct PetEngine {
    config: EngineConfig,
}

impl PetEngine {
    /// Build an engine, rejecting invalid tuning.
    pub fn new(config: EngineConfig) -> Result<Self, PetError> {
        let errors = config::validate(&config);
        if !errors.is_empty() {
            return Err(PetError::InvalidConfig(errors));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hatch a new pet stamped with the current time.
    pub fn create(&self, name: &str) -> Result<PetState, PetError> {
        self.create_at(name, Utc::now())
    }

    /// Hatch a new pet stamped with `now`.
    pub fn create_at(&self, name: &str, now: DateTime<Utc>) -> Result<PetState, PetError> {
        let pet = PetState::new(name, self.config.initial_level, now)?;
        log::debug!("created pet {} ({})", pet.id(), pet.name());
        Ok(pet)
    }

    pub fn apply_decay(&self, state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
        decay::apply_decay(state, now, &self.config)
    }

    pub fn feed(&self, state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
        actions::feed(state, now, &self.config)
    }

    pub fn play(&self, state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
        actions::play(state, now, &self.config)
    }

    pub fn rest(&self, state: &PetState, now: DateTime<Utc>) -> Result<PetState, PetError> {
        actions::rest(state, now, &self.config)
    }

    pub fn perform(
        &self,
        state: &PetState,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<PetState, PetError> {
        actions::perform(state, action, now, &self.config)
    }

    pub fn rename(&self, state: &PetState, name: &str) -> Result<PetState, PetError> {
        actions::rename(state, name)
    }
}
