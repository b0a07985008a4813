//! Player actions: feed, play, rest, and rename.
//!
//! Each action validates its preconditions against the input state before
//! touching anything; a rejected action returns an error and no new state.
//! The config-taking functions are crate-private: outside callers go through
//! [`crate::PetEngine`], which only holds validated tuning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decay::elapsed_seconds;
use crate::error::PetError;
use crate::pet::{validate_name, Need, PetState, LEVEL_MAX};

/// A discrete player-triggered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Feed,
    Play,
    Rest,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Feed, Action::Play, Action::Rest];

    pub fn name(self) -> &'static str {
        match self {
            Action::Feed => "feed",
            Action::Play => "play",
            Action::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feed" => Ok(Action::Feed),
            "play" => Ok(Action::Play),
            "rest" => Ok(Action::Rest),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// The level deltas produced by an action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActionEffect {
    pub hunger_delta: f64,
    pub energy_delta: f64,
    pub affection_delta: f64,
    /// Play requires at least this much energy beforehand.
    pub min_energy: Option<f64>,
}

/// Compute the effect of `action` under `config`.
///
/// Rest restores energy fully, so its delta is the full level range; the
/// clamp in [`apply_effect`] caps it at 100.
pub(crate) fn compute_action_effect(action: Action, config: &EngineConfig) -> ActionEffect {
    match action {
        Action::Feed => ActionEffect {
            hunger_delta: config.feed_amount,
            energy_delta: 0.0,
            affection_delta: 0.0,
            min_energy: None,
        },
        Action::Play => ActionEffect {
            hunger_delta: 0.0,
            energy_delta: -config.play_energy_cost,
            affection_delta: config.play_affection_gain,
            min_energy: Some(config.play_min_energy),
        },
        Action::Rest => ActionEffect {
            hunger_delta: 0.0,
            energy_delta: LEVEL_MAX,
            affection_delta: 0.0,
            min_energy: None,
        },
    }
}

/// Apply an effect to a copy of `state`, clamping every level to [0, 100].
pub(crate) fn apply_effect(state: &PetState, effect: &ActionEffect) -> PetState {
    let mut next = state.clone();
    next.set_level(Need::Hunger, state.hunger() + effect.hunger_delta);
    next.set_level(Need::Energy, state.energy() + effect.energy_delta);
    next.set_level(Need::Affection, state.affection() + effect.affection_delta);
    next
}

/// Validate and perform `action` at `now`.
pub(crate) fn perform(
    state: &PetState,
    action: Action,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<PetState, PetError> {
    elapsed_seconds(state, now).inspect_err(|e| {
        log::debug!("{} rejected for {}: {}", action, state.id(), e);
    })?;

    let effect = compute_action_effect(action, config);
    if let Some(required) = effect.min_energy {
        if state.energy() < required {
            log::debug!(
                "{} rejected for {}: energy {:.1} below {:.1}",
                action,
                state.id(),
                state.energy(),
                required
            );
            return Err(PetError::InsufficientEnergy {
                energy: state.energy(),
                required,
            });
        }
    }

    let mut next = apply_effect(state, &effect);
    next.restamp(now);
    Ok(next)
}

pub(crate) fn feed(
    state: &PetState,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<PetState, PetError> {
    perform(state, Action::Feed, now, config)
}

/// Fails with [`PetError::InsufficientEnergy`] when energy is below
/// `config.play_min_energy`.
pub(crate) fn play(
    state: &PetState,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<PetState, PetError> {
    perform(state, Action::Play, now, config)
}

pub(crate) fn rest(
    state: &PetState,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<PetState, PetError> {
    perform(state, Action::Rest, now, config)
}

/// Give the pet a new name. Levels and timestamp are left alone.
pub fn rename(state: &PetState, name: &str) -> Result<PetState, PetError> {
    let name = validate_name(name)?;
    let mut next = state.clone();
    next.set_name(name);
    Ok(next)
}
