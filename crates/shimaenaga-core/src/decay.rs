//! Time-driven need decay.
//!
//! Hunger and energy fall linearly with elapsed wall-clock time; affection
//! never decays. The caller passes `now` explicitly so decay is
//! deterministic and replayable.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::error::PetError;
use crate::pet::{stamp, Need, PetState};

/// Seconds elapsed since `state` was last stamped, or an error if `now` is
/// earlier. Sub-millisecond differences count as zero.
pub fn elapsed_seconds(state: &PetState, now: DateTime<Utc>) -> Result<f64, PetError> {
    let now = stamp(now);
    if now < state.last_updated() {
        return Err(PetError::InvalidTime {
            last_updated: state.last_updated(),
            now,
        });
    }
    let millis = (now - state.last_updated()).num_milliseconds();
    Ok(millis as f64 / 1000.0)
}

/// Points a need loses over `seconds` at `seconds_per_point`. Never
/// negative, so decay cannot raise a level.
pub fn decay_amount(seconds: f64, seconds_per_point: f64) -> f64 {
    (seconds / seconds_per_point).max(0.0)
}

/// Apply decay from `state.last_updated()` up to `now`.
///
/// Returns the state unchanged when no time has elapsed, so a second call
/// with the same `now` is a no-op.
pub(crate) fn apply_decay(
    state: &PetState,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<PetState, PetError> {
    let elapsed = match elapsed_seconds(state, now) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("decay rejected for {}: {}", state.id(), e);
            return Err(e);
        }
    };
    if elapsed == 0.0 {
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.set_level(
        Need::Hunger,
        state.hunger() - decay_amount(elapsed, config.hunger_seconds_per_point),
    );
    next.set_level(
        Need::Energy,
        state.energy() - decay_amount(elapsed, config.energy_seconds_per_point),
    );
    next.restamp(now);

    log::debug!(
        "decayed {} over {:.0}s: hunger {:.2} -> {:.2}, energy {:.2} -> {:.2}",
        state.id(),
        elapsed,
        state.hunger(),
        next.hunger(),
        state.energy(),
        next.energy()
    );
    Ok(next)
}
