//! Integration tests for a pet's life through the public API.
//!
//! Exercises: create → actions → decay → save → load → further play.
//!
//! All tests are pure logic with no storage engine and no UI.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shimaenaga_core::actions::Action;
use shimaenaga_core::persistence::{load_pet, save_pet};
use shimaenaga_core::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_755_734_400, 0).unwrap()
}

fn levels(pet: &PetState) -> (f64, f64, f64) {
    (pet.hunger(), pet.energy(), pet.affection())
}

// ── Worked example ─────────────────────────────────────────────────────

#[test]
fn shima_feed_then_five_minutes() {
    let engine = PetEngine::default();
    let pet = engine.create_at("Shima", t0()).unwrap();
    assert_eq!(levels(&pet), (50.0, 50.0, 50.0));

    let pet = engine.feed(&pet, t0()).unwrap();
    assert_eq!(levels(&pet), (70.0, 50.0, 50.0));

    let pet = engine.apply_decay(&pet, t0() + Duration::seconds(300)).unwrap();
    assert_eq!(levels(&pet), (69.0, 49.0, 50.0));
}

#[test]
fn crate_root_functions_use_default_tuning() {
    let pet = shimaenaga_core::create("Shima").unwrap();
    assert_eq!(levels(&pet), (50.0, 50.0, 50.0));

    let now = pet.last_updated();
    let pet = shimaenaga_core::feed(&pet, now).unwrap();
    let pet = shimaenaga_core::play(&pet, now).unwrap();
    let pet = shimaenaga_core::rest(&pet, now).unwrap();
    assert_eq!(levels(&pet), (70.0, 100.0, 65.0));

    let later = now + Duration::minutes(10);
    let pet = shimaenaga_core::apply_decay(&pet, later).unwrap();
    assert_eq!(levels(&pet), (68.0, 98.0, 65.0));

    let bytes = shimaenaga_core::serialize(&pet);
    assert_eq!(shimaenaga_core::deserialize(&bytes).unwrap(), pet);
}

// ── A day in the life ──────────────────────────────────────────────────

#[test]
fn daily_routine_stays_in_bounds() {
    let engine = PetEngine::default();
    let mut pet = engine.create_at("Shima", t0()).unwrap();
    let mut now = t0();

    // Every two hours: catch up on decay, feed, play, and rest at night.
    for step in 0..12 {
        now += Duration::hours(2);
        pet = engine.apply_decay(&pet, now).unwrap();
        pet = engine.feed(&pet, now).unwrap();
        if pet.energy() >= engine.config().play_min_energy {
            pet = engine.play(&pet, now).unwrap();
        }
        if step % 4 == 3 {
            pet = engine.rest(&pet, now).unwrap();
        }
        for need in Need::ALL {
            let v = pet.level(need);
            assert!((0.0..=100.0).contains(&v), "{:?} = {}", need, v);
        }
    }

    assert_eq!(pet.last_updated(), now);
    assert_eq!(pet.affection(), 100.0);
}

#[test]
fn neglected_pet_bottoms_out_and_cannot_play() {
    let engine = PetEngine::default();
    let pet = engine.create_at("Shima", t0()).unwrap();
    let later = t0() + Duration::hours(24);
    let pet = engine.apply_decay(&pet, later).unwrap();

    assert_eq!(pet.hunger(), 0.0);
    assert_eq!(pet.energy(), 0.0);
    assert_eq!(pet.affection(), 50.0);
    assert_eq!(pet.most_urgent_need(20.0), Some(Need::Hunger));

    let err = engine.play(&pet, later).unwrap_err();
    assert!(matches!(err, PetError::InsufficientEnergy { .. }));

    let rested = engine.rest(&pet, later).unwrap();
    assert!(engine.play(&rested, later).is_ok());
}

#[test]
fn clock_regression_leaves_state_alone() {
    let engine = PetEngine::default();
    let pet = engine.create_at("Shima", t0()).unwrap();
    let pet = engine.apply_decay(&pet, t0() + Duration::hours(1)).unwrap();
    let before = pet.clone();

    for action in Action::ALL {
        let err = engine.perform(&pet, action, t0()).unwrap_err();
        assert!(matches!(err, PetError::InvalidTime { .. }), "{}", action);
    }
    assert!(engine.apply_decay(&pet, t0()).is_err());
    assert_eq!(pet, before);
}

// ── Persistence across app launches ───────────────────────────────────

#[test]
fn save_close_reopen_resume() {
    let engine = PetEngine::default();
    let pet = engine.create_at("Shima", t0()).unwrap();
    let pet = engine.play(&pet, t0() + Duration::minutes(1)).unwrap();
    let pet = engine.rename(&pet, "Enaga").unwrap();

    let mut save_file = Vec::new();
    save_pet(&mut save_file, &pet).unwrap();

    // App relaunches three hours later.
    let loaded = load_pet(&save_file[..]).unwrap();
    assert_eq!(loaded.id(), pet.id());
    assert_eq!(loaded.name(), "Enaga");

    let reopened = t0() + Duration::minutes(1) + Duration::hours(3);
    let resumed = engine.apply_decay(&loaded, reopened).unwrap();
    assert_eq!(resumed.hunger(), 50.0 - 36.0);
    assert_eq!(resumed.energy(), 40.0 - 36.0);
    assert_eq!(resumed.affection(), 65.0);
}

#[test]
fn tuned_engine_from_json() {
    let config = EngineConfig::from_json_str(
        r#"{ "hunger_seconds_per_point": 60.0, "feed_amount": 30.0 }"#,
    )
    .unwrap();
    let engine = PetEngine::new(config).unwrap();
    let pet = engine.create_at("Shima", t0()).unwrap();
    let pet = engine.feed(&pet, t0()).unwrap();
    let pet = engine.apply_decay(&pet, t0() + Duration::minutes(10)).unwrap();
    assert_eq!(pet.hunger(), 70.0);
    assert_eq!(pet.energy(), 48.0);
}
