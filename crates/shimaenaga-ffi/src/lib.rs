//! C FFI bindings for the Shimaenaga pet engine
//!
//! This crate exposes the engine to the mobile app shell (or any language
//! with C FFI support). The shell owns scheduling and storage; it hands in
//! wall-clock milliseconds and stores the bytes from `shimaenaga_pet_serialize`.
//!
//! # Basic Usage (C)
//! ```c
//! #include "shimaenaga.h"
//!
//! ShimaenagaPet *pet = NULL;
//! if (shimaenaga_pet_create("Shima", now_ms(), &pet) != Ok) { /* ... */ }
//!
//! // App became active
//! shimaenaga_pet_apply_decay(pet, now_ms());
//!
//! // Player taps "play"
//! if (shimaenaga_pet_play(pet, now_ms()) == InsufficientEnergy) { /* show hint */ }
//!
//! ShimaenagaLevels levels;
//! shimaenaga_pet_get_levels(pet, &levels);
//!
//! // Persist
//! size_t len = 0;
//! shimaenaga_pet_serialize(pet, NULL, 0, &len);
//! uint8_t *buf = malloc(len);
//! shimaenaga_pet_serialize(pet, buf, len, &len);
//!
//! shimaenaga_pet_destroy(pet);
//! ```
//!
//! A failing call never modifies the pet behind the handle.

use std::ffi::{c_char, CStr};

use chrono::{DateTime, Utc};
use shimaenaga_core::actions::Action;
use shimaenaga_core::{DecodeError, PetEngine, PetError, PetState};

/// A pet plus the engine that drives it. Opaque to C.
pub struct ShimaenagaPet {
    engine: PetEngine,
    state: PetState,
}

/// Opaque handle to a pet
pub type ShimaenagaPetHandle = *mut ShimaenagaPet;

/// Result code for fallible calls
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimaenagaStatus {
    Ok = 0,
    /// A required pointer argument was null
    NullPointer = 1,
    /// Name was empty or whitespace-only
    InvalidName = 2,
    /// Timestamp earlier than the last update, or unrepresentable
    InvalidTime = 3,
    /// Not enough energy to play
    InsufficientEnergy = 4,
    /// Stored bytes are not a valid pet record
    DecodeError = 5,
    /// Name was not valid UTF-8
    InvalidUtf8 = 6,
    /// Output buffer too small; the required size was written to `out_len`
    BufferTooSmall = 7,
}

impl From<&PetError> for ShimaenagaStatus {
    fn from(e: &PetError) -> Self {
        match e {
            PetError::InvalidName => ShimaenagaStatus::InvalidName,
            PetError::InvalidTime { .. } => ShimaenagaStatus::InvalidTime,
            PetError::InsufficientEnergy { .. } => ShimaenagaStatus::InsufficientEnergy,
            PetError::Decode(_) | PetError::InvalidConfig(_) => ShimaenagaStatus::DecodeError,
        }
    }
}

impl From<&DecodeError> for ShimaenagaStatus {
    fn from(_: &DecodeError) -> Self {
        ShimaenagaStatus::DecodeError
    }
}

/// Level snapshot returned to C
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ShimaenagaLevels {
    /// Fullness, 0 (starving) to 100 (full)
    pub hunger: f64,
    /// 0 (exhausted) to 100 (fully rested)
    pub energy: f64,
    /// 0 to 100
    pub affection: f64,
    /// Milliseconds since the Unix epoch of the last decay or action
    pub last_updated_ms: i64,
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

/// Hatch a new pet named `name` at `now_ms` (milliseconds since the Unix epoch).
///
/// On success writes a handle to `out` that must be freed with
/// `shimaenaga_pet_destroy`.
#[no_mangle]
pub extern "C" fn shimaenaga_pet_create(
    name: *const c_char,
    now_ms: i64,
    out: *mut ShimaenagaPetHandle,
) -> ShimaenagaStatus {
    if name.is_null() || out.is_null() {
        return ShimaenagaStatus::NullPointer;
    }
    let name = match read_str(name) {
        Ok(s) => s,
        Err(status) => return status,
    };
    let now = match to_time(now_ms) {
        Some(t) => t,
        None => return ShimaenagaStatus::InvalidTime,
    };

    let engine = PetEngine::default();
    match engine.create_at(name, now) {
        Ok(state) => {
            let pet = Box::new(ShimaenagaPet { engine, state });
            unsafe {
                *out = Box::into_raw(pet);
            }
            ShimaenagaStatus::Ok
        }
        Err(e) => (&e).into(),
    }
}

/// Restore a pet from bytes produced by `shimaenaga_pet_serialize`.
#[no_mangle]
pub extern "C" fn shimaenaga_pet_deserialize(
    bytes: *const u8,
    len: usize,
    out: *mut ShimaenagaPetHandle,
) -> ShimaenagaStatus {
    if out.is_null() || (bytes.is_null() && len > 0) {
        return ShimaenagaStatus::NullPointer;
    }
    let data: &[u8] = if len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(bytes, len) }
    };

    match shimaenaga_core::deserialize(data) {
        Ok(state) => {
            let pet = Box::new(ShimaenagaPet {
                engine: PetEngine::default(),
                state,
            });
            unsafe {
                *out = Box::into_raw(pet);
            }
            ShimaenagaStatus::Ok
        }
        Err(e) => {
            log::warn!("rejected stored pet record: {}", e);
            (&e).into()
        }
    }
}

/// Free a pet handle
#[no_mangle]
pub extern "C" fn shimaenaga_pet_destroy(handle: ShimaenagaPetHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Apply need decay up to `now_ms`
#[no_mangle]
pub extern "C" fn shimaenaga_pet_apply_decay(
    handle: ShimaenagaPetHandle,
    now_ms: i64,
) -> ShimaenagaStatus {
    update(handle, now_ms, |engine, state, now| {
        engine.apply_decay(state, now)
    })
}

#[no_mangle]
pub extern "C" fn shimaenaga_pet_feed(handle: ShimaenagaPetHandle, now_ms: i64) -> ShimaenagaStatus {
    perform(handle, Action::Feed, now_ms)
}

/// Returns `InsufficientEnergy` when the pet is too tired to play
#[no_mangle]
pub extern "C" fn shimaenaga_pet_play(handle: ShimaenagaPetHandle, now_ms: i64) -> ShimaenagaStatus {
    perform(handle, Action::Play, now_ms)
}

#[no_mangle]
pub extern "C" fn shimaenaga_pet_rest(handle: ShimaenagaPetHandle, now_ms: i64) -> ShimaenagaStatus {
    perform(handle, Action::Rest, now_ms)
}

#[no_mangle]
pub extern "C" fn shimaenaga_pet_rename(
    handle: ShimaenagaPetHandle,
    name: *const c_char,
) -> ShimaenagaStatus {
    if handle.is_null() || name.is_null() {
        return ShimaenagaStatus::NullPointer;
    }
    let name = match read_str(name) {
        Ok(s) => s,
        Err(status) => return status,
    };

    let pet = unsafe { &mut *handle };
    match pet.engine.rename(&pet.state, name) {
        Ok(next) => {
            pet.state = next;
            ShimaenagaStatus::Ok
        }
        Err(e) => (&e).into(),
    }
}

// ============================================================================
// Query Functions
// ============================================================================

/// Read the current levels. Returns false on a null argument.
#[no_mangle]
pub extern "C" fn shimaenaga_pet_get_levels(
    handle: ShimaenagaPetHandle,
    levels: *mut ShimaenagaLevels,
) -> bool {
    if handle.is_null() || levels.is_null() {
        return false;
    }

    let pet = unsafe { &*handle };
    let out = unsafe { &mut *levels };

    out.hunger = pet.state.hunger();
    out.energy = pet.state.energy();
    out.affection = pet.state.affection();
    out.last_updated_ms = pet.state.last_updated().timestamp_millis();

    true
}

/// Copy the 16-byte pet id into `out`
#[no_mangle]
pub extern "C" fn shimaenaga_pet_copy_id(handle: ShimaenagaPetHandle, out: *mut u8) -> bool {
    if handle.is_null() || out.is_null() {
        return false;
    }

    let pet = unsafe { &*handle };
    let id = pet.state.id();
    let bytes = id.as_bytes();
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), out, bytes.len());
    }
    true
}

/// Copy the name as NUL-terminated UTF-8 into `buf`.
///
/// `out_len` receives the size needed including the terminator.
#[no_mangle]
pub extern "C" fn shimaenaga_pet_copy_name(
    handle: ShimaenagaPetHandle,
    buf: *mut u8,
    cap: usize,
    out_len: *mut usize,
) -> ShimaenagaStatus {
    if handle.is_null() {
        return ShimaenagaStatus::NullPointer;
    }

    let pet = unsafe { &*handle };
    let mut bytes = pet.state.name().as_bytes().to_vec();
    bytes.push(0);
    write_buffer(&bytes, buf, cap, out_len)
}

/// Encode the pet as its JSON record into `buf`.
///
/// Call with a null `buf` and zero `cap` to learn the size via `out_len`.
#[no_mangle]
pub extern "C" fn shimaenaga_pet_serialize(
    handle: ShimaenagaPetHandle,
    buf: *mut u8,
    cap: usize,
    out_len: *mut usize,
) -> ShimaenagaStatus {
    if handle.is_null() {
        return ShimaenagaStatus::NullPointer;
    }

    let pet = unsafe { &*handle };
    let bytes = shimaenaga_core::serialize(&pet.state);
    write_buffer(&bytes, buf, cap, out_len)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_time(now_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(now_ms)
}

fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, ShimaenagaStatus> {
    let cstr = unsafe { CStr::from_ptr(ptr) };
    cstr.to_str().map_err(|_| ShimaenagaStatus::InvalidUtf8)
}

/// Replace the held state with `f`'s result, or leave it alone on error.
fn update<F>(handle: ShimaenagaPetHandle, now_ms: i64, f: F) -> ShimaenagaStatus
where
    F: FnOnce(&PetEngine, &PetState, DateTime<Utc>) -> Result<PetState, PetError>,
{
    if handle.is_null() {
        return ShimaenagaStatus::NullPointer;
    }
    let now = match to_time(now_ms) {
        Some(t) => t,
        None => return ShimaenagaStatus::InvalidTime,
    };

    let pet = unsafe { &mut *handle };
    match f(&pet.engine, &pet.state, now) {
        Ok(next) => {
            pet.state = next;
            ShimaenagaStatus::Ok
        }
        Err(e) => (&e).into(),
    }
}

fn perform(handle: ShimaenagaPetHandle, action: Action, now_ms: i64) -> ShimaenagaStatus {
    update(handle, now_ms, |engine, state, now| {
        engine.perform(state, action, now)
    })
}

fn write_buffer(bytes: &[u8], buf: *mut u8, cap: usize, out_len: *mut usize) -> ShimaenagaStatus {
    if !out_len.is_null() {
        unsafe {
            *out_len = bytes.len();
        }
    }
    if buf.is_null() || cap < bytes.len() {
        return ShimaenagaStatus::BufferTooSmall;
    }
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
    }
    ShimaenagaStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    const T0_MS: i64 = 1_755_734_400_000;

    fn create(name: &str) -> ShimaenagaPetHandle {
        let name = CString::new(name).unwrap();
        let mut handle: ShimaenagaPetHandle = ptr::null_mut();
        assert_eq!(
            shimaenaga_pet_create(name.as_ptr(), T0_MS, &mut handle),
            ShimaenagaStatus::Ok
        );
        assert!(!handle.is_null());
        handle
    }

    fn levels(handle: ShimaenagaPetHandle) -> ShimaenagaLevels {
        let mut levels = ShimaenagaLevels::default();
        assert!(shimaenaga_pet_get_levels(handle, &mut levels));
        levels
    }

    fn serialize(handle: ShimaenagaPetHandle) -> Vec<u8> {
        let mut len = 0usize;
        assert_eq!(
            shimaenaga_pet_serialize(handle, ptr::null_mut(), 0, &mut len),
            ShimaenagaStatus::BufferTooSmall
        );
        let mut buf = vec![0u8; len];
        assert_eq!(
            shimaenaga_pet_serialize(handle, buf.as_mut_ptr(), buf.len(), &mut len),
            ShimaenagaStatus::Ok
        );
        buf
    }

    #[test]
    fn test_create_and_worked_example() {
        let pet = create("Shima");
        let l = levels(pet);
        assert_eq!((l.hunger, l.energy, l.affection), (50.0, 50.0, 50.0));
        assert_eq!(l.last_updated_ms, T0_MS);

        assert_eq!(shimaenaga_pet_feed(pet, T0_MS), ShimaenagaStatus::Ok);
        assert_eq!(
            shimaenaga_pet_apply_decay(pet, T0_MS + 300_000),
            ShimaenagaStatus::Ok
        );
        let l = levels(pet);
        assert_eq!((l.hunger, l.energy, l.affection), (69.0, 49.0, 50.0));

        shimaenaga_pet_destroy(pet);
    }

    #[test]
    fn test_create_rejects_blank_and_null() {
        let blank = CString::new("   ").unwrap();
        let mut handle: ShimaenagaPetHandle = ptr::null_mut();
        assert_eq!(
            shimaenaga_pet_create(blank.as_ptr(), T0_MS, &mut handle),
            ShimaenagaStatus::InvalidName
        );
        assert!(handle.is_null());
        assert_eq!(
            shimaenaga_pet_create(ptr::null(), T0_MS, &mut handle),
            ShimaenagaStatus::NullPointer
        );
    }

    #[test]
    fn test_invalid_utf8_name() {
        let bytes = [0xffu8, 0xfe, 0x00];
        let mut handle: ShimaenagaPetHandle = ptr::null_mut();
        assert_eq!(
            shimaenaga_pet_create(bytes.as_ptr() as *const c_char, T0_MS, &mut handle),
            ShimaenagaStatus::InvalidUtf8
        );
    }

    #[test]
    fn test_failed_calls_leave_state_alone() {
        let pet = create("Shima");
        assert_eq!(
            shimaenaga_pet_apply_decay(pet, T0_MS + 24 * 3_600_000),
            ShimaenagaStatus::Ok
        );
        let before = levels(pet);

        assert_eq!(
            shimaenaga_pet_play(pet, T0_MS + 24 * 3_600_000),
            ShimaenagaStatus::InsufficientEnergy
        );
        assert_eq!(shimaenaga_pet_feed(pet, T0_MS), ShimaenagaStatus::InvalidTime);
        assert_eq!(
            shimaenaga_pet_apply_decay(pet, i64::MAX),
            ShimaenagaStatus::InvalidTime
        );

        let after = levels(pet);
        assert_eq!(before.hunger, after.hunger);
        assert_eq!(before.energy, after.energy);
        assert_eq!(before.last_updated_ms, after.last_updated_ms);

        shimaenaga_pet_destroy(pet);
    }

    #[test]
    fn test_rest_then_play() {
        let pet = create("Shima");
        assert_eq!(shimaenaga_pet_rest(pet, T0_MS), ShimaenagaStatus::Ok);
        assert_eq!(shimaenaga_pet_play(pet, T0_MS), ShimaenagaStatus::Ok);
        let l = levels(pet);
        assert_eq!((l.energy, l.affection), (90.0, 65.0));
        shimaenaga_pet_destroy(pet);
    }

    #[test]
    fn test_rename_and_copy_name() {
        let pet = create("Shima");
        let name = CString::new("Enaga").unwrap();
        assert_eq!(shimaenaga_pet_rename(pet, name.as_ptr()), ShimaenagaStatus::Ok);

        let mut len = 0usize;
        let mut small = [0u8; 2];
        assert_eq!(
            shimaenaga_pet_copy_name(pet, small.as_mut_ptr(), small.len(), &mut len),
            ShimaenagaStatus::BufferTooSmall
        );
        assert_eq!(len, 6);

        let mut buf = vec![0u8; len];
        assert_eq!(
            shimaenaga_pet_copy_name(pet, buf.as_mut_ptr(), buf.len(), &mut len),
            ShimaenagaStatus::Ok
        );
        assert_eq!(&buf, b"Enaga\0");
        shimaenaga_pet_destroy(pet);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let pet = create("Shima");
        assert_eq!(shimaenaga_pet_play(pet, T0_MS + 1_234), ShimaenagaStatus::Ok);
        assert_eq!(
            shimaenaga_pet_apply_decay(pet, T0_MS + 777_777),
            ShimaenagaStatus::Ok
        );
        let bytes = serialize(pet);

        let mut restored: ShimaenagaPetHandle = ptr::null_mut();
        assert_eq!(
            shimaenaga_pet_deserialize(bytes.as_ptr(), bytes.len(), &mut restored),
            ShimaenagaStatus::Ok
        );

        let (a, b) = (levels(pet), levels(restored));
        assert_eq!(a.hunger, b.hunger);
        assert_eq!(a.energy, b.energy);
        assert_eq!(a.affection, b.affection);
        assert_eq!(a.last_updated_ms, b.last_updated_ms);

        let mut id_a = [0u8; 16];
        let mut id_b = [0u8; 16];
        assert!(shimaenaga_pet_copy_id(pet, id_a.as_mut_ptr()));
        assert!(shimaenaga_pet_copy_id(restored, id_b.as_mut_ptr()));
        assert_eq!(id_a, id_b);

        shimaenaga_pet_destroy(pet);
        shimaenaga_pet_destroy(restored);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let garbage = b"{\"hunger\": 500}";
        let mut handle: ShimaenagaPetHandle = ptr::null_mut();
        assert_eq!(
            shimaenaga_pet_deserialize(garbage.as_ptr(), garbage.len(), &mut handle),
            ShimaenagaStatus::DecodeError
        );
        assert!(handle.is_null());
        assert_eq!(
            shimaenaga_pet_deserialize(ptr::null(), 0, &mut handle),
            ShimaenagaStatus::DecodeError
        );
    }

    #[test]
    fn test_null_handles() {
        assert_eq!(
            shimaenaga_pet_feed(ptr::null_mut(), T0_MS),
            ShimaenagaStatus::NullPointer
        );
        assert!(!shimaenaga_pet_get_levels(ptr::null_mut(), ptr::null_mut()));
        shimaenaga_pet_destroy(ptr::null_mut());
    }
}
