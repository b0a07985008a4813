//! Shimaenaga Headless Simulation Harness
//!
//! Replays pet scenarios against the pure engine and checks every
//! invariant. Runs entirely in-process without the app shell or storage.
//!
//! Usage:
//!   cargo run -p shimaenaga-simtest
//!   cargo run -p shimaenaga-simtest -- --verbose --seed 7
//!   cargo run -p shimaenaga-simtest -- --config data/engine_config.json

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shimaenaga_core::actions::Action;
use shimaenaga_core::persistence::{self, load_pet, save_pet};
use shimaenaga_core::prelude::*;

// ── Shipped tuning (same JSON the app bundles) ──────────────────────────
const ENGINE_CONFIG_JSON: &str = include_str!("../../../data/engine_config.json");

const RANDOM_SESSION_STEPS: usize = 10_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    seed: u64,
    config_path: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        verbose: false,
        seed: 42,
        config_path: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = value
                    .parse()
                    .map_err(|e| format!("invalid --seed {}: {}", value, e))?;
            }
            "--config" => {
                args.config_path = Some(iter.next().ok_or("--config needs a path")?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn load_engine(path: Option<&str>) -> Result<PetEngine, String> {
    let config = match path {
        Some(p) => {
            let json = std::fs::read_to_string(p).map_err(|e| format!("{}: {}", p, e))?;
            EngineConfig::from_json_str(&json).map_err(|e| format!("{}: {}", p, e))?
        }
        None => EngineConfig::default(),
    };
    PetEngine::new(config).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shimaenaga=info".into()),
        )
        .init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let engine = match load_engine(args.config_path.as_deref()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    log::info!("engine config: {:?}", engine.config());

    println!("=== Shimaenaga Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Shipped config file
    results.extend(validate_shipped_config(args.verbose));

    // 2. Creation
    results.extend(validate_creation(&engine));

    // 3. Worked example (default tuning only)
    results.extend(validate_worked_example());

    // 4. Decay behaviour
    results.extend(validate_decay(&engine));

    // 5. Actions
    results.extend(validate_actions(&engine));

    // 6. Neglect over a day
    results.extend(validate_neglect(&engine, args.verbose));

    // 7. Persistence
    results.extend(validate_persistence(&engine));

    // 8. Seeded random session
    results.extend(validate_random_session(&engine, args.seed, args.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_755_734_400, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn in_bounds(pet: &PetState) -> bool {
    Need::ALL
        .iter()
        .all(|&n| (0.0..=100.0).contains(&pet.level(n)))
}

// ── 1. Shipped Config ───────────────────────────────────────────────────

fn validate_shipped_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Shipped Config ---");
    let mut results = Vec::new();

    let config = match EngineConfig::from_json_str(ENGINE_CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("config error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "config_matches_defaults".into(),
        passed: config == EngineConfig::default(),
        detail: "data/engine_config.json equals EngineConfig::default()".into(),
    });

    if verbose {
        println!("  {:?}", config);
    }

    results
}

// ── 2. Creation ─────────────────────────────────────────────────────────

fn validate_creation(engine: &PetEngine) -> Vec<TestResult> {
    println!("--- Creation ---");
    let mut results = Vec::new();
    let initial = engine.config().initial_level;

    match engine.create_at("Shima", t0()) {
        Ok(pet) => {
            let all_initial = Need::ALL.iter().all(|&n| pet.level(n) == initial);
            results.push(TestResult {
                name: "create_initial_levels".into(),
                passed: all_initial,
                detail: format!(
                    "hunger={} energy={} affection={} (expected {})",
                    pet.hunger(),
                    pet.energy(),
                    pet.affection(),
                    initial
                ),
            });
        }
        Err(e) => results.push(TestResult {
            name: "create_initial_levels".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    for name in ["", "   ", "\t\n"] {
        let rejected = matches!(engine.create_at(name, t0()), Err(PetError::InvalidName));
        results.push(TestResult {
            name: format!("create_rejects_{:?}", name),
            passed: rejected,
            detail: "blank names are refused".into(),
        });
    }

    let a = engine.create_at("Shima", t0());
    let b = engine.create_at("Shima", t0());
    let distinct = matches!((&a, &b), (Ok(a), Ok(b)) if a.id() != b.id());
    results.push(TestResult {
        name: "create_unique_ids".into(),
        passed: distinct,
        detail: "two pets with the same name get different ids".into(),
    });

    results
}

// ── 3. Worked Example ───────────────────────────────────────────────────

fn validate_worked_example() -> Vec<TestResult> {
    println!("--- Worked Example ---");
    let engine = PetEngine::default();

    let outcome = engine
        .create_at("Shima", t0())
        .and_then(|p| engine.feed(&p, t0()))
        .and_then(|p| engine.apply_decay(&p, t0() + Duration::seconds(300)));

    let (passed, detail) = match outcome {
        Ok(p) => (
            p.hunger() == 69.0 && p.energy() == 49.0 && p.affection() == 50.0,
            format!(
                "create → feed → +300s gives hunger={} energy={} affection={}",
                p.hunger(),
                p.energy(),
                p.affection()
            ),
        ),
        Err(e) => (false, e.to_string()),
    };

    vec![TestResult {
        name: "worked_example".into(),
        passed,
        detail,
    }]
}

// ── 4. Decay ────────────────────────────────────────────────────────────

fn validate_decay(engine: &PetEngine) -> Vec<TestResult> {
    println!("--- Decay ---");
    let mut results = Vec::new();

    let pet = match engine.create_at("Shima", t0()) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "decay_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let later = t0() + Duration::minutes(47);
    let idempotent = match engine.apply_decay(&pet, later) {
        Ok(once) => engine.apply_decay(&once, later).map(|twice| twice == once),
        Err(e) => Err(e),
    };
    results.push(TestResult {
        name: "decay_idempotent".into(),
        passed: matches!(idempotent, Ok(true)),
        detail: "second decay with the same now is a no-op".into(),
    });

    let noop = engine.apply_decay(&pet, t0());
    results.push(TestResult {
        name: "decay_zero_elapsed".into(),
        passed: matches!(&noop, Ok(p) if *p == pet),
        detail: "decay at last_updated leaves the pet unchanged".into(),
    });

    let backwards = engine.apply_decay(&pet, t0() - Duration::seconds(1));
    results.push(TestResult {
        name: "decay_clock_backwards".into(),
        passed: matches!(backwards, Err(PetError::InvalidTime { .. })),
        detail: "decay one second into the past is rejected".into(),
    });

    let affection_kept = engine
        .apply_decay(&pet, t0() + Duration::days(3))
        .map(|p| p.affection() == pet.affection());
    results.push(TestResult {
        name: "decay_spares_affection".into(),
        passed: matches!(affection_kept, Ok(true)),
        detail: "affection does not decay".into(),
    });

    results
}

// ── 5. Actions ──────────────────────────────────────────────────────────

fn validate_actions(engine: &PetEngine) -> Vec<TestResult> {
    println!("--- Actions ---");
    let mut results = Vec::new();
    let config = engine.config().clone();

    let pet = match engine.create_at("Shima", t0()) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "actions_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let fed = engine.feed(&pet, t0());
    let expected_hunger = (pet.hunger() + config.feed_amount).min(100.0);
    results.push(TestResult {
        name: "feed_raises_hunger".into(),
        passed: matches!(&fed, Ok(p) if p.hunger() == expected_hunger
            && p.energy() == pet.energy()
            && p.affection() == pet.affection()),
        detail: format!("hunger {} → {}", pet.hunger(), expected_hunger),
    });

    let rested = engine.rest(&pet, t0());
    results.push(TestResult {
        name: "rest_restores_energy".into(),
        passed: matches!(&rested, Ok(p) if p.energy() == 100.0),
        detail: "energy restored to 100".into(),
    });

    // Drain energy below the play threshold, then try to play.
    let drained = engine.apply_decay(&pet, t0() + Duration::days(1));
    let refused = match &drained {
        Ok(d) if d.energy() < config.play_min_energy => {
            matches!(engine.play(d, d.last_updated()), Err(PetError::InsufficientEnergy { .. }))
        }
        _ => false,
    };
    results.push(TestResult {
        name: "play_needs_energy".into(),
        passed: refused,
        detail: format!("play refused below {} energy", config.play_min_energy),
    });

    let renamed = engine.rename(&pet, "Enaga");
    results.push(TestResult {
        name: "rename_keeps_identity".into(),
        passed: matches!(&renamed, Ok(p) if p.name() == "Enaga" && p.id() == pet.id()),
        detail: "rename changes only the name".into(),
    });

    results
}

// ── 6. Neglect ──────────────────────────────────────────────────────────

fn validate_neglect(engine: &PetEngine, verbose: bool) -> Vec<TestResult> {
    println!("--- Neglect (24h, hourly decay) ---");
    let mut results = Vec::new();

    let mut pet = match engine.create_at("Shima", t0()) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "neglect_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut monotonic = true;
    let mut bounded = true;
    for hour in 1..=24 {
        let now = t0() + Duration::hours(hour);
        match engine.apply_decay(&pet, now) {
            Ok(next) => {
                monotonic &= next.hunger() <= pet.hunger() && next.energy() <= pet.energy();
                bounded &= in_bounds(&next);
                pet = next;
            }
            Err(e) => {
                results.push(TestResult {
                    name: "neglect_decay".into(),
                    passed: false,
                    detail: format!("hour {}: {}", hour, e),
                });
                return results;
            }
        }
        if verbose && hour % 6 == 0 {
            println!(
                "  h{:02}: hunger={:.1} energy={:.1} affection={:.1} urgent={:?}",
                hour,
                pet.hunger(),
                pet.energy(),
                pet.affection(),
                pet.most_urgent_need(25.0)
            );
        }
    }

    results.push(TestResult {
        name: "neglect_monotonic".into(),
        passed: monotonic,
        detail: "hunger and energy never rise without an action".into(),
    });
    results.push(TestResult {
        name: "neglect_bounded".into(),
        passed: bounded && pet.hunger() >= 0.0 && pet.energy() >= 0.0,
        detail: format!(
            "after 24h hunger={:.1} energy={:.1}",
            pet.hunger(),
            pet.energy()
        ),
    });

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(engine: &PetEngine) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let pet = engine
        .create_at("Shima", t0())
        .and_then(|p| engine.play(&p, t0() + Duration::seconds(42)))
        .and_then(|p| engine.apply_decay(&p, t0() + Duration::milliseconds(987_654)));
    let pet = match pet {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "persistence_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let json = persistence::serialize(&pet);
    let json_ok = matches!(persistence::deserialize(&json), Ok(ref p) if *p == pet);
    results.push(TestResult {
        name: "json_roundtrip".into(),
        passed: json_ok,
        detail: format!("{} bytes", json.len()),
    });

    let mut save_buffer = Vec::new();
    let binary_ok = save_pet(&mut save_buffer, &pet).is_ok()
        && matches!(load_pet(&save_buffer[..]), Ok(ref p) if *p == pet);
    results.push(TestResult {
        name: "binary_roundtrip".into(),
        passed: binary_ok,
        detail: format!("{} bytes", save_buffer.len()),
    });

    let malformed: [(&str, &[u8]); 3] = [
        ("garbage", b"not a pet"),
        (
            "level_out_of_range",
            br#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","name":"Shima","hunger":101,"energy":50,"affection":50,"last_updated":0}"#,
        ),
        (
            "string_timestamp",
            br#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","name":"Shima","hunger":50,"energy":50,"affection":50,"last_updated":"noon"}"#,
        ),
    ];
    for (label, bytes) in malformed {
        let rejected = persistence::deserialize(bytes).is_err();
        results.push(TestResult {
            name: format!("decode_rejects_{}", label),
            passed: rejected,
            detail: "malformed record refused".into(),
        });
    }

    results
}

// ── 8. Random Session ───────────────────────────────────────────────────

fn validate_random_session(engine: &PetEngine, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Session (seed {}) ---", seed);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let first = match engine.create_at("Shima", t0()) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "random_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut pet = first.clone();
    let mut now = t0();
    let mut violations = Vec::new();
    let mut accepted = [0usize; 3];
    let mut refused_energy = 0usize;
    let mut refused_time = 0usize;

    for step in 0..RANDOM_SESSION_STEPS {
        let before = pet.clone();

        // Occasionally hand the engine a stale timestamp.
        let stamp = if rng.gen_bool(0.05) {
            now - Duration::seconds(rng.gen_range(1..600))
        } else {
            now += Duration::milliseconds(rng.gen_range(0..45 * 60 * 1000));
            now
        };

        let outcome = match rng.gen_range(0..4) {
            0 => engine.apply_decay(&pet, stamp).map(|p| (None, p)),
            n => {
                let action = Action::ALL[n - 1];
                engine.perform(&pet, action, stamp).map(|p| (Some(action), p))
            }
        };

        match outcome {
            Ok((action, next)) => {
                if let Some(action) = action {
                    accepted[action as usize] += 1;
                }
                pet = next;
            }
            Err(PetError::InsufficientEnergy { energy, required }) => {
                refused_energy += 1;
                if energy >= required {
                    violations.push(format!("step {}: refused play at {:.1}", step, energy));
                }
            }
            Err(PetError::InvalidTime { .. }) => refused_time += 1,
            Err(e) => violations.push(format!("step {}: unexpected {}", step, e)),
        }

        if !in_bounds(&pet) {
            violations.push(format!("step {}: level out of bounds {:?}", step, pet));
        }
        if pet.last_updated() < before.last_updated() {
            violations.push(format!("step {}: timestamp went backwards", step));
        }
        if pet.id() != first.id() {
            violations.push(format!("step {}: id changed", step));
        }
    }

    results.push(TestResult {
        name: "random_session_invariants".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            format!("{} steps, no violations", RANDOM_SESSION_STEPS)
        } else {
            format!("{} violations, first: {}", violations.len(), violations[0])
        },
    });

    results.push(TestResult {
        name: "random_session_rejections_seen".into(),
        passed: refused_time > 0,
        detail: format!(
            "{} stale timestamps refused, {} plays refused for energy",
            refused_time, refused_energy
        ),
    });

    let saved = persistence::serialize(&pet);
    results.push(TestResult {
        name: "random_session_final_roundtrip".into(),
        passed: matches!(persistence::deserialize(&saved), Ok(ref p) if *p == pet),
        detail: "final state survives a JSON round trip".into(),
    });

    if verbose {
        println!(
            "  accepted: feed={} play={} rest={}",
            accepted[0], accepted[1], accepted[2]
        );
        println!(
            "  final: hunger={:.2} energy={:.2} affection={:.2}",
            pet.hunger(),
            pet.energy(),
            pet.affection()
        );
    }

    results
}
