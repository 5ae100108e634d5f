use crate::sim::{RunConfig, SimError, TrafficParams, WarmupPolicy};

fn invalid_name(err: SimError) -> &'static str {
    match err {
        SimError::InvalidParameter { name, .. } => name,
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn traffic_params_derive_per_cell_arrival_rate() {
    let p = TrafficParams::new(4, 0.8, 1.0).expect("params");
    assert_eq!(p.n(), 4);
    assert!((p.lambda() - 0.2).abs() < 1e-12);
    // 每行/每列期望到达率 nλ = ρ < 1
    assert!((p.lambda() * p.n() as f64 - p.rho()).abs() < 1e-12);
}

#[test]
fn traffic_params_reject_out_of_range_values() {
    assert_eq!(invalid_name(TrafficParams::new(0, 0.5, 1.0).unwrap_err()), "n");
    assert_eq!(invalid_name(TrafficParams::new(2, 1.0, 1.0).unwrap_err()), "rho");
    assert_eq!(invalid_name(TrafficParams::new(2, -0.1, 1.0).unwrap_err()), "rho");
    assert_eq!(invalid_name(TrafficParams::new(2, f64::NAN, 1.0).unwrap_err()), "rho");
    assert_eq!(invalid_name(TrafficParams::new(2, 0.5, 1.5).unwrap_err()), "mu");
    assert_eq!(invalid_name(TrafficParams::new(2, 0.5, -0.5).unwrap_err()), "mu");
    assert!(TrafficParams::new(1, 0.0, 0.0).is_ok());
    assert!(TrafficParams::new(1, 0.999, 1.0).is_ok());
}

#[test]
fn heuristic_warmup_scales_with_size_and_load() {
    let auto = WarmupPolicy::default();
    assert_eq!(auto.resolve(2, 0.5).expect("resolve"), 16);
    assert_eq!(auto.resolve(15, 0.7).expect("resolve"), 2500);
    let doubled = WarmupPolicy::Heuristic { scale: 2.0 };
    assert_eq!(doubled.resolve(2, 0.5).expect("resolve"), 32);
    assert_eq!(WarmupPolicy::Fixed(123).resolve(50, 0.99).expect("resolve"), 123);
    assert!(WarmupPolicy::Heuristic { scale: -1.0 }.resolve(2, 0.5).is_err());
}

#[test]
fn warmup_policy_parses_cli_spelling() {
    assert_eq!("auto".parse::<WarmupPolicy>().expect("auto"), WarmupPolicy::default());
    assert_eq!(
        "auto:0.5".parse::<WarmupPolicy>().expect("auto:0.5"),
        WarmupPolicy::Heuristic { scale: 0.5 }
    );
    assert_eq!("1000".parse::<WarmupPolicy>().expect("1000"), WarmupPolicy::Fixed(1000));
    assert!("soon".parse::<WarmupPolicy>().is_err());
    assert!("auto:x".parse::<WarmupPolicy>().is_err());

    assert_eq!(WarmupPolicy::Fixed(7).to_string(), "7");
    assert_eq!(WarmupPolicy::default().to_string(), "auto");
    assert_eq!(WarmupPolicy::Heuristic { scale: 0.5 }.to_string(), "auto:0.5");
}

#[test]
fn run_config_parses_minimal_json_with_defaults() {
    let raw = r#"{ "n": 3, "rho": 0.6 }"#;
    let cfg: RunConfig = serde_json::from_str(raw).expect("parse config");
    assert_eq!(cfg, RunConfig::new(3, 0.6));
    assert_eq!(cfg.mu, 1.0);
    assert_eq!(cfg.slots, 10_000);
    assert_eq!(cfg.seed, 0);
    assert_eq!(cfg.warmup, WarmupPolicy::Heuristic { scale: 1.0 });
}

#[test]
fn run_config_parses_both_warmup_forms() {
    let raw = r#"{ "n": 3, "rho": 0.6, "warmup": 250, "seed": 5, "slots": 900, "mu": 0.9 }"#;
    let cfg: RunConfig = serde_json::from_str(raw).expect("parse config");
    assert_eq!(cfg.warmup, WarmupPolicy::Fixed(250));
    assert_eq!(cfg.seed, 5);
    assert_eq!(cfg.slots, 900);
    assert_eq!(cfg.mu, 0.9);

    let raw = r#"{ "n": 3, "rho": 0.6, "warmup": { "scale": 3.0 } }"#;
    let cfg: RunConfig = serde_json::from_str(raw).expect("parse config");
    assert_eq!(cfg.warmup, WarmupPolicy::Heuristic { scale: 3.0 });
}

#[test]
fn run_config_validation_rejects_zero_slots() {
    let cfg = RunConfig::new(2, 0.5).with_slots(0);
    assert_eq!(invalid_name(cfg.validate().unwrap_err()), "slots");

    let (params, warmup) = RunConfig::new(2, 0.5)
        .with_warmup(WarmupPolicy::Fixed(3))
        .validate()
        .expect("valid");
    assert_eq!(params.n(), 2);
    assert_eq!(warmup, 3);
}
