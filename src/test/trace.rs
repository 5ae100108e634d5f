use crate::sim::{RunConfig, SlotTrace, WarmupPolicy, run_observed};
use serde_json::Value;

fn traced(cfg: &RunConfig, trace: SlotTrace) -> SlotTrace {
    let mut trace = trace;
    run_observed(cfg, &mut trace).expect("run");
    trace
}

#[test]
fn trace_respects_limit() {
    let cfg = RunConfig::new(3, 0.5)
        .with_slots(100)
        .with_warmup(WarmupPolicy::Fixed(0));
    let trace = traced(&cfg, SlotTrace::new().with_limit(10));
    assert_eq!(trace.events.len(), 10);
    assert_eq!(trace.events.last().map(|e| e.slot), Some(9));
    assert!(trace.events.iter().all(|e| e.voq.is_none()));
}

#[test]
fn trace_with_matrix_records_post_service_state() {
    let cfg = RunConfig::new(2, 0.8)
        .with_slots(20)
        .with_warmup(WarmupPolicy::Fixed(0))
        .with_seed(4);
    let trace = traced(&cfg, SlotTrace::new().with_matrix(true));
    for e in &trace.events {
        let voq = e.voq.as_ref().expect("matrix");
        let size: u64 = voq.iter().flatten().sum();
        assert_eq!(size, e.sample.queue_length);
        assert_eq!(e.scheduled, e.matching.is_some());
    }
}

#[test]
fn trace_json_omits_matching_for_idle_slots() {
    let cfg = RunConfig::new(2, 0.0)
        .with_slots(3)
        .with_warmup(WarmupPolicy::Fixed(0));
    let trace = traced(&cfg, SlotTrace::new());
    let v: Value = serde_json::from_str(&trace.to_json().expect("json")).expect("parse");
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 3);
    for ev in arr {
        assert_eq!(ev.get("scheduled").and_then(|x| x.as_bool()), Some(false));
        assert!(ev.get("matching").is_none());
        assert!(ev.get("voq").is_none());
        assert_eq!(ev.get("queue_length").and_then(|x| x.as_u64()), Some(0));
        assert_eq!(ev.get("schedule_weight").and_then(|x| x.as_u64()), Some(0));
    }
}
