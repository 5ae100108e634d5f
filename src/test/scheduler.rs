use crate::switch::{BernoulliArrivals, MaxWeightScheduler, Service, VoqState};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn voq_from(rows: &[&[u64]]) -> VoqState {
    let mut voq = VoqState::new(rows.len());
    for (i, row) in rows.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            for _ in 0..count {
                voq.enqueue(i, j);
            }
        }
    }
    voq
}

#[test]
fn zero_arrival_rate_never_adds_packets() {
    let arrivals = BernoulliArrivals::new(0.0).expect("lambda");
    let mut rng = StdRng::seed_from_u64(1);
    let mut voq = VoqState::new(4);
    for _ in 0..100 {
        assert_eq!(arrivals.arrive(&mut rng, &mut voq), 0);
    }
    assert!(voq.is_empty());
}

#[test]
fn unit_arrival_rate_fills_every_voq() {
    let arrivals = BernoulliArrivals::new(1.0).expect("lambda");
    let mut rng = StdRng::seed_from_u64(1);
    let mut voq = VoqState::new(3);
    assert_eq!(arrivals.arrive(&mut rng, &mut voq), 9);
    assert_eq!(voq.rows(), vec![vec![1; 3]; 3]);
    assert_eq!(voq.size(), 9);
}

#[test]
fn arrivals_count_matches_size_increase() {
    let arrivals = BernoulliArrivals::new(0.3).expect("lambda");
    let mut rng = StdRng::seed_from_u64(42);
    let mut voq = VoqState::new(5);
    for _ in 0..200 {
        let before = voq.size();
        let added = arrivals.arrive(&mut rng, &mut voq);
        assert_eq!(voq.size(), before + added);
        assert_eq!(voq.size(), voq.recount());
    }
}

#[test]
fn invalid_probabilities_are_rejected() {
    assert!(BernoulliArrivals::new(1.5).is_err());
    assert!(BernoulliArrivals::new(-0.1).is_err());
    assert!(MaxWeightScheduler::new(f64::NAN).is_err());
}

#[test]
fn empty_switch_is_not_served_and_consumes_no_randomness() {
    let scheduler = MaxWeightScheduler::new(0.5).expect("mu");
    let mut rng = StdRng::seed_from_u64(9);
    let mut reference = rng.clone();
    let mut voq = VoqState::new(3);

    let service = scheduler.serve(&mut rng, &mut voq).expect("serve");
    assert_eq!(service, Service::idle());
    assert!(service.matching.is_none());
    assert_eq!(rng.next_u64(), reference.next_u64());
}

#[test]
fn failed_service_trial_leaves_queues_untouched() {
    let scheduler = MaxWeightScheduler::new(0.0).expect("mu");
    let mut rng = StdRng::seed_from_u64(3);
    let mut voq = voq_from(&[&[2, 0], &[0, 1]]);
    for _ in 0..20 {
        let service = scheduler.serve(&mut rng, &mut voq).expect("serve");
        assert!(!service.attempted);
        assert_eq!(service.weight, 0);
    }
    assert_eq!(voq.rows(), vec![vec![2, 0], vec![0, 1]]);
}

#[test]
fn serves_max_weight_matching_and_counts_pre_decrement_weight() {
    let scheduler = MaxWeightScheduler::new(1.0).expect("mu");
    let mut rng = StdRng::seed_from_u64(0);
    let mut voq = voq_from(&[&[3, 1], &[2, 1]]);

    let service = scheduler.serve(&mut rng, &mut voq).expect("serve");
    assert!(service.attempted);
    // 候选：(0,0)+(1,1)=4，(0,1)+(1,0)=3
    assert_eq!(
        service.matching.as_ref().map(|m| m.assignment().to_vec()),
        Some(vec![0, 1])
    );
    assert_eq!(service.weight, 4);
    assert_eq!(service.served, 2);
    assert_eq!(voq.rows(), vec![vec![2, 1], vec![2, 0]]);
    assert_eq!(voq.size(), 5);
}

#[test]
fn zero_cells_in_matching_are_skipped() {
    let scheduler = MaxWeightScheduler::new(1.0).expect("mu");
    let mut rng = StdRng::seed_from_u64(0);
    let mut voq = voq_from(&[&[2, 0, 0], &[0, 0, 0], &[0, 0, 0]]);

    let service = scheduler.serve(&mut rng, &mut voq).expect("serve");
    let matching = service.matching.expect("matching");
    assert!(matching.is_permutation());
    assert_eq!(matching.output_of(0), Some(0));
    assert_eq!(service.served, 1);
    assert_eq!(service.weight, 2);
    assert_eq!(voq.size(), 1);
}

#[test]
fn service_conserves_packets() {
    let arrivals = BernoulliArrivals::new(0.2).expect("lambda");
    let scheduler = MaxWeightScheduler::new(0.9).expect("mu");
    let mut rng = StdRng::seed_from_u64(2024);
    let mut voq = VoqState::new(4);

    for _ in 0..500 {
        arrivals.arrive(&mut rng, &mut voq);
        let before = voq.size();
        let service = scheduler.serve(&mut rng, &mut voq).expect("serve");
        assert_eq!(voq.size(), before - service.served);
        assert_eq!(voq.size(), voq.recount());
        assert!(service.served <= 4);
        // 每个被服务的 VOQ 出队前至少为 1
        assert!(service.weight >= service.served);
    }
}
