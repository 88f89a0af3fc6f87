// ABOUTME: Property tests for traffic policy validation.
// ABOUTME: Weight-sum and order-insensitivity invariants under proptest.

use nonempty::NonEmpty;
use proptest::prelude::*;
use strato::platform::TrafficTarget;
use strato::release::{PolicyError, TrafficPolicy};
use strato::types::RevisionId;

fn targets_from_weights(weights: &[u8]) -> NonEmpty<TrafficTarget> {
    let targets: Vec<TrafficTarget> = weights
        .iter()
        .enumerate()
        .map(|(i, &percent)| TrafficTarget::new(RevisionId::new(format!("rev-{i}")), percent))
        .collect();
    NonEmpty::from_vec(targets).expect("weights vector is non-empty")
}

proptest! {
    /// Validation accepts exactly the splits whose positive weights sum
    /// to 100. Revisions are distinct by construction here, so the only
    /// shape violations are weight violations.
    #[test]
    fn construction_agrees_with_the_weight_invariant(
        weights in prop::collection::vec(0u8..=120, 1..6)
    ) {
        let sum: u32 = weights.iter().map(|&w| u32::from(w)).sum();
        let has_zero = weights.contains(&0);

        let result = TrafficPolicy::new(targets_from_weights(&weights));

        match result {
            Ok(_) => {
                prop_assert_eq!(sum, 100);
                prop_assert!(!has_zero);
            }
            Err(PolicyError::ZeroWeight(_)) => prop_assert!(has_zero),
            Err(PolicyError::WeightSum { sum: reported }) => {
                prop_assert!(!has_zero);
                prop_assert_eq!(reported, sum);
                prop_assert_ne!(sum, 100);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// A policy matches any permutation of its own targets.
    #[test]
    fn matching_ignores_target_order(
        permutation in Just(vec![
            ("rev-0", 25u8), ("rev-1", 35u8), ("rev-2", 40u8),
        ]).prop_shuffle()
    ) {
        let policy = TrafficPolicy::new(targets_from_weights(&[25, 35, 40]))
            .expect("policy should validate");

        let shuffled: Vec<TrafficTarget> = permutation
            .iter()
            .map(|&(id, percent)| TrafficTarget::new(RevisionId::new(id), percent))
            .collect();

        prop_assert!(policy.matches(&shuffled));
    }

    /// Dropping any target from a split breaks the match.
    #[test]
    fn matching_requires_every_target(index in 0usize..3) {
        let policy = TrafficPolicy::new(targets_from_weights(&[25, 35, 40]))
            .expect("policy should validate");

        let mut current: Vec<TrafficTarget> = (0..3)
            .map(|i| TrafficTarget::new(RevisionId::new(format!("rev-{i}")), [25, 35, 40][i]))
            .collect();
        current.remove(index);

        prop_assert!(!policy.matches(&current));
    }
}
