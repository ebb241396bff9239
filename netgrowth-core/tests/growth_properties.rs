//! Property-based checks of the growth loop over random configurations.

use std::collections::HashSet;

use netgrowth_core::{
    Attachment, GrowthConfig, GrowthSimulator, SaturationPolicy, SnapshotRecorder,
};
use proptest::prelude::*;
use rstest::rstest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn config_strategy() -> impl Strategy<Value = GrowthConfig> {
    (
        2_usize..60,
        1_u32..10,
        0.0_f64..=1.0,
        any::<bool>(),
        any::<bool>(),
        any::<u64>(),
        prop_oneof![
            Just(SaturationPolicy::Checkpoint),
            Just(SaturationPolicy::StrictCap)
        ],
    )
        .prop_map(
            |(nodes, threshold, p, directed, preferential, seed, policy)| GrowthConfig {
                target_node_count: nodes,
                saturation_threshold: threshold,
                directed,
                attachment: if preferential {
                    Attachment::preferential()
                } else {
                    Attachment::uniform(p).unwrap_or_default()
                },
                seed: Some(seed),
                saturation_policy: policy,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn final_graph_has_contiguous_ids(cfg in config_strategy()) {
        let target = cfg.target_node_count;
        let mut sim = GrowthSimulator::new(cfg).expect("strategy yields valid configs");
        let summary = sim.run_to_end().expect("built-in rules never fail");

        prop_assert_eq!(summary.nodes, target);
        let expected_ids = (0..target).collect::<Vec<_>>();
        prop_assert_eq!(sim.candidates(), expected_ids.as_slice());
        for (i, node) in sim.graph().nodes().iter().enumerate() {
            prop_assert_eq!(node.id, i);
        }
    }

    #[test]
    fn edges_are_simple(cfg in config_strategy()) {
        let mut sim = GrowthSimulator::new(cfg).expect("valid config");
        sim.run_to_end().expect("run");

        let edges: Vec<_> = sim.graph().edges().collect();
        let unique: HashSet<_> = edges.iter().copied().collect();
        prop_assert_eq!(unique.len(), edges.len());
        prop_assert_eq!(edges.len(), sim.graph().edge_count());
        prop_assert!(edges.iter().all(|(a, b)| a != b));
    }

    #[test]
    fn saturation_only_grows(cfg in config_strategy()) {
        let mut sim = GrowthSimulator::new(cfg).expect("valid config");
        let mut previous = sim.saturated().as_slice().to_vec();

        while let Some(outcome) = sim.step().expect("step") {
            let current = sim.saturated().as_slice();
            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current[..previous.len()], previous.as_slice());
            prop_assert_eq!(&current[previous.len()..], outcome.newly_saturated.as_slice());
            previous = current.to_vec();
        }
    }

    #[test]
    fn checkpoint_overshoot_is_limited_to_the_arrival_step(mut cfg in config_strategy()) {
        cfg.directed = false;
        cfg.saturation_policy = SaturationPolicy::Checkpoint;
        let threshold = cfg.saturation_threshold as usize;
        let mut sim = GrowthSimulator::new(cfg).expect("valid config");

        // Seed nodes arrive with one edge each.
        let mut arrival_degree = vec![1, 1];
        while let Some(outcome) = sim.step().expect("step") {
            arrival_degree.push(outcome.edges_added.len());
        }

        for (node, &arrived_with) in arrival_degree.iter().enumerate() {
            let degree = sim.graph().degree(node);
            prop_assert!(
                degree <= threshold.max(arrived_with),
                "node {} has degree {} (threshold {}, arrived with {})",
                node, degree, threshold, arrived_with
            );
        }
    }

    #[test]
    fn strict_cap_is_never_exceeded(mut cfg in config_strategy()) {
        cfg.directed = false;
        cfg.saturation_policy = SaturationPolicy::StrictCap;
        let threshold = cfg.saturation_threshold as usize;
        let mut sim = GrowthSimulator::new(cfg).expect("valid config");
        sim.run_to_end().expect("run");

        for node in 0..sim.graph().node_count() {
            prop_assert!(sim.graph().degree(node) <= threshold);
        }
    }

    #[test]
    fn identical_seed_and_config_reproduce_the_run(cfg in config_strategy()) {
        let first = GrowthSimulator::new(cfg.clone())
            .expect("valid config")
            .run_with(SnapshotRecorder)
            .expect("run");
        let second = GrowthSimulator::new(cfg)
            .expect("valid config")
            .run_with(SnapshotRecorder)
            .expect("run");
        prop_assert_eq!(first, second);
    }
}

#[rstest]
#[case::undirected(false)]
#[case::directed(true)]
fn zero_probability_never_attaches(#[case] directed: bool) {
    init_tracing();
    for nodes in [2, 3, 50] {
        let cfg = GrowthConfig {
            target_node_count: nodes,
            saturation_threshold: 4,
            directed,
            attachment: Attachment::uniform(0.0).expect("in range"),
            seed: Some(3),
            ..GrowthConfig::default()
        };
        let mut sim = GrowthSimulator::new(cfg).expect("valid config");
        sim.run_to_end().expect("run");
        assert_eq!(sim.graph().edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }
}

#[rstest]
#[case::seed_1(1)]
#[case::seed_99(99)]
#[case::seed_12345(12_345)]
fn directed_certain_attachment_always_links_both_ways(#[case] seed: u64) {
    init_tracing();
    let cfg = GrowthConfig {
        target_node_count: 12,
        saturation_threshold: 1_000,
        directed: true,
        attachment: Attachment::uniform(1.0).expect("in range"),
        seed: Some(seed),
        ..GrowthConfig::default()
    };
    let mut sim = GrowthSimulator::new(cfg).expect("valid config");
    sim.run_to_end().expect("run");

    let graph = sim.graph();
    for new in 2..12 {
        for old in 0..new {
            assert!(graph.has_edge(new, old));
            assert!(graph.has_edge(old, new));
        }
    }
}

#[test]
fn four_nodes_threshold_one_matches_reference_ordering() {
    let cfg = GrowthConfig {
        target_node_count: 4,
        saturation_threshold: 1,
        attachment: Attachment::uniform(1.0).expect("in range"),
        seed: Some(0),
        ..GrowthConfig::default()
    };
    let mut sim = GrowthSimulator::new(cfg).expect("valid config");
    let summary = sim.run_to_end().expect("run");

    assert_eq!(sim.graph().edges().collect::<Vec<_>>(), vec![(0, 1), (2, 3)]);
    assert_eq!(sim.saturated().as_slice(), &[0, 1]);
    assert_eq!(summary.saturated, 2);
}
