use approx::assert_relative_eq;

use spmd_nbody::simulation::params::{G, NSTEPS, PARTITION_SIZE, TIMESTEP, WORKERS};
use spmd_nbody::{
    advance, bench_workers, even_worker_counts, partition_forces, run, Body, BodyStore, Force, Generation, NVec3, NewtonianGravity,
    Parameters, PartitionMap, Scenario, SimError, SimulationConfig,
};

/// Build a body from plain arrays
pub fn body(x: [f64; 3], v: [f64; 3], m: f64) -> Body {
    Body::new(x.into(), v.into(), m)
}

/// Default physics parameters for tests
pub fn test_params(steps: usize) -> Parameters {
    Parameters {
        G,
        dt: TIMESTEP,
        steps,
    }
}

/// Store with every partition of `current` filled from `Body::initial`
pub fn seeded_store(workers: usize, partition_size: usize) -> BodyStore {
    let mut store = BodyStore::new(PartitionMap::new(workers, partition_size).unwrap());
    for mut view in store.split() {
        let range = view.map().range(view.worker());
        let mut local = view.local_slice(Generation::Current);
        for (slot, i) in local.iter_mut().zip(range) {
            *slot = Body::initial(i);
        }
    }
    store
}

// ==================================================================================
// Initial conditions and configuration
// ==================================================================================

#[test]
fn initial_conditions_follow_index_formula() {
    let b = Body::initial(3);
    assert_eq!(b.x, NVec3::new(100.0 * (3.0 + 0.1), 200.0 * (3.0 + 0.1), 300.0 * (3.0 + 0.1)));
    assert_eq!(b.v, NVec3::new(403.0, 503.0, 603.0));
    assert_eq!(b.m, 10e6 * (3.0 + 100.2));
}

#[test]
fn empty_yaml_is_the_reference_run() {
    let cfg = SimulationConfig::from_yaml("{}").unwrap();
    assert_eq!(cfg, SimulationConfig::default());
    assert_eq!(cfg.engine.workers, WORKERS);
    assert_eq!(cfg.engine.bodies, WORKERS * PARTITION_SIZE);
    assert_eq!(cfg.parameters.steps, NSTEPS);

    let scenario = Scenario::build(&cfg).unwrap();
    assert_eq!(scenario.map().partition_size(), PARTITION_SIZE);
    assert_eq!(*scenario.parameters(), Parameters::default());
}

#[test]
fn yaml_overrides_are_applied() {
    let cfg = SimulationConfig::from_yaml(
        "engine:\n  workers: 5\n  bodies: 1000\nparameters:\n  G: 1.0\n  steps: 3\n",
    )
    .unwrap();
    assert_eq!(cfg.engine.workers, 5);
    assert_eq!(cfg.parameters.G, 1.0);
    assert_eq!(cfg.parameters.timestep, TIMESTEP);

    let scenario = Scenario::build(&cfg).unwrap();
    assert_eq!(scenario.map().partition_size(), 200);
    assert_eq!(scenario.parameters().steps, 3);
}

#[test]
fn uneven_population_fails_before_running() {
    let cfg = SimulationConfig::from_yaml("engine:\n  workers: 3\n  bodies: 1000\n").unwrap();
    let err = Scenario::build(&cfg).unwrap_err();
    assert!(matches!(err, SimError::UnevenPartition { bodies: 1000, workers: 3 }));
}

#[test]
fn bad_timestep_is_rejected() {
    let mut p = test_params(1);
    p.dt = 0.0;
    assert!(matches!(
        Scenario::deterministic(p, 2, 10),
        Err(SimError::InvalidTimestep(_))
    ));
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn coincident_bodies_do_not_interact() {
    let gravity = NewtonianGravity { G };
    let a = body([0.0, 0.0, 0.0], [0.0; 3], 5.0);
    let twin = body([0.0, 0.0, 0.0], [0.0; 3], 7.0);
    let c = body([1.0, 2.0, 0.0], [0.0; 3], 3.0);

    let mut alone = NVec3::zeros();
    gravity.accumulate(&a, &[twin], &mut alone);
    assert_eq!(alone, NVec3::zeros());

    let mut with_twin = NVec3::zeros();
    gravity.accumulate(&a, &[a, twin, c], &mut with_twin);
    let mut without_twin = NVec3::zeros();
    gravity.accumulate(&a, &[a, c], &mut without_twin);
    assert_eq!(with_twin, without_twin);
    assert!(with_twin.norm() > 0.0);
}

#[test]
fn gravity_inverse_square_law() {
    let gravity = NewtonianGravity { G: 1.0 };
    let a = body([0.0, 0.0, 0.0], [0.0; 3], 1.0);

    let mut near = NVec3::zeros();
    gravity.accumulate(&a, &[body([1.0, 0.0, 0.0], [0.0; 3], 1.0)], &mut near);
    let mut far = NVec3::zeros();
    gravity.accumulate(&a, &[body([2.0, 0.0, 0.0], [0.0; 3], 1.0)], &mut far);

    assert_relative_eq!(near.norm() / far.norm(), 4.0, epsilon = 1e-12);
}

#[test]
fn partition_forces_match_single_sweep() {
    // same population seen as one partition and as four
    let mut whole = seeded_store(1, 12);
    let mut split = seeded_store(4, 3);
    let gravity = NewtonianGravity { G };

    let whole_views = whole.split();
    let all = whole_views[0].fetch_partition(Generation::Current, 0);
    let mut reference = vec![NVec3::zeros(); 12];
    let mut scratch = Vec::new();
    partition_forces(&gravity, &whole_views[0], &all, &mut reference, &mut scratch);

    for view in split.split() {
        let own = view.fetch_partition(Generation::Current, view.worker());
        let mut out = vec![NVec3::zeros(); own.len()];
        partition_forces(&gravity, &view, &own, &mut out, &mut scratch);
        let range = view.map().range(view.worker());
        assert_eq!(out.as_slice(), &reference[range]);
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn position_uses_velocity_from_start_of_step() {
    let b = body([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], 2.0);
    let next = advance(&b, NVec3::new(8.0, 0.0, -2.0), 0.5);

    assert_eq!(next.x, NVec3::new(1.0 + 0.5 * 4.0, 2.0 + 0.5 * 5.0, 3.0 + 0.5 * 6.0));
    assert_eq!(next.v, NVec3::new(4.0 + 0.5 * 4.0, 5.0, 6.0 + 0.5 * -1.0));
    assert_eq!(next.m, 2.0);
}

#[test]
fn explicit_population_must_fit_the_layout() {
    let bodies = vec![Body::initial(0), Body::initial(1), Body::initial(2)];
    let err = Scenario::with_bodies(test_params(1), 2, bodies).unwrap_err();
    assert!(matches!(err, SimError::UnevenPartition { bodies: 3, workers: 2 }));

    let scenario = Scenario::with_bodies(test_params(1), 3, vec![Body::initial(7); 3]).unwrap();
    assert_eq!(scenario.map().bodies(), 3);
    assert_eq!(scenario.initial().body(2), Body::initial(7));
}

#[test]
fn single_pair_reference_step() {
    let v0 = [0.5, -1.0, 2.0];
    let v1 = [0.0, 3.0, 0.0];
    for workers in [1, 2] {
        let bodies = vec![body([0.0, 0.0, 0.0], v0, 1.0), body([1.0, 0.0, 0.0], v1, 1.0)];
        let scenario = Scenario::with_bodies(test_params(1), workers, bodies).unwrap();
        let report = run(&scenario).unwrap();
        let (b0, b1) = (report.bodies[0], report.bodies[1]);

        // |F| = G m m / 1^2, along the x axis; body 0 sits at -x of body 1
        let f = 6.67e-11;
        assert_relative_eq!(b0.v.x, v0[0] + TIMESTEP * -f, max_relative = 1e-15);
        assert_relative_eq!(b1.v.x, v1[0] + TIMESTEP * f, max_relative = 1e-15);
        assert_eq!(b0.v.y, v0[1]);
        assert_eq!(b1.v.z, v1[2]);

        assert_relative_eq!(b0.x.x, TIMESTEP * v0[0], max_relative = 1e-15);
        assert_relative_eq!(b0.x.y, TIMESTEP * v0[1], max_relative = 1e-15);
        assert_relative_eq!(b1.x.x, 1.0 + TIMESTEP * v1[0], max_relative = 1e-15);
        assert_relative_eq!(b1.x.y, TIMESTEP * v1[1], max_relative = 1e-15);
        assert_eq!(report.step_times.len(), 1);
    }
}

// ==================================================================================
// Store tests
// ==================================================================================

#[test]
fn fetch_is_idempotent_within_a_step() {
    let mut store = seeded_store(3, 5);
    let mut views = store.split();

    // worker 1 writes its next generation; worker 0 reads worker 1 twice
    {
        let mut next = views[1].local_slice(Generation::Next);
        next.fill(body([9.0, 9.0, 9.0], [0.0; 3], 1.0));
    }
    let first = views[0].fetch_partition(Generation::Current, 1);
    let second = views[0].fetch_partition(Generation::Current, 1);
    assert_eq!(first, second);
    assert_eq!(first[0], Body::initial(5));
}

#[test]
fn partition_owner_is_stable() {
    let map = PartitionMap::for_population(1000, 10).unwrap();
    for i in 0..1000 {
        assert_eq!(map.owner(i), i / 100);
        assert_eq!(map.owner(i), map.owner(i));
        assert_eq!(map.global_index(map.owner(i), map.local_offset(i)), i);
    }
}

// ==================================================================================
// Driver tests
// ==================================================================================

#[test]
fn repeated_runs_are_bit_identical() {
    let scenario = Scenario::deterministic(test_params(NSTEPS), 4, 200).unwrap();
    let a = run(&scenario).unwrap();
    let b = run(&scenario).unwrap();
    assert_eq!(a.bodies, b.bodies);
    assert_eq!(a.step_times.len(), NSTEPS);
}

#[test]
fn mass_is_conserved_exactly() {
    // every intermediate generation, not just the last one
    for steps in 1..=NSTEPS {
        let scenario = Scenario::deterministic(test_params(steps), 5, 100).unwrap();
        let report = run(&scenario).unwrap();
        for (i, b) in report.bodies.iter().enumerate() {
            assert_eq!(b.m, Body::initial(i).m, "mass of body {i} changed by step {steps}");
        }
    }
}

#[test]
fn worker_count_does_not_change_trajectories() {
    let reference = run(&Scenario::deterministic(test_params(NSTEPS), 1, 1000).unwrap()).unwrap();
    for workers in [2, 5, 10] {
        let report =
            run(&Scenario::deterministic(test_params(NSTEPS), workers, 1000).unwrap()).unwrap();
        assert_eq!(report.bodies, reference.bodies, "P = {workers} diverged");
    }
}

#[test]
fn bodies_actually_move() {
    let report = run(&Scenario::deterministic(test_params(2), 2, 10).unwrap()).unwrap();
    for (i, b) in report.bodies.iter().enumerate() {
        let start = Body::initial(i);
        assert_ne!(b.x, start.x);
        assert!(b.x.iter().all(|c| c.is_finite()));
    }
}

// ==================================================================================
// Benchmark tests
// ==================================================================================

#[test]
fn even_worker_counts_only_divisors() {
    assert_eq!(even_worker_counts(12, 5), vec![1, 2, 3, 4]);
    assert_eq!(even_worker_counts(7, 10), vec![1, 7]);
    assert!(even_worker_counts(12, 0).is_empty());
}

#[test]
fn bench_workers_skips_uneven_counts() {
    // 5 and 0 do not split 12 bodies and must be skipped, not rejected
    bench_workers(12, &[0, 1, 4, 5], test_params(1)).unwrap();
}
