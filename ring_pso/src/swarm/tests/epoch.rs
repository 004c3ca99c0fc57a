use std::{
    cell::Cell,
    io,
    sync::{Arc, Mutex},
};

use pretty_assertions::assert_eq;

use super::*;

#[derive(Debug, thiserror::Error)]
#[error("objective unavailable")]
struct Unavailable;

#[test]
fn test_step_increments_epoch_and_keeps_constriction_factor() {
    let f = FnObjective::new(rastrigin);
    let mut swarm = Swarm::new(&[(-5.12, 5.12), (-5.12, 5.12)], &f, 1e-4).unwrap();
    let chi = swarm.constriction_factor();

    for expected_epoch in 1..=10 {
        swarm.step().unwrap();
        assert_eq!(swarm.epoch_count(), expected_epoch);
        assert_eq!(swarm.constriction_factor(), chi);
    }
}

#[test]
fn test_identical_inputs_give_identical_trajectories() {
    let f = FnObjective::new(rastrigin);
    let bounds = [(-5.12, 5.12), (-5.12, 5.12), (-5.12, 5.12)];
    let cfg = SwarmConfig::default().with_n_particles(20).with_seed(1234);

    let mut a = Swarm::with_config(&bounds, &f, 1e-4, cfg.clone()).unwrap();
    let mut b = Swarm::with_config(&bounds, &f, 1e-4, cfg).unwrap();
    assert_eq!(dump(&a), dump(&b));

    for _ in 0..25 {
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(dump(&a), dump(&b));
    }
}

#[test]
fn test_failed_epoch_leaves_state_untouched() {
    let failing = Cell::new(false);
    let f = TryFnObjective::new(|x: &[f64]| {
        if failing.get() {
            Err(Unavailable)
        } else {
            Ok(sum_of_squares(x))
        }
    });
    let reference_f = FnObjective::new(sum_of_squares);

    let bounds = [(-10.0, 10.0), (-10.0, 10.0)];
    let mut swarm = Swarm::new(&bounds, &f, 1e-4).unwrap();
    let mut reference = Swarm::new(&bounds, &reference_f, 1e-4).unwrap();
    swarm.step().unwrap();
    reference.step().unwrap();

    let before = dump(&swarm);
    failing.set(true);
    match swarm.step() {
        Err(SwarmError::ObjectiveEvaluationError(inner)) => {
            assert!(inner.downcast_ref::<Unavailable>().is_some());
        }
        other => panic!("expected ObjectiveEvaluationError, got {:?}", other),
    }
    assert_eq!(dump(&swarm), before);

    // the generator was rewound too, so the retried epoch matches an uninterrupted run
    failing.set(false);
    swarm.step().unwrap();
    reference.step().unwrap();
    assert_eq!(dump(&swarm), dump(&reference));
}

#[test]
fn test_constant_objective_keeps_personal_bests_and_prefers_left_neighbor() {
    let f = FnObjective::new(|_x: &[f64]| 1.0);
    let cfg = SwarmConfig::default().with_n_particles(6);
    let mut swarm = Swarm::with_config(&[(-1.0, 1.0), (-1.0, 1.0)], &f, 1e-12, cfg).unwrap();
    let initial_positions = as_rows(swarm.positions());

    for _ in 0..5 {
        swarm.step().unwrap();
    }

    // equal values never replace a personal best
    assert_eq!(as_rows(swarm.personal_best_positions()), initial_positions);

    // all neighbors tie, so the left neighbor is everyone's local best
    let n = swarm.n_particles();
    for i in 0..n {
        assert_eq!(
            swarm.local_best_positions()[i],
            swarm.positions()[(i + n - 1) % n]
        );
    }
}

#[test]
fn test_velocity_update_rule_single_particle() {
    let f = FnObjective::new(sum_of_squares);
    let cfg = SwarmConfig::default().with_n_particles(1);
    let mut swarm = Swarm::with_config(&[(-100.0, 100.0)], &f, 1e-4, cfg).unwrap();

    let x0 = swarm.positions()[0][0];
    let v0 = swarm.velocities()[0][0];
    swarm.step().unwrap();

    // a lone particle is its own local best, and both bests still sit at x0
    let chi = swarm.constriction_factor();
    let v1 = chi * v0;
    assert!((swarm.velocities()[0][0] - v1).abs() < 1e-12);
    let expected_x = (x0 + v1).clamp(-100.0, 100.0);
    assert!((swarm.positions()[0][0] - expected_x).abs() < 1e-12);
}

#[test]
fn test_epochs_iterator_stops_at_cap() {
    let f = FnObjective::new(sum_of_squares);
    let cfg = SwarmConfig::default().with_max_epochs(5);
    let mut swarm = Swarm::with_config(&[(-10.0, 10.0), (-10.0, 10.0)], &f, 1e-4, cfg).unwrap();

    let snapshots = swarm
        .epochs()
        .collect::<SwarmResult<Vec<EpochSnapshot>>>()
        .unwrap();
    let epochs: Vec<u64> = snapshots.iter().map(|s| s.epoch).collect();
    assert_eq!(epochs, vec![1, 2, 3, 4, 5]);
    assert_eq!(swarm.epoch_count(), 5);
    assert!(swarm.epochs().next().is_none());

    let last = snapshots.last().unwrap();
    assert_eq!(last.positions, as_rows(swarm.positions()));
    assert_eq!(last.f_values, swarm.f_values().to_vec());
    assert_eq!(last.best_value, swarm.min_point().value);
}

#[test]
fn test_epochs_iterator_ends_after_failure() {
    let failing = Cell::new(false);
    let f = TryFnObjective::new(|x: &[f64]| {
        if failing.get() {
            Err(Unavailable)
        } else {
            Ok(sum_of_squares(x))
        }
    });
    let mut swarm = Swarm::new(&[(-10.0, 10.0)], &f, 1e-4).unwrap();
    failing.set(true);

    let mut epochs = swarm.epochs();
    assert!(matches!(
        epochs.next(),
        Some(Err(SwarmError::ObjectiveEvaluationError(_)))
    ));
    assert!(epochs.next().is_none());
}

#[test]
fn test_min_point_ties_go_to_lowest_index() {
    let f = FnObjective::new(|x: &[f64]| x[0].abs().floor());
    let cfg = SwarmConfig::default().with_n_particles(10);
    let swarm = Swarm::with_config(&[(0.0, 0.5)], &f, 1e-4, cfg).unwrap();

    // every particle evaluates to 0
    let min = swarm.min_point();
    assert_eq!(min.particle, 0);
    assert_eq!(min.value, 0.0);
    assert_eq!(min.position, swarm.positions()[0]);
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_epoch_debug_event_carries_spread() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let f = FnObjective::new(sum_of_squares);
    let mut swarm = Swarm::new(&[(-10.0, 10.0), (-10.0, 10.0)], &f, 1e-4).unwrap();
    tracing::subscriber::with_default(subscriber, || swarm.step().unwrap());

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let line = logs
        .lines()
        .find(|l| l.contains("epoch complete"))
        .expect("no epoch event logged");
    assert!(line.contains("epoch=1"), "{}", line);
    assert!(line.contains("best_value="), "{}", line);
    assert!(line.contains("spread="), "{}", line);
}
