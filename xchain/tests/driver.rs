//! Integration tests: run driver + engines + visualization.

use std::fs;
use xchain::{
    Driver,
    Mode,
    RunArtifacts,
    RunError,
    dynamics::InitialState,
    error::ModelError,
    store::{ self, Record },
};

mod common;
use common::{ ChainTdse, Event, MockSim, RingTise };

fn artifacts(dir: &tempfile::TempDir, script: &str) -> RunArtifacts {
    RunArtifacts::from_script(script).unwrap().in_dir(dir.path())
}

// =================================================================================================
// Orchestration
// =================================================================================================

#[test]
fn batch_never_builds_visual() {
    let dir = tempfile::tempdir().unwrap();
    let files = artifacts(&dir, "batch_tdse.rs");
    let sim = MockSim::<true>::new(Some(InitialState::Fundamental));
    Driver::new(files.clone(), Mode::Batch).run(&sim).unwrap();
    assert_eq!(
        sim.events(),
        vec![
            Event::Hamiltonian,
            Event::Dynamics,
            Event::InitialState(InitialState::Fundamental),
            Event::Solve,
        ],
    );
    assert!(!files.log_file().exists());
}

#[test]
fn interactive_logs_before_visual_and_solve() {
    let dir = tempfile::tempdir().unwrap();
    let files = artifacts(&dir, "interactive_tdse.rs");
    let sim = MockSim::<true>::new(Some(InitialState::Site(0)));
    Driver::new(files.clone(), Mode::Interactive).run(&sim).unwrap();
    assert_eq!(
        sim.events(),
        vec![
            Event::Hamiltonian,
            Event::Dynamics,
            Event::InitialState(InitialState::Site(0)),
            Event::Visual { log_attached: true },
            Event::Rendered,
            Event::Solve,
        ],
    );
    let log = fs::read_to_string(files.log_file()).unwrap();
    assert!(log.contains("run 'interactive_tdse'"));
}

#[test]
fn tise_needs_no_initial_state() {
    let dir = tempfile::tempdir().unwrap();
    for mode in [Mode::Batch, Mode::Interactive] {
        let sim = MockSim::<false>::new(None);
        Driver::new(artifacts(&dir, "levels.rs"), mode).run(&sim).unwrap();
        assert_eq!(sim.count(Event::Hamiltonian), 1);
        assert_eq!(sim.count(Event::Dynamics), 1);
        assert_eq!(sim.count(Event::Solve), 1);
        assert!(!sim.events().iter().any(|e| matches!(e, Event::InitialState(_))));
    }
}

#[test]
fn tdse_without_initial_state_is_not_solved() {
    let dir = tempfile::tempdir().unwrap();
    let sim = MockSim::<true>::new(None);
    let res = Driver::new(artifacts(&dir, "no_init.rs"), Mode::Interactive)
        .run(&sim);
    assert!(matches!(res, Err(RunError::MissingInitialState)));
    assert_eq!(sim.events(), vec![Event::Hamiltonian, Event::Dynamics]);
}

#[test]
fn failed_run_keeps_its_log() {
    let dir = tempfile::tempdir().unwrap();
    let files = artifacts(&dir, "failing.rs");
    let mut sim = MockSim::<true>::new(Some(InitialState::Fundamental));
    sim.fail_hamiltonian = true;
    let res = Driver::new(files.clone(), Mode::Interactive).run(&sim);
    assert!(matches!(res, Err(RunError::Model(ModelError::NoSites))));
    assert_eq!(sim.events(), vec![Event::Hamiltonian]);
    let log = fs::read_to_string(files.log_file()).unwrap();
    assert!(log.contains("run 'failing'"));
}

// =================================================================================================
// Real collaborators
// =================================================================================================

#[test]
fn example_chain_in_batch_mode() {
    let dir = tempfile::tempdir().unwrap();
    let files = artifacts(&dir, "tdse_1.py");
    let sim = ChainTdse { n_site: 15, num_steps: 25 };
    let rec = Driver::new(files.clone(), Mode::Batch).run(&sim).unwrap();

    assert_eq!(files.save_file(), dir.path().join("tdse_1.pic"));
    assert!(files.save_file().is_file());
    assert!(!files.log_file().exists());
    assert!(!files.image_file().exists());
    assert!(!files.movie_file().exists());

    assert_eq!(rec.times.len(), 26);
    assert!((rec.times[1] - 10.0).abs() < 1e-12);
    assert_eq!(rec.populations.dim(), (26, 15));
    assert_eq!(rec.populations[[0, 7]], 1.0);
    assert_eq!(store::load(&files.save_file()).unwrap(), Record::Tdse(rec));
}

#[test]
fn example_ring_interactive() {
    let dir = tempfile::tempdir().unwrap();
    let files = artifacts(&dir, "tise_1.py");
    let rec = Driver::new(files.clone(), Mode::Interactive)
        .run(&RingTise)
        .unwrap();

    assert_eq!(rec.energies.len(), 4);
    assert!(rec.energies.to_vec().windows(2).all(|w| w[0] <= w[1]));
    for file in [
        files.log_file(),
        files.save_file(),
        files.image_file(),
        files.movie_file(),
    ] {
        assert!(file.is_file(), "missing {}", file.display());
    }
    let log = fs::read_to_string(files.log_file()).unwrap();
    assert!(log.contains("level   0"));
}

#[test]
fn real_runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let sim = ChainTdse { n_site: 6, num_steps: 5 };
    let a = Driver::new(artifacts(&dir, "first.rs"), Mode::Batch).run(&sim).unwrap();
    let b = Driver::new(artifacts(&dir, "second.rs"), Mode::Batch).run(&sim).unwrap();
    assert_eq!(a, b);
}
