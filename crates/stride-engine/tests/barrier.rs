//! Integration test: barrier discipline under a wider grid.
//!
//! Runs 8 workers over 50 steps x 4 substeps with a recording plugin
//! at every substep and verifies the superstep structure of the whole
//! dispatch log: all thread hooks for a substep complete before that
//! substep's core hooks, and no worker enters the next substep early.

use stride_core::{PluginRegistry, WorkerId};
use stride_engine::{RunConfig, Scheduler};
use stride_test_utils::{Event, RecordingPlugin};

const THREADS: u32 = 8;
const STEPS: u64 = 50;
const SUBSTEPS: u32 = 4;

#[test]
fn superstep_structure_holds_across_the_whole_grid() {
    let plugin = RecordingPlugin::new(SUBSTEPS);
    let events = plugin.events();

    let mut registry = PluginRegistry::new();
    registry.register(Box::new(plugin));

    let config = RunConfig {
        threads: THREADS,
        steps: STEPS,
        substeps: SUBSTEPS,
        seed: 0,
    };
    let report = Scheduler::new(config, &registry).unwrap().run().unwrap();
    assert_eq!(report.completed_steps(), STEPS);

    let log = events.lock().unwrap();
    let group = THREADS as usize + 1;
    assert_eq!(log.len(), (STEPS as usize) * (SUBSTEPS as usize) * group);

    for (group_idx, chunk) in log.chunks(group).enumerate() {
        let substep = (group_idx % SUBSTEPS as usize) as u32;

        // Every worker reports exactly once before the core hook.
        let mut workers: Vec<WorkerId> = chunk[..THREADS as usize]
            .iter()
            .map(|event| match event {
                Event::Thread { substep: s, worker } => {
                    assert_eq!(*s, substep, "thread event leaked across the barrier");
                    *worker
                }
                Event::Core { .. } => {
                    panic!("core hook ran before all workers completed substep {substep}")
                }
            })
            .collect();
        workers.sort();
        let expected: Vec<WorkerId> = (0..THREADS).map(WorkerId).collect();
        assert_eq!(workers, expected, "worker missing or duplicated in a superstep");

        match chunk[THREADS as usize] {
            Event::Core { substep: s } => assert_eq!(s, substep),
            other => panic!("expected core event closing the superstep, got {other:?}"),
        }
    }
}

#[test]
fn large_zero_hook_grid_completes() {
    let registry = PluginRegistry::new();
    let config = RunConfig {
        threads: 4,
        steps: 200,
        substeps: 3,
        seed: 0,
    };
    let report = Scheduler::new(config, &registry).unwrap().run().unwrap();
    assert_eq!(report.completed_steps(), 200);
    assert_eq!(report.step_durations.len(), 200);
}
