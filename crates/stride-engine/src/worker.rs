//! The per-worker loop.
//!
//! Each worker mirrors the scheduler's (step, substep) grid exactly.
//! Per substep it runs the thread-level hooks for that substep, sends
//! its completion signal, and blocks until the scheduler releases it
//! again. The rendezvous channels make each send/receive a meeting
//! point, so a worker can never run ahead of the collect phase.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error};

use stride_core::{RunContext, WorkerId};

use crate::hooks::HookTable;
use crate::scheduler::RunError;

/// The two-valued message exchanged between the scheduler and each
/// worker.
///
/// On the release channel, `Halt` tells the worker to terminate
/// instead of entering the next substep. On the report channel, `Halt`
/// tells the scheduler the worker is aborting the run (a thread hook
/// failed); the error itself travels back through the worker's join
/// handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineSignal {
    /// Proceed with the next substep / the worker completed normally.
    Continue,
    /// Terminate: shutdown request (release) or abort report (report).
    Halt,
}

/// One worker's side of the lockstep protocol.
pub(crate) struct Worker {
    pub(crate) id: WorkerId,
    pub(crate) name: String,
    pub(crate) steps: u64,
    pub(crate) substeps: u32,
    pub(crate) table: Arc<HookTable>,
    pub(crate) ctx: Arc<RunContext>,
    pub(crate) release: Receiver<EngineSignal>,
    pub(crate) report: Sender<EngineSignal>,
}

impl Worker {
    /// Run the mirrored grid to completion.
    ///
    /// Returns `Ok(())` on normal completion or external halt, and the
    /// originating error when one of this worker's thread hooks fails.
    /// A disconnected channel is treated as a halt: the scheduler is
    /// gone and the worker has nothing left to synchronize with.
    pub(crate) fn run(self) -> Result<(), RunError> {
        debug!(worker = %self.id, "started");

        // Initial unconditional release; work only begins once the
        // scheduler opens the first substep.
        match self.release.recv() {
            Ok(EngineSignal::Continue) => {}
            Ok(EngineSignal::Halt) | Err(_) => return Ok(()),
        }

        for step in 0..self.steps {
            for substep in 0..self.substeps {
                for entry in self.table.thread_hooks(substep) {
                    if let Err(err) = entry.call(&self.ctx, self.id, &self.name) {
                        error!(
                            worker = %self.id,
                            step,
                            substep,
                            plugin = entry.plugin(),
                            hook = entry.description(),
                            %err,
                            "thread hook failed, aborting run"
                        );
                        // Report the abort, then stay in the protocol
                        // until the scheduler's halt arrives so the
                        // shutdown drain stays in lockstep.
                        let _ = self.report.send(EngineSignal::Halt);
                        let _ = self.release.recv();
                        return Err(RunError::ThreadHookFailed {
                            worker: self.id,
                            plugin: entry.plugin().to_string(),
                            description: entry.description().to_string(),
                            source: err,
                        });
                    }
                }

                if self.report.send(EngineSignal::Continue).is_err() {
                    return Ok(());
                }
                match self.release.recv() {
                    Ok(EngineSignal::Continue) => {}
                    Ok(EngineSignal::Halt) | Err(_) => {
                        debug!(worker = %self.id, step, substep, "halted");
                        return Ok(());
                    }
                }
            }
        }

        debug!(worker = %self.id, "finished");
        Ok(())
    }
}
