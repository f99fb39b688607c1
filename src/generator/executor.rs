//! Executables and the thread-owning executor driving them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::generator::context::GenerationManager;

/// A unit of periodic generation work.
///
/// The executor calls `prepare` once, then loops `execute` followed by a
/// sleep of `next_exec_timeout` until the executable reports `finished`
/// or the lifecycle stops it.
pub trait Executable: Send {
    /// One-time initialization before the first tick.
    fn prepare(&mut self);

    /// One unit of work.
    fn execute(&mut self);

    /// Whether the work is complete. Infinite executables return `false`
    /// forever.
    fn finished(&self) -> bool;

    /// Delay before the next tick.
    fn next_exec_timeout(&self) -> Duration;
}

/// Owns one [`Executable`] and the worker thread pumping it.
///
/// `launch` respects the venue lifecycle: a terminated executor refuses,
/// a suspended one registers itself for the next launch event, an active
/// one (re)spawns the worker. `terminate` is idempotent and joins the
/// worker; it must never be called from the worker thread itself.
pub struct Executor {
    manager: Arc<GenerationManager>,
    executable: Arc<Mutex<Box<dyn Executable>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    terminated: Arc<AtomicBool>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("terminated", &self.terminated.load(Ordering::Relaxed))
            .field("executing", &self.is_executing())
            .finish()
    }
}

impl Executor {
    /// Creates an executor for one executable.
    pub fn new(executable: Box<dyn Executable>, manager: Arc<GenerationManager>) -> Arc<Self> {
        Arc::new(Self {
            manager,
            executable: Arc::new(Mutex::new(executable)),
            worker: Mutex::new(None),
            terminated: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Starts (or schedules) execution according to the lifecycle state.
    pub fn launch(self: &Arc<Self>) {
        if self.terminated.load(Ordering::Relaxed) {
            warn!("unable to launch a generation executor: it was terminated previously");
            return;
        }

        if !self.manager.is_running() {
            let weak = Arc::downgrade(self);
            self.manager.call_on_launch(Box::new(move || {
                if let Some(executor) = weak.upgrade() {
                    executor.launch();
                }
            }));
            info!("postponed launching of generation executor");
            return;
        }

        if self.is_executing() {
            warn!("unable to launch a generation executor: it is in executing state already");
            return;
        }

        self.start();
        info!("generation executor launched");
    }

    /// Stops execution permanently and joins the worker thread.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::Relaxed);
        self.join_worker();
        info!("generation executor terminated");
    }

    fn is_executing(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn start(self: &Arc<Self>) {
        self.join_worker();

        let executable = Arc::clone(&self.executable);
        let manager = Arc::clone(&self.manager);
        let terminated = Arc::clone(&self.terminated);
        let weak = Arc::downgrade(self);

        let spawned = std::thread::Builder::new()
            .name("orderflow-executor".to_owned())
            .spawn(move || Self::run(executable, manager, terminated, weak));

        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
            }
            Err(err) => error!(%err, "failed to spawn generation executor thread"),
        }
    }

    fn join_worker(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            debug!("joining generation executor's thread");
            if handle.join().is_err() {
                error!("generation executor's thread terminated with a panic");
            }
        }
    }

    fn run(
        executable: Arc<Mutex<Box<dyn Executable>>>,
        manager: Arc<GenerationManager>,
        terminated: Arc<AtomicBool>,
        executor: Weak<Executor>,
    ) {
        {
            let mut executable = executable.lock().unwrap_or_else(PoisonError::into_inner);
            executable.prepare();

            while !terminated.load(Ordering::Relaxed) && manager.is_running() {
                executable.execute();

                if executable.finished() {
                    terminated.store(true, Ordering::Relaxed);
                    break;
                }
                std::thread::sleep(executable.next_exec_timeout());
            }
        }

        if terminated.load(Ordering::Relaxed) {
            debug!("generation executor's thread has been terminated");
            return;
        }

        // Suspended: park until the next launch notification.
        if let Some(executor) = executor.upgrade() {
            manager.call_on_launch(Box::new(move || executor.start()));
            debug!("generation executor's thread suspended until the next launch notification");
        }
    }
}
