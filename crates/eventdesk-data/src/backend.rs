// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use eventdesk_app::{DirectorySnapshot, OperationOutcome, PendingOperation};
use log::{debug, info, warn};

use crate::{DataError, DataResult, Directory};

const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Runs directory operations on worker threads after a simulated latency.
#[derive(Debug, Clone)]
pub struct Backend {
    directory: Arc<Mutex<Directory>>,
    latency: Duration,
    fail_next: Arc<AtomicBool>,
}

impl Backend {
    pub fn new(directory: Directory, latency: Duration) -> Self {
        Self {
            directory: Arc::new(Mutex::new(directory)),
            latency,
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn seeded(latency: Duration) -> Self {
        Self::new(Directory::seeded(), latency)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.lock().snapshot()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Makes the next operation fail without touching the directory.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Runs `operation` on the calling thread, skipping the latency.
    pub fn execute(&self, operation: PendingOperation) -> DataResult<OperationOutcome> {
        let mut directory = self.lock();
        self.run(&mut directory, operation)
    }

    /// Starts `operation` on a worker thread. `on_done` always runs exactly
    /// once, with `DataError::Cancelled` when the handle was cancelled first.
    pub fn spawn<F>(
        &self,
        request_id: u64,
        operation: PendingOperation,
        on_done: F,
    ) -> OperationHandle
    where
        F: FnOnce(u64, DataResult<OperationOutcome>) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker = self.clone();
        let flag = Arc::clone(&cancelled);
        debug!("request {request_id}: spawning {}", operation.describe());
        let thread = thread::spawn(move || {
            let result = worker.run_after_latency(&flag, operation);
            if let Err(error) = &result {
                debug!("request {request_id}: {error}");
            }
            on_done(request_id, result);
        });
        OperationHandle {
            request_id,
            cancelled,
            thread: Some(thread),
        }
    }

    fn run_after_latency(
        &self,
        cancelled: &AtomicBool,
        operation: PendingOperation,
    ) -> DataResult<OperationOutcome> {
        let deadline = Instant::now() + self.latency;
        loop {
            if cancelled.load(Ordering::SeqCst) {
                return Err(DataError::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(CANCEL_POLL.min(deadline - now));
        }
        let mut directory = self.lock();
        // Checked again under the lock: a cancelled request never applies.
        if cancelled.load(Ordering::SeqCst) {
            return Err(DataError::Cancelled);
        }
        self.run(&mut directory, operation)
    }

    fn run(
        &self,
        directory: &mut Directory,
        operation: PendingOperation,
    ) -> DataResult<OperationOutcome> {
        let summary = operation.describe();
        if self.fail_next.swap(false, Ordering::SeqCst) {
            warn!("injected failure: {summary}");
            return Err(DataError::SimulatedFailure(summary));
        }
        let outcome = directory.execute(operation)?;
        info!("{summary}: applied");
        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.directory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cancellation handle for one spawned operation.
#[derive(Debug)]
pub struct OperationHandle {
    request_id: u64,
    cancelled: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl OperationHandle {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the worker to finish.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("request {}: worker panicked", self.request_id);
        }
    }
}
