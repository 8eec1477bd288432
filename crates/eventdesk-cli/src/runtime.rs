// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use eventdesk_app::{DirectorySnapshot, OperationError, OperationOutcome, PendingOperation, Role};
use eventdesk_data::{Backend, OperationHandle};
use eventdesk_tui::{AppRuntime, InternalEvent};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Console runtime over the simulated backend.
pub struct BackendRuntime {
    backend: Backend,
    role: Role,
    export_dir: PathBuf,
    handles: BTreeMap<u64, OperationHandle>,
}

impl BackendRuntime {
    pub fn new(backend: Backend, role: Role, export_dir: PathBuf) -> Self {
        Self {
            backend,
            role,
            export_dir,
            handles: BTreeMap::new(),
        }
    }

    /// Cancels everything still running and waits for the workers.
    pub fn shutdown(&mut self) {
        for (request_id, handle) in std::mem::take(&mut self.handles) {
            if !handle.is_finished() {
                debug!("cancelling request {request_id} on shutdown");
                handle.cancel();
            }
            handle.join();
        }
    }

    fn reap_finished(&mut self) {
        self.handles.retain(|_, handle| !handle.is_finished());
    }
}

impl AppRuntime for BackendRuntime {
    fn load_directory(&mut self) -> Result<DirectorySnapshot> {
        let mut snapshot = self.backend.snapshot();
        if let Some(profile) = snapshot.profile.as_mut() {
            profile.role = self.role;
        }
        Ok(snapshot)
    }

    fn run_operation(&mut self, operation: PendingOperation) -> Result<OperationOutcome> {
        Ok(self.backend.execute(operation)?)
    }

    fn spawn_operation(
        &mut self,
        request_id: u64,
        operation: PendingOperation,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        self.reap_finished();
        let handle = self.backend.spawn(request_id, operation, move |id, result| {
            let _ = tx.send(InternalEvent::OperationFinished {
                request_id: id,
                result: result.map_err(OperationError::from),
            });
        });
        self.handles.insert(request_id, handle);
        Ok(())
    }

    fn cancel_operation(&mut self, request_id: u64) -> Result<()> {
        // Kept until reaped so shutdown still joins the worker.
        match self.handles.get(&request_id) {
            Some(handle) => handle.cancel(),
            None => warn!("request {request_id}: nothing to cancel"),
        }
        Ok(())
    }

    fn write_export(&mut self, file_name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!(
                "create export directory {} -- set [export].dir to a writable path",
                self.export_dir.display()
            )
        })?;
        let path = self.export_dir.join(file_name);
        fs::write(&path, contents).with_context(|| format!("write export {}", path.display()))?;
        info!("exported {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::BackendRuntime;
    use anyhow::{Result, anyhow};
    use eventdesk_app::{
        OperationError, OperationOutcome, ParticipantId, PendingOperation, Role,
    };
    use eventdesk_data::Backend;
    use eventdesk_testkit::temp_dir;
    use eventdesk_tui::{AppRuntime, InternalEvent};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn load_applies_configured_role_to_profile() -> Result<()> {
        let dir = temp_dir()?;
        let mut runtime = BackendRuntime::new(
            Backend::seeded(Duration::ZERO),
            Role::Supervisor,
            dir.path().to_path_buf(),
        );
        let snapshot = runtime.load_directory()?;
        let profile = snapshot.profile.ok_or_else(|| anyhow!("no profile"))?;
        assert_eq!(profile.role, Role::Supervisor);
        assert_eq!(snapshot.participants.len(), 7);
        Ok(())
    }

    #[test]
    fn spawned_operation_reports_through_channel() -> Result<()> {
        let dir = temp_dir()?;
        let backend = Backend::seeded(Duration::from_millis(5));
        let mut runtime =
            BackendRuntime::new(backend.clone(), Role::Organizer, dir.path().to_path_buf());
        let (tx, rx) = mpsc::channel();
        runtime.spawn_operation(
            4,
            PendingOperation::DeleteParticipants(vec![ParticipantId::new(3)]),
            tx,
        )?;
        let InternalEvent::OperationFinished { request_id, result } =
            rx.recv_timeout(Duration::from_secs(5))?
        else {
            return Err(anyhow!("unexpected event"));
        };
        assert_eq!(request_id, 4);
        let Ok(OperationOutcome::Participants(items)) = result else {
            return Err(anyhow!("expected participants outcome"));
        };
        assert_eq!(items.len(), 6);
        runtime.shutdown();
        assert_eq!(backend.snapshot().participants.len(), 6);
        Ok(())
    }

    #[test]
    fn cancelled_operation_leaves_backend_untouched() -> Result<()> {
        let dir = temp_dir()?;
        let backend = Backend::seeded(Duration::from_millis(500));
        let mut runtime =
            BackendRuntime::new(backend.clone(), Role::Organizer, dir.path().to_path_buf());
        let (tx, rx) = mpsc::channel();
        runtime.spawn_operation(
            9,
            PendingOperation::DeleteParticipants(vec![ParticipantId::new(1)]),
            tx,
        )?;
        runtime.cancel_operation(9)?;
        let InternalEvent::OperationFinished { result, .. } =
            rx.recv_timeout(Duration::from_secs(5))?
        else {
            return Err(anyhow!("unexpected event"));
        };
        assert_eq!(result, Err(OperationError::Cancelled));
        assert_eq!(backend.snapshot().participants.len(), 7);
        Ok(())
    }

    #[test]
    fn export_is_written_under_export_dir() -> Result<()> {
        let dir = temp_dir()?;
        let export_dir = dir.path().join("nested").join("exports");
        let mut runtime = BackendRuntime::new(
            Backend::seeded(Duration::ZERO),
            Role::Organizer,
            export_dir.clone(),
        );
        let path = runtime.write_export("participants-tous.csv", "id\r\n1\r\n")?;
        assert_eq!(path, export_dir.join("participants-tous.csv"));
        assert_eq!(std::fs::read_to_string(&path)?, "id\r\n1\r\n");
        Ok(())
    }
}
