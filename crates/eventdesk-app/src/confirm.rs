// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("another action is already pending -- finish or cancel it first")]
    Busy,
    #[error("nothing to confirm")]
    NothingToConfirm,
    #[error("nothing pending to cancel")]
    NothingPending,
    #[error("cannot cancel while the action is processing")]
    CancelWhileProcessing,
    #[error("no action is processing")]
    NotProcessing,
}

/// Idle → Confirming → Processing → Idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmFlow<T> {
    Idle,
    Confirming(T),
    Processing(T),
}

impl<T> Default for ConfirmFlow<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T: Clone> ConfirmFlow<T> {
    pub fn request(&mut self, target: T) -> Result<(), FlowError> {
        match self {
            Self::Idle => {
                *self = Self::Confirming(target);
                Ok(())
            }
            Self::Confirming(_) | Self::Processing(_) => Err(FlowError::Busy),
        }
    }

    /// Moves to processing and hands back the target to execute.
    pub fn confirm(&mut self) -> Result<T, FlowError> {
        match std::mem::take(self) {
            Self::Confirming(target) => {
                *self = Self::Processing(target.clone());
                Ok(target)
            }
            other => {
                *self = other;
                Err(FlowError::NothingToConfirm)
            }
        }
    }

    pub fn cancel(&mut self) -> Result<T, FlowError> {
        match std::mem::take(self) {
            Self::Confirming(target) => Ok(target),
            Self::Processing(target) => {
                *self = Self::Processing(target);
                Err(FlowError::CancelWhileProcessing)
            }
            Self::Idle => Err(FlowError::NothingPending),
        }
    }

    /// Returns to idle once the processing action finished, either way.
    pub fn complete(&mut self) -> Result<T, FlowError> {
        match std::mem::take(self) {
            Self::Processing(target) => Ok(target),
            other => {
                *self = other;
                Err(FlowError::NotProcessing)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while processing; triggering controls stay disabled.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Processing(_))
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Confirming(target) | Self::Processing(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Transient message. `token` identifies it so a stale clear timer cannot
/// remove a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub token: u64,
}

#[cfg(test)]
mod tests {
    use super::{ConfirmFlow, FlowError};

    #[test]
    fn happy_path_runs_through_all_states() {
        let mut flow = ConfirmFlow::default();
        assert!(flow.is_idle());

        flow.request(7).expect("request from idle");
        assert_eq!(flow, ConfirmFlow::Confirming(7));

        assert_eq!(flow.confirm(), Ok(7));
        assert!(flow.is_locked());

        assert_eq!(flow.complete(), Ok(7));
        assert!(flow.is_idle());
    }

    #[test]
    fn cancel_from_confirming_returns_to_idle() {
        let mut flow = ConfirmFlow::default();
        flow.request("target").expect("request");
        assert_eq!(flow.cancel(), Ok("target"));
        assert!(flow.is_idle());
    }

    #[test]
    fn cancel_is_rejected_while_processing() {
        let mut flow = ConfirmFlow::default();
        flow.request(1).expect("request");
        flow.confirm().expect("confirm");
        assert_eq!(flow.cancel(), Err(FlowError::CancelWhileProcessing));
        assert_eq!(flow, ConfirmFlow::Processing(1));
    }

    #[test]
    fn out_of_order_commands_leave_state_unchanged() {
        let mut flow: ConfirmFlow<i32> = ConfirmFlow::default();
        assert_eq!(flow.confirm(), Err(FlowError::NothingToConfirm));
        assert_eq!(flow.complete(), Err(FlowError::NotProcessing));
        assert_eq!(flow.cancel(), Err(FlowError::NothingPending));

        flow.request(1).expect("request");
        assert_eq!(flow.request(2), Err(FlowError::Busy));
        assert_eq!(flow.complete(), Err(FlowError::NotProcessing));
        assert_eq!(flow, ConfirmFlow::Confirming(1));
    }
}
