//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(UiError::new(
                UiErrorCategory::Transport,
                UiErrorContext::SubmitPlan,
                "UI command queue is full; please retry",
            ))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(UiError::new(
                UiErrorCategory::Transport,
                UiErrorContext::SubmitPlan,
                "Planner worker disconnected (possible startup/runtime failure); restart the app",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossbeam_channel::bounded;
    use shared::{
        domain::{Reason, SubmissionId},
        protocol::VacationRequest,
    };

    fn request_plan(id: u64) -> BackendCommand {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        BackendCommand::RequestPlan {
            submission: SubmissionId(id),
            request: VacationRequest {
                destination: "Oslo".to_string(),
                reason: Reason::Family,
                start_date: date,
                end_date: date,
            },
        }
    }

    #[test]
    fn queues_command_when_there_is_room() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, request_plan(1)).expect("queued");
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::RequestPlan {
                submission: SubmissionId(1),
                ..
            })
        ));
    }

    #[test]
    fn full_queue_is_a_transport_error() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, request_plan(1)).expect("queued");
        let err = dispatch_backend_command(&tx, request_plan(2)).expect_err("full");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.message().contains("queue is full"));
    }

    #[test]
    fn disconnected_worker_is_a_transport_error() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let err = dispatch_backend_command(&tx, BackendCommand::Shutdown).expect_err("gone");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.message().contains("disconnected"));
    }
}
