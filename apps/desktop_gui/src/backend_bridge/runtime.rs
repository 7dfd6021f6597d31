//! Runtime bridge between UI command queue and backend event intake.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use planner_client::PlanService;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

/// Spawns the planner worker thread. It runs until `Shutdown` arrives or
/// either channel closes.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn PlanService>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Planner worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::worker_startup(format!(
                    "failed to build runtime: {err}"
                ))));
                tracing::error!("failed to build planner runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Planner worker ready".to_string()));
            tracing::info!("planner worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::RequestPlan {
                        submission,
                        request,
                    } => {
                        let event = match service.request_plan(&request).await {
                            Ok(plan) => {
                                tracing::info!(%submission, "vacation plan received");
                                UiEvent::PlanReady { submission, plan }
                            }
                            Err(err) => {
                                let error = UiError::from_request_error(&err);
                                tracing::warn!(
                                    %submission,
                                    category = ?error.category(),
                                    "vacation plan request failed: {err}"
                                );
                                UiEvent::PlanFailed { submission, error }
                            }
                        };
                        // Blocking send: a terminal event must never be dropped.
                        if ui_tx.send(event).is_err() {
                            tracing::info!("ui event receiver closed; stopping planner worker");
                            break;
                        }
                    }
                    BackendCommand::Shutdown => break,
                }
            }

            tracing::info!("planner worker stopped");
        });
    })
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
