//! Submission controller: validates the form, queues exactly one plan request,
//! and folds worker events back into `UiState`.

use chrono::NaiveDate;
use crossbeam_channel::Sender;
use shared::domain::SubmissionId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::state::{reduce, Transition, UiState};
use crate::ui::form::{FormModel, ValidationFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Queued(SubmissionId),
    Invalid(ValidationFailure),
    AlreadyBusy,
    DispatchFailed(UiError),
}

pub struct SubmissionController {
    state: UiState,
    last_submission: SubmissionId,
    status: String,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self {
            state: UiState::default(),
            last_submission: SubmissionId(0),
            status: "Ready".to_string(),
        }
    }
}

impl SubmissionController {
    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn submit(
        &mut self,
        form: &FormModel,
        today: NaiveDate,
        cmd_tx: &Sender<BackendCommand>,
    ) -> SubmitOutcome {
        if self.state.is_loading() {
            return SubmitOutcome::AlreadyBusy;
        }

        let request = match form.validate_on(today) {
            Ok(request) => request,
            Err(failure) => {
                tracing::debug!(field = ?failure.field, "vacation form rejected: {failure}");
                self.status = format!("Check the form: {failure}");
                return SubmitOutcome::Invalid(failure);
            }
        };

        let submission = self.last_submission.next();
        self.last_submission = submission;
        self.apply(Transition::SubmitStarted(submission));
        self.status = format!("Planning your trip to {}...", request.destination);

        match dispatch_backend_command(
            cmd_tx,
            BackendCommand::RequestPlan {
                submission,
                request,
            },
        ) {
            Ok(()) => SubmitOutcome::Queued(submission),
            Err(error) => {
                self.status = error.message().to_string();
                self.apply(Transition::SubmitFailed {
                    submission,
                    error: error.clone(),
                });
                SubmitOutcome::DispatchFailed(error)
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::Error(error) => {
                tracing::error!(context = ?error.context(), "planner worker error: {}", error.message());
                self.status = error.message().to_string();
                // A dead worker must not leave a submission hanging.
                if let Some(submission) = self.state.in_flight() {
                    self.apply(Transition::SubmitFailed { submission, error });
                }
            }
            UiEvent::PlanReady { submission, plan } => {
                if self.state.in_flight() == Some(submission) {
                    self.status = "Plan ready".to_string();
                }
                self.apply(Transition::SubmitSucceeded {
                    submission,
                    plan: plan.vacation,
                });
            }
            UiEvent::PlanFailed { submission, error } => {
                if self.state.in_flight() == Some(submission) {
                    self.status = error.headline();
                }
                self.apply(Transition::SubmitFailed { submission, error });
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.apply(Transition::DismissError);
    }

    fn apply(&mut self, transition: Transition) {
        self.state = reduce(&self.state, transition);
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
