//! Planner UI state as an immutable value with a pure reducer.

use shared::domain::SubmissionId;

use crate::controller::events::UiError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    in_flight: Option<SubmissionId>,
    result: Option<String>,
    error: Option<UiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SubmitStarted(SubmissionId),
    SubmitSucceeded {
        submission: SubmissionId,
        plan: String,
    },
    SubmitFailed {
        submission: SubmissionId,
        error: UiError,
    },
    DismissError,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    /// Form inputs and the submit button accept interaction only while idle.
    pub fn controls_enabled(&self) -> bool {
        !self.is_loading()
    }
}

pub fn reduce(state: &UiState, transition: Transition) -> UiState {
    match transition {
        Transition::SubmitStarted(submission) => {
            if state.is_loading() {
                return state.clone();
            }
            UiState {
                in_flight: Some(submission),
                result: state.result.clone(),
                error: None,
            }
        }
        Transition::SubmitSucceeded { submission, plan } => {
            if state.in_flight != Some(submission) {
                return state.clone();
            }
            UiState {
                in_flight: None,
                result: Some(plan),
                error: None,
            }
        }
        Transition::SubmitFailed { submission, error } => {
            if state.in_flight != Some(submission) {
                return state.clone();
            }
            UiState {
                in_flight: None,
                result: state.result.clone(),
                error: Some(error),
            }
        }
        Transition::DismissError => UiState {
            error: None,
            ..state.clone()
        },
    }
}
