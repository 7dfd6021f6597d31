//! Worker-to-UI events and error modeling for the planner controller.

use planner_client::{PlanErrorKind, PlanRequestError};
use shared::{domain::SubmissionId, protocol::VacationResponse};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    PlanReady {
        submission: SubmissionId,
        plan: VacationResponse,
    },
    PlanFailed {
        submission: SubmissionId,
        error: UiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Server,
    MalformedResponse,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FormValidation,
    SubmitPlan,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Server => "Planning service",
        UiErrorCategory::MalformedResponse => "Unexpected response",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

pub fn classify_plan_failure(message: &str) -> String {
    if message.to_ascii_lowercase().contains("worker startup failure") {
        "Planner worker failed to start; restart the app and retry.".to_string()
    } else {
        format!("Planning request failed: {message}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// The worker thread could not bring up its runtime; nothing can be planned.
    pub fn worker_startup(detail: impl std::fmt::Display) -> Self {
        Self::new(
            UiErrorCategory::Unknown,
            UiErrorContext::BackendStartup,
            format!("planner worker startup failure: {detail}"),
        )
    }

    pub fn from_request_error(err: &PlanRequestError) -> Self {
        let category = match err.kind() {
            PlanErrorKind::Transport | PlanErrorKind::Timeout => UiErrorCategory::Transport,
            PlanErrorKind::Server => UiErrorCategory::Server,
            PlanErrorKind::Malformed => UiErrorCategory::MalformedResponse,
            PlanErrorKind::Setup => UiErrorCategory::Unknown,
        };
        Self::new(category, UiErrorContext::SubmitPlan, err.to_string())
    }

    /// Short sentence shown above the raw message in the result viewport.
    pub fn headline(&self) -> String {
        match self.category {
            UiErrorCategory::Transport => {
                "Planning service unreachable; check your network and retry.".to_string()
            }
            UiErrorCategory::Server => {
                "The planning service could not produce a plan right now.".to_string()
            }
            UiErrorCategory::MalformedResponse => {
                "The planning service sent back something that is not a plan.".to_string()
            }
            UiErrorCategory::Validation => "Please review the form.".to_string(),
            UiErrorCategory::Unknown => classify_plan_failure(&self.message),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
