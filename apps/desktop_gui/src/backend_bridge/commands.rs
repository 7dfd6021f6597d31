//! Backend commands queued from UI to backend worker.

use shared::{domain::SubmissionId, protocol::VacationRequest};

pub enum BackendCommand {
    RequestPlan {
        submission: SubmissionId,
        request: VacationRequest,
    },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RequestPlan { .. } => "request_plan",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
