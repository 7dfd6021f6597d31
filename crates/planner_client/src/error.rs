use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorKind {
    Setup,
    Transport,
    Timeout,
    Server,
    Malformed,
}

#[derive(Debug, Error)]
pub enum PlanRequestError {
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("failed to reach planning service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("planning service timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error(
        "planning service returned HTTP {status}: {}",
        .message.as_deref().unwrap_or("no details")
    )]
    Status { status: u16, message: Option<String> },
    #[error("malformed planning service response: {0}")]
    MalformedResponse(String),
    #[error("planning service returned an empty plan")]
    EmptyPlan,
}

impl PlanRequestError {
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }

    pub fn kind(&self) -> PlanErrorKind {
        match self {
            Self::ClientBuild(_) => PlanErrorKind::Setup,
            Self::Transport(_) => PlanErrorKind::Transport,
            Self::Timeout(_) => PlanErrorKind::Timeout,
            Self::Status { .. } => PlanErrorKind::Server,
            Self::MalformedResponse(_) | Self::EmptyPlan => PlanErrorKind::Malformed,
        }
    }
}
