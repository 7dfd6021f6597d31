use super::*;
use std::{
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use axum::{http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use crossbeam_channel::bounded;
use planner_client::{ClientConfig, PlanRequestError, PlannerClient};
use shared::{
    domain::{Reason, SubmissionId},
    protocol::{VacationRequest, VacationResponse},
};

use crate::controller::events::UiErrorCategory;

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

struct StubService {
    reply: Result<String, u16>,
    seen: Mutex<Vec<VacationRequest>>,
}

impl StubService {
    fn ok(plan: &str) -> Self {
        Self {
            reply: Ok(plan.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlanService for StubService {
    async fn request_plan(
        &self,
        request: &VacationRequest,
    ) -> Result<VacationResponse, PlanRequestError> {
        self.seen.lock().expect("lock").push(request.clone());
        match &self.reply {
            Ok(plan) => Ok(VacationResponse {
                vacation: plan.clone(),
            }),
            Err(status) => Err(PlanRequestError::Status {
                status: *status,
                message: None,
            }),
        }
    }
}

fn sample_request() -> VacationRequest {
    VacationRequest {
        destination: "Reykjavik".to_string(),
        reason: Reason::Friends,
        start_date: NaiveDate::from_ymd_opt(2024, 2, 10).expect("date"),
        end_date: NaiveDate::from_ymd_opt(2024, 2, 14).expect("date"),
    }
}

fn next_terminal_event(ui_rx: &crossbeam_channel::Receiver<UiEvent>) -> UiEvent {
    loop {
        match ui_rx.recv_timeout(EVENT_TIMEOUT).expect("worker event") {
            UiEvent::Info(_) => continue,
            other => return other,
        }
    }
}

#[test]
fn successful_request_yields_plan_ready() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(16);
    let service = Arc::new(StubService::ok("# Plan\n- Day 1"));
    let handle = launch(cmd_rx, ui_tx, service.clone());

    cmd_tx
        .send(BackendCommand::RequestPlan {
            submission: SubmissionId(7),
            request: sample_request(),
        })
        .expect("send");

    match next_terminal_event(&ui_rx) {
        UiEvent::PlanReady { submission, plan } => {
            assert_eq!(submission, SubmissionId(7));
            assert_eq!(plan.vacation, "# Plan\n- Day 1");
        }
        _ => panic!("expected PlanReady"),
    }
    assert_eq!(service.seen.lock().expect("lock").as_slice(), &[sample_request()]);

    cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");
    handle.join().expect("worker joins");
}

#[test]
fn failed_request_yields_plan_failed() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(16);
    let handle = launch(cmd_rx, ui_tx, Arc::new(StubService::failing(502)));

    cmd_tx
        .send(BackendCommand::RequestPlan {
            submission: SubmissionId(1),
            request: sample_request(),
        })
        .expect("send");

    match next_terminal_event(&ui_rx) {
        UiEvent::PlanFailed { submission, error } => {
            assert_eq!(submission, SubmissionId(1));
            assert_eq!(error.category(), UiErrorCategory::Server);
        }
        _ => panic!("expected PlanFailed"),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");
    handle.join().expect("worker joins");
}

#[test]
fn worker_stops_when_command_sender_drops() {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
    let (ui_tx, _ui_rx) = bounded(16);
    let handle = launch(cmd_rx, ui_tx, Arc::new(StubService::ok("unused")));
    drop(cmd_tx);
    handle.join().expect("worker joins");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_reports_http_failure_from_real_client() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/ai/ask",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "model offline" })),
            )
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let endpoint = url::Url::parse(&format!("http://{addr}/ai/ask")).expect("url");
    let client = PlannerClient::new(ClientConfig::new(endpoint)).expect("client");

    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(16);
    let handle = launch(cmd_rx, ui_tx, Arc::new(client));
    cmd_tx
        .send(BackendCommand::RequestPlan {
            submission: SubmissionId(2),
            request: sample_request(),
        })
        .expect("send");

    let event = tokio::task::spawn_blocking(move || next_terminal_event(&ui_rx))
        .await
        .expect("join");
    match event {
        UiEvent::PlanFailed { error, .. } => {
            assert_eq!(error.category(), UiErrorCategory::Server);
            assert!(error.message().contains("model offline"));
        }
        _ => panic!("expected PlanFailed"),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");
    tokio::task::spawn_blocking(move || handle.join())
        .await
        .expect("join task")
        .expect("worker joins");
}
