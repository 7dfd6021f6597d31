use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use shared::domain::Reason;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
enum Reply {
    Json(StatusCode, serde_json::Value),
    Raw(StatusCode, &'static str),
    Stall(Duration),
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    tx: Arc<Mutex<Option<oneshot::Sender<serde_json::Value>>>>,
}

async fn handle_ask(
    State(state): State<ServerState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, String) {
    // Reject anything the planning service could not decode either.
    let decoded = serde_json::from_value::<VacationRequest>(body.clone());
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(body);
    }
    if let Err(err) = decoded {
        let body = serde_json::json!({ "message": err.to_string() });
        return (StatusCode::BAD_REQUEST, body.to_string());
    }
    match state.reply {
        Reply::Json(status, value) => (status, value.to_string()),
        Reply::Raw(status, text) => (status, text.to_string()),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, r##"{"vacation":"# Late"}"##.to_string())
        }
    }
}

async fn spawn_plan_server(reply: Reply) -> (Url, oneshot::Receiver<serde_json::Value>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        reply,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/ai/ask", post(handle_ask))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let endpoint = Url::parse(&format!("http://{addr}/ai/ask")).expect("endpoint url");
    (endpoint, rx)
}

fn sample_request() -> VacationRequest {
    VacationRequest {
        destination: "Kyoto".to_string(),
        reason: Reason::Romantic,
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).expect("date"),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 6).expect("date"),
    }
}

fn client_for(endpoint: Url) -> PlannerClient {
    PlannerClient::new(ClientConfig::new(endpoint)).expect("client")
}

#[tokio::test]
async fn posts_request_body_and_returns_plan() {
    let (endpoint, body_rx) = spawn_plan_server(Reply::Json(
        StatusCode::OK,
        serde_json::json!({ "vacation": "# Plan\n- Day 1" }),
    ))
    .await;

    let plan = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect("plan");
    assert_eq!(plan.vacation, "# Plan\n- Day 1");

    let body = body_rx.await.expect("captured body");
    assert_eq!(
        body,
        serde_json::json!({
            "destination": "Kyoto",
            "reason": "romantic",
            "startDate": "2024-04-01T00:00:00.000Z",
            "endDate": "2024-04-06T00:00:00.000Z",
        })
    );
    let decoded: VacationRequest = serde_json::from_value(body).expect("service-side decode");
    assert_eq!(decoded, sample_request());
}

#[tokio::test]
async fn plan_service_trait_delegates_to_client() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Json(
        StatusCode::OK,
        serde_json::json!({ "vacation": "Pack light." }),
    ))
    .await;

    let service: Arc<dyn PlanService> = Arc::new(client_for(endpoint));
    let plan = service
        .request_plan(&sample_request())
        .await
        .expect("plan");
    assert_eq!(plan.vacation, "Pack light.");
}

#[tokio::test]
async fn error_status_surfaces_service_message() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "message": "model quota exhausted" }),
    ))
    .await;

    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("server error");
    assert_eq!(err.kind(), PlanErrorKind::Server);
    match err {
        PlanRequestError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("model quota exhausted"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_status_without_json_body_has_no_details() {
    let (endpoint, _body_rx) =
        spawn_plan_server(Reply::Raw(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")).await;

    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("gateway error");
    assert_eq!(
        err.to_string(),
        "planning service returned HTTP 502: no details"
    );
}

#[tokio::test]
async fn missing_vacation_field_is_malformed() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Json(
        StatusCode::OK,
        serde_json::json!({ "plan": "# Plan" }),
    ))
    .await;

    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("malformed");
    assert_eq!(err.kind(), PlanErrorKind::Malformed);
    assert!(matches!(err, PlanRequestError::MalformedResponse(_)));
}

#[tokio::test]
async fn blank_plan_is_malformed() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Json(
        StatusCode::OK,
        serde_json::json!({ "vacation": "  \n " }),
    ))
    .await;

    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("empty plan");
    assert!(matches!(err, PlanRequestError::EmptyPlan));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Raw(StatusCode::OK, "# Plan")).await;

    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("not json");
    assert_eq!(err.kind(), PlanErrorKind::Malformed);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/ai/ask")).expect("endpoint url");
    let err = client_for(endpoint)
        .plan(&sample_request())
        .await
        .expect_err("connection refused");
    assert_eq!(err.kind(), PlanErrorKind::Transport);
}

#[tokio::test]
async fn configured_timeout_fails_stalled_request() {
    let (endpoint, _body_rx) = spawn_plan_server(Reply::Stall(Duration::from_secs(5))).await;

    let client = PlannerClient::new(
        ClientConfig::new(endpoint).with_timeout(Duration::from_millis(200)),
    )
    .expect("client");
    let err = client
        .plan(&sample_request())
        .await
        .expect_err("timeout");
    assert_eq!(err.kind(), PlanErrorKind::Timeout);
}

#[test]
fn default_endpoint_is_an_absolute_https_url() {
    let endpoint = Url::parse(DEFAULT_ENDPOINT).expect("default endpoint");
    assert_eq!(endpoint.scheme(), "https");
    assert_eq!(endpoint.path(), "/ai/ask");
}
