//! Integration tests for the carbon dashboard.
//!
//! A fake Electricity Maps endpoint is served on a loopback port and the
//! real client is pointed at it, so these run without network access.

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use carbon_dashboard::api::{create_router, AppState};
use carbon_dashboard::config::Config;
use carbon_dashboard::error::FetchError;
use carbon_dashboard::intensity::{ElectricityMapsClient, HistorySource};

/// What the fake upstream answers, and the Authorization headers it saw.
#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: Value,
    seen_auth: Arc<Mutex<Vec<String>>>,
}

async fn history(State(upstream): State<Upstream>, headers: HeaderMap) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    upstream.seen_auth.lock().unwrap().push(auth);

    (upstream.status, axum::Json(upstream.body))
}

/// Start a fake upstream and return its history URL plus the shared state.
async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Upstream) {
    let upstream = Upstream {
        status,
        body,
        seen_auth: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v3/carbon-intensity/history", get(history))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (
        format!("http://{}/v3/carbon-intensity/history?zone=GB", addr),
        upstream,
    )
}

fn client_for(url: String, token: &str) -> ElectricityMapsClient {
    let config = Config {
        electricity_maps_api_url: url,
        electricity_maps_api_token: token.to_string(),
        ..Config::default()
    };
    ElectricityMapsClient::new(&config).unwrap()
}

fn sample_history() -> Value {
    json!({
        "zone": "GB",
        "history": [
            {"zone": "GB", "carbonIntensity": 200, "datetime": "2024-10-24T10:00:00.000Z", "isEstimated": false},
            {"zone": "GB", "carbonIntensity": 210, "datetime": "2024-10-24T11:00:00.000Z", "isEstimated": false},
            {"zone": "GB", "carbonIntensity": 190, "datetime": "2024-10-24T12:00:00.000Z", "isEstimated": true}
        ]
    })
}

async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn client_sends_bearer_token_and_parses_history() {
    let (url, upstream) = spawn_upstream(StatusCode::OK, sample_history()).await;
    let client = client_for(url, "secret-token");

    let readings = client.fetch().await.unwrap();

    assert_eq!(readings.len(), 3);
    assert_eq!(readings[0].datetime(), Some("2024-10-24T10:00:00.000Z"));
    assert_eq!(readings[2].intensity(), Some(190.0));
    assert_eq!(
        upstream.seen_auth.lock().unwrap().as_slice(),
        ["Bearer secret-token".to_string()]
    );
}

#[tokio::test]
async fn client_maps_non_200_to_status_error() {
    let (url, _) = spawn_upstream(StatusCode::UNAUTHORIZED, json!({"error": "no"})).await;
    let client = client_for(url, "");

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn client_rejects_body_without_history() {
    let (url, _) = spawn_upstream(StatusCode::OK, json!({"zone": "GB"})).await;
    let client = client_for(url, "token");

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));
}

#[tokio::test]
async fn dashboard_end_to_end() {
    let (url, upstream) = spawn_upstream(StatusCode::OK, sample_history()).await;
    let app = create_router(AppState::new(Arc::new(client_for(url, "token"))));

    let (status, body) = get_body(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("The average carbon intensity in the last 24 hours"));
    assert!(body.contains("200.0"));

    let (status, body) = get_body(app.clone(), "/view_data").await;
    assert_eq!(status, StatusCode::OK);
    let data: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(data, sample_history()["history"]);

    let (status, body) = get_body(app, "/download_csv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Hour,Carbon Intensity (gCO2eq/kWh)\r\n\
         2024-10-24 10:00:00,200\r\n\
         2024-10-24 11:00:00,210\r\n\
         2024-10-24 12:00:00,190\r\n\
         Average,200.0\r\n"
    );

    // No caching: one upstream call per view.
    assert_eq!(upstream.seen_auth.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard_upstream_down() {
    let (url, _) = spawn_upstream(StatusCode::BAD_GATEWAY, json!({})).await;
    let app = create_router(AppState::new(Arc::new(client_for(url, "token"))));

    let (status, body) = get_body(app.clone(), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to retrieve data");

    let (status, body) = get_body(app.clone(), "/view_data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": "Failed to retrieve data"})
    );

    let (status, body) = get_body(app, "/download_csv").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to retrieve data");
}

#[tokio::test]
async fn dashboard_null_intensity_reaches_json_view() {
    let history = json!({
        "zone": "GB",
        "history": [
            {"zone": "GB", "carbonIntensity": 200, "datetime": "2024-10-24T10:00:00.000Z"},
            {"datetime": "2024-10-24T11:00:00.000Z", "carbonIntensity": null}
        ]
    });
    let (url, _) = spawn_upstream(StatusCode::OK, history.clone()).await;
    let app = create_router(AppState::new(Arc::new(client_for(url, "token"))));

    let (status, body) = get_body(app.clone(), "/view_data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), history["history"]);

    let (status, body) = get_body(app.clone(), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to process data");

    let (status, body) = get_body(app, "/download_csv").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to process data");
}
