//! Integration tests for the HTTP API

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use salesboard_config::Config;
use salesboard_server::{router, AppState};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

const GOOD_CSV: &str = "\
Date,Product,Region,Sales
2024-01-05,Widget,North,100
2024-01-05,Widget,North,100
2024-02-02,Gadget,South,300
2024-03-09,Widget,West,55.5
";

fn app() -> Router {
    // Default config: no API key, so summaries come back unavailable
    // without any network traffic.
    let state = AppState::from_config(Config::default()).unwrap();
    router(state)
}

fn multipart_upload(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri("/api/dashboard")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_index_serves_dashboard_page() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("SalesBoard"));
    assert!(page.contains("/api/dashboard"));
}

#[tokio::test]
async fn test_dashboard_upload_happy_path() {
    let response = app()
        .oneshot(multipart_upload("sales.csv", GOOD_CSV))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["report"]["rows_in"], 4);
    assert_eq!(body["report"]["rows_out"], 3);
    assert_eq!(body["report"]["duplicates_removed"], 1);

    assert_eq!(body["facts"]["top_product"]["key"], "Gadget");
    assert_eq!(body["facts"]["top_region"]["key"], "South");
    assert_eq!(body["facts"]["best_month"]["label"], "2024-02");

    // The cleaned table itself ships with the response.
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["date"], "2024-01-05");
    assert_eq!(records[0]["product"], "Widget");
    assert_eq!(records[0]["sales"], 100.0);

    // All four charts are ready and decode to PNG bytes.
    for chart in ["monthly_trend", "top_products", "top_regions", "region_share"] {
        assert_eq!(body["charts"][chart]["status"], "ready", "chart {}", chart);
        let encoded = body["charts"][chart]["png"].as_str().unwrap();
        let png = BASE64.decode(encoded).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "chart {}", chart);
    }

    // No API key configured: summary is explicitly unavailable, never
    // an error message posing as summary text.
    assert_eq!(body["summary"]["status"], "unavailable");
    assert_eq!(body["summary"]["kind"], "configuration");
}

#[tokio::test]
async fn test_undrawable_chart_does_not_abort_upload() {
    // Negative and zero sales survive cleaning but leave the region
    // share pie with no positive slice; the dashboard must still come
    // back whole.
    let csv = "\
Date,Product,Region,Sales
2024-01-05,Widget,North,-100
2024-01-06,Gadget,South,0
";
    let response = app().oneshot(multipart_upload("sales.csv", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["report"]["rows_out"], 2);
    assert_eq!(body["facts"]["top_product"]["key"], "Gadget");
    assert_eq!(body["facts"]["top_region"]["key"], "South");

    assert_eq!(body["charts"]["region_share"]["status"], "unavailable");
    assert!(body["charts"]["region_share"]["message"]
        .as_str()
        .unwrap()
        .contains("No positive region totals"));

    // Bar charts handle non-positive values and still render.
    assert_eq!(body["charts"]["monthly_trend"]["status"], "ready");
    assert_eq!(body["charts"]["top_products"]["status"], "ready");
}

#[tokio::test]
async fn test_dashboard_rejects_missing_column() {
    let csv = "When,Product,Region,Sales\n2024-01-05,Widget,North,100\n";
    let response = app().oneshot(multipart_upload("sales.csv", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "ingest");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Missing required column 'Date'"));
}

#[tokio::test]
async fn test_dashboard_rejects_unsupported_extension() {
    let response = app()
        .oneshot(multipart_upload("sales.pdf", GOOD_CSV))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[tokio::test]
async fn test_dashboard_rejects_legacy_xls() {
    // No reader for BIFF workbooks; the user gets a clear message
    // instead of an opaque open failure.
    let response = app()
        .oneshot(multipart_upload("sales.xls", GOOD_CSV))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Unsupported file type"));
}

#[tokio::test]
async fn test_dashboard_rejects_missing_file_field() {
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         hello\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/dashboard")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_dashboard_rejects_fully_invalid_sales() {
    let csv = "Date,Product,Region,Sales\n2024-01-05,Widget,North,abc\n";
    let response = app().oneshot(multipart_upload("sales.csv", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "cleaning");
}

#[tokio::test]
async fn test_speech_rejects_empty_text() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/speech")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"   "}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "validation");
}
