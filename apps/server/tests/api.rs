use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use itinero_server::{api::app_router, build_state, config::Config, scheduler::run_quote_sweep};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = Config::with_db_path(tmp.path().join("test.db").to_string_lossy()).unwrap();
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn snapshot_body(day: &str, ghs: f64) -> Value {
    json!({
        "provider": "exchangerate-api",
        "baseCurrency": "usd",
        "asOf": day,
        "rates": { "USD": 1.0, "GHS": ghs, "EUR": 0.92 }
    })
}

#[tokio::test]
async fn healthz_works() {
    let (_tmp, app) = build_test_router().await;
    let (status, _) = send(&app, Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn fx_snapshot_record_and_convert() {
    let (_tmp, app) = build_test_router().await;

    let (status, _) = send(&app, Method::GET, "/api/v1/fx/latest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Without a snapshot a conversion is absent, not an error
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/fx/convert?amount=10&from=USD&to=GHS",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "amount": null }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/fx/snapshots",
        Some(snapshot_body("2025-12-01", 12.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], json!(true));
    assert_eq!(body["snapshot"]["baseCurrency"], json!("USD"));

    // Same provider, base and day again: the stored snapshot is returned
    let (status, again) = send(
        &app,
        Method::POST,
        "/api/v1/fx/snapshots",
        Some(snapshot_body("2025-12-01", 99.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["created"], json!(false));
    assert_eq!(again["snapshot"]["id"], body["snapshot"]["id"]);
    assert_eq!(again["snapshot"]["rates"]["GHS"], json!(12.0));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/fx/convert?amount=10&from=usd&to=GHS",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_f64().unwrap(), 120.0);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/fx/convert?amount=10&from=USD&to=JPY",
        None,
    )
    .await;
    assert_eq!(body, json!({ "amount": null }));

    let (status, body) = send(&app, Method::GET, "/api/v1/fx/latest?base=USD", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["asOf"], json!("2025-12-01"));

    let (status, _) = send(&app, Method::GET, "/api/v1/fx/latest?base=DOLLAR", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_snapshot_is_rejected() {
    let (_tmp, app) = build_test_router().await;
    let mut body = snapshot_body("2025-12-01", 12.0);
    body["rates"]["GHS"] = json!(-1.0);
    let (status, _) = send(&app, Method::POST, "/api/v1/fx/snapshots", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn currencies_are_listed() {
    let (_tmp, app) = build_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/currencies", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert!(list.iter().any(|c| c["code"] == json!("GHS")));
}

#[tokio::test]
async fn quote_confirm_and_balance_flow() {
    let (_tmp, app) = build_test_router().await;

    let (status, quote) = send(
        &app,
        Method::POST,
        "/api/v1/points/quotes",
        Some(json!({ "userId": "user-1", "points": 250 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quote["amountMajor"], json!(100.0));
    assert_eq!(quote["amountMinor"], json!(10000));
    assert_eq!(quote["currency"], json!("GHS"));
    assert_eq!(quote["status"], json!("pending"));
    let id = quote["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/points/quotes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], quote["id"]);

    let confirm_uri = format!("/api/v1/points/quotes/{id}/confirm");
    let (status, outcome) = send(
        &app,
        Method::POST,
        &confirm_uri,
        Some(json!({ "reference": "psk_123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], json!("credited"));
    assert_eq!(outcome["entry"]["delta"], json!(250.0));
    assert_eq!(outcome["entry"]["refId"], json!("psk_123"));

    // A replayed confirmation writes nothing
    let (_, replay) = send(
        &app,
        Method::POST,
        &confirm_uri,
        Some(json!({ "reference": "psk_123" })),
    )
    .await;
    assert_eq!(replay["outcome"], json!("alreadyProcessed"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/points/ledger",
        Some(json!({ "userId": "user-1", "delta": -50 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reason"], json!("manual_topup"));

    let (_, balance) = send(&app, Method::GET, "/api/v1/points/users/user-1/balance", None).await;
    assert_eq!(balance, json!({ "userId": "user-1", "balance": 200.0 }));

    let (_, ledger) = send(&app, Method::GET, "/api/v1/points/users/user-1/ledger", None).await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn points_input_errors() {
    let (_tmp, app) = build_test_router().await;

    for body in [
        json!({ "userId": "user-1", "points": 0 }),
        json!({ "userId": "user-1", "points": -5 }),
        json!({ "userId": "", "points": 10 }),
        json!({ "userId": "user-1", "points": "abc" }),
        json!({ "userId": "user-1" }),
    ] {
        let (status, err) = send(&app, Method::POST, "/api/v1/points/quotes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], json!(400));
        assert!(err["message"].is_string());
    }

    for (uri, body) in [
        ("/api/v1/points/ledger", json!({ "userId": "user-1", "delta": "lots" })),
        ("/api/v1/points/quotes/q-1/confirm", json!({ "ref": "psk_1" })),
        ("/api/v1/fx/snapshots", json!({ "provider": "manual" })),
    ] {
        let (status, err) = send(&app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(err["code"], json!(400));
    }

    let (status, err) = send(
        &app,
        Method::GET,
        "/api/v1/fx/convert?amount=abc&from=USD&to=GHS",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], json!(400));

    let (status, _) = send(&app, Method::GET, "/api/v1/points/quotes/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/points/quotes/missing/confirm",
        Some(json!({ "reference": "psk_1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sweep_leaves_fresh_quotes_pending() {
    let tmp = tempdir().unwrap();
    let config = Config::with_db_path(tmp.path().join("test.db").to_string_lossy()).unwrap();
    let state = build_state(&config).await.unwrap();
    let quote = state
        .points_service
        .request_quote("user-1", 10.0)
        .await
        .unwrap();

    run_quote_sweep(&state).await;

    let stored = state.points_service.get_quote(&quote.id).unwrap();
    assert_eq!(stored.status, quote.status);
}
