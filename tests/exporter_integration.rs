mod common;

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use f2pool_exporter::config::FailurePolicy;
use mockito::Server;
use tower::ServiceExt;

use common::{
    account_lines, body_text, build_app, build_config, get, sample, sample_lines, ACCOUNT_FIXTURE,
};

const ALICE: &[(&str, &str)] = &[("currency", "bitcoin"), ("account", "alice")];

fn alice_worker(worker: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("currency", "bitcoin"),
        ("account", "alice"),
        ("worker", worker),
    ]
}

#[tokio::test]
async fn scrape_publishes_account_and_worker_metrics() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ACCOUNT_FIXTURE)
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    let response = app.oneshot(get("/metrics")).await.unwrap();
    m.assert_async().await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");

    let text = body_text(response).await;

    assert_eq!(sample(&text, "f2pool_balance", ALICE), Some(0.00231));
    assert_eq!(sample(&text, "f2pool_paid", ALICE), Some(1.25));
    assert_eq!(sample(&text, "f2pool_value", ALICE), Some(1.25231));
    assert_eq!(sample(&text, "f2pool_value_last_day", ALICE), Some(0.0004));
    assert_eq!(sample(&text, "f2pool_up", ALICE), Some(1.0));

    let all = alice_worker("all");
    assert_eq!(sample(&text, "f2pool_hashrate", &all), Some(100.0));
    assert_eq!(sample(&text, "f2pool_hashes_last_hour", &all), Some(360000.0));
    assert_eq!(sample(&text, "f2pool_hashes_last_day", &all), Some(8640000.0));
    assert_eq!(
        sample(&text, "f2pool_stale_hashes_rejected_last_hour", &all),
        Some(1.0)
    );
    assert_eq!(
        sample(&text, "f2pool_stale_hashes_rejected_last_day", &all),
        Some(5.0)
    );

    let w1 = alice_worker("w1");
    assert_eq!(sample(&text, "f2pool_hashrate", &w1), Some(10.0));
    assert_eq!(sample(&text, "f2pool_hashes_last_hour", &w1), Some(5.0));
    assert_eq!(sample(&text, "f2pool_hashes_last_day", &w1), Some(100.0));
    assert_eq!(
        sample(&text, "f2pool_stale_hashes_rejected_last_hour", &w1),
        Some(0.0)
    );
    assert_eq!(
        sample(&text, "f2pool_stale_hashes_rejected_last_day", &w1),
        Some(1.0)
    );
    assert_eq!(
        sample(&text, "f2pool_worker_shares_time", &w1),
        Some(1_704_067_200.0)
    );

    let lines = account_lines(&text);
    assert_eq!(lines.len(), 16, "{text}");
    for line in lines {
        assert!(line.contains(r#"currency="bitcoin""#), "{line}");
        assert!(line.contains(r#"account="alice""#), "{line}");
    }
}

#[tokio::test]
async fn root_redirects_to_configured_metrics_path() {
    for metrics_path in ["/metrics", "/stats"] {
        let (app, _fatal_rx) = build_app(build_config(
            "http://127.0.0.1:9",
            &["bitcoin/alice"],
            metrics_path,
            FailurePolicy::Isolate,
        ));

        for path in ["/", "/anything/else"] {
            let response = app.clone().oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY, "{path}");
            assert_eq!(response.headers()[LOCATION], metrics_path, "{path}");
        }
    }
}

#[tokio::test]
async fn custom_metrics_path_serves_metrics() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_body(ACCOUNT_FIXTURE)
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/stats",
        FailurePolicy::Isolate,
    ));

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert_eq!(sample(&text, "f2pool_paid", ALICE), Some(1.25));
}

#[tokio::test]
async fn health_does_not_contact_upstream() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    m.assert_async().await;
}

#[tokio::test]
async fn missing_field_marks_resource_down() {
    let mut server = Server::new_async().await;
    let body = ACCOUNT_FIXTURE.replace("\"balance\": 0.00231,", "");
    server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let (app, mut fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert_eq!(sample(&text, "f2pool_up", ALICE), Some(0.0));
    assert_eq!(sample(&text, "f2pool_balance", ALICE), None);
    assert_eq!(sample(&text, "f2pool_paid", ALICE), None);
    assert!(fatal_rx.try_recv().is_err());
}

#[tokio::test]
async fn failing_resource_does_not_hide_the_others() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_body(ACCOUNT_FIXTURE)
        .create_async()
        .await;
    server
        .mock("GET", "/litecoin/bob")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice", "litecoin/bob"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    let text = body_text(app.oneshot(get("/metrics")).await.unwrap()).await;
    assert_eq!(sample(&text, "f2pool_up", ALICE), Some(1.0));
    assert_eq!(sample(&text, "f2pool_balance", ALICE), Some(0.00231));
    assert_eq!(
        sample(&text, "f2pool_up", &[("currency", "litecoin"), ("account", "bob")]),
        Some(0.0)
    );
}

#[tokio::test]
async fn exit_policy_fails_scrape_and_requests_shutdown() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bitcoin/alice")
        .with_status(500)
        .create_async()
        .await;

    let (app, mut fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/metrics",
        FailurePolicy::Exit,
    ));

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("bitcoin/alice"), "{message}");

    let fatal = fatal_rx.try_recv().expect("shutdown should be requested");
    assert!(fatal.to_string().contains("500"), "{fatal}");
}

#[tokio::test]
async fn successive_scrapes_are_identical() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_body(ACCOUNT_FIXTURE)
        .expect(2)
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    let first = body_text(app.clone().oneshot(get("/metrics")).await.unwrap()).await;
    let second = body_text(app.oneshot(get("/metrics")).await.unwrap()).await;

    m.assert_async().await;
    assert_eq!(account_lines(&first), account_lines(&second));
    assert_eq!(sample(&second, "f2pool_paid", ALICE), Some(1.25));
}

#[tokio::test]
async fn scrape_includes_exporter_self_metrics() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/bitcoin/alice")
        .with_status(200)
        .with_body(ACCOUNT_FIXTURE)
        .create_async()
        .await;
    server
        .mock("GET", "/litecoin/bob")
        .with_status(502)
        .create_async()
        .await;

    let (app, _fatal_rx) = build_app(build_config(
        &server.url(),
        &["bitcoin/alice", "litecoin/bob"],
        "/metrics",
        FailurePolicy::Isolate,
    ));

    body_text(app.clone().oneshot(get("/metrics")).await.unwrap()).await;
    let text = body_text(app.oneshot(get("/metrics")).await.unwrap()).await;

    let bob = [("currency", "litecoin"), ("account", "bob")];
    assert_eq!(
        sample(&text, "f2pool_exporter_scrape_errors_total", &bob),
        Some(2.0)
    );
    assert_eq!(
        sample(&text, "f2pool_exporter_scrape_errors_total", ALICE),
        None
    );
    assert!(sample_lines(&text)
        .iter()
        .any(|line| line.starts_with("f2pool_exporter_scrape_duration_seconds ")));
    #[cfg(target_os = "linux")]
    assert!(text.contains("process_resident_memory_bytes"), "{text}");
}
