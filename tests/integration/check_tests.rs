//! Check lifecycle tests against a mock compliance service

use crate::{create_controller, create_test_config, sample_response};
use compliance_checker::classify::ErrorKind;
use compliance_checker::controller::{FALLBACK_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE};
use compliance_checker::state::{LifecycleState, Progress};
use compliance_checker::storage::{
    HistoryStore, KeyValueStore, MemoryStore, ResultCache, SqliteStore, CACHE_KEY, HISTORY_KEY,
};
use compliance_checker::{SubmitOutcome, ValidationError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "https://example.com";

#[tokio::test]
async fn test_successful_check_publishes_and_persists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .and(body_json(json!({ "url": TARGET })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, store.clone());

    let outcome = controller.submit(TARGET).await;
    let result = match outcome {
        SubmitOutcome::Succeeded(result) => result,
        other => panic!("expected success, got {:?}", other),
    };

    assert_eq!(result.url, TARGET);
    assert_eq!(result.score, 67.0);
    assert_eq!(result.passed_count, 2);
    assert_eq!(result.total_count, 3);
    assert_eq!(result.checks.len(), 3);
    assert!(!result.id.is_empty());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, LifecycleState::Succeeded);
    assert_eq!(snapshot.result.as_ref(), Some(&result));
    assert!(snapshot.failure.is_none());
    assert_eq!(snapshot.progress, Progress::cleared());
    assert_eq!(snapshot.last_url.as_deref(), Some(TARGET));

    // Both persisted slots were written
    assert!(store.get(CACHE_KEY).unwrap().is_some());
    assert!(store.get(HISTORY_KEY).unwrap().is_some());
    assert_eq!(ResultCache::new(store.clone()).load(), Some(result.clone()));
    assert_eq!(HistoryStore::new(store).list(), vec![result]);
}

#[tokio::test]
async fn test_server_counts_are_recomputed() {
    let mock_server = MockServer::start().await;

    let mut body = sample_response(TARGET);
    body["passedCount"] = json!(3);
    body["totalCount"] = json!(10);

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Succeeded(result) => {
            assert_eq!(result.passed_count, 2);
            assert_eq!(result.total_count, 3);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fraction_score_is_converted() {
    let mock_server = MockServer::start().await;

    let mut body = sample_response(TARGET);
    body["score"] = json!("7/10");

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Succeeded(result) => assert_eq!(result.score, 70.0),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_json_error_is_classified_as_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal server error" })),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, store.clone());

    let outcome = controller.submit(TARGET).await;
    let failure = match outcome {
        SubmitOutcome::Failed(failure) => failure,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(failure.message, "Internal server error");
    assert_eq!(failure.kind, ErrorKind::Server);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, LifecycleState::Failed);
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.failure, Some(failure));
    assert_eq!(snapshot.progress, Progress::cleared());

    // Nothing is persisted on failure
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_detail_field_is_used() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Invalid URL format" })),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Failed(failure) => {
            assert_eq!(failure.message, "Invalid URL format");
            assert_eq!(failure.kind, ErrorKind::Validation);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_is_used_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(504).set_body_string("Request timeout - analysis took too long"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Failed(failure) => {
            assert_eq!(failure.message, "Request timeout - analysis took too long");
            assert_eq!(failure.kind, ErrorKind::Timeout);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_error_body_uses_fallback_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Failed(failure) => {
            assert_eq!(failure.message, FALLBACK_ERROR_MESSAGE);
            assert_eq!(failure.kind, ErrorKind::Generic);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_null_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, store.clone());

    match controller.submit(TARGET).await {
        SubmitOutcome::Failed(failure) => {
            assert_eq!(failure.message, INVALID_RESPONSE_MESSAGE);
            assert_eq!(failure.kind, ErrorKind::Generic);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Start and immediately stop a server so the port is known to be closed
    let base_url = {
        let mock_server = MockServer::start().await;
        mock_server.uri()
    };

    let config = create_test_config(&base_url, 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Failed(failure) => {
            assert_eq!(failure.kind, ErrorKind::Network);
            assert!(failure.message.starts_with("Failed to fetch"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(controller.state(), LifecycleState::Failed);
}

#[tokio::test]
async fn test_invalid_url_never_reaches_the_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    for input in ["not-a-url", "", "ftp://example.com", "https://"] {
        let outcome = controller.submit(input).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)), "{:?}", input);
        assert_eq!(controller.state(), LifecycleState::Idle);
    }

    assert_eq!(
        controller.submit("not-a-url").await,
        SubmitOutcome::Rejected(ValidationError::Scheme("not-a-url".to_string()))
    );
}

#[tokio::test]
async fn test_submit_while_requesting_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response(TARGET))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let (first, second) = tokio::join!(controller.submit(TARGET), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.state(), LifecycleState::Requesting);
        controller.submit("https://other.example").await
    });

    assert!(matches!(first, SubmitOutcome::Succeeded(_)));
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(controller.snapshot().last_url.as_deref(), Some(TARGET));
    assert_eq!(controller.history().len(), 1);
}

#[tokio::test]
async fn test_dropped_submit_returns_to_idle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response(TARGET))
                .set_delay(Duration::from_secs(10)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 50, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(200), controller.submit(TARGET)).await;
    assert!(timed_out.is_err());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, LifecycleState::Idle);
    assert_eq!(snapshot.progress, Progress::cleared());
    assert!(snapshot.result.is_none());
    assert!(snapshot.failure.is_none());
    assert_eq!(snapshot.last_url.as_deref(), Some(TARGET));

    // The simulator was stopped with the abandoned run
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(controller.progress(), Progress::cleared());

    assert!(controller.reset());
    assert!(matches!(
        controller.retry().await,
        Some(SubmitOutcome::Succeeded(_))
    ));
    assert_eq!(controller.history().len(), 1);
}

#[tokio::test]
async fn test_retry_resubmits_last_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Server busy" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .and(body_json(json!({ "url": TARGET })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let first = controller.submit(TARGET).await;
    assert!(matches!(first, SubmitOutcome::Failed(ref f) if f.kind == ErrorKind::Server));

    let retried = controller.retry().await;
    assert!(matches!(retried, Some(SubmitOutcome::Succeeded(_))));
    assert_eq!(controller.state(), LifecycleState::Succeeded);
}

#[tokio::test]
async fn test_progress_advances_while_requesting() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response(TARGET))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 50, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let (outcome, observed) = tokio::join!(controller.submit(TARGET), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let initial = controller.progress();
        tokio::time::sleep(Duration::from_millis(290)).await;
        (initial, controller.progress())
    });

    let (initial, later) = observed;
    assert_eq!(initial.percent, 0);
    assert_eq!(initial.stage.as_deref(), Some("Fetching webpage..."));
    assert_eq!(later.percent, 90);
    assert_eq!(later.stage.as_deref(), Some("Generating recommendations..."));

    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert_eq!(controller.progress(), Progress::cleared());
}

#[tokio::test]
async fn test_complete_stage_is_shown_during_settle_delay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 400);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let (outcome, during) = tokio::join!(controller.submit(TARGET), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        controller.snapshot()
    });

    assert_eq!(during.state, LifecycleState::Requesting);
    assert_eq!(during.progress, Progress::at(100, "Complete!"));
    assert!(during.result.is_none());

    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert_eq!(controller.progress(), Progress::cleared());
}

#[tokio::test]
async fn test_no_progress_updates_after_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .mount(&mock_server)
        .await;

    // Stages would fire at 100..400ms, well after the response arrives
    let config = create_test_config(&mock_server.uri(), 100, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    assert!(matches!(
        controller.submit(TARGET).await,
        SubmitOutcome::Succeeded(_)
    ));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(controller.progress(), Progress::cleared());
    assert_eq!(controller.state(), LifecycleState::Succeeded);
}

#[tokio::test]
async fn test_no_progress_updates_after_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(500).set_body_string("500 Internal Server Error"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 100, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    assert!(matches!(
        controller.submit(TARGET).await,
        SubmitOutcome::Failed(_)
    ));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(controller.progress(), Progress::cleared());
    assert_eq!(controller.state(), LifecycleState::Failed);
}

#[tokio::test]
async fn test_new_submit_clears_previous_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response(TARGET))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    let (_, during) = tokio::join!(controller.submit(TARGET), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.snapshot()
    });
    assert_eq!(during.state, LifecycleState::Requesting);
    assert!(during.result.is_none());
    assert!(during.failure.is_none());

    // A second run starts from a clean slate even after a success
    let (_, during) = tokio::join!(controller.submit("https://second.example"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.snapshot()
    });
    assert!(during.result.is_none());
    assert_eq!(during.last_url.as_deref(), Some("https://second.example"));
}

#[tokio::test]
async fn test_result_survives_restart_with_sqlite() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response(TARGET)))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("state.db");
    let config = create_test_config(&mock_server.uri(), 1000, 0);

    let result = {
        let store = Arc::new(SqliteStore::new(&db_path).unwrap());
        let controller = create_controller(&config, store);
        match controller.submit(TARGET).await {
            SubmitOutcome::Succeeded(result) => result,
            other => panic!("expected success, got {:?}", other),
        }
    };

    let store = Arc::new(SqliteStore::new(&db_path).unwrap());
    let controller = create_controller(&config, store);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, LifecycleState::Succeeded);
    assert_eq!(snapshot.result, Some(result.clone()));
    assert_eq!(controller.history().list(), vec![result.clone()]);

    // Reset drops the cached result but keeps history across restarts
    assert!(controller.reset());
    let controller = create_controller(&config, Arc::new(SqliteStore::new(&db_path).unwrap()));
    assert_eq!(controller.state(), LifecycleState::Idle);
    assert_eq!(controller.history().len(), 1);

    let selected = controller.select_history(&result.id).unwrap();
    assert_eq!(selected, result);
    assert_eq!(controller.state(), LifecycleState::Succeeded);
}
