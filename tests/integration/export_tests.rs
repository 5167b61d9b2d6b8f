//! Export tests on results produced by a full check

use crate::{create_controller, create_test_config, sample_response};
use compliance_checker::model::CheckResult;
use compliance_checker::output::{
    export_to_dir, from_json, to_clipboard_text, to_json, to_pdf_document, to_share_summary,
    ExportFormat, FOOTER_LABEL,
};
use compliance_checker::storage::MemoryStore;
use compliance_checker::SubmitOutcome;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "https://shop.example/cart?step=2";

async fn checked_result(body: serde_json::Value) -> CheckResult {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1000, 0);
    let controller = create_controller(&config, Arc::new(MemoryStore::new()));

    match controller.submit(TARGET).await {
        SubmitOutcome::Succeeded(result) => result,
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_json_export_round_trips() {
    let result = checked_result(sample_response(TARGET)).await;
    let dir = TempDir::new().unwrap();

    let path = export_to_dir(&result, ExportFormat::Json, dir.path()).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("compliance-check-https---shop-example-cart-step-2-"));
    assert!(name.ends_with(".json"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, to_json(&result).unwrap());
    assert_eq!(from_json(&written).unwrap(), result);
}

#[tokio::test]
async fn test_pdf_export_of_long_report_paginates() {
    let details = "The element does not meet the minimum contrast ratio of 4.5:1 \
                   for normal text; increase the foreground darkness. "
        .repeat(4);
    let checks: Vec<_> = (0..40)
        .map(|i| json!({ "name": format!("Rule {}", i), "passed": i % 3 != 0, "details": details }))
        .collect();

    let mut body = sample_response(TARGET);
    body["checks"] = json!(checks);
    let result = checked_result(body).await;

    let document = to_pdf_document(&result);
    let pages = document.page_count();
    assert!(pages > 1);
    for (index, page) in document.pages.iter().enumerate() {
        let texts = page.texts();
        let footer = format!("Page {} of {}", index + 1, pages);
        assert!(texts.contains(&footer.as_str()));
        assert!(texts.contains(&FOOTER_LABEL));
    }

    let dir = TempDir::new().unwrap();
    let path = export_to_dir(&result, ExportFormat::Pdf, dir.path()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(&format!("/Count {}", pages)));
}

#[tokio::test]
async fn test_pdf_text_is_sanitized() {
    let mut body = sample_response(TARGET);
    body["checks"] = json!([{
        "name": "Headings \u{2014} order",
        "passed": false,
        "details": "Use \u{201C}h1\u{201D} first\u{2026} \u{1F600}"
    }]);
    let result = checked_result(body).await;

    let document = to_pdf_document(&result);
    let texts = document.pages[0].texts();
    assert!(texts.contains(&"Headings -- order"));
    assert!(texts.contains(&"Use \"h1\" first..."));
    assert!(texts.iter().all(|t| t.is_ascii()));
}

#[tokio::test]
async fn test_clipboard_and_share_text() {
    let result = checked_result(sample_response(TARGET)).await;

    let text = to_clipboard_text(&result);
    assert_eq!(
        text,
        format!(
            "Compliance Check Results\nURL: {}\nScore: 67\n\n\
             1. Alt Text: PASS\n2. Color Contrast: FAIL\n3. Page Title: PASS",
            TARGET
        )
    );

    let share = to_share_summary(&result);
    assert_eq!(share.text, "Check out these compliance results: 67");
    assert_eq!(share.url, TARGET);
    assert_eq!(share.fallback_text(), text);
}
