//! Contract tests for VerificationClient against a wiremock verifier.

use attest_verifier::{VerificationClient, VerificationError, VerificationReport, VerifierConfig};
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> VerificationClient {
    let mut config = VerifierConfig::new(
        format!("{}/verify-attestation", server.uri()).parse().unwrap(),
    );
    config.timeout_secs = 5;
    VerificationClient::new(config).unwrap()
}

const ARCHIVE: &[u8] = b"PK\x03\x04 not really a zip";

#[tokio::test]
async fn accepted_archive_reports_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-attestation"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"report-digest=ABC123.zip\""))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server)
        .submit_for_verification(ARCHIVE, "report-digest=ABC123.zip")
        .await
        .unwrap();

    assert_eq!(outcome.expected_digest, "ABC123");
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.body, "ok");

    let report = VerificationReport::from_result(Ok(outcome));
    assert!(report.is_passed());
    assert!(report.to_string().contains("ok"));
}

#[tokio::test]
async fn server_error_fails_with_status_and_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-attestation"))
        .respond_with(ResponseTemplate::new(500).set_body_string("credential invalid"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .submit_for_verification(ARCHIVE, "report-digest=ABC123.zip")
        .await;
    match &result {
        Err(VerificationError::Rejected { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "credential invalid");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    let report = VerificationReport::from_result(result);
    assert!(!report.is_passed());
    assert!(report.to_string().contains("500"));
}

#[tokio::test]
async fn malformed_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_for_verification(ARCHIVE, "report.zip")
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::MalformedArchiveName(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_failure() {
    let mut config = VerifierConfig::new("http://127.0.0.1:1/verify-attestation".parse().unwrap());
    config.timeout_secs = 1;
    config.max_retries = 0;
    let client = VerificationClient::new(config).unwrap();

    let result = client
        .submit_for_verification(ARCHIVE, "report-digest=ABC123.zip")
        .await;
    assert!(matches!(result, Err(VerificationError::Transport { .. })));
    let report = VerificationReport::from_result(result).to_string();
    assert!(report.starts_with("Verification failed: "));
    assert!(
        report.to_lowercase().contains("refused"),
        "cause missing from {report:?}"
    );
}

#[tokio::test]
async fn archive_file_is_submitted_under_its_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-attestation"))
        .and(body_string_contains("filename=\"contract-digest=EA2bjW_01.zip\""))
        .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("contract-digest=EA2bjW_01.zip");
    std::fs::write(&archive_path, ARCHIVE).unwrap();

    let outcome = client(&server)
        .submit_archive_file(&archive_path)
        .await
        .unwrap();
    assert_eq!(outcome.expected_digest, "EA2bjW_01");
    assert_eq!(outcome.archive_filename, "contract-digest=EA2bjW_01.zip");
    assert_eq!(outcome.status, 202);
}

#[tokio::test]
async fn missing_archive_file_is_io_error() {
    let server = MockServer::start().await;
    let err = client(&server)
        .submit_archive_file("/nonexistent/dir/x-digest=abc.zip")
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::Io { .. }));
}

#[tokio::test]
async fn health_returns_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"msg": "verification service is healthy"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let msg = client(&server).health().await.unwrap();
    assert_eq!(msg, "verification service is healthy");
}

#[tokio::test]
async fn unhealthy_service_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}
