//! Pending and stale-result guards, exercised with an agent whose
//! authorize call blocks until the test releases it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use url::Url;

use attest_core::{Document, Said, SchemaSaid};
use attest_gateway::{
    AttestationCredential, AuthorizationGrant, AuthorizeRequest, CreateCredentialRequest,
    ExtensionGateway, GatewayError, RawCredential,
};
use attest_workflow::{AttestationWorkflow, SigningConfig, StateKind, Step, WorkflowError};

#[derive(Default)]
struct GatedAgent {
    entered: Notify,
    release: Notify,
    authorize_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

#[async_trait]
impl ExtensionGateway for GatedAgent {
    async fn detect_installed(&self) -> bool {
        true
    }

    async fn configure_vendor(&self, _theme_url: &Url) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn authorize(
        &self,
        _request: &AuthorizeRequest,
    ) -> Result<AuthorizationGrant, GatewayError> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(AuthorizationGrant::from_value(
            json!({"identifier": {"prefix": "EGated"}}),
        ))
    }

    async fn create_data_attestation_credential(
        &self,
        _request: &CreateCredentialRequest,
    ) -> Result<AttestationCredential, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        AttestationCredential::from_result(json!({"acdc": {"_ked": {"d": "EGatedSaid"}}}))
    }

    async fn get_credential(
        &self,
        said: &Said,
        _include_raw: bool,
    ) -> Result<RawCredential, GatewayError> {
        Ok(RawCredential {
            said: said.clone(),
            cesr: "-IABBEGatedSaid".into(),
        })
    }

    fn gateway_name(&self) -> &str {
        "GatedAgent"
    }
}

async fn setup() -> (Arc<GatedAgent>, Arc<AttestationWorkflow>) {
    let agent = Arc::new(GatedAgent::default());
    let wf = Arc::new(AttestationWorkflow::new(
        agent.clone(),
        SigningConfig::new(SchemaSaid::new("ESchema").unwrap()),
    ));
    wf.initialize().await.unwrap();
    wf.select_document(Document::new("first.txt", b"first".to_vec()).unwrap());
    (agent, wf)
}

#[tokio::test]
async fn second_step_rejected_while_authorize_pending() {
    let (agent, wf) = setup().await;

    let task = tokio::spawn({
        let wf = wf.clone();
        async move { wf.authorize().await }
    });
    agent.entered.notified().await;
    assert!(wf.is_pending());

    assert!(matches!(
        wf.authorize().await,
        Err(WorkflowError::StepInFlight {
            step: Step::Authorize
        })
    ));
    assert!(matches!(
        wf.issue_credential().await,
        Err(WorkflowError::StepInFlight { .. })
    ));
    assert!(matches!(
        wf.download_archive().await,
        Err(WorkflowError::StepInFlight { .. })
    ));
    assert_eq!(agent.authorize_calls.load(Ordering::SeqCst), 1);
    assert_eq!(agent.create_calls.load(Ordering::SeqCst), 0);

    agent.release.notify_one();
    task.await.unwrap().unwrap();
    assert_eq!(wf.state().kind(), StateKind::Authorized);
}

#[tokio::test]
async fn result_for_replaced_document_is_discarded() {
    let (agent, wf) = setup().await;

    let task = tokio::spawn({
        let wf = wf.clone();
        async move { wf.authorize().await }
    });
    agent.entered.notified().await;

    let second = wf.select_document(Document::new("second.txt", b"second".to_vec()).unwrap());
    agent.release.notify_one();

    assert!(matches!(
        task.await.unwrap(),
        Err(WorkflowError::Superseded {
            step: Step::Authorize
        })
    ));

    let state = wf.state();
    assert_eq!(state.kind(), StateKind::DigestReady);
    assert_eq!(state.digest(), Some(&second));
    assert_eq!(
        state.session().map(|s| s.document.name().to_string()),
        Some("second.txt".to_string())
    );
    assert!(!wf
        .transitions()
        .iter()
        .any(|t| t.to_state == StateKind::Authorized));

    // The new document still needs its own authorization.
    assert!(matches!(
        wf.issue_credential().await,
        Err(WorkflowError::AuthorizationRequired)
    ));
    assert_eq!(agent.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authorize_and_issue_stops_when_document_replaced() {
    let (agent, wf) = setup().await;

    let task = tokio::spawn({
        let wf = wf.clone();
        async move { wf.authorize_and_issue().await }
    });
    agent.entered.notified().await;
    wf.clear_document();
    agent.release.notify_one();

    assert!(matches!(
        task.await.unwrap(),
        Err(WorkflowError::Superseded { .. })
    ));
    assert_eq!(agent.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(wf.state().kind(), StateKind::Idle);
}
