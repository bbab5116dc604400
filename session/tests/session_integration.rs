use errors::AuthError;
use pd_core::types::{ApiKey, DocumentId};
use session::{App, AppPhase, Dashboard};
use std::sync::Arc;
use summarize::{FlowState, GenerationOutcome};
use testing::{
    MemoryCredentialStore, MockAuthenticator, MockDriveService, MockExtractor, MockSummarizer,
    drive_file, pdf_bytes
};

fn app_with(authenticator: Arc<MockAuthenticator>, summarizer: Arc<MockSummarizer>) -> App {
    App::new(
        authenticator,
        summarizer,
        Arc::new(MockExtractor::new()),
        Arc::new(MemoryCredentialStore::empty())
    )
}

async fn signed_in_dashboard(
    files: Vec<pd_core::types::DriveFile>,
    summarizer: Arc<MockSummarizer>
) -> (Arc<Dashboard>, Arc<MockDriveService>) {
    let drive = Arc::new(MockDriveService::new(files));
    let authenticator = Arc::new(MockAuthenticator::with_drive(drive.clone()));
    let app = app_with(authenticator, summarizer);
    let dashboard = app.sign_in().await.unwrap();
    (dashboard, drive)
}

#[tokio::test]
async fn app_starts_signed_out() {
    let drive = Arc::new(MockDriveService::empty());
    let app = app_with(
        Arc::new(MockAuthenticator::with_drive(drive)),
        Arc::new(MockSummarizer::new("s"))
    );

    assert_eq!(app.phase().await, AppPhase::SignedOut);
    assert!(app.dashboard().await.is_none());
    assert!(app.last_sign_in_failure().await.is_none());
}

#[tokio::test]
async fn sign_in_brings_up_dashboard_with_initial_sync() {
    let (dashboard, drive) = signed_in_dashboard(
        vec![drive_file("a", "A.pdf", "u1"), drive_file("b", "B.pdf", "u2")],
        Arc::new(MockSummarizer::new("s"))
    )
    .await;

    let documents = dashboard.documents().await;
    assert_eq!(documents.len(), 2);
    assert_eq!(
        drive.list_calls.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn popup_blocked_keeps_app_signed_out_with_remediation() {
    let authenticator = Arc::new(MockAuthenticator::failing(|| AuthError::PopupBlocked {
        reason: "browser refused to open".to_string()
    }));
    let app = app_with(authenticator, Arc::new(MockSummarizer::new("s")));

    assert!(app.sign_in().await.is_err());
    assert_eq!(app.phase().await, AppPhase::SignedOut);
    assert!(app.dashboard().await.is_none());

    let failure = app.last_sign_in_failure().await.unwrap();
    assert!(failure.message.contains("blocked"));
    assert!(failure.remediation.unwrap().contains("pop-ups"));
}

#[tokio::test]
async fn plain_sign_in_failure_has_no_remediation() {
    let authenticator = Arc::new(MockAuthenticator::failing(|| AuthError::Failed {
        reason: "network down".to_string()
    }));
    let app = app_with(authenticator, Arc::new(MockSummarizer::new("s")));

    assert!(app.sign_in().await.is_err());
    let failure = app.last_sign_in_failure().await.unwrap();
    assert!(failure.remediation.is_none());
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    let authenticator = Arc::new(MockAuthenticator::failing(|| AuthError::Failed {
        reason: "transient".to_string()
    }));
    let app = app_with(authenticator.clone(), Arc::new(MockSummarizer::new("s")));

    assert!(app.sign_in().await.is_err());

    let drive = Arc::new(MockDriveService::empty());
    authenticator.succeed_with(drive).await;
    app.sign_in().await.unwrap();

    assert_eq!(app.phase().await, AppPhase::SignedIn);
    assert!(app.last_sign_in_failure().await.is_none());
}

#[tokio::test]
async fn note_intents_target_the_selection() {
    let (dashboard, _drive) = signed_in_dashboard(
        vec![drive_file("a", "A.pdf", "u1"), drive_file("b", "B.pdf", "u2")],
        Arc::new(MockSummarizer::new("s"))
    )
    .await;

    // No selection yet: note intents are no-ops.
    assert!(dashboard.add_note("ignored").await.is_none());

    dashboard.select(&DocumentId::new("a")).await;
    let first = dashboard.add_note("hello").await.unwrap();
    dashboard.add_note("world").await.unwrap();
    dashboard.delete_note(&first).await;

    let selected = dashboard.selected().await.unwrap();
    let contents: Vec<_> = selected.notes.iter().map(|n| n.content.as_str()).collect();
    assert_eq!(contents, vec!["world"]);

    // Notes landed on "a", not "b".
    let documents = dashboard.documents().await;
    assert!(documents[1].notes.is_empty());
}

#[tokio::test]
async fn edit_summary_without_selection_is_a_noop() {
    let (dashboard, _drive) = signed_in_dashboard(
        vec![drive_file("a", "A.pdf", "u1")],
        Arc::new(MockSummarizer::new("s"))
    )
    .await;

    dashboard.edit_summary("ignored").await;
    assert!(dashboard.documents().await[0].summary.is_empty());

    dashboard.select(&DocumentId::new("a")).await;
    dashboard.edit_summary("manual summary").await;
    assert_eq!(dashboard.selected().await.unwrap().summary, "manual summary");
}

#[tokio::test]
async fn upload_selects_the_new_document() {
    let (dashboard, _drive) =
        signed_in_dashboard(vec![], Arc::new(MockSummarizer::new("s"))).await;

    dashboard.upload("paper.pdf", pdf_bytes()).await.unwrap();
    assert_eq!(dashboard.selected().await.unwrap().name, "paper.pdf");
}

#[tokio::test]
async fn generation_flow_end_to_end() {
    let summarizer = Arc::new(MockSummarizer::new("generated summary"));
    let (dashboard, _drive) = signed_in_dashboard(
        vec![drive_file("a", "A.pdf", "u1")],
        summarizer.clone()
    )
    .await;

    dashboard.select(&DocumentId::new("a")).await;

    // Nothing extracted yet: generation is a no-op.
    let outcome = dashboard.generate_summary().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::NoExtractedText);
    assert_eq!(summarizer.call_count().await, 0);

    assert!(dashboard.extract_selected().await.unwrap());

    // No credential stored: the flow parks and makes no adapter call.
    assert!(!dashboard.has_credential().await);
    let outcome = dashboard.generate_summary().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::AwaitingCredential);
    assert_eq!(dashboard.summary_state().await, FlowState::AwaitingCredential);
    assert_eq!(summarizer.call_count().await, 0);

    // Submitting the credential re-enters the flow: exactly one call.
    let outcome = dashboard
        .submit_credential(ApiKey::new("key1"))
        .await
        .unwrap();
    assert_eq!(outcome, GenerationOutcome::Generated);
    assert_eq!(summarizer.call_count().await, 1);
    assert_eq!(
        dashboard.selected().await.unwrap().summary,
        "generated summary"
    );
    assert_eq!(dashboard.summary_state().await, FlowState::Idle);
}

#[tokio::test]
async fn extraction_failure_leaves_buffer_unchanged() {
    let extractor = Arc::new(MockExtractor::new());
    let drive = Arc::new(MockDriveService::new(vec![drive_file("a", "A.pdf", "u1")]));
    let app = App::new(
        Arc::new(MockAuthenticator::with_drive(drive)),
        Arc::new(MockSummarizer::new("s")),
        extractor.clone(),
        Arc::new(MemoryCredentialStore::empty())
    );
    let dashboard = app.sign_in().await.unwrap();

    dashboard.select(&DocumentId::new("a")).await;
    extractor.fail(true);
    assert!(dashboard.extract_selected().await.is_err());

    // Still no text, so generation is a no-op.
    let outcome = dashboard.generate_summary().await.unwrap();
    assert_eq!(outcome, GenerationOutcome::NoExtractedText);
}

#[tokio::test]
async fn extract_without_selection_reports_false() {
    let (dashboard, _drive) =
        signed_in_dashboard(vec![drive_file("a", "A.pdf", "u1")], Arc::new(MockSummarizer::new("s")))
            .await;

    assert!(!dashboard.extract_selected().await.unwrap());
}

#[tokio::test]
async fn initial_sync_failure_is_not_fatal() {
    let drive = Arc::new(MockDriveService::empty());
    drive.fail_listing(true);
    let app = app_with(
        Arc::new(MockAuthenticator::with_drive(drive.clone())),
        Arc::new(MockSummarizer::new("s"))
    );

    let dashboard = app.sign_in().await.unwrap();
    assert_eq!(app.phase().await, AppPhase::SignedIn);
    assert!(dashboard.documents().await.is_empty());

    // The user retries once Drive recovers.
    drive.fail_listing(false);
    drive.set_files(vec![drive_file("a", "A.pdf", "u1")]).await;
    dashboard.refresh().await.unwrap();
    assert_eq!(dashboard.documents().await.len(), 1);
}
