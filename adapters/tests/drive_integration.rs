use adapters::GoogleDriveClient;
use config::DriveConfig;
use errors::DriveError;
use pd_core::traits::DriveService;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> DriveConfig {
    DriveConfig {
        base_url: format!("{}/drive/v3", server.uri()),
        upload_base_url: format!("{}/upload/drive/v3", server.uri())
    }
}

#[tokio::test]
async fn list_pdfs_queries_and_validates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", "mimeType='application/pdf' and trashed=false"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                { "id": "a", "name": "A.pdf", "mimeType": "application/pdf", "webViewLink": "u1" },
                { "id": "b", "name": "B.pdf", "mimeType": "application/pdf", "webViewLink": "u2" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    let files = client.list_pdfs().await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].id, "a");
    assert_eq!(files[1].web_view_link, "u2");
}

#[tokio::test]
async fn list_pdfs_rejects_record_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [ { "id": "a", "name": "A.pdf" } ]
        })))
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    let err = client.list_pdfs().await.unwrap_err();
    assert!(matches!(err, DriveError::InvalidRecord { .. }));
}

#[tokio::test]
async fn list_pdfs_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    match client.list_pdfs().await.unwrap_err() {
        DriveError::Api { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {:?}", other)
    }
}

#[tokio::test]
async fn list_pdfs_with_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    assert!(client.list_pdfs().await.unwrap().is_empty());
}

#[tokio::test]
async fn upload_pdf_is_multipart_related() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "new-1",
            "name": "paper.pdf",
            "mimeType": "application/pdf",
            "webViewLink": "https://drive.example/new-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    let file = client
        .upload_pdf("paper.pdf", b"%PDF-1.4".to_vec())
        .await
        .unwrap();

    assert_eq!(file.id, "new-1");
    assert_eq!(file.name, "paper.pdf");

    let requests = server.received_requests().await.unwrap();
    let upload = &requests[0];
    let content_type = upload
        .headers
        .get("content-type")
        .expect("upload has content type")
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/related; boundary="));
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("\"name\":\"paper.pdf\""));
    assert!(body.contains("%PDF-1.4"));
}

#[tokio::test]
async fn upload_failure_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GoogleDriveClient::from_config("token-1", &config_for(&server));
    let err = client
        .upload_pdf("paper.pdf", b"%PDF-1.4".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Api { status: 500, .. }));
}
