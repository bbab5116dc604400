//! Google Drive v3 adapter.

use async_trait::async_trait;
use config::DriveConfig;
use errors::DriveError;
use pd_core::traits::DriveService;
use pd_core::types::DriveFile;
use serde::Deserialize;

const LIST_QUERY: &str = "mimeType='application/pdf' and trashed=false";
const FILE_FIELDS: &str = "id,name,mimeType,webViewLink";
const UPLOAD_BOUNDARY: &str = "paperdrive_upload_boundary";

#[derive(Debug)]
pub struct GoogleDriveClient {
    client: reqwest::Client,
    base_url: String,
    upload_base_url: String,
    access_token: String
}

impl GoogleDriveClient {
    /// Client against the production Drive endpoints.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::from_config(access_token, &DriveConfig::default())
    }

    pub fn from_config(access_token: impl Into<String>, config: &DriveConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into()
        }
    }
}

/// Raw listing payload; field presence is validated before anything
/// leaves the adapter.
#[derive(Debug, Deserialize)]
struct FileListing {
    #[serde(default)]
    files: Vec<RawDriveFile>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDriveFile {
    id: Option<String>,
    name: Option<String>,
    web_view_link: Option<String>,
    mime_type: Option<String>
}

impl RawDriveFile {
    fn validate(self) -> Result<DriveFile, DriveError> {
        let id = self.id.filter(|s| !s.is_empty()).ok_or_else(|| {
            DriveError::InvalidRecord {
                reason: "missing id".to_string()
            }
        })?;
        let name = self.name.filter(|s| !s.is_empty()).ok_or_else(|| {
            DriveError::InvalidRecord {
                reason: format!("record {} is missing name", id)
            }
        })?;
        let web_view_link = self.web_view_link.filter(|s| !s.is_empty()).ok_or_else(|| {
            DriveError::InvalidRecord {
                reason: format!("record {} is missing webViewLink", id)
            }
        })?;

        Ok(DriveFile {
            id,
            name,
            web_view_link,
            mime_type: self.mime_type
        })
    }
}

fn network(e: reqwest::Error) -> DriveError {
    DriveError::Network {
        reason: e.to_string()
    }
}

#[async_trait]
impl DriveService for GoogleDriveClient {
    type Error = DriveError;

    async fn list_pdfs(&self) -> Result<Vec<DriveFile>, Self::Error> {
        let fields = format!("files({})", FILE_FIELDS);
        let response = self
            .client
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", LIST_QUERY),
                ("fields", fields.as_str()),
                ("pageSize", "1000")
            ])
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            return Err(DriveError::Api {
                status: status.as_u16(),
                body
            });
        }

        let listing: FileListing =
            serde_json::from_str(&body).map_err(|e| DriveError::InvalidRecord {
                reason: e.to_string()
            })?;

        listing
            .files
            .into_iter()
            .map(RawDriveFile::validate)
            .collect()
    }

    async fn upload_pdf(&self, name: &str, bytes: Vec<u8>) -> Result<DriveFile, Self::Error> {
        // Drive multipart uploads are `multipart/related`: one JSON
        // metadata part, one media part.
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": "application/pdf"
        });

        let mut body = Vec::with_capacity(bytes.len() + 512);
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
                UPLOAD_BOUNDARY, metadata
            )
            .as_bytes()
        );
        body.extend_from_slice(
            format!("--{}\r\nContent-Type: application/pdf\r\n\r\n", UPLOAD_BOUNDARY).as_bytes()
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", UPLOAD_BOUNDARY).as_bytes());

        let response = self
            .client
            .post(format!("{}/files", self.upload_base_url))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", UPLOAD_BOUNDARY)
            )
            .body(body)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            return Err(DriveError::Api {
                status: status.as_u16(),
                body
            });
        }

        let raw: RawDriveFile =
            serde_json::from_str(&body).map_err(|e| DriveError::InvalidRecord {
                reason: e.to_string()
            })?;
        raw.validate()
    }
}
