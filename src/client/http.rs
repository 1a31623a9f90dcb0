//! HttpNotesApi - reqwest implementation of [`NotesApi`]

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use super::upload::{FormPart, UploadForm, UploadReply};
use super::{join_url, DownloadRequest, NotesApi, Registration};
use crate::config::{Config, USER_AGENT};
use crate::core::error::{NotesError, Result};

const NOTES_PATH: &str = "/api/notes";
const UPLOAD_PATH: &str = "/api/notes/upload";
const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Fallback message when an auth call fails without a body
const AUTH_FAILED_MESSAGE: &str = "An error occurred";

pub struct HttpNotesApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotesApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotesError::InvalidInput(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_auth(&self, path: &str, body: Value) -> Result<String> {
        let url = join_url(&self.base_url, path)?;
        let resp = self.client.post(url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(text)
        } else if text.trim().is_empty() {
            Err(NotesError::Auth(AUTH_FAILED_MESSAGE.to_string()))
        } else {
            Err(NotesError::Auth(text))
        }
    }
}

fn into_multipart(form: UploadForm) -> Result<Form> {
    let mut multipart = Form::new();
    for part in form.parts {
        multipart = match part {
            FormPart::Text { field, value } => multipart.text(field, value),
            FormPart::File {
                field,
                file_name,
                bytes,
            } => multipart.part(
                field,
                Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/octet-stream")
                    .map_err(|e| NotesError::InvalidInput(format!("MIME parse error: {}", e)))?,
            ),
        };
    }
    Ok(multipart)
}

impl NotesApi for HttpNotesApi {
    async fn search(&self, query: Option<&str>) -> Result<Value> {
        let mut url = join_url(&self.base_url, NOTES_PATH)?;
        if let Some(q) = query {
            url.query_pairs_mut().append_pair("search", q);
        }

        let resp = self.client.get(url).send().await?;
        tracing::debug!(status = resp.status().as_u16(), "listing response");
        // The body is decoded whatever the status; odd shapes unwrap to nothing
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_bytes(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        let url = request.url(&self.base_url)?;
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotesError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    async fn upload(&self, form: UploadForm) -> Result<UploadReply> {
        let url = join_url(&self.base_url, UPLOAD_PATH)?;
        let multipart = into_multipart(form)?;
        let resp = self.client.post(url).multipart(multipart).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(UploadReply { status, body })
    }

    async fn login(&self, username: &str, password: &str) -> Result<String> {
        self.post_auth(
            LOGIN_PATH,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    async fn register(&self, registration: &Registration) -> Result<String> {
        self.post_auth(REGISTER_PATH, serde_json::to_value(registration)?)
            .await
    }

    async fn ping(&self) -> bool {
        match join_url(&self.base_url, "/") {
            Ok(url) => self.client.head(url).send().await.is_ok(),
            Err(_) => false,
        }
    }
}
