//! In-memory `NotesApi` for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use super::{DownloadRequest, NotesApi, Registration, UploadForm, UploadReply};
use crate::core::error::{NotesError, Result};

pub struct MockApi {
    listing: Value,
    search_fails: bool,
    search_delays: HashMap<String, Duration>,
    downloads: HashMap<String, Vec<u8>>,
    upload_reply: UploadReply,
    auth_rejection: Option<String>,
    searches: Mutex<Vec<Option<String>>>,
    fetches: Mutex<Vec<String>>,
    uploads: Mutex<Vec<UploadForm>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            listing: json!([]),
            search_fails: false,
            search_delays: HashMap::new(),
            downloads: HashMap::new(),
            upload_reply: UploadReply {
                status: 200,
                body: "ok".to_string(),
            },
            auth_rejection: None,
            searches: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(mut self, listing: Value) -> Self {
        self.listing = listing;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// Delay the response to `query` by `delay`
    pub fn with_search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    /// Serve `bytes` for the request displayed as `label`; others get 404
    pub fn with_download(mut self, label: &str, bytes: &[u8]) -> Self {
        self.downloads.insert(label.to_string(), bytes.to_vec());
        self
    }

    pub fn with_upload_reply(mut self, status: u16, body: &str) -> Self {
        self.upload_reply = UploadReply {
            status,
            body: body.to_string(),
        };
        self
    }

    pub fn rejecting_auth(mut self, message: &str) -> Self {
        self.auth_rejection = Some(message.to_string());
        self
    }

    pub fn searches(&self) -> Vec<Option<String>> {
        self.searches.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<UploadForm> {
        self.uploads.lock().unwrap().clone()
    }
}

impl NotesApi for MockApi {
    async fn search(&self, query: Option<&str>) -> Result<Value> {
        self.searches
            .lock()
            .unwrap()
            .push(query.map(str::to_string));

        let delay = query.and_then(|q| self.search_delays.get(q)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.search_fails {
            return Err(NotesError::Status {
                status: 503,
                url: "/api/notes".to_string(),
            });
        }
        Ok(self.listing.clone())
    }

    async fn fetch_bytes(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        let label = request.to_string();
        self.fetches.lock().unwrap().push(label.clone());
        match self.downloads.get(&label) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(NotesError::Status {
                status: 404,
                url: label,
            }),
        }
    }

    async fn upload(&self, form: UploadForm) -> Result<UploadReply> {
        self.uploads.lock().unwrap().push(form);
        Ok(self.upload_reply.clone())
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<String> {
        match &self.auth_rejection {
            Some(msg) => Err(NotesError::Auth(msg.clone())),
            None => Ok("Login successful".to_string()),
        }
    }

    async fn register(&self, _registration: &Registration) -> Result<String> {
        match &self.auth_rejection {
            Some(msg) => Err(NotesError::Auth(msg.clone())),
            None => Ok("Registration successful".to_string()),
        }
    }

    async fn ping(&self) -> bool {
        true
    }
}
