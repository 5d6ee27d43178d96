use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BennyError, Result};
use crate::models::StatementDocument;
use crate::settings::Settings;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READ_TIMEOUT_SECS: u64 = 120;

/// Wire-level operations of the remote extraction service. The HTTP
/// implementation talks to the real service; tests substitute a mock.
pub trait ExtractionApi {
    /// Upload a document, returning the remote file id.
    fn upload(&self, path: &Path) -> Result<String>;
    /// Submit an asynchronous extraction job, returning the job id.
    fn submit(&self, file_id: &str, profile: &str) -> Result<String>;
    fn fetch_job(&self, job_id: &str) -> Result<JobResponse>;
    /// Delete the remote copy of an uploaded file.
    fn delete(&self, file_id: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Vec<JobOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobOutput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<JobContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    file_id: &'a str,
    profile: &'a str,
}

#[derive(Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    deleted: bool,
}

pub struct HttpExtractionApi {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpExtractionApi {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            BennyError::Settings(
                "no API key configured; set api_key in settings.json or BENNY_API_KEY".to_string(),
            )
        })?;
        Self::new(&settings.service_url, &api_key)
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BennyError::Service(format!(
                "request failed: {} - {body}",
                status.as_u16()
            )));
        }
        Ok(response)
    }
}

impl ExtractionApi for HttpExtractionApi {
    fn upload(&self, path: &Path) -> Result<String> {
        let url = format!("{}/files", self.base_url);
        let form = reqwest::blocking::multipart::Form::new()
            .text("purpose", "statement")
            .file("file", path)?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?;
        let parsed: UploadResponse = Self::check(response)?.json()?;
        Ok(parsed.id)
    }

    fn submit(&self, file_id: &str, profile: &str) -> Result<String> {
        let url = format!("{}/jobs", self.base_url);
        let body = SubmitRequest { file_id, profile };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let parsed: JobResponse = Self::check(response)?.json()?;
        Ok(parsed.id)
    }

    fn fetch_job(&self, job_id: &str) -> Result<JobResponse> {
        let url = format!("{}/jobs/{job_id}", self.base_url);
        let response = self.client.get(&url).bearer_auth(&self.api_key).send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn delete(&self, file_id: &str) -> Result<bool> {
        let url = format!("{}/files/{file_id}", self.base_url);
        let response = self.client.delete(&url).bearer_auth(&self.api_key).send()?;
        let parsed: DeleteResponse = Self::check(response)?.json()?;
        Ok(parsed.deleted)
    }
}

// ---------------------------------------------------------------------------
// Client: submit, poll to a terminal status, parse the transaction list
// ---------------------------------------------------------------------------

pub struct ExtractionClient<A: ExtractionApi> {
    api: A,
    poll_interval: Duration,
}

impl<A: ExtractionApi> ExtractionClient<A> {
    pub fn new(api: A) -> Self {
        Self::with_poll_interval(api, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(api: A, poll_interval: Duration) -> Self {
        Self { api, poll_interval }
    }

    pub fn upload(&self, path: &Path) -> Result<String> {
        self.api.upload(path)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit an extraction job for an uploaded file and block until the
    /// service reports a terminal status.
    pub fn extract(&self, file_id: &str, profile: &str) -> Result<StatementDocument> {
        let job_id = self.api.submit(file_id, profile)?;
        let job = self.poll(&job_id)?;
        parse_transactions(&job)
    }

    /// Fixed-interval poll, no overall deadline: the loop only ends when
    /// the service returns a terminal status or a request fails.
    fn poll(&self, job_id: &str) -> Result<JobResponse> {
        loop {
            std::thread::sleep(self.poll_interval);
            let job = self.api.fetch_job(job_id)?;
            match job.status.as_str() {
                "completed" => return Ok(job),
                "queued" | "in_progress" => continue,
                status => {
                    return Err(BennyError::Service(format!(
                        "job {job_id} ended with status '{status}'"
                    )))
                }
            }
        }
    }
}

/// Locate the first message-type output's first output_text block and
/// parse its text as the transaction list.
fn parse_transactions(job: &JobResponse) -> Result<StatementDocument> {
    let text = job
        .output
        .iter()
        .find(|o| o.kind == "message")
        .and_then(|o| o.content.iter().find(|c| c.kind == "output_text"))
        .and_then(|c| c.text.as_deref())
        .ok_or_else(|| {
            BennyError::Service("completed job is missing output text".to_string())
        })?;
    serde_json::from_str(text)
        .map_err(|e| BennyError::Service(format!("unparseable transaction list: {e}")))
}

// ---------------------------------------------------------------------------
// Mock API for tests
// ---------------------------------------------------------------------------
