//! HTTP client for the analysis backend.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::input::{TextPair, UploadRequest};
use crate::models::{AnalysisResults, Health, ParaphraseCheck, SimpleCheck};

pub const GENERIC_FAILURE: &str = "Analysis failed. Please make sure the backend is running.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("could not encode request: {0}")]
    Encode(serde_json::Error),
    #[error("backend sent an unreadable response: {0}")]
    Decode(serde_json::Error),
    #[error("could not read {path}: {source}")]
    Archive {
        path: String,
        source: std::io::Error,
    },
}

pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let url = self.url("/health");
        debug!(%url, "checking backend health");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    /// Whole-text comparison.
    pub async fn analyze_simple(&self, texts: &TextPair) -> Result<SimpleCheck, ClientError> {
        let url = self.url("/analyze-simple");
        debug!(%url, "submitting text pair");
        let response = self.http.post(&url).json(texts).send().await?;
        decode(response).await
    }

    /// Sentence-by-sentence comparison.
    pub async fn analyze_paraphrase(
        &self,
        texts: &TextPair,
    ) -> Result<ParaphraseCheck, ClientError> {
        let url = self.url("/analyze-paraphrase");
        debug!(%url, "submitting text pair for sentence comparison");
        let response = self.http.post(&url).json(texts).send().await?;
        decode(response).await
    }

    pub async fn upload_and_analyze(
        &self,
        request: &UploadRequest,
    ) -> Result<AnalysisResults, ClientError> {
        let bytes = std::fs::read(&request.archive).map_err(|source| ClientError::Archive {
            path: request.archive.display().to_string(),
            source,
        })?;
        let archive = Part::bytes(bytes)
            .file_name(request.archive_name())
            .mime_str("application/zip")?;

        let form = Form::new()
            .part("file", archive)
            .text("assignmentName", request.assignment_name.clone())
            .text("similarity", request.threshold.to_string())
            .text(
                "fileTypes",
                serde_json::to_string(&request.file_types).map_err(ClientError::Encode)?,
            )
            .text("detectionMode", request.detection_mode.as_str());

        let url = self.url("/upload-and-analyze");
        info!(%url, assignment = %request.assignment_name, "uploading submissions");
        let response = self.http.post(&url).multipart(form).send().await?;
        let results: AnalysisResults = decode(response).await?;
        info!(
            pairs = results.suspicious_pairs.len(),
            submissions = results.total_submissions,
            "analysis received"
        );
        Ok(results)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Backend {
            status: status.as_u16(),
            message: backend_message(&body),
        });
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(ClientError::Decode)
}

/// The message a backend put in an error body, or the generic fallback.
pub fn backend_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
