//! AssemblyAI v2 REST client.
//!
//! One transcription is three vendor calls: upload the raw bytes, create a
//! transcript job with speaker diarization enabled, then poll the job until
//! it reaches a terminal status.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};

use crate::config::Config;

use super::client::{Transcript, TranscriptStatus, TranscriptionProvider};
use super::error::TranscriptionError;

pub const MAX_FILE_SIZE_BYTES: u64 = 25 * 1024 * 1024; // 25MB limit

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    speaker_labels: bool,
    sentiment_analysis: bool,
}

/// AssemblyAI hosted transcription/diarization client
pub struct AssemblyAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    poll_interval: Duration,
    poll_deadline: Duration,
}

impl AssemblyAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            poll_interval: config.poll_interval,
            poll_deadline: config.poll_deadline,
        }
    }

    /// Upload raw audio bytes; returns the vendor-hosted audio URL.
    async fn upload(&self, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        debug!("Uploading {} bytes to AssemblyAI", audio.len());

        let response = self
            .http
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", self.api_key.expose_secret())
            .body(audio)
            .send()
            .await
            .map_err(|e| {
                error!("Upload request error: {}", e);
                TranscriptionError::ApiError(format!("Request failed: {}", e))
            })?;

        let upload: UploadResponse = parse_json(response).await?;
        Ok(upload.upload_url)
    }

    /// Create a transcript job for an uploaded audio URL.
    ///
    /// Speaker diarization on, vendor sentiment analysis off; sentiment is
    /// classified locally per utterance.
    async fn submit(&self, audio_url: &str) -> Result<Transcript, TranscriptionError> {
        let request = TranscriptRequest {
            audio_url,
            speaker_labels: true,
            sentiment_analysis: false,
        };

        let response = self
            .http
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Transcript request error: {}", e);
                TranscriptionError::ApiError(format!("Request failed: {}", e))
            })?;

        parse_json(response).await
    }

    /// Fetch the current state of a transcript job.
    async fn fetch(&self, id: &str) -> Result<Transcript, TranscriptionError> {
        let response = self
            .http
            .get(format!("{}/v2/transcript/{}", self.base_url, id))
            .header("authorization", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                error!("Poll request error: {}", e);
                TranscriptionError::ApiError(format!("Request failed: {}", e))
            })?;

        parse_json(response).await
    }

    /// Poll a submitted job until completed or error, bounded by the deadline.
    async fn await_completion(
        &self,
        mut transcript: Transcript,
    ) -> Result<Transcript, TranscriptionError> {
        let deadline = Instant::now() + self.poll_deadline;

        loop {
            match transcript.status {
                TranscriptStatus::Completed | TranscriptStatus::Error => return Ok(transcript),
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    if Instant::now() >= deadline {
                        warn!(
                            "Transcription job {} exceeded {}s deadline",
                            transcript.id,
                            self.poll_deadline.as_secs()
                        );
                        return Err(TranscriptionError::TranscriptionTimeout(
                            self.poll_deadline.as_secs(),
                        ));
                    }
                    sleep(self.poll_interval).await;
                    transcript = self.fetch(&transcript.id).await?;
                }
            }
        }
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError> {
        let audio = tokio::fs::read(audio_path).await?;

        let size_bytes = audio.len() as u64;
        if size_bytes > MAX_FILE_SIZE_BYTES {
            error!(
                "File too large: {} bytes > {} bytes",
                size_bytes, MAX_FILE_SIZE_BYTES
            );
            return Err(TranscriptionError::FileTooLarge { size_bytes });
        }

        let audio_url = self.upload(audio).await?;
        let submitted = self.submit(&audio_url).await?;
        info!("Transcription job {} submitted", submitted.id);

        let transcript = self.await_completion(submitted).await?;
        info!(
            "Transcription job {} finished with status {:?}",
            transcript.id, transcript.status
        );
        Ok(transcript)
    }
}

/// Check response status and decode the JSON body.
async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TranscriptionError> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("API error response ({}): {}", status, error_text);
        return Err(TranscriptionError::ApiError(format!(
            "API returned status {}: {}",
            status, error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))
}
