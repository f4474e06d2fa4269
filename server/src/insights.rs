//! The integration layer: spool an upload to a scoped temp file, run the
//! vendor transcription, classify each utterance's sentiment.
//!
//! Failures never escape as errors; they collapse into the `error` field of
//! [`AudioInsights`] so the presentation layer has a single flat channel to
//! render.

use std::io::Write;

use log::{error, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use audiolens_sentiment::{classify, Sentiment};

use crate::clients::{Transcript, TranscriptStatus, TranscriptionError, TranscriptionProvider};

/// Sentiment classification for one diarized utterance.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentRecord {
    pub text: String,
    pub speaker: String,
    pub sentiment: Sentiment,
}

/// Everything the page renders for one upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioInsights {
    /// Full transcript text
    pub transcript: String,
    /// Conversation joined as `Speaker X: text` lines
    pub speaker_transcript: String,
    /// Per-utterance sentiment records, in utterance order
    pub sentiments: Vec<SentimentRecord>,
    /// Flat user-facing error, `None` on full success
    pub error: Option<String>,
}

impl AudioInsights {
    fn from_error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

/// Transcribe an uploaded audio file and classify utterance sentiment.
///
/// `extension` is the upload's file extension (wav/mp3/m4a), already
/// validated by the caller and kept on the temp file name.
pub async fn analyze_audio(
    provider: &dyn TranscriptionProvider,
    audio: &[u8],
    extension: &str,
) -> AudioInsights {
    let transcript = match spool_and_transcribe(provider, audio, extension).await {
        Ok(transcript) => transcript,
        Err(e) => {
            error!("Audio analysis failed: {}", e);
            return AudioInsights::from_error(format!("An error occurred: {}", e.user_message()));
        }
    };

    if transcript.status == TranscriptStatus::Error {
        let message = transcript
            .error
            .unwrap_or_else(|| "unknown error".to_string());
        return AudioInsights::from_error(format!("Transcription error: {}", message));
    }

    let text = transcript.text.unwrap_or_default();
    let utterances = transcript.utterances.unwrap_or_default();

    if utterances.is_empty() {
        // Transcript text still gets surfaced alongside the error banner.
        return AudioInsights {
            transcript: text,
            error: Some("No utterances found".to_string()),
            ..AudioInsights::default()
        };
    }

    let mut speaker_transcript = String::new();
    let mut sentiments = Vec::with_capacity(utterances.len());

    for utterance in utterances {
        speaker_transcript.push_str(&format!(
            "Speaker {}: {}\n",
            utterance.speaker, utterance.text
        ));

        sentiments.push(SentimentRecord {
            sentiment: classify(&utterance.text),
            text: utterance.text,
            speaker: utterance.speaker,
        });
    }

    info!(
        "Analyzed {} utterances ({} transcript chars)",
        sentiments.len(),
        text.len()
    );

    AudioInsights {
        transcript: text,
        speaker_transcript,
        sentiments,
        error: None,
    }
}

/// Write the upload to a per-request temp file and run the provider on it.
///
/// The temp file is unique per request and removed when it drops, which
/// covers the success path, every error path, and panics.
async fn spool_and_transcribe(
    provider: &dyn TranscriptionProvider,
    audio: &[u8],
    extension: &str,
) -> Result<Transcript, TranscriptionError> {
    let temp = spool_to_temp(audio, extension)?;
    provider.transcribe(temp.path()).await
}

fn spool_to_temp(audio: &[u8], extension: &str) -> Result<NamedTempFile, TranscriptionError> {
    let mut temp = tempfile::Builder::new()
        .prefix("audiolens-")
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    temp.write_all(audio)?;
    temp.flush()?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::clients::Utterance;

    use super::*;

    /// Test double that records the path it was handed and replays a canned
    /// result.
    struct StubProvider {
        result: Mutex<Option<Result<Transcript, TranscriptionError>>>,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl StubProvider {
        fn new(result: Result<Transcript, TranscriptionError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                seen_path: Mutex::new(None),
            }
        }

        fn seen_path(&self) -> PathBuf {
            self.seen_path.lock().unwrap().clone().expect("not called")
        }
    }

    #[async_trait]
    impl TranscriptionProvider for StubProvider {
        async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError> {
            // The spooled upload must exist while the provider runs.
            assert!(audio_path.exists());
            *self.seen_path.lock().unwrap() = Some(audio_path.to_path_buf());
            self.result.lock().unwrap().take().expect("called twice")
        }
    }

    fn completed_transcript() -> Transcript {
        Transcript {
            id: "job-1".to_string(),
            status: TranscriptStatus::Completed,
            text: Some("I love this. I hate this.".to_string()),
            error: None,
            utterances: Some(vec![
                Utterance {
                    speaker: "A".to_string(),
                    text: "I love this, it's great".to_string(),
                },
                Utterance {
                    speaker: "B".to_string(),
                    text: "I hate this, terrible".to_string(),
                },
            ]),
        }
    }

    #[tokio::test]
    async fn completed_transcript_maps_to_insights() {
        let provider = StubProvider::new(Ok(completed_transcript()));

        let insights = analyze_audio(&provider, b"fake audio", "wav").await;

        assert_eq!(insights.error, None);
        assert_eq!(insights.transcript, "I love this. I hate this.");
        assert_eq!(
            insights.speaker_transcript,
            "Speaker A: I love this, it's great\nSpeaker B: I hate this, terrible\n"
        );
        assert_eq!(insights.sentiments.len(), 2);
        assert_eq!(insights.sentiments[0].speaker, "A");
        assert_eq!(insights.sentiments[0].sentiment, Sentiment::Positive);
        assert_eq!(insights.sentiments[1].sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn vendor_error_status_maps_to_error_string() {
        let provider = StubProvider::new(Ok(Transcript {
            id: "job-2".to_string(),
            status: TranscriptStatus::Error,
            text: None,
            error: Some("Audio file is corrupted".to_string()),
            utterances: None,
        }));

        let insights = analyze_audio(&provider, b"fake audio", "mp3").await;

        assert_eq!(
            insights.error.as_deref(),
            Some("Transcription error: Audio file is corrupted")
        );
        assert!(insights.transcript.is_empty());
        assert!(insights.sentiments.is_empty());
    }

    #[tokio::test]
    async fn empty_utterances_keep_transcript_text() {
        let provider = StubProvider::new(Ok(Transcript {
            id: "job-3".to_string(),
            status: TranscriptStatus::Completed,
            text: Some("Some transcribed text".to_string()),
            error: None,
            utterances: Some(vec![]),
        }));

        let insights = analyze_audio(&provider, b"fake audio", "m4a").await;

        assert_eq!(insights.error.as_deref(), Some("No utterances found"));
        assert_eq!(insights.transcript, "Some transcribed text");
        assert!(insights.speaker_transcript.is_empty());
        assert!(insights.sentiments.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_collapses_to_flat_message() {
        let provider = StubProvider::new(Err(TranscriptionError::ApiError(
            "API returned status 500: boom".to_string(),
        )));

        let insights = analyze_audio(&provider, b"fake audio", "wav").await;

        assert_eq!(
            insights.error.as_deref(),
            Some("An error occurred: Transcription failed: API returned status 500: boom")
        );
    }

    #[tokio::test]
    async fn temp_file_is_removed_after_success() {
        let provider = StubProvider::new(Ok(completed_transcript()));

        analyze_audio(&provider, b"fake audio", "wav").await;

        let path = provider.seen_path();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn temp_file_is_removed_after_provider_error() {
        let provider = StubProvider::new(Err(TranscriptionError::ApiError("boom".to_string())));

        analyze_audio(&provider, b"fake audio", "wav").await;

        let path = provider.seen_path();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn temp_file_carries_upload_extension() {
        let provider = StubProvider::new(Ok(completed_transcript()));

        analyze_audio(&provider, b"fake audio", "m4a").await;

        let path = provider.seen_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("m4a"));
    }
}
