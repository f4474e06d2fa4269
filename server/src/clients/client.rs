use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::TranscriptionError;

/// Processing status of a vendor transcription job.
///
/// Jobs progress queued -> processing -> completed, or end in error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// One vendor-segmented span of speech with its speaker label.
///
/// Timing and confidence fields may appear on the wire; they are not consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

/// Vendor transcription result: full text, status, and diarized utterances.
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
}

/// Trait for hosted transcription/diarization providers.
///
/// An implementation owns the full vendor round trip: uploading the audio,
/// starting a diarized transcription job, and waiting for its terminal state.
/// A vendor-reported failure is returned as a `Transcript` with
/// [`TranscriptStatus::Error`]; `Err` is reserved for transport, IO, and
/// deadline failures.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the audio file at `audio_path` with speaker diarization.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_deserializes_from_vendor_json() {
        let json = r#"{
            "id": "5551722-f677-48a6-9287-39c0aafd9ac1",
            "status": "completed",
            "text": "Hello there. Hi.",
            "utterances": [
                {"speaker": "A", "text": "Hello there.", "start": 240, "end": 1040, "confidence": 0.97},
                {"speaker": "B", "text": "Hi.", "start": 1200, "end": 1500, "confidence": 0.95}
            ],
            "audio_duration": 2,
            "language_code": "en_us"
        }"#;

        let transcript: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Completed);
        assert_eq!(transcript.text.as_deref(), Some("Hello there. Hi."));
        let utterances = transcript.utterances.unwrap();
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].speaker, "A");
        assert_eq!(utterances[1].text, "Hi.");
    }

    #[test]
    fn error_status_carries_vendor_message() {
        let json = r#"{
            "id": "5551722-f677-48a6-9287-39c0aafd9ac1",
            "status": "error",
            "error": "Audio file is corrupted"
        }"#;

        let transcript: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Error);
        assert_eq!(transcript.error.as_deref(), Some("Audio file is corrupted"));
        assert!(transcript.text.is_none());
    }

    #[test]
    fn queued_job_has_no_results_yet() {
        let json = r#"{"id": "abc123", "status": "queued"}"#;
        let transcript: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Queued);
        assert!(transcript.utterances.is_none());
    }
}
