#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("File too large: {size_bytes} bytes")]
    FileTooLarge { size_bytes: u64 },
    #[error("API error: {0}")]
    ApiError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),
    #[error("Transcription timed out after {0} seconds")]
    TranscriptionTimeout(u64),
}

impl TranscriptionError {
    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            TranscriptionError::FileTooLarge { size_bytes } => {
                let mb = size_bytes / (1024 * 1024);
                format!("Audio file too large ({}MB). Maximum is 25MB.", mb)
            }
            TranscriptionError::ApiError(msg) => {
                // Parse for specific errors
                if msg.contains("429") || msg.to_lowercase().contains("rate limit") {
                    "Rate limit reached. Please wait and retry.".to_string()
                } else if msg.contains("401") {
                    "Invalid API key. Check your AssemblyAI credentials.".to_string()
                } else {
                    format!("Transcription failed: {}", msg)
                }
            }
            TranscriptionError::IoError(_) => {
                "Failed to read audio file. Please try again.".to_string()
            }
            TranscriptionError::InvalidResponse(_) => {
                "Transcription service returned an unexpected response.".to_string()
            }
            TranscriptionError::TranscriptionTimeout(_) => {
                "Transcription took too long. Try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_401_maps_to_credentials_message() {
        let err = TranscriptionError::ApiError("API returned status 401: unauthorized".into());
        assert!(err.user_message().contains("API key"));
    }

    #[test]
    fn file_too_large_reports_megabytes() {
        let err = TranscriptionError::FileTooLarge {
            size_bytes: 30 * 1024 * 1024,
        };
        assert_eq!(
            err.user_message(),
            "Audio file too large (30MB). Maximum is 25MB."
        );
    }
}
