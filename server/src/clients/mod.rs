mod assemblyai;
mod client;
mod error;

// Re-export public types
pub use assemblyai::{AssemblyAiClient, MAX_FILE_SIZE_BYTES};
pub use client::{Transcript, TranscriptStatus, TranscriptionProvider, Utterance};
pub use error::TranscriptionError;
