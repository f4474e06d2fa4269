use derive_more::{Display, From};

#[derive(Debug, Display, From)]
pub enum Error {
    #[from]
    Config(crate::config::ConfigError),

    #[from]
    Transcription(crate::clients::TranscriptionError),

    #[from]
    Io(std::io::Error),
}

impl std::error::Error for Error {}
