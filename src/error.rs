/// Errors produced while preparing, packaging or playing back a song.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid PCM buffer: {0}")]
    InvalidPcm(String),
    #[error("Failed to decode WAV track: {0}")]
    Wav(#[from] hound::Error),
    #[error("no media returned")]
    NoMedia,
    #[error("Media payload could not be decoded: {0}")]
    InvalidMedia(String),
    #[error("Voice '{0}' is not a known voice style.")]
    UnknownVoice(String),
    #[error("Lyrics cannot be empty.")]
    EmptyLyrics,
    #[error("Hosted service error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
