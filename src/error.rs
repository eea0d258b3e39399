use crate::driver::DriverId;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("library is not initialized, call ditdah::init() first")]
    NotInitialized,

    #[error("no default driver found")]
    NoDefaultDriver,

    #[error("no driver named {0:?}")]
    NoDriver(String),

    #[error("no driver with id {0}")]
    InvalidDriver(DriverId),

    #[error("driver {0:?} is not a live output driver")]
    NotLive(String),

    #[error("driver {0:?} is not a file output driver")]
    NotFile(String),

    #[error("bad option {key:?} = {value:?}")]
    BadOption { key: String, value: String },

    #[error("bad sample format: {0}")]
    BadFormat(String),

    #[error("unknown note: {0}")]
    UnknownNote(String),

    #[error("no output device named {0:?}")]
    NoDevice(String),

    #[error("output device does not support {channels} channels at {rate} Hz")]
    UnsupportedConfig { channels: u16, rate: u32 },

    #[error("file already exists: {0}")]
    FileExists(PathBuf),

    #[error("device is closed")]
    DeviceClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio host unavailable: {0}")]
    HostUnavailable(#[from] cpal::HostUnavailable),

    #[error("failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query device configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to play output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

impl Error {
    pub(crate) fn bad_format(reason: impl Into<String>) -> Self {
        Error::BadFormat(reason.into())
    }

    pub(crate) fn bad_option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Error::BadOption {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_option_names_key_and_value() {
        let err = Error::bad_option("byteorder", "middle");
        let message = err.to_string();
        assert!(message.contains("byteorder"));
        assert!(message.contains("middle"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
