mod audio_device;
mod config;
mod driver;
mod error;
mod format;
mod options;

pub mod morse;

pub use audio_device::{open_file, open_live, Device};
pub use config::{MorseConfig, DEFAULT_BASE, FALLBACK_UNIT_MILLIS, MAX_VOLUME};
pub use driver::{
    default_driver, driver_by_name, driver_info, init, is_initialized, list_drivers, shutdown,
    DriverId, DriverInfo, DriverKind,
};
pub use error::{Error, Result};
pub use format::{
    parse_matrix, ByteOrder, ChannelLocation, SampleFormat, MATRIX_51, MATRIX_51_VORBIS,
    MATRIX_71, MATRIX_71_VORBIS, MATRIX_AIFF, MATRIX_DEFAULT, MATRIX_QUADRAPHONIC,
};
pub use options::{DeviceOptions, COMMON_OPTIONS};
