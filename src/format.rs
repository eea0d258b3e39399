use crate::error::{Error, Result};

use std::str::FromStr;

/// Stereo ordering in virtually all file formats.
pub const MATRIX_DEFAULT: &str = "L,R";
/// Quadraphonic ordering for most file formats.
pub const MATRIX_QUADRAPHONIC: &str = "L,R,BL,BR";
/// Channel order of a 5.1 WAV or FLAC file.
pub const MATRIX_51: &str = "L,R,C,LFE,BR,BL";
/// Channel order of a 7.1 WAV or FLAC file.
pub const MATRIX_71: &str = "L,R,C,LFE,BR,BL,SL,SR";
/// Channel order of a six channel (5.1) Vorbis I file.
pub const MATRIX_51_VORBIS: &str = "L,C,R,BR,BL,LFE";
/// Channel order of an eight channel (7.1) Vorbis file.
pub const MATRIX_71_VORBIS: &str = "L,C,R,BR,BL,SL,SR,LFE";
/// Channel order of a six channel AIFF[-C] file.
pub const MATRIX_AIFF: &str = "L,CL,C,R,RC,BC";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
    Native,
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::Native
    }
}

impl ByteOrder {
    /// Replaces `Native` with the concrete order of the host.
    pub fn resolve(self) -> ByteOrder {
        match self {
            ByteOrder::Native if cfg!(target_endian = "big") => ByteOrder::Big,
            ByteOrder::Native => ByteOrder::Little,
            other => other,
        }
    }

    pub fn decode(self, bytes: [u8; 2]) -> i16 {
        match self.resolve() {
            ByteOrder::Big => i16::from_be_bytes(bytes),
            _ => i16::from_le_bytes(bytes),
        }
    }

    pub fn encode(self, sample: i16) -> [u8; 2] {
        match self.resolve() {
            ByteOrder::Big => sample.to_be_bytes(),
            _ => sample.to_le_bytes(),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "native" => Ok(ByteOrder::Native),
            "little" => Ok(ByteOrder::Little),
            "big" => Ok(ByteOrder::Big),
            other => Err(Error::bad_option("byteorder", other)),
        }
    }
}

/// Intended speaker location of one input channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLocation {
    Left,
    Right,
    Center,
    Mono,
    LeftOfCenter,
    RightOfCenter,
    BackLeft,
    BackRight,
    BackCenter,
    SideLeft,
    SideRight,
    LowFrequency,
    Unused,
    Aux1,
    Aux2,
    Aux3,
    Aux4,
}

impl FromStr for ChannelLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        use ChannelLocation::*;

        let location = match s {
            "L" => Left,
            "R" => Right,
            "C" => Center,
            "M" => Mono,
            "CL" => LeftOfCenter,
            // AIFF spells "right of center" backwards.
            "CR" | "RC" => RightOfCenter,
            "BL" => BackLeft,
            "BR" => BackRight,
            "BC" => BackCenter,
            "SL" => SideLeft,
            "SR" => SideRight,
            "LFE" => LowFrequency,
            "X" => Unused,
            "A1" => Aux1,
            "A2" => Aux2,
            "A3" => Aux3,
            "A4" => Aux4,
            other => {
                return Err(Error::bad_format(format!(
                    "unknown channel location {:?}",
                    other
                )))
            }
        };

        Ok(location)
    }
}

/// Parses a comma separated channel matrix such as `"L,R,C,LFE,BR,BL"`.
pub fn parse_matrix(matrix: &str) -> Result<Vec<ChannelLocation>> {
    matrix
        .split(',')
        .map(|entry| entry.trim().parse())
        .collect()
}

/// Format of the interleaved PCM stream handed to a device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleFormat {
    /// Bits per sample.
    pub bits: u16,
    /// Samples per second per channel.
    pub rate: u32,
    pub channels: u16,
    pub byte_order: ByteOrder,
    /// Mapping of input channels to speaker locations, `None` for no mapping.
    pub matrix: Option<String>,
}

impl Default for SampleFormat {
    fn default() -> Self {
        SampleFormat {
            bits: 16,
            rate: 44100,
            channels: 2,
            byte_order: ByteOrder::Native,
            matrix: None,
        }
    }
}

impl SampleFormat {
    pub fn new(rate: u32, channels: u16) -> Self {
        SampleFormat {
            rate,
            channels,
            ..Default::default()
        }
    }

    pub fn with_matrix(mut self, matrix: &str) -> Self {
        // A zero-length matrix is not a valid mapping, it means "none".
        self.matrix = if matrix.is_empty() {
            None
        } else {
            Some(matrix.to_string())
        };
        self
    }

    /// Bits per second.
    pub fn bitrate(&self) -> u64 {
        self.rate as u64 * self.bits as u64 * self.channels as u64
    }

    pub fn sample_bytes(&self) -> usize {
        (self.bits as usize + 7) / 8
    }

    /// Bytes of one sample for every channel.
    pub fn frame_bytes(&self) -> usize {
        self.sample_bytes() * self.channels as usize
    }

    pub fn channel_matrix(&self) -> Result<Option<Vec<ChannelLocation>>> {
        self.matrix.as_deref().map(parse_matrix).transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate == 0 {
            return Err(Error::bad_format("sample rate must be positive"));
        }
        if self.channels == 0 {
            return Err(Error::bad_format("channel count must be positive"));
        }
        if self.bits != 16 {
            return Err(Error::bad_format(format!(
                "{} bit samples are not supported, only 16",
                self.bits
            )));
        }
        if let Some(locations) = self.channel_matrix()? {
            if locations.len() != self.channels as usize {
                return Err(Error::bad_format(format!(
                    "matrix maps {} channels but the format has {}",
                    locations.len(),
                    self.channels
                )));
            }
        }

        Ok(())
    }
}
