use crate::{
    driver::{self, Backend, DriverEntry, DriverId, DriverKind},
    error::{Error, Result},
    format::{ByteOrder, SampleFormat},
    options::DeviceOptions,
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SampleRate, SizedSample, StreamConfig, SupportedStreamConfig,
};
use crossbeam_channel as channel;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, error, info, trace, warn};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Interleaved samples per chunk queued for the output stream.
const CHUNK_SIZE: usize = 4096;

/// Chunks that may be queued ahead of the output stream before `play` blocks.
const CHUNKS_AHEAD: usize = 8;

/// Upper bound on how long `close` waits for queued samples to be played.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a device's samples end up.
trait Sink {
    fn write(&mut self, samples: &[i16]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// An open output device. Close it explicitly to see errors from flushing; dropping closes it too.
pub struct Device {
    sink: Option<Box<dyn Sink>>,
    format: SampleFormat,
    driver: DriverId,
}

/// Opens a live playback device on the given driver.
///
/// `options` are driver configuration settings; the live host drivers accept `dev` to pick an
/// output device by name.
pub fn open_live(
    driver: DriverId,
    format: &SampleFormat,
    options: &DeviceOptions,
) -> Result<Device> {
    let entry = driver::lookup(driver)?;
    if entry.info.kind != DriverKind::Live {
        return Err(Error::NotLive(entry.info.short_name));
    }
    let format = prepare(&entry, format, options)?;

    let sink: Box<dyn Sink> = match entry.backend {
        Backend::Host(host_id) => Box::new(AudioOutputDeviceStream::connect(
            host_id,
            options.get("dev"),
            &format,
        )?),
        _ => Box::new(NullSink::default()),
    };
    info!("Opened live device on driver {:?}", entry.info.short_name);

    Ok(Device {
        sink: Some(sink),
        format,
        driver,
    })
}

/// Opens a file output device. An existing file is only replaced when `overwrite` is set.
pub fn open_file<P: AsRef<Path>>(
    driver: DriverId,
    path: P,
    overwrite: bool,
    format: &SampleFormat,
    options: &DeviceOptions,
) -> Result<Device> {
    let path = path.as_ref();
    let entry = driver::lookup(driver)?;
    if entry.info.kind != DriverKind::File {
        return Err(Error::NotFile(entry.info.short_name));
    }
    let format = prepare(&entry, format, options)?;

    let file = if overwrite {
        File::create(path)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => Error::FileExists(path.to_path_buf()),
                _ => Error::Io(e),
            })?
    };
    let file = BufWriter::new(file);

    let sink: Box<dyn Sink> = match entry.backend {
        Backend::Wav => Box::new(WavSink::create(file, &format)?),
        _ => {
            let byte_order = match options.get("byteorder") {
                Some(order) => order.parse()?,
                None => format.byte_order,
            };
            Box::new(RawSink { file, byte_order })
        }
    };
    info!("Opened {:?} for {} output", path, entry.info.short_name);

    Ok(Device {
        sink: Some(sink),
        format,
        driver,
    })
}

/// Validates the options against the driver and applies the ones that affect the format.
fn prepare(
    entry: &DriverEntry,
    format: &SampleFormat,
    options: &DeviceOptions,
) -> Result<SampleFormat> {
    options.check(entry.info.options)?;
    if options.contains("debug") || options.contains("verbose") {
        debug!("Driver {:?} options {:?}", entry.info.short_name, options);
    }

    let mut format = format.clone();
    if let Some(matrix) = options.get("matrix") {
        format = format.with_matrix(matrix);
    }
    format.validate()?;

    if let Some(matrix) = format.channel_matrix()? {
        debug!("Channel matrix {:?}", matrix);
    }

    Ok(format)
}

impl Device {
    pub fn format(&self) -> &SampleFormat {
        &self.format
    }

    pub fn driver(&self) -> DriverId {
        self.driver
    }

    /// Plays raw interleaved PCM in the format's byte order, blocking until the device has
    /// accepted all of it.
    pub fn play(&mut self, bytes: &[u8]) -> Result<()> {
        let frame_bytes = self.format.frame_bytes();
        if bytes.len() % frame_bytes != 0 {
            return Err(Error::bad_format(format!(
                "{} bytes is not a whole number of {}-byte frames",
                bytes.len(),
                frame_bytes
            )));
        }

        let byte_order = self.format.byte_order;
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| byte_order.decode([pair[0], pair[1]]))
            .collect();

        self.play_samples(&samples)
    }

    /// Plays interleaved signed 16-bit samples, blocking until the device has accepted all of
    /// them.
    pub fn play_samples(&mut self, samples: &[i16]) -> Result<()> {
        if samples.len() % self.format.channels as usize != 0 {
            return Err(Error::bad_format(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                self.format.channels
            )));
        }

        let sink = self.sink.as_mut().ok_or(Error::DeviceClosed)?;
        trace!("Writing {} samples", samples.len());
        sink.write(samples)
    }

    pub fn close(mut self) -> Result<()> {
        self.close_sink()
    }

    fn close_sink(&mut self) -> Result<()> {
        match self.sink.take() {
            Some(mut sink) => sink.close(),
            None => Ok(()),
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Err(e) = self.close_sink() {
            error!("Failed to close device: {}", e);
        }
    }
}

/// A cpal output stream fed through a bounded channel.
///
/// Writes block once `CHUNKS_AHEAD` chunks are queued, so the caller runs at most that far ahead
/// of the sound card.
struct AudioOutputDeviceStream {
    stream: cpal::Stream,
    config: StreamConfig,

    /// Send the audio samples to be played by the device. Dropped on close.
    sample_tx: Option<Sender<Vec<i16>>>,

    /// Receives a message once the callback has played everything it was sent.
    drained_rx: Receiver<()>,
}

impl AudioOutputDeviceStream {
    fn connect(
        host_id: cpal::HostId,
        device_name: Option<&str>,
        format: &SampleFormat,
    ) -> Result<Self> {
        let host = cpal::host_from_id(host_id)?;
        let device = match device_name {
            Some(name) => host
                .output_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| Error::NoDevice(name.to_string()))?,
            None => host
                .default_output_device()
                .ok_or_else(|| Error::NoDevice("default".to_string()))?,
        };

        let supported_config = choose_config(&device, format)?;
        let sample_format = supported_config.sample_format();
        let config = supported_config.config();
        info!("Creating output device stream with config:\n{:?}", config);

        let (sample_tx, sample_rx) = channel::bounded(CHUNKS_AHEAD);
        let (drained_tx, drained_rx) = channel::bounded(1);

        let stream = match sample_format {
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, sample_rx, drained_tx),
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, sample_rx, drained_tx),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, sample_rx, drained_tx),
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, sample_rx, drained_tx),
            cpal::SampleFormat::F64 => build_stream::<f64>(&device, &config, sample_rx, drained_tx),
            _ => {
                return Err(Error::UnsupportedConfig {
                    channels: format.channels,
                    rate: format.rate,
                })
            }
        }?;
        stream.play()?;

        Ok(AudioOutputDeviceStream {
            stream,
            config,
            sample_tx: Some(sample_tx),
            drained_rx,
        })
    }
}

impl Sink for AudioOutputDeviceStream {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let sample_tx = self.sample_tx.as_ref().ok_or(Error::DeviceClosed)?;
        for chunk in samples.chunks(CHUNK_SIZE) {
            sample_tx
                .send(chunk.to_vec())
                .map_err(|_| Error::DeviceClosed)?;
        }

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Disconnecting tells the callback to report when it runs dry.
        if self.sample_tx.take().is_none() {
            return Ok(());
        }

        if self.drained_rx.recv_timeout(DRAIN_TIMEOUT).is_err() {
            warn!("Output stream did not drain within {:?}", DRAIN_TIMEOUT);
        }
        if let Err(e) = self.stream.pause() {
            debug!("Failed to pause output stream: {}", e);
        }
        debug!("Closed output stream at {} Hz", self.config.sample_rate.0);

        Ok(())
    }
}

/// Picks a config with exactly the requested channel count whose rate range covers the requested
/// rate, preferring 16-bit integer samples.
fn choose_config(device: &cpal::Device, format: &SampleFormat) -> Result<SupportedStreamConfig> {
    let rate = SampleRate(format.rate);
    let mut candidates: Vec<_> = device
        .supported_output_configs()?
        .filter(|c| c.channels() == format.channels)
        .filter(|c| c.min_sample_rate() <= rate && rate <= c.max_sample_rate())
        .collect();
    candidates.sort_by_key(|c| c.sample_format() != cpal::SampleFormat::I16);

    candidates
        .into_iter()
        .next()
        .map(|c| c.with_sample_rate(rate))
        .ok_or(Error::UnsupportedConfig {
            channels: format.channels,
            rate: format.rate,
        })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_rx: Receiver<Vec<i16>>,
    drained_tx: Sender<()>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<i16> + Send + 'static,
{
    let mut pending = VecDeque::with_capacity(CHUNK_SIZE);
    let mut drained = false;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            service_cpal_output_stream_callback(
                data,
                &mut pending,
                &sample_rx,
                &drained_tx,
                &mut drained,
            )
        },
        |err| error!("Output stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

fn service_cpal_output_stream_callback<T>(
    data: &mut [T],
    pending: &mut VecDeque<i16>,
    sample_rx: &Receiver<Vec<i16>>,
    drained_tx: &Sender<()>,
    drained: &mut bool,
) where
    T: SizedSample + FromSample<i16>,
{
    // This runs in a realtime priority thread, so never block waiting for the writer. Anything
    // we can't fill is played as silence.
    let mut disconnected = false;
    while pending.len() < data.len() {
        match sample_rx.try_recv() {
            Ok(chunk) => pending.extend(chunk),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                disconnected = true;
                break;
            }
        }
    }

    let provided = pending.len().min(data.len());
    for (out, sample) in data.iter_mut().zip(pending.drain(..provided)) {
        *out = T::from_sample(sample);
    }
    for out in data[provided..].iter_mut() {
        *out = T::EQUILIBRIUM;
    }
    if provided < data.len() && !disconnected {
        trace!("Output stream underrun by {} samples", data.len() - provided);
    }

    if disconnected && pending.is_empty() && !*drained {
        *drained = true;
        let _ = drained_tx.try_send(());
    }
}

/// Accepts and discards everything.
#[derive(Default)]
struct NullSink {
    samples_written: usize,
}

impl Sink for NullSink {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        self.samples_written += samples.len();
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!("Null device discarded {} samples", self.samples_written);
        Ok(())
    }
}

struct WavSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl WavSink {
    fn create(file: BufWriter<File>, format: &SampleFormat) -> Result<Self> {
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.rate,
            bits_per_sample: format.bits,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::new(file, spec)?;

        Ok(WavSink {
            writer: Some(writer),
        })
    }
}

impl Sink for WavSink {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::DeviceClosed)?;
        for &s in samples {
            writer.write_sample(s)?;
        }

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
            debug!("Finalized WAV file");
        }

        Ok(())
    }
}

struct RawSink {
    file: BufWriter<File>,
    byte_order: ByteOrder,
}

impl Sink for RawSink {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let byte_order = self.byte_order;
        let bytes: Vec<u8> = samples
            .iter()
            .flat_map(|&s| byte_order.encode(s).to_vec())
            .collect();
        self.file.write_all(&bytes)?;

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
