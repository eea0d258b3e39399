use ditdah::{
    morse::translate, open_file, open_live, DeviceOptions, Device, DriverId, DriverKind,
    MorseConfig,
};

use anyhow::{bail, Context};
use crossbeam_channel as channel;
use crossbeam_channel::Receiver;
use log::{debug, info};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "morse", about = "Plays a sentence as morse code.")]
struct Opt {
    /// Number of samples per second per channel.
    #[structopt(short = "r", default_value = "8000")]
    rate: u32,

    /// Number of channels.
    #[structopt(short = "c", default_value = "2")]
    channels: u16,

    /// Channel matrix for audio driver.
    #[structopt(short = "m", default_value = "L,R")]
    matrix: String,

    /// Name of audio driver to use. Omit for the default system driver.
    #[structopt(short = "d")]
    driver: Option<String>,

    /// Note to play at: C, C#, D, D#, E, F, F#, G, G#, A, A#, B
    #[structopt(short = "n", default_value = "F#")]
    note: String,

    /// Base frequency in hertz for the tone scale (value of note A).
    #[structopt(short = "f", default_value = "440")]
    base: f64,

    /// Duration of 1 unit (dot) in milliseconds.
    #[structopt(short = "u", default_value = "50")]
    unit: u32,

    /// Volume of output in range 0..100
    #[structopt(short = "v", default_value = "100")]
    volume: u32,

    /// Write to this file instead of playing. `.raw` and `.pcm` get headerless samples, anything
    /// else a WAV file.
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,

    /// Replace the output file if it exists.
    #[structopt(long = "overwrite")]
    overwrite: bool,

    /// Print the available drivers and exit.
    #[structopt(long = "list-drivers")]
    list_drivers: bool,

    #[structopt(required_unless = "list-drivers")]
    sentence: Option<String>,
}

impl Opt {
    fn config(&self) -> MorseConfig {
        MorseConfig {
            rate: self.rate,
            channels: self.channels,
            matrix: self.matrix.clone(),
            driver: self.driver.clone().unwrap_or_default(),
            note: self.note.clone(),
            base: self.base,
            unit: self.unit,
            volume: self.volume,
        }
    }
}

fn main() {
    env_logger::init();

    let opt = Opt::from_args();

    // Set SIGINT handler.
    let (exit_tx, exit_rx) = channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = exit_tx.try_send(());
    })
    .expect("Error setting Ctrl-C handler");

    ditdah::init();
    let result = run(&opt, &exit_rx);
    ditdah::shutdown();

    if let Err(e) = result {
        eprintln!("morse: {:#}", e);
        std::process::exit(1);
    }
}

fn run(opt: &Opt, exit_rx: &Receiver<()>) -> anyhow::Result<()> {
    if opt.list_drivers {
        return list_drivers();
    }

    let text = sentence(opt.sentence.as_deref())?;
    let config = opt.config().sanitize()?;
    info!("Sending {:?} at {:.2} Hz", text, config.frequency());

    // Create morse code tones for the configured note, then the whole message.
    let samples = config.sample_set();
    let morse_code = translate(text, &samples);

    let format = config.sample_format();
    let options = DeviceOptions::new();
    let device = match &opt.output {
        Some(path) => {
            let driver = file_driver(&config, path)?;
            open_file(driver, path, opt.overwrite, &format, &options)
                .with_context(|| format!("open {}", path.display()))?
        }
        None => {
            let driver = live_driver(&config)?;
            open_live(driver, &format, &options).context("open audio device")?
        }
    };

    play(device, &morse_code, exit_rx)
}

/// Plays in slices of a tenth of a second so that Ctrl-C is noticed promptly.
fn play(mut device: Device, samples: &[i16], exit_rx: &Receiver<()>) -> anyhow::Result<()> {
    let format = device.format();
    let slice_len = ((format.rate as usize / 10).max(1)) * format.channels as usize;

    for slice in samples.chunks(slice_len) {
        if exit_rx.try_recv().is_ok() {
            debug!("Interrupted playback");
            break;
        }
        device.play_samples(slice)?;
    }

    device.close()?;
    Ok(())
}

fn live_driver(config: &MorseConfig) -> anyhow::Result<DriverId> {
    let id = if config.driver.is_empty() {
        ditdah::default_driver()
    } else {
        ditdah::driver_by_name(&config.driver)
    };

    id.context("no valid audio driver found")
}

fn file_driver(config: &MorseConfig, path: &Path) -> anyhow::Result<DriverId> {
    if !config.driver.is_empty() {
        let id = ditdah::driver_by_name(&config.driver)?;
        if ditdah::driver_info(id)?.kind != DriverKind::File {
            bail!("driver {:?} cannot write files", config.driver);
        }
        return Ok(id);
    }

    Ok(ditdah::driver_by_name(file_driver_name(path))?)
}

/// `.raw` and `.pcm` files get headerless samples, everything else a WAV header.
fn file_driver_name(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("raw") | Some("pcm") => "raw",
        _ => "wav",
    }
}

fn sentence(text: Option<&str>) -> anyhow::Result<&str> {
    match text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => bail!("nothing to send, usage: morse [options] <sentence>"),
    }
}

fn list_drivers() -> anyhow::Result<()> {
    println!("--- Available audio drivers ---");
    for info in ditdah::list_drivers()? {
        let kind = match info.kind {
            DriverKind::Live => "live",
            DriverKind::File => "file",
        };
        println!("{}: {} [{}] {}", info.id, info.short_name, kind, info.comment);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_extension_picks_driver() {
        assert_eq!(file_driver_name(Path::new("out.raw")), "raw");
        assert_eq!(file_driver_name(Path::new("/tmp/out.pcm")), "raw");
        assert_eq!(file_driver_name(Path::new("out.wav")), "wav");
        assert_eq!(file_driver_name(Path::new("out.RAW")), "wav");
        assert_eq!(file_driver_name(Path::new("out")), "wav");
    }

    #[test]
    fn empty_sentence_is_a_usage_error() {
        assert!(sentence(None).is_err());
        assert!(sentence(Some("")).is_err());
        assert_eq!(sentence(Some("sos")).unwrap(), "sos");
    }

    #[test]
    fn sentence_is_required_unless_listing() {
        assert!(Opt::from_iter_safe(&["morse"]).is_err());
        assert!(Opt::from_iter_safe(&["morse", "--list-drivers"]).is_ok());
        let opt = Opt::from_iter_safe(&["morse", "-n", "a", "-u", "20", "hello world"]).unwrap();
        assert_eq!(opt.sentence.as_deref(), Some("hello world"));
        assert_eq!(opt.config().note, "a");
        assert_eq!(opt.config().unit, 20);
    }
}
