use crate::{
    error::{Error, Result},
    format::ByteOrder,
};

use cpal::traits::HostTrait;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static REGISTRY: Lazy<RwLock<Vec<DriverEntry>>> = Lazy::new(|| RwLock::new(Vec::new()));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DriverId(pub(crate) usize);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    /// Plays through a sound card or sound server.
    Live,
    /// Writes into a file on disk.
    File,
}

#[derive(Clone, Debug)]
pub struct DriverInfo {
    pub id: DriverId,
    pub kind: DriverKind,
    pub short_name: String,
    pub name: String,
    pub comment: String,
    pub preferred_byte_order: ByteOrder,
    /// Driver specific option keys, on top of the common ones.
    pub options: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    Host(cpal::HostId),
    Null,
    Wav,
    Raw,
}

#[derive(Clone, Debug)]
pub(crate) struct DriverEntry {
    pub info: DriverInfo,
    pub backend: Backend,
}

/// Builds the driver registry. Must be balanced by a call to `shutdown`.
///
/// Repeated calls are ignored until `shutdown` is called, after which the registry is rebuilt by
/// the next `init`.
pub fn init() {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        *registry = discover_drivers();
        info!("Initialized with {} drivers", registry.len());
    }
}

/// Drops the driver registry. Repeated calls are ignored.
pub fn shutdown() {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if INITIALIZED
        .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        registry.clear();
        debug!("Shut down driver registry");
    }
}

pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

fn discover_drivers() -> Vec<DriverEntry> {
    let mut backends: Vec<Backend> = cpal::available_hosts()
        .into_iter()
        .map(Backend::Host)
        .collect();
    backends.extend(&[Backend::Null, Backend::Wav, Backend::Raw]);

    backends
        .into_iter()
        .enumerate()
        .map(|(i, backend)| DriverEntry {
            info: describe(DriverId(i), backend),
            backend,
        })
        .collect()
}

fn describe(id: DriverId, backend: Backend) -> DriverInfo {
    match backend {
        Backend::Host(host_id) => DriverInfo {
            id,
            kind: DriverKind::Live,
            short_name: host_id.name().to_lowercase(),
            name: format!("{} output", host_id.name()),
            comment: "Live playback through the platform audio host".to_string(),
            preferred_byte_order: ByteOrder::Native,
            options: &["dev"],
        },
        Backend::Null => DriverInfo {
            id,
            kind: DriverKind::Live,
            short_name: "null".to_string(),
            name: "Null output".to_string(),
            comment: "Accepts and discards all samples, for testing".to_string(),
            preferred_byte_order: ByteOrder::Native,
            options: &[],
        },
        Backend::Wav => DriverInfo {
            id,
            kind: DriverKind::File,
            short_name: "wav".to_string(),
            name: "WAV file output".to_string(),
            comment: "Writes RIFF/WAVE files".to_string(),
            preferred_byte_order: ByteOrder::Little,
            options: &[],
        },
        Backend::Raw => DriverInfo {
            id,
            kind: DriverKind::File,
            short_name: "raw".to_string(),
            name: "Raw file output".to_string(),
            comment: "Writes headerless PCM samples".to_string(),
            preferred_byte_order: ByteOrder::Native,
            options: &["byteorder"],
        },
    }
}

fn with_registry<T>(f: impl FnOnce(&[DriverEntry]) -> Result<T>) -> Result<T> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    if !is_initialized() {
        return Err(Error::NotInitialized);
    }
    f(&registry)
}

pub(crate) fn lookup(id: DriverId) -> Result<DriverEntry> {
    with_registry(|drivers| drivers.get(id.0).cloned().ok_or(Error::InvalidDriver(id)))
}

/// Returns the live driver of the platform's default audio host, provided that host has an
/// output device.
pub fn default_driver() -> Result<DriverId> {
    with_registry(|drivers| {
        let host = cpal::default_host();
        if host.default_output_device().is_none() {
            return Err(Error::NoDefaultDriver);
        }
        drivers
            .iter()
            .find(|d| d.backend == Backend::Host(host.id()))
            .map(|d| d.info.id)
            .ok_or(Error::NoDefaultDriver)
    })
}

pub fn driver_by_name(name: &str) -> Result<DriverId> {
    with_registry(|drivers| {
        drivers
            .iter()
            .find(|d| d.info.short_name == name)
            .map(|d| d.info.id)
            .ok_or_else(|| Error::NoDriver(name.to_string()))
    })
}

pub fn driver_info(id: DriverId) -> Result<DriverInfo> {
    lookup(id).map(|entry| entry.info)
}

pub fn list_drivers() -> Result<Vec<DriverInfo>> {
    with_registry(|drivers| Ok(drivers.iter().map(|d| d.info.clone()).collect()))
}
