use ditdah::{driver_by_name, list_drivers, open_live, DeviceOptions, Error, SampleFormat};

use std::thread;

// One test only: the library state is process wide.
#[test]
fn init_and_shutdown_are_idempotent() {
    assert!(!ditdah::is_initialized());
    assert!(matches!(list_drivers(), Err(Error::NotInitialized)));
    assert!(matches!(driver_by_name("null"), Err(Error::NotInitialized)));

    let handles: Vec<_> = (0..8).map(|_| thread::spawn(ditdah::init)).collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(ditdah::is_initialized());
    let drivers = list_drivers().unwrap();
    ditdah::init();
    assert_eq!(list_drivers().unwrap().len(), drivers.len());

    let null = driver_by_name("null").unwrap();
    let device = open_live(null, &SampleFormat::new(8000, 2), &DeviceOptions::new()).unwrap();
    device.close().unwrap();

    ditdah::shutdown();
    ditdah::shutdown();
    assert!(!ditdah::is_initialized());
    assert!(matches!(
        open_live(null, &SampleFormat::new(8000, 2), &DeviceOptions::new()),
        Err(Error::NotInitialized)
    ));

    ditdah::init();
    assert_eq!(driver_by_name("null").unwrap(), null);
    ditdah::shutdown();
}
