// SPDX-License-Identifier: Apache-2.0
//! Integration tests using the compiled mock GMH vendor library.
//!
//! The build.rs compiles `tests/mock_gmh/mock_gmh.c` into `libmock_gmh.so`
//! and exports its path via the `MOCK_GMH_LIBRARY_PATH` env var.
//!
//! The mock keeps the open COM port in process-global state just like the
//! real vendor library, so every test takes `mock_lock()` to serialize
//! access.

use std::io::Write as _;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use gmh3x::library::GmhLibrary;
use gmh3x::probe::SensorInfo;
use gmh3x::report::run_best_effort;
use gmh3x::session::GmhSession;
use gmh3x::{GmhError, ffi};

/// Path to the compiled mock library (set by build.rs).
fn mock_library_path() -> &'static str {
    env!("MOCK_GMH_LIBRARY_PATH")
}

fn mock_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn load_mock() -> GmhLibrary {
    GmhLibrary::load(Path::new(mock_library_path())).expect("failed to load mock GMH library")
}

// ---------------------------------------------------------------------------
// Library loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_mock_library() {
    let _g = mock_lock();
    let library = load_mock();
    assert!(library.supports_message_translation());
    assert_eq!(library.version_number(), 3428);
}

#[test]
fn test_load_nonexistent_library() {
    let result = GmhLibrary::load(Path::new("/nonexistent/libGMH3x32E.so"));
    assert!(matches!(result, Err(GmhError::LoadFailed { .. })));
}

#[test]
fn test_load_non_library_file() {
    // A file that exists but is not a loadable shared object.
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(b"definitely not ELF").expect("write");

    let result = GmhLibrary::load(file.path());
    assert!(matches!(result, Err(GmhError::LoadFailed { .. })));
}

#[test]
fn test_error_message_translation() {
    let _g = mock_lock();
    let library = load_mock();
    assert_eq!(
        library.error_message(-4910).as_deref(),
        Some("no response from interface")
    );
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_open_session() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).expect("session open failed");
    assert_eq!(session.port(), 1);
}

#[test]
fn test_open_bad_port_reports_vendor_code() {
    let _g = mock_lock();
    let library = load_mock();
    let err = GmhSession::open(&library, 7).unwrap_err();
    match err {
        GmhError::Status { code, message } => {
            assert_eq!(code, -4910);
            assert_eq!(message.as_deref(), Some("no response from interface"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[test]
fn test_session_drop_closes_port() {
    let _g = mock_lock();
    let library = load_mock();
    {
        let _session = GmhSession::open(&library, 1).expect("first open failed");
        // COM port closes here on drop.
    }
    // A second open only succeeds if the first drop actually closed the port.
    let _session2 = GmhSession::open(&library, 1).expect("second open failed");
}

// ---------------------------------------------------------------------------
// Transmit reads
// ---------------------------------------------------------------------------

#[test]
fn test_display_value() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.display_value(1).unwrap(), 23.7);
    assert_eq!(session.display_value(2).unwrap(), 48.2);
}

#[test]
fn test_channel_count() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.channel_count().unwrap(), 2);
}

#[test]
fn test_unknown_request_code_is_status_error() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    let err = session.transmit(1, 199).unwrap_err();
    assert_eq!(err.status_code(), Some(-3));
}

#[test]
fn test_absent_channel_is_status_error() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    let err = session.display_value(3).unwrap_err();
    assert_eq!(err.status_code(), Some(-7));
}

#[test]
fn test_ranges() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.min_range(1).unwrap(), -200);
    assert_eq!(session.max_range(1).unwrap(), 850);
}

#[test]
fn test_display_ranges() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.display_min_range(1).unwrap(), -25);
    assert_eq!(session.display_max_range(1).unwrap(), 70);
    assert_eq!(session.display_decimal_point(1).unwrap(), 1);
    assert_eq!(session.display_unit(1).unwrap(), "°C");
}

#[test]
fn test_power_off_time_round_trip() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.power_off_time().unwrap(), 20);
    // The mock echoes the requested value back through the integer slot.
    assert_eq!(session.set_power_off_time(15).unwrap(), 15);
}

#[test]
fn test_software_info() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    let (version, ident) = session.software_info().unwrap();
    assert_eq!(version, 1.7);
    assert_eq!(ident, 90);
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

#[test]
fn test_measurement_code_and_description() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();

    let code = session.measurement_code(1).unwrap();
    assert_eq!(code, 11);
    assert_eq!(session.measurement_description(code).unwrap(), "Temperature");

    let code = session.measurement_code(2).unwrap();
    assert_eq!(code, 207);
    assert_eq!(
        session.measurement_description(code).unwrap(),
        "Rel. Air Humidity"
    );
}

#[test]
fn test_unknown_measurement_code() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    let err = session.measurement_description(999).unwrap_err();
    assert_eq!(err.status_code(), Some(0));
}

#[test]
fn test_unit_decodes_latin1() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    // The mock writes the unit as raw Latin-1 (0xB0 'C').
    assert_eq!(session.unit(1).unwrap(), "°C");
    assert_eq!(session.unit(2).unwrap(), "%");
}

#[test]
fn test_instrument_type_and_status() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();
    assert_eq!(session.instrument_type().unwrap(), "GFTB 200");
    assert_eq!(session.status_message(1).unwrap(), "ok");
}

// ---------------------------------------------------------------------------
// Capability probe
// ---------------------------------------------------------------------------

#[test]
fn test_sensor_info_walk() {
    let _g = mock_lock();
    let library = load_mock();
    let session = GmhSession::open(&library, 1).unwrap();

    let info = SensorInfo::query(&session).expect("probe failed");
    assert_eq!(info.channels.len(), 2);

    let temp = info.channel_for("Temperature").expect("no temperature");
    assert_eq!(temp.channel, 1);
    assert_eq!(temp.unit.as_deref(), Some("°C"));

    let rh = info
        .channel_for("Rel. Air Humidity")
        .expect("no humidity");
    assert_eq!(rh.channel, 2);
    assert_eq!(rh.unit.as_deref(), Some("%"));
}

// ---------------------------------------------------------------------------
// Best-effort demo sequence against the real loader path
// ---------------------------------------------------------------------------

#[test]
fn test_demo_sequence_transcript() {
    let _g = mock_lock();
    let mut library = load_mock();

    let mut out = Vec::new();
    let report = run_best_effort(&mut library, 1, 1, &mut out).expect("demo run failed");
    let out = String::from_utf8(out).unwrap();

    assert!(ffi::is_success(report.open_status));
    assert_eq!(report.version, 3428);
    assert_eq!(report.display_value, 23.7);
    assert_eq!(report.measurement_code, 11);
    assert_eq!(report.measurement, "Temperature");
    assert!(ffi::is_success(report.close_status));

    assert!(out.contains("library version: 3428"));
    assert!(out.contains("display value: 23.7"));
    assert!(out.contains("measuring: Temperature"));
}

#[test]
fn test_demo_sequence_continues_past_failed_open() {
    let _g = mock_lock();
    let mut library = load_mock();

    let mut out = Vec::new();
    let report = run_best_effort(&mut library, 9, 1, &mut out).expect("demo run failed");
    let out = String::from_utf8(out).unwrap();

    assert_eq!(report.open_status, -4910);
    assert!(out.contains("error opening COM port 9, code -4910"));

    // Continue-on-error: the version read happens anyway and the port was
    // never open, so every transmit fails with the no-response code.
    assert_eq!(report.version, 3428);
    assert!(out.contains("library version: 3428"));
    assert_eq!(report.display_status, -4910);
    assert!(out.contains("error reading display value, code -4910"));
}
