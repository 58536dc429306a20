// SPDX-License-Identifier: Apache-2.0
//! The fixed demonstration sequence against a GMH instrument.
//!
//! This reproduces the vendor's classic `UseDLL` walkthrough: open the COM
//! port, read the library version, read the displayed value, read and decode
//! the measurement type, close the port. The sequence runs under a
//! *best-effort* policy: a failed step is reported with its raw vendor code
//! and the walk continues, so one unplugged probe still shows which of the
//! remaining calls work.
//!
//! The sequence is written against the [`Instrument`] trait rather than
//! [`GmhLibrary`] directly so the call-ordering and continue-on-error
//! contract can be tested without a physical device.

use std::io::{self, Write};

use crate::ffi;
use crate::library::{GmhLibrary, decode_text};
use crate::session::Transmission;

/// The five vendor entry points, as one step of the demo sequence sees them.
///
/// Statuses are raw vendor codes: negative is failure. The
/// `measurement_text` status follows the vendor's length-byte convention,
/// where anything below 1 is failure.
pub trait Instrument {
    fn open_com(&mut self, port: i16) -> i16;
    fn close_com(&mut self) -> i16;
    fn version_number(&mut self) -> i16;
    fn transmit(&mut self, channel: i16, request: ffi::GmhRequest, io: &mut Transmission) -> i16;
    fn measurement_text(&mut self, code: i32) -> (i16, String);
}

impl Instrument for GmhLibrary {
    fn open_com(&mut self, port: i16) -> i16 {
        unsafe { (self.fn_open_com)(port) }
    }

    fn close_com(&mut self) -> i16 {
        unsafe { (self.fn_close_com)() }
    }

    fn version_number(&mut self) -> i16 {
        unsafe { (self.fn_get_version_number)() }
    }

    fn transmit(&mut self, channel: i16, request: ffi::GmhRequest, io: &mut Transmission) -> i16 {
        unsafe {
            (self.fn_transmit)(
                channel,
                request,
                &mut io.priority,
                &mut io.float_value,
                &mut io.int_value,
            )
        }
    }

    fn measurement_text(&mut self, code: i32) -> (i16, String) {
        let Ok(narrowed) = i16::try_from(code) else {
            log::debug!("measurement code {code} out of i16 range");
            return (-1, String::new());
        };
        let shifted = narrowed.wrapping_add(ffi::LANGUAGE_OFFSET_ENGLISH);

        let mut buf = [0 as std::os::raw::c_char; ffi::MEASUREMENT_TEXT_CAP];
        let len = unsafe { (self.fn_get_measurement)(shifted, buf.as_mut_ptr()) };

        let text = decode_text(&buf).unwrap_or_default();
        (i16::from(len), text)
    }
}

/// Everything the demo sequence observed, one field per step.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Report {
    pub open_status: i16,
    /// `GMH_GetVersionNumber` returns the version as its status value.
    pub version: i16,
    pub display_status: i16,
    pub display_value: f64,
    pub measurement_code_status: i16,
    pub measurement_code: i32,
    pub measurement_status: i16,
    pub measurement: String,
    pub close_status: i16,
}

/// Run the fixed call sequence under the best-effort policy, writing
/// human-readable status lines to `out`.
///
/// Exactly one `open_com` and exactly one `close_com` happen per run, no
/// matter which intermediate steps fail.
pub fn run_best_effort<I, W>(instrument: &mut I, port: i16, channel: i16, out: &mut W) -> io::Result<Report>
where
    I: Instrument + ?Sized,
    W: Write,
{
    let mut report = Report::default();

    report.open_status = instrument.open_com(port);
    if !ffi::is_success(report.open_status) {
        writeln!(
            out,
            "error opening COM port {port}, code {}",
            report.open_status
        )?;
    }

    report.version = instrument.version_number();
    if ffi::is_success(report.version) {
        writeln!(out, "library version: {}", report.version)?;
    } else {
        writeln!(out, "error reading library version, code {}", report.version)?;
    }

    let mut slots = Transmission::default();
    report.display_status = instrument.transmit(channel, ffi::REQUEST_GET_VALUE, &mut slots);
    if ffi::is_success(report.display_status) {
        report.display_value = slots.float_value;
        writeln!(out, "display value: {}", report.display_value)?;
    } else {
        writeln!(
            out,
            "error reading display value, code {}",
            report.display_status
        )?;
    }

    // The measurement-type read's own status is deliberately not reported;
    // the decoded code is passed on regardless and the decode step surfaces
    // any failure.
    let mut slots = Transmission::default();
    report.measurement_code_status =
        instrument.transmit(channel, ffi::REQUEST_GET_MEAS_CODE, &mut slots);
    report.measurement_code = slots.int_value;
    if !ffi::is_success(report.measurement_code_status) {
        log::debug!(
            "measurement-type read returned status {}, passing code {} on",
            report.measurement_code_status,
            report.measurement_code
        );
    }

    let (status, text) = instrument.measurement_text(report.measurement_code);
    report.measurement_status = status;
    if status >= 1 {
        report.measurement = text;
        writeln!(out, "measuring: {}", report.measurement)?;
    } else {
        writeln!(out, "error reading measurement type, code {status}")?;
    }

    report.close_status = instrument.close_com();
    if !ffi::is_success(report.close_status) {
        log::error!("error closing COM port, code {}", report.close_status);
    }

    Ok(report)
}
