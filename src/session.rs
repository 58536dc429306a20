// SPDX-License-Identifier: Apache-2.0
//! GMH communication sessions.
//!
//! A session is the open/close bracket around the COM port. Sessions are
//! created via [`GmhSession::open`] and close the port automatically when
//! dropped. The vendor library supports exactly one open port per process,
//! and every call blocks until the instrument answers or the vendor's own
//! serial timeout elapses.

use std::os::raw::c_char;

use crate::error::{GmhError, Result};
use crate::ffi;
use crate::library::{GmhLibrary, decode_text};

/// Output slots of one `GMH_Transmit` round trip.
///
/// Which slot carries the result depends on the request code: `GetValue`
/// fills `float_value`, the `Get*Code`/`Get*Range` family fills `int_value`,
/// `GetSoftwareInfo` fills both.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Transmission {
    pub priority: i16,
    pub float_value: f64,
    pub int_value: i32,
}

/// An open session with a GMH instrument on one COM port.
///
/// Not `Send`/`Sync`: the vendor library keeps the open port in process-wide
/// state and makes no thread-safety guarantees.
#[derive(Debug)]
pub struct GmhSession<'lib> {
    library: &'lib GmhLibrary,
    port: i16,
    _not_sync: std::marker::PhantomData<*const ()>,
}

impl<'lib> GmhSession<'lib> {
    /// Open the COM port for a 3100N GMH adapter cable.
    ///
    /// # Errors
    ///
    /// Returns [`GmhError::Status`] with the vendor code (and translated
    /// message when the library can provide one) if `GMH_OpenCom` fails.
    pub fn open(library: &'lib GmhLibrary, port: i16) -> Result<Self> {
        let status = unsafe { (library.fn_open_com)(port) };

        if !ffi::is_success(status) {
            return Err(GmhError::Status {
                code: status,
                message: library.error_message(status),
            });
        }

        log::debug!("opened GMH session on COM port {port} (status {status})");

        Ok(Self {
            library,
            port,
            _not_sync: std::marker::PhantomData,
        })
    }

    /// The underlying vendor library this session talks through.
    pub fn library(&self) -> &GmhLibrary {
        self.library
    }

    /// COM port number this session was opened on.
    pub fn port(&self) -> i16 {
        self.port
    }

    // -----------------------------------------------------------------------
    // Raw transmit
    // -----------------------------------------------------------------------

    /// One `GMH_Transmit` round trip with a preset integer slot.
    ///
    /// The `Set*` request codes read the integer slot as an input; everything
    /// else overwrites it.
    fn raw_transmit(
        &self,
        channel: i16,
        request: ffi::GmhRequest,
        int_in: i32,
    ) -> Result<Transmission> {
        let mut out = Transmission {
            int_value: int_in,
            ..Transmission::default()
        };

        let status = unsafe {
            (self.library.fn_transmit)(
                channel,
                request,
                &mut out.priority,
                &mut out.float_value,
                &mut out.int_value,
            )
        };

        if !ffi::is_success(status) {
            return Err(GmhError::Status {
                code: status,
                message: self.library.error_message(status),
            });
        }

        log::trace!("transmit(chan {channel}, request {request}) -> {out:?}");

        Ok(out)
    }

    /// Interrogate the instrument with a raw request code.
    pub fn transmit(&self, channel: i16, request: ffi::GmhRequest) -> Result<Transmission> {
        self.raw_transmit(channel, request, 0)
    }

    // -----------------------------------------------------------------------
    // Typed reads
    // -----------------------------------------------------------------------

    /// Live displayed value of the given measurement channel.
    pub fn display_value(&self, channel: i16) -> Result<f64> {
        Ok(self.transmit(channel, ffi::REQUEST_GET_VALUE)?.float_value)
    }

    /// Raw measurement-type code of the given channel (decode it with
    /// [`GmhSession::measurement_description`]).
    pub fn measurement_code(&self, channel: i16) -> Result<i32> {
        Ok(self.transmit(channel, ffi::REQUEST_GET_MEAS_CODE)?.int_value)
    }

    /// Number of measurement channels this instrument exposes.
    pub fn channel_count(&self) -> Result<i32> {
        Ok(self.transmit(1, ffi::REQUEST_GET_CHANNEL_COUNT)?.int_value)
    }

    /// Lower measuring range of the given channel.
    pub fn min_range(&self, channel: i16) -> Result<i32> {
        Ok(self.transmit(channel, ffi::REQUEST_GET_MIN_RANGE)?.int_value)
    }

    /// Upper measuring range of the given channel.
    pub fn max_range(&self, channel: i16) -> Result<i32> {
        Ok(self.transmit(channel, ffi::REQUEST_GET_MAX_RANGE)?.int_value)
    }

    /// Lower range of the instrument's display for the given channel.
    pub fn display_min_range(&self, channel: i16) -> Result<i32> {
        Ok(self
            .transmit(channel, ffi::REQUEST_GET_DISP_MIN_RANGE)?
            .int_value)
    }

    /// Upper range of the instrument's display for the given channel.
    pub fn display_max_range(&self, channel: i16) -> Result<i32> {
        Ok(self
            .transmit(channel, ffi::REQUEST_GET_DISP_MAX_RANGE)?
            .int_value)
    }

    /// Decimal-point position of the display for the given channel.
    pub fn display_decimal_point(&self, channel: i16) -> Result<i32> {
        Ok(self
            .transmit(channel, ffi::REQUEST_GET_DISP_DEC_POINT)?
            .int_value)
    }

    /// Auto power-off time in minutes.
    pub fn power_off_time(&self) -> Result<i32> {
        Ok(self
            .transmit(1, ffi::REQUEST_GET_POWER_OFF_TIME)?
            .int_value)
    }

    /// Request a new auto power-off time in minutes. Returns the time the
    /// instrument actually accepted.
    pub fn set_power_off_time(&self, minutes: i16) -> Result<i32> {
        Ok(self
            .raw_transmit(1, ffi::REQUEST_SET_POWER_OFF_TIME, i32::from(minutes))?
            .int_value)
    }

    /// Firmware version and identifier of the instrument.
    pub fn software_info(&self) -> Result<(f64, i32)> {
        let out = self.transmit(1, ffi::REQUEST_GET_SOFTWARE_INFO)?;
        Ok((out.float_value, out.int_value))
    }

    // -----------------------------------------------------------------------
    // Text decoding (code -> label, via the vendor's language tables)
    // -----------------------------------------------------------------------

    /// Decode a raw measurement-type code into a human-readable label,
    /// e.g. `11 -> "Temperature"`.
    pub fn measurement_description(&self, code: i32) -> Result<String> {
        let mut buf = [0 as c_char; ffi::MEASUREMENT_TEXT_CAP];
        let shifted = shift_code(code)?;

        let len = unsafe { (self.library.fn_get_measurement)(shifted, buf.as_mut_ptr()) };
        if len < 1 {
            return Err(GmhError::Status {
                code: i16::from(len),
                message: None,
            });
        }

        decode_text(&buf)
    }

    /// Measurement unit of the given channel, e.g. `"°C"`.
    pub fn unit(&self, channel: i16) -> Result<String> {
        let code = self.transmit(channel, ffi::REQUEST_GET_UNIT_CODE)?.int_value;
        self.decode_unit(code)
    }

    /// Unit shown on the instrument's display for the given channel.
    pub fn display_unit(&self, channel: i16) -> Result<String> {
        let code = self
            .transmit(channel, ffi::REQUEST_GET_DISP_UNIT_CODE)?
            .int_value;
        self.decode_unit(code)
    }

    fn decode_unit(&self, code: i32) -> Result<String> {
        let decode = self
            .library
            .fn_get_unit
            .ok_or(GmhError::NotSupported("GMH_GetUnit"))?;

        let mut buf = [0 as c_char; ffi::UNIT_TEXT_CAP];
        let len = unsafe { decode(shift_code(code)?, buf.as_mut_ptr()) };
        if len < 1 {
            return Err(GmhError::Status {
                code: i16::from(len),
                message: None,
            });
        }

        decode_text(&buf)
    }

    /// Instrument type label, e.g. `"GFTB 200"`.
    pub fn instrument_type(&self) -> Result<String> {
        let decode = self
            .library
            .fn_get_type
            .ok_or(GmhError::NotSupported("GMH_GetType"))?;

        let code = self.transmit(1, ffi::REQUEST_GET_TYPE_CODE)?.int_value;

        let mut buf = [0 as c_char; ffi::MEASUREMENT_TEXT_CAP];
        let len = unsafe { decode(shift_code(code)?, buf.as_mut_ptr()) };
        if len < 1 {
            return Err(GmhError::Status {
                code: i16::from(len),
                message: None,
            });
        }

        decode_text(&buf)
    }

    /// Status string of the given channel, e.g. low-battery or sensor-error
    /// conditions.
    pub fn status_message(&self, channel: i16) -> Result<String> {
        let decode = self
            .library
            .fn_get_status_message
            .ok_or(GmhError::NotSupported("GMH_GetStatusMessage"))?;

        let code = self.transmit(channel, ffi::REQUEST_GET_STATUS)?.int_value;

        let mut buf = [0 as c_char; ffi::MESSAGE_TEXT_CAP];
        unsafe { decode(shift_code(code)?, buf.as_mut_ptr()) };

        decode_text(&buf)
    }
}

impl Drop for GmhSession<'_> {
    fn drop(&mut self) {
        let status = unsafe { (self.library.fn_close_com)() };
        if ffi::is_success(status) {
            log::debug!("closed GMH session on COM port {}", self.port);
        } else {
            log::error!(
                "GMH_CloseCom failed for COM port {} (status {status})",
                self.port
            );
        }
    }
}

/// Shift a raw device code by the English language offset, rejecting codes
/// that cannot survive the i16 round trip.
fn shift_code(code: i32) -> Result<i16> {
    let narrowed = i16::try_from(code)
        .map_err(|_| GmhError::Parse(format!("device code {code} out of i16 range")))?;
    Ok(narrowed.wrapping_add(ffi::LANGUAGE_OFFSET_ENGLISH))
}
