// SPDX-License-Identifier: Apache-2.0
//! Raw FFI constants and type definitions for the vendor GMH3x32E library.
//!
//! These match the function typedefs shipped with Greisinger's `UseDLL`
//! example (`UseDLL.h`). The library exposes a handful of flat C entry points:
//!
//! ```text
//! GMH_OpenCom
//! GMH_CloseCom
//! GMH_Transmit
//! GMH_GetVersionNumber
//! GMH_GetMeasurement
//! GMH_GetErrorMessageRet      (decode helper, not on every release)
//! GMH_GetUnit
//! GMH_GetType
//! GMH_GetStatusMessage
//! ```
//!
//! All function pointers are resolved at runtime from the vendor shared
//! library; nothing here links statically. The vendor DLL uses stdcall on
//! Windows and plain cdecl elsewhere, which is exactly what `extern "system"`
//! selects.

use std::os::raw::c_char;

// ===========================================================================
// Status conventions
// ===========================================================================

/// Returns `true` if a GMH return code indicates success.
///
/// The vendor API signals errors with negative values only; any non-negative
/// status (including informational positives) is success.
#[inline]
pub fn is_success(code: i16) -> bool {
    code >= 0
}

/// Language offset added to raw device codes before handing them to the text
/// decode helpers (`GMH_GetMeasurement`, `GMH_GetUnit`, ...). 4096 selects
/// the English message tables.
pub const LANGUAGE_OFFSET_ENGLISH: i16 = 4096;

// ===========================================================================
// Transmit request codes (GMH_Transmit)
// ===========================================================================

/// Request code type for [`FnTransmit`]. Meanings are defined by the vendor
/// protocol documentation; the constants below are the useful subset.
pub type GmhRequest = i16;

pub const REQUEST_GET_VALUE: GmhRequest = 0;
pub const REQUEST_GET_STATUS: GmhRequest = 3;
pub const REQUEST_GET_TYPE_CODE: GmhRequest = 12;
pub const REQUEST_GET_MIN_RANGE: GmhRequest = 176;
pub const REQUEST_GET_MAX_RANGE: GmhRequest = 177;
pub const REQUEST_GET_UNIT_CODE: GmhRequest = 178;
pub const REQUEST_GET_MEAS_CODE: GmhRequest = 180;
pub const REQUEST_GET_DISP_MIN_RANGE: GmhRequest = 200;
pub const REQUEST_GET_DISP_MAX_RANGE: GmhRequest = 201;
pub const REQUEST_GET_DISP_UNIT_CODE: GmhRequest = 202;
pub const REQUEST_GET_DISP_DEC_POINT: GmhRequest = 204;
pub const REQUEST_GET_CHANNEL_COUNT: GmhRequest = 208;
pub const REQUEST_GET_POWER_OFF_TIME: GmhRequest = 222;
pub const REQUEST_SET_POWER_OFF_TIME: GmhRequest = 223;
pub const REQUEST_GET_SOFTWARE_INFO: GmhRequest = 254;

// ===========================================================================
// Text buffer capacities
// ===========================================================================
//
// The vendor writes NUL-terminated Latin-1 strings into caller-allocated
// buffers. Capacities follow the vendor's own wrapper code; the decode path
// rejects any buffer that comes back without a NUL instead of reading past
// the end.

/// Capacity for measurement-type and instrument-type labels.
pub const MEASUREMENT_TEXT_CAP: usize = 30;

/// Capacity for error and status message strings.
pub const MESSAGE_TEXT_CAP: usize = 70;

/// Capacity for measurement unit strings.
pub const UNIT_TEXT_CAP: usize = 10;

// ===========================================================================
// Function pointer types — GMH3x32E entry points
// ===========================================================================

/// `short GMH_OpenCom(short port)` — open the COM port for a 3100N adapter
/// cable. Only one port can be open per process.
pub type FnOpenCom = unsafe extern "system" fn(port: i16) -> i16;

/// `short GMH_CloseCom(void)` — close the open COM port.
pub type FnCloseCom = unsafe extern "system" fn() -> i16;

/// `short GMH_Transmit(short chan, short code, short *prio, double *flt, long *intval)`
///
/// Generic read/write primitive keyed by request code. Depending on the code,
/// the result lands in the float slot, the integer slot, or both; for the
/// `Set*` codes the integer slot is an input.
pub type FnTransmit = unsafe extern "system" fn(
    chan: i16,
    code: GmhRequest,
    priority: *mut i16,
    float_value: *mut f64,
    int_value: *mut i32,
) -> i16;

/// `short GMH_GetVersionNumber(void)` — version of the library itself,
/// returned directly as the status value.
pub type FnGetVersionNumber = unsafe extern "system" fn() -> i16;

/// `char GMH_GetMeasurement(short code, char *text)` — decode a
/// language-shifted measurement-type code into a label. Returns the string
/// length; values below 1 indicate failure.
pub type FnGetMeasurement = unsafe extern "system" fn(code: i16, text: *mut c_char) -> c_char;

/// `short GMH_GetErrorMessageRet(short code, char *text)` — translate a
/// language-shifted return code into a message string.
pub type FnGetErrorMessage = unsafe extern "system" fn(code: i16, text: *mut c_char) -> i16;

/// `char GMH_GetUnit(short code, char *text)` — decode a language-shifted
/// unit code into a unit string (e.g. `°C`).
pub type FnGetUnit = unsafe extern "system" fn(code: i16, text: *mut c_char) -> c_char;

/// `char GMH_GetType(short code, char *text)` — decode a language-shifted
/// instrument-type code into a type label.
pub type FnGetType = unsafe extern "system" fn(code: i16, text: *mut c_char) -> c_char;

/// `short GMH_GetStatusMessage(short code, char *text)` — decode a
/// language-shifted status code into a status string.
pub type FnGetStatusMessage = unsafe extern "system" fn(code: i16, text: *mut c_char) -> i16;
