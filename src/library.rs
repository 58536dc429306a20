// SPDX-License-Identifier: Apache-2.0
//! Load the vendor GMH shared library and resolve its entry points.
//!
//! Greisinger ships the instrument protocol as a closed-source library
//! (`GMH3x32E.dll` on Windows). This module handles the `dlopen` + `dlsym`
//! dance: the five core entry points are resolved eagerly and fail-fast, the
//! text decode helpers are resolved opportunistically since not every
//! release of the vendor library exports them.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::Path;

use libloading::{Library, Symbol};

use crate::error::{GmhError, Result};
use crate::ffi;

/// Fixed install location of the vendor library on the platform it actually
/// ships for. On other platforms a bare SONAME is returned so the dynamic
/// linker performs its normal search (useful for stand-in libraries).
pub fn default_library_path() -> &'static Path {
    if cfg!(windows) {
        Path::new("C:\\Windows\\System32\\GMH3x32E.dll")
    } else {
        Path::new("libGMH3x32E.so")
    }
}

/// A loaded GMH vendor library with all entry points resolved.
///
/// The library handle is kept alive for the lifetime of this struct so the
/// shared object is not unloaded while we still hold function pointers into
/// it; dropping the struct releases the handle exactly once.
pub struct GmhLibrary {
    /// Prevent the shared library from being unloaded.
    _library: Library,

    /// Path the library was loaded from (for diagnostics).
    library_path: String,

    // -- Core entry points (required) ---------------------------------------
    pub(crate) fn_open_com: ffi::FnOpenCom,
    pub(crate) fn_close_com: ffi::FnCloseCom,
    pub(crate) fn_transmit: ffi::FnTransmit,
    pub(crate) fn_get_version_number: ffi::FnGetVersionNumber,
    pub(crate) fn_get_measurement: ffi::FnGetMeasurement,

    // -- Text decode helpers (optional — not on every vendor release) -------
    pub(crate) fn_get_error_message: Option<ffi::FnGetErrorMessage>,
    pub(crate) fn_get_unit: Option<ffi::FnGetUnit>,
    pub(crate) fn_get_type: Option<ffi::FnGetType>,
    pub(crate) fn_get_status_message: Option<ffi::FnGetStatusMessage>,
}

impl GmhLibrary {
    /// Load the GMH vendor library and resolve all entry points.
    ///
    /// # Errors
    ///
    /// Returns [`GmhError::LoadFailed`] if the library cannot be loaded, or
    /// [`GmhError::SymbolNotFound`] if one of the five core entry points is
    /// missing. Absent decode helpers are not load errors; the corresponding
    /// calls fail later with [`GmhError::NotSupported`].
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();

        // SAFETY: we are loading an external shared library. The caller is
        // responsible for ensuring the library is trustworthy.
        let library = unsafe { Library::new(path) }.map_err(|e| GmhError::LoadFailed {
            path: path_str.clone(),
            cause: e.to_string(),
        })?;

        log::info!("loaded GMH library '{path_str}'");

        let fn_open_com = resolve_required::<ffi::FnOpenCom>(&library, "GMH_OpenCom")?;
        let fn_close_com = resolve_required::<ffi::FnCloseCom>(&library, "GMH_CloseCom")?;
        let fn_transmit = resolve_required::<ffi::FnTransmit>(&library, "GMH_Transmit")?;
        let fn_get_version_number =
            resolve_required::<ffi::FnGetVersionNumber>(&library, "GMH_GetVersionNumber")?;
        let fn_get_measurement =
            resolve_required::<ffi::FnGetMeasurement>(&library, "GMH_GetMeasurement")?;

        let fn_get_error_message =
            resolve_optional::<ffi::FnGetErrorMessage>(&library, "GMH_GetErrorMessageRet");
        let fn_get_unit = resolve_optional::<ffi::FnGetUnit>(&library, "GMH_GetUnit");
        let fn_get_type = resolve_optional::<ffi::FnGetType>(&library, "GMH_GetType");
        let fn_get_status_message =
            resolve_optional::<ffi::FnGetStatusMessage>(&library, "GMH_GetStatusMessage");

        if fn_get_error_message.is_none() {
            log::warn!("GMH library at '{path_str}' does not export message translation");
        }

        Ok(Self {
            _library: library,
            library_path: path_str,
            fn_open_com,
            fn_close_com,
            fn_transmit,
            fn_get_version_number,
            fn_get_measurement,
            fn_get_error_message,
            fn_get_unit,
            fn_get_type,
            fn_get_status_message,
        })
    }

    /// Filesystem path the library was loaded from.
    pub fn library_path(&self) -> &str {
        &self.library_path
    }

    /// Version number of the vendor library itself. Does not require an open
    /// COM port. Negative values are vendor error codes.
    pub fn version_number(&self) -> i16 {
        unsafe { (self.fn_get_version_number)() }
    }

    /// Whether the library can translate return codes into message strings.
    pub fn supports_message_translation(&self) -> bool {
        self.fn_get_error_message.is_some()
    }

    /// Translate a raw return code into the vendor's English message string.
    ///
    /// Returns `None` when the library does not export the translation
    /// helper or the message fails to decode.
    pub fn error_message(&self, code: i16) -> Option<String> {
        let translate = self.fn_get_error_message?;
        let mut buf = [0 as c_char; ffi::MESSAGE_TEXT_CAP];
        let shifted = code.wrapping_add(ffi::LANGUAGE_OFFSET_ENGLISH);
        unsafe { translate(shifted, buf.as_mut_ptr()) };
        decode_text(&buf).ok().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for GmhLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmhLibrary")
            .field("library_path", &self.library_path)
            .field(
                "supports_message_translation",
                &self.supports_message_translation(),
            )
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Symbol resolution helpers
// ---------------------------------------------------------------------------

/// Resolve a required symbol. Returns an error if the symbol is missing.
fn resolve_required<T: Copy>(library: &Library, name: &str) -> Result<T> {
    log::trace!("resolving required symbol '{name}'");

    // SAFETY: The caller guarantees the type `T` matches the actual function
    // signature exported by the library. This is the core FFI contract.
    unsafe {
        let sym: Symbol<T> = library
            .get(name.as_bytes())
            .map_err(|e| GmhError::SymbolNotFound {
                symbol: name.to_string(),
                cause: e.to_string(),
            })?;
        Ok(*sym)
    }
}

/// Resolve an optional symbol. Returns `None` if the symbol is missing.
fn resolve_optional<T: Copy>(library: &Library, name: &str) -> Option<T> {
    log::trace!("resolving optional symbol '{name}'");

    unsafe { library.get::<T>(name.as_bytes()).ok().map(|s| *s) }
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

/// Decode a NUL-terminated Latin-1 string the vendor wrote into a bounded
/// buffer. A buffer with no NUL means the vendor overran (or never wrote)
/// the buffer and is rejected rather than read past the end.
pub(crate) fn decode_text(buf: &[c_char]) -> Result<String> {
    // c_char is i8 or u8 depending on platform; view as bytes either way.
    let bytes: &[u8] = unsafe { std::slice::from_raw_parts(buf.as_ptr().cast(), buf.len()) };

    let c_str = CStr::from_bytes_until_nul(bytes)
        .map_err(|_| GmhError::Parse("text buffer is not NUL-terminated".into()))?;

    // GMH strings are ISO-8859-1: each byte maps directly to the code point.
    Ok(c_str.to_bytes().iter().map(|&b| char::from(b)).collect())
}
