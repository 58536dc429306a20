// SPDX-License-Identifier: Apache-2.0
//! # gmh3x
//!
//! Client for Greisinger GMH handheld measurement instruments (humidity,
//! temperature, pressure meters connected through a 3100N serial adapter
//! cable) via the closed-source vendor library `GMH3x32E`.
//!
//! All protocol logic, serial communication and measurement decoding live
//! inside the vendor library; this crate owns the loading and binding of its
//! entry points and wraps the C-style status-code API in typed, RAII-managed
//! Rust:
//!
//! ```text
//!                ┌─────────────────────┐
//!                │     application     │
//!                └──────────┬──────────┘
//!                ┌──────────┴──────────┐
//!                │       gmh3x         │
//!                │                     │
//!                │  GmhLibrary         │ ← dlopen + fail-fast dlsym
//!                │  GmhSession         │ ← RAII COM-port open/close
//!                │  SensorInfo         │ ← per-channel capability walk
//!                │  report::run_*      │ ← best-effort demo sequence
//!                └──────────┬──────────┘
//!                           │ C ABI (extern "system")
//!                ┌──────────┴──────────┐
//!                │   GMH3x32E.dll/.so  │
//!                └─────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gmh3x::{GmhLibrary, GmhSession, SensorInfo, library::default_library_path};
//!
//! let library = GmhLibrary::load(default_library_path())?;
//! println!("library version {}", library.version_number());
//!
//! let session = GmhSession::open(&library, 1)?;
//! let info = SensorInfo::query(&session)?;
//! for ch in &info.channels {
//!     println!(
//!         "channel {}: {} = {} {}",
//!         ch.channel,
//!         ch.quantity,
//!         session.display_value(ch.channel)?,
//!         ch.unit.as_deref().unwrap_or(""),
//!     );
//! }
//! # Ok::<(), gmh3x::GmhError>(())
//! ```
//!
//! The COM port closes when the session drops; the library handle is
//! released when `GmhLibrary` drops, after every session borrowing it.

pub mod error;
pub mod ffi;
pub mod library;
pub mod probe;
pub mod report;
pub mod session;

// Re-export the most commonly used types at crate root.
pub use error::GmhError;
pub use library::GmhLibrary;
pub use probe::{ChannelInfo, SensorInfo};
pub use report::{Instrument, Report};
pub use session::{GmhSession, Transmission};
