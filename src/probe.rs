// SPDX-License-Identifier: Apache-2.0
//! Instrument capability probing.
//!
//! GMH handhelds expose between 1 and 99 measurement channels, and which
//! physical quantity each channel carries depends on the attached probe.
//! [`SensorInfo::query`] walks the channels once and records what the
//! instrument can actually measure, so callers can address channels by
//! quantity instead of by magic number.

use crate::error::Result;
use crate::session::GmhSession;

/// One usable measurement channel of an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    /// Channel number the quantity is read from.
    pub channel: i16,
    /// Decoded measurement quantity, e.g. `"Temperature"`.
    pub quantity: String,
    /// Measurement unit, e.g. `"°C"`; `None` when the library cannot decode
    /// units.
    pub unit: Option<String>,
}

/// Measurement capabilities of a connected instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorInfo {
    pub channels: Vec<ChannelInfo>,
}

impl SensorInfo {
    /// Interrogate the instrument on an open session.
    ///
    /// Channels that do not answer a value read are skipped, not errors —
    /// sparse channel numbering is normal for multi-probe instruments.
    pub fn query(session: &GmhSession<'_>) -> Result<Self> {
        let count = session.channel_count()?;
        let mut channels = Vec::new();

        let last = i16::try_from(count.clamp(0, 99)).unwrap_or(99);
        for channel in 1..=last {
            if session.display_value(channel).is_err() {
                log::debug!("channel {channel}: no readable value, skipping");
                continue;
            }

            let code = session.measurement_code(channel)?;
            let quantity = session.measurement_description(code)?;
            let unit = session.unit(channel).ok();

            log::debug!(
                "channel {channel}: {quantity} [{}]",
                unit.as_deref().unwrap_or("?")
            );

            channels.push(ChannelInfo {
                channel,
                quantity,
                unit,
            });
        }

        Ok(Self { channels })
    }

    /// Look up the channel carrying a given quantity, by decoded label.
    pub fn channel_for(&self, quantity: &str) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.quantity == quantity)
    }
}
