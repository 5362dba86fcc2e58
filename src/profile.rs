//! Panel profiles
//!
//! A profile describes everything that differs between panels built on the
//! SSD1677: geometry, how RAM is addressed, and the command tables for
//! initialization, refresh and deep sleep. The driver interprets the tables;
//! the addressing and clipping logic is shared by every profile.

use crate::command::{
    BOOSTER_SOFT_START, BORDER_WAVEFORM, CTRL1_BYPASS_RED, DEEP_SLEEP, DISPLAY_UPDATE_CTRL1,
    DISPLAY_UPDATE_CTRL2, ENTRY_X_INC_Y_DEC, SOFT_RESET, TEMP_SENSOR_CONTROL, WRITE_TEMP,
};
use crate::config::RamXAddressing;

/// One entry of a profile command table
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Send a command byte followed by its arguments
    Write {
        /// Command byte
        command: u8,
        /// Argument bytes (may be empty)
        data: &'static [u8],
    },
    /// Wait a fixed time
    Delay {
        /// Milliseconds
        ms: u32,
    },
    /// Driver output control with the gate count taken from the panel height
    DriverOutputControl {
        /// Scanning mode byte
        scanning: u8,
    },
    /// Set the RAM window to cover the whole panel
    FullWindow,
}

impl Step {
    /// Command write step
    pub const fn write(command: u8, data: &'static [u8]) -> Self {
        Self::Write { command, data }
    }
}

/// Expected controller timings, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelTiming {
    /// Typical duration of the full waveform
    pub full_refresh_ms: u32,
    /// Typical duration of the partial waveform
    pub partial_refresh_ms: u32,
    /// Settle time after the deep sleep command
    pub hibernate_settle_ms: u32,
}

/// Static description of a panel variant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelProfile {
    /// Panel model name, used in log output
    pub name: &'static str,
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
    /// Unit of the RAM X address arguments
    pub ram_x_addressing: RamXAddressing,
    /// Data entry mode byte sent before every window
    pub data_entry_mode: u8,
    /// Gates are wired bottom-to-top, so RAM rows run opposite to panel rows
    pub gates_reversed: bool,
    /// Register initialization after power-up or wake
    pub init: &'static [Step],
    /// Full waveform, measured temperature
    pub full_refresh: &'static [Step],
    /// Full waveform with a forced temperature
    pub fast_full_refresh: &'static [Step],
    /// Partial (differential) waveform
    pub partial_refresh: &'static [Step],
    /// Enter deep sleep
    pub deep_sleep: &'static [Step],
    /// Expected durations
    pub timing: PanelTiming,
}

/// Good Display GDEQ0426T82, 4.26" 800x480 black/white
///
/// The gates of this panel are reversed but the controller has no reverse gate
/// scan, so RAM is filled with Y decrementing instead.
pub const GDEQ0426T82: PanelProfile = PanelProfile {
    name: "GDEQ0426T82",
    width: 800,
    height: 480,
    ram_x_addressing: RamXAddressing::Pixels,
    data_entry_mode: ENTRY_X_INC_Y_DEC,
    gates_reversed: true,
    init: &[
        Step::Delay { ms: 10 },
        Step::write(SOFT_RESET, &[]),
        Step::Delay { ms: 10 },
        Step::write(TEMP_SENSOR_CONTROL, &[0x80]),
        Step::write(BOOSTER_SOFT_START, &[0xAE, 0xC7, 0xC3, 0xC0, 0x80]),
        Step::DriverOutputControl { scanning: 0x02 },
        Step::write(BORDER_WAVEFORM, &[0x01]),
        Step::write(DISPLAY_UPDATE_CTRL1, &[CTRL1_BYPASS_RED]),
        Step::FullWindow,
    ],
    full_refresh: &[Step::write(DISPLAY_UPDATE_CTRL2, &[0xF7])],
    // 0x5A = 90 degC selects the shortest full waveform
    fast_full_refresh: &[
        Step::write(WRITE_TEMP, &[0x5A]),
        Step::write(DISPLAY_UPDATE_CTRL2, &[0xD7]),
    ],
    partial_refresh: &[Step::write(DISPLAY_UPDATE_CTRL2, &[0xFF])],
    deep_sleep: &[Step::write(DEEP_SLEEP, &[0x03])],
    timing: PanelTiming {
        full_refresh_ms: 1600,
        partial_refresh_ms: 600,
        hibernate_settle_ms: 100,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MASTER_ACTIVATION;

    fn writes(steps: &[Step]) -> impl Iterator<Item = (u8, &'static [u8])> + '_ {
        steps.iter().filter_map(|step| match step {
            Step::Write { command, data } => Some((*command, *data)),
            _ => None,
        })
    }

    #[test]
    fn test_init_starts_with_soft_reset() {
        let first = writes(GDEQ0426T82.init).next();
        assert_eq!(first, Some((SOFT_RESET, &[][..])));
    }

    #[test]
    fn test_init_ends_with_full_window() {
        assert_eq!(GDEQ0426T82.init.last(), Some(&Step::FullWindow));
    }

    #[test]
    fn test_refresh_tables_never_trigger_themselves() {
        for table in [
            GDEQ0426T82.full_refresh,
            GDEQ0426T82.fast_full_refresh,
            GDEQ0426T82.partial_refresh,
        ] {
            assert!(writes(table).all(|(command, _)| command != MASTER_ACTIVATION));
        }
    }

    #[test]
    fn test_update_sequences_power_down_after_waveform() {
        for table in [
            GDEQ0426T82.full_refresh,
            GDEQ0426T82.fast_full_refresh,
            GDEQ0426T82.partial_refresh,
        ] {
            let ctrl2 = writes(table)
                .find(|(command, _)| *command == DISPLAY_UPDATE_CTRL2)
                .map(|(_, data)| data[0]);
            // disable analog + disable clock
            assert_eq!(ctrl2.map(|value| value & 0x03), Some(0x03));
        }
    }
}
