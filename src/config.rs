//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};
use crate::profile::PanelProfile;

/// Default busy-wait bound for a full refresh
pub const DEFAULT_FULL_REFRESH_TIMEOUT_MS: u32 = 10_000;

/// Default busy-wait bound for a partial refresh
pub const DEFAULT_PARTIAL_REFRESH_TIMEOUT_MS: u32 = 5_000;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows > MAX_GATE_OUTPUTS
    /// - cols > MAX_SOURCE_OUTPUTS
    /// - cols % 8 != 0 (must be byte-aligned for memory)
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS || !cols.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Bytes per row of 1-bit pixels
    pub fn row_bytes(&self) -> usize {
        self.cols as usize / 8
    }

    /// Size of a full-frame 1-bit buffer in bytes
    pub fn buffer_size(&self) -> usize {
        self.row_bytes() * self.rows as usize
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// RAM X address unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RamXAddressing {
    /// X address is in pixels
    #[default]
    Pixels,
    /// X address is in bytes (pixel / 8)
    Bytes,
}

/// Display configuration
///
/// Combines a [`PanelProfile`] with the runtime options of the driver.
/// Use [`Builder`] to create one.
#[derive(Clone, Debug)]
pub struct Config {
    /// Command tables and geometry of the panel
    pub panel: PanelProfile,
    /// Validated panel dimensions
    pub dimensions: Dimensions,
    /// Rotation applied by the graphics canvas
    pub rotation: Rotation,
    /// Use the fixed-temperature full waveform instead of the measured one
    pub fast_full_update: bool,
    /// Busy-wait bound after a full refresh trigger
    pub full_refresh_timeout_ms: u32,
    /// Busy-wait bound after a partial refresh trigger
    pub partial_refresh_timeout_ms: u32,
    /// Fill value for the automatic blanking before the first write
    pub clear_value: u8,
}

impl Config {
    /// Get the rotated dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => self.dimensions,
            Rotation::Rotate90 | Rotation::Rotate270 => Dimensions {
                rows: self.dimensions.cols,
                cols: self.dimensions.rows,
            },
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use epd_ssd1677::{Builder, Rotation, GDEQ0426T82};
///
/// let config = match Builder::new()
///     .panel(GDEQ0426T82)
///     .rotation(Rotation::Rotate270)
///     .fast_full_update(false)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.dimensions.cols, 800);
/// ```
#[must_use]
pub struct Builder {
    /// Panel profile (required)
    panel: Option<PanelProfile>,
    /// Display rotation
    rotation: Rotation,
    /// Fixed-temperature full waveform
    fast_full_update: bool,
    /// Full refresh busy bound
    full_refresh_timeout_ms: u32,
    /// Partial refresh busy bound
    partial_refresh_timeout_ms: u32,
    /// First-write blanking value
    clear_value: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            panel: None,
            rotation: Rotation::Rotate0,
            // Vendor example code uses the fast full update on this panel family
            fast_full_update: true,
            full_refresh_timeout_ms: DEFAULT_FULL_REFRESH_TIMEOUT_MS,
            partial_refresh_timeout_ms: DEFAULT_PARTIAL_REFRESH_TIMEOUT_MS,
            // White
            clear_value: 0xFF,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the panel profile (required)
    pub fn panel(mut self, panel: PanelProfile) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Trade full-refresh quality for speed by forcing a fixed temperature
    pub fn fast_full_update(mut self, value: bool) -> Self {
        self.fast_full_update = value;
        self
    }

    /// Set the busy-wait bound for full refreshes
    pub fn full_refresh_timeout_ms(mut self, value: u32) -> Self {
        self.full_refresh_timeout_ms = value;
        self
    }

    /// Set the busy-wait bound for partial refreshes
    pub fn partial_refresh_timeout_ms(mut self, value: u32) -> Self {
        self.partial_refresh_timeout_ms = value;
        self
    }

    /// Set the fill value used to blank the panel before the first write
    pub fn clear_value(mut self, value: u8) -> Self {
        self.clear_value = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingPanel` if no panel profile was selected
    /// - `BuilderError::InvalidDimensions` if the profile exceeds controller limits
    /// - `BuilderError::InvalidTimeout` if a refresh timeout is zero
    pub fn build(self) -> Result<Config, BuilderError> {
        let panel = self.panel.ok_or(BuilderError::MissingPanel)?;
        let dimensions = Dimensions::new(panel.height, panel.width)?;
        if self.full_refresh_timeout_ms == 0 || self.partial_refresh_timeout_ms == 0 {
            return Err(BuilderError::InvalidTimeout);
        }
        Ok(Config {
            panel,
            dimensions,
            rotation: self.rotation,
            fast_full_update: self.fast_full_update,
            full_refresh_timeout_ms: self.full_refresh_timeout_ms,
            partial_refresh_timeout_ms: self.partial_refresh_timeout_ms,
            clear_value: self.clear_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GDEQ0426T82;

    #[test]
    fn test_build_without_panel_fails() {
        assert_eq!(Builder::new().build().err(), Some(BuilderError::MissingPanel));
    }

    #[test]
    fn test_build_uses_profile_dimensions() {
        let config = Builder::new().panel(GDEQ0426T82).build().unwrap();
        assert_eq!(config.dimensions, Dimensions { rows: 480, cols: 800 });
        assert_eq!(config.dimensions.buffer_size(), 48_000);
        assert!(config.fast_full_update);
        assert_eq!(config.clear_value, 0xFF);
    }

    #[test]
    fn test_build_rejects_oversized_profile() {
        let mut panel = GDEQ0426T82;
        panel.width = 1024;
        let result = Builder::new().panel(panel).build();
        assert!(matches!(
            result,
            Err(BuilderError::InvalidDimensions { cols: 1024, .. })
        ));
    }

    #[test]
    fn test_build_rejects_zero_timeout() {
        let result = Builder::new()
            .panel(GDEQ0426T82)
            .partial_refresh_timeout_ms(0)
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidTimeout)));
    }

    #[test]
    fn test_dimensions_require_byte_aligned_columns() {
        assert!(Dimensions::new(480, 801).is_err());
        assert!(Dimensions::new(0, 800).is_err());
        assert!(Dimensions::new(680, 960).is_ok());
    }

    #[test]
    fn test_rotated_dimensions_swap_axes() {
        let config = Builder::new()
            .panel(GDEQ0426T82)
            .rotation(Rotation::Rotate90)
            .build()
            .unwrap();
        let rotated = config.rotated_dimensions();
        assert_eq!((rotated.cols, rotated.rows), (480, 800));
    }
}
