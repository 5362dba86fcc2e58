//! SSD1677 E-Paper Panel Driver
//!
//! A driver for monochrome e-paper panels built on the SSD1677 controller,
//! such as the Good Display GDEQ0426T82 (4.26", 800x480).
//!
//! ## Features
//!
//! - `no_std` compatible, no heap use
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Panel variants described as data ([`PanelProfile`])
//! - Rectangle writes with byte snapping, clipping, inversion and mirroring
//! - Full and partial refresh, with the first refresh always full
//! - Deep sleep with automatic wake on the next operation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd_ssd1677::{Builder, Display, Interface, Rect, RefreshMode, WriteOptions, GDEQ0426T82};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let config = match Builder::new().panel(GDEQ0426T82).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.initialize(&mut delay);
//!
//! // A 16x16 icon, 2 bytes per row
//! let icon = [0x00u8; 32];
//! let _ = display.write_rect(&icon, Rect::new(100, 40, 16, 16), WriteOptions::NONE, &mut delay);
//! let _ = display.refresh(RefreshMode::Partial, &mut delay);
//! let _ = display.hibernate(&mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Color type for monochrome e-paper panels
pub mod color;
/// SSD1677 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Panel profiles
pub mod profile;
/// Coordinate rotation utilities
pub mod rotation;
/// Addressing and clipping
pub mod window;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use config::{
    Builder, Config, Dimensions, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS, RamXAddressing, Rotation,
};
pub use display::{DeviceState, Display, RefreshMode};
pub use error::{BuilderError, Error};
pub use interface::InterfaceError;
pub use interface::{BusyWait, DisplayInterface, Interface, NoReset};
pub use profile::{GDEQ0426T82, PanelProfile, PanelTiming, Step};
pub use window::{Rect, Region, SubImage, WriteOptions};

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
