//! SSD1677 command bytes used by the panel profiles
//!
//! Every command is a single byte sent with DC low, optionally followed by
//! argument bytes sent with DC high. Multi-byte coordinates are little-endian
//! (low byte first).
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd_ssd1677::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! // Select the built-in temperature sensor
//! let _ = interface.send_command(command::TEMP_SENSOR_CONTROL);
//! let _ = interface.send_data(&[0x80]);
//! ```

// System control

/// Soft reset (0x12)
///
/// Restores register defaults. The controller needs ~10ms before the next command.
pub const SOFT_RESET: u8 = 0x12;

/// Driver output control (0x01)
///
/// Arguments: `[gates-1 LSB, gates-1 MSB, scanning mode]`
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Booster soft-start control (0x0C)
///
/// Arguments: 5 bytes of phase timing.
pub const BOOSTER_SOFT_START: u8 = 0x0C;

/// Deep sleep mode (0x10)
///
/// Argument: `0x01` keeps RAM, `0x03` drops RAM. Only a hardware reset wakes the
/// controller again.
pub const DEEP_SLEEP: u8 = 0x10;

/// Temperature sensor selection (0x18)
///
/// Argument: `0x80` selects the built-in sensor.
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

/// Write temperature register (0x1A)
///
/// Forces a temperature value instead of measuring it. The fast full update
/// writes a fixed high value here so the controller picks its shortest
/// waveform.
pub const WRITE_TEMP: u8 = 0x1A;

/// Border waveform control (0x3C)
///
/// Argument: `0x00` black, `0x01` white, `0xC0` HiZ.
pub const BORDER_WAVEFORM: u8 = 0x3C;

// RAM addressing

/// Data entry mode (0x11)
///
/// Argument bits:
/// - bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - bit 1 (ID1): Y direction (0=decrement, 1=increment)
/// - bit 2 (AM): counter advances along X (0) or Y (1) first
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// X increment, Y decrement, X first
pub const ENTRY_X_INC_Y_DEC: u8 = 0x01;

/// X increment, Y increment, X first
pub const ENTRY_X_INC_Y_INC: u8 = 0x03;

/// Set RAM X start/end (0x44)
///
/// Arguments: `[start LSB, start MSB, end LSB, end MSB]`
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y start/end (0x45)
///
/// Arguments: `[start LSB, start MSB, end LSB, end MSB]`
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter (0x4E)
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter (0x4F)
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write black/white RAM (0x24)
///
/// Bit=0 black, bit=1 white. Bytes land at the address counter, which advances
/// inside the current window.
pub const WRITE_RAM_BW: u8 = 0x24;

// Display update

/// Master activation (0x20)
///
/// Runs the sequence selected with [`DISPLAY_UPDATE_CTRL2`]. BUSY stays high
/// until the waveform completes.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Display update control 1 (0x21)
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Display update control 2 (0x22)
///
/// Argument bit flags:
/// - 0x80: enable clock
/// - 0x40: enable analog
/// - 0x20: load temperature
/// - 0x10: load LUT
/// - 0x08: display mode 2
/// - 0x04: display
/// - 0x02: disable analog
/// - 0x01: disable clock
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Treat RED RAM as 0 during updates (argument for [`DISPLAY_UPDATE_CTRL1`])
///
/// The panel is monochrome so only BW RAM takes part in the waveform.
pub const CTRL1_BYPASS_RED: u8 = 0x40;
