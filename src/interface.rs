//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the SSD1677 over SPI.
//!
//! ## Hardware Requirements
//!
//! - SPI bus with chip select managed by the [`SpiDevice`] (one CS-scoped
//!   transaction per command or data burst)
//! - **DC**: Data/Command select (output)
//! - **RST**: Reset (output, active low), optional
//! - **BUSY**: Busy status (input, active high)
//!
//! Long waits go through [`DelayNs`] one millisecond at a time. On an RTOS or
//! async executor the delay implementation is where the host scheduler and its
//! watchdog get to run, so it must not be a pure spin.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd_ssd1677::{BusyWait, DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! let _ = interface.send_command(0x12); // Soft reset
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//!
//! if let Ok(BusyWait::TimedOut { waited_ms }) = interface.busy_wait(&mut delay, 1_000) {
//!     let _ = waited_ms;
//! }
//! ```

use core::convert::Infallible;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Default reset pulse width in milliseconds
pub const DEFAULT_RESET_DURATION_MS: u32 = 10;

/// Outcome of waiting for the BUSY line
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusyWait {
    /// BUSY deasserted
    Idle {
        /// Approximate time spent waiting
        elapsed_ms: u32,
    },
    /// BUSY was still asserted when the timeout ran out
    TimedOut {
        /// Time spent waiting
        waited_ms: u32,
    },
}

/// Trait for hardware interface to SSD1677 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// For most cases, use the provided [`Interface`] struct.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes (DC high) as one chip-select burst
    ///
    /// Consecutive calls keep feeding the last command; the controller's address
    /// counter carries on across bursts.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Pulse the reset line
    ///
    /// Does nothing when no reset line is wired.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Whether [`reset`](Self::reset) actually drives a pin
    ///
    /// Deep sleep can only be left through a hardware reset, so the driver
    /// refuses to hibernate without one.
    fn has_reset(&self) -> bool {
        true
    }

    /// Poll BUSY until it deasserts or `timeout_ms` elapses
    ///
    /// A timeout is reported as [`BusyWait::TimedOut`], not as an error: the
    /// controller has no status register, so callers decide how to proceed.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the pin fails.
    fn busy_wait<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> InterfaceResult<BusyWait, Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Placeholder for boards without a reset line
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReset;

impl ErrorType for NoReset {
    type Error = Infallible;
}

impl OutputPin for NoReset {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Hardware interface implementation for SSD1677
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`], or [`NoReset`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
///
/// ## Example
///
/// ```rust,no_run
/// use epd_ssd1677::{Builder, Display, Interface, GDEQ0426T82};
/// # use core::convert::Infallible;
/// # use embedded_hal::digital::{InputPin, OutputPin};
/// # use embedded_hal::spi::{Operation, SpiDevice};
/// # struct MockSpi;
/// # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
/// # impl SpiDevice for MockSpi {
/// #     fn transaction(
/// #         &mut self,
/// #         _operations: &mut [Operation<'_, u8>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl InputPin for MockPin {
/// #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
/// #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
/// # }
/// let mut interface = Interface::new(
///     MockSpi,  // SpiDevice
///     MockPin,  // DC
///     MockPin,  // RST
///     MockPin,  // BUSY
/// );
/// interface.set_reset_duration(20);
///
/// # let config = match Builder::new().panel(GDEQ0426T82).build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let _display = Display::new(interface, config);
/// ```
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin
    busy: BUSY,
    /// Whether `rst` is wired to the panel
    reset_wired: bool,
    /// Low phase of the reset pulse in milliseconds
    reset_duration_ms: u32,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface with a reset line
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            reset_wired: true,
            reset_duration_ms: DEFAULT_RESET_DURATION_MS,
            busy_active_high: true,
        }
    }

    /// Set the low phase of the reset pulse
    ///
    /// Default is 10ms. Some boards with slow reset circuitry need 20ms.
    pub fn set_reset_duration(&mut self, duration_ms: u32) -> &mut Self {
        self.reset_duration_ms = duration_ms;
        self
    }

    /// Get the low phase of the reset pulse in milliseconds
    pub fn reset_duration(&self) -> u32 {
        self.reset_duration_ms
    }

    /// Set busy pin polarity
    ///
    /// Default is active-high. Set to false for active-low panels.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, BUSY> Interface<SPI, DC, NoReset, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    BUSY: InputPin,
{
    /// Create an Interface for a board without a reset line
    ///
    /// Hibernation is unavailable with such an interface.
    pub fn new_without_reset(spi: SPI, dc: DC, busy: BUSY) -> Self {
        let mut interface = Self::new(spi, dc, NoReset, busy);
        interface.reset_wired = false;
        interface
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        if !self.reset_wired {
            return;
        }
        // HIGH -> 10ms -> LOW for the pulse width -> HIGH -> settle
        let _ = self.rst.set_high();
        delay.delay_ms(10);
        let _ = self.rst.set_low();
        delay.delay_ms(self.reset_duration_ms);
        let _ = self.rst.set_high();
        delay.delay_ms(self.reset_duration_ms.max(10));
    }

    fn has_reset(&self) -> bool {
        self.reset_wired
    }

    fn busy_wait<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> InterfaceResult<BusyWait, Self::Error> {
        let mut elapsed_ms = 0u32;

        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            }
            .map_err(InterfaceError::Pin)?;

            if !is_busy {
                return Ok(BusyWait::Idle { elapsed_ms });
            }
            if elapsed_ms >= timeout_ms {
                return Ok(BusyWait::TimedOut {
                    waited_ms: elapsed_ms,
                });
            }

            delay.delay_ms(1);
            elapsed_ms += 1;
        }
    }
}
