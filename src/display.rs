//! Core display operations
//!
//! [`Display`] owns the interface and tracks the controller state. Writes go
//! to controller RAM and stay invisible until [`Display::refresh`] runs a
//! waveform.
//!
//! The controller needs a full waveform after power-up before a partial one
//! gives defined results, so the first refresh is always full whatever mode
//! the caller asks for. Writing before initialization is not an error either:
//! the first write initializes the controller and blanks the panel.

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

use crate::command::{
    DATA_ENTRY_MODE, DRIVER_OUTPUT_CONTROL, MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE,
    SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, WRITE_RAM_BW,
};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::{Error, MAX_SOURCE_OUTPUTS};
use crate::interface::{BusyWait, DisplayInterface};
use crate::profile::Step;
use crate::window::{self, Rect, Region, SubImage, Transfer, WriteOptions};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Widest row the controller can take, in bytes
const ROW_BUFFER_SIZE: usize = MAX_SOURCE_OUTPUTS as usize / 8;

/// Refresh mode for display updates
///
/// Both modes redraw the whole panel; they differ in waveform only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RefreshMode {
    /// Full waveform (slow, flashes, clears ghosting)
    ///
    /// Uses the fixed-temperature variant when
    /// [`Config::fast_full_update`] is set.
    #[default]
    Full,
    /// Differential waveform (fast, may leave ghosting)
    ///
    /// Only honoured once a full refresh has run since power-up.
    Partial,
}

/// Controller state as tracked by the driver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceState {
    /// Register initialization has run since power-up or wake
    pub init_done: bool,
    /// Deep sleep entered; only a hardware reset wakes the controller
    pub hibernating: bool,
    /// A waveform is running and the analog supplies are up
    pub power_on: bool,
    /// No write has happened yet, so the next one blanks the panel first
    pub initial_write: bool,
    /// No full refresh has happened yet, so the next refresh is forced full
    pub initial_refresh: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            init_done: false,
            hibernating: false,
            power_on: false,
            initial_write: true,
            initial_refresh: true,
        }
    }
}

/// Core display driver for SSD1677
///
/// This struct provides low-level operations for the SSD1677 controller.
/// For graphics support, use `GraphicDisplay` (requires `graphics` feature).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Refresh state machine flags
    state: DeviceState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent to the controller until the first operation.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: DeviceState::default(),
        }
    }

    /// Pulse the reset line and initialize the controller
    ///
    /// The first-write and first-refresh bookkeeping is kept: a reset does
    /// not clear the panel, so the image on it is still known.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        debug!("{}: hardware reset", self.config.panel.name);
        self.interface.reset(delay);
        self.state.hibernating = false;
        self.state.init_done = false;
        self.initialize(delay)
    }

    /// Initialize the controller if it is not already
    ///
    /// Wakes it with a reset pulse first when it is hibernating. Calling this
    /// on an initialized controller sends nothing.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.state.init_done {
            return Ok(());
        }
        if self.state.hibernating {
            debug!("{}: waking from deep sleep", self.config.panel.name);
            self.interface.reset(delay);
            self.state.hibernating = false;
        }

        self.run_steps(self.config.panel.init, delay)?;
        self.state.init_done = true;
        self.state.power_on = false;
        debug!("{}: initialized", self.config.panel.name);
        Ok(())
    }

    /// Fill the whole controller RAM with `value`
    ///
    /// Nothing changes on the panel until the next refresh. The very first
    /// write after construction becomes [`clear_screen`](Self::clear_screen).
    pub fn write_screen_buffer<D: DelayNs>(&mut self, value: u8, delay: &mut D) -> DisplayResult<I> {
        if self.state.initial_write {
            return self.clear_screen(value, delay);
        }
        self.fill_ram(value, delay)
    }

    /// Fill the controller RAM with `value` and run a full refresh
    ///
    /// The first-refresh latch stays pending, so the next caller refresh is
    /// full as well.
    pub fn clear_screen<D: DelayNs>(&mut self, value: u8, delay: &mut D) -> DisplayResult<I> {
        debug!("{}: clearing screen to {:#04x}", self.config.panel.name, value);
        self.fill_ram(value, delay)?;
        self.update_full(delay)?;
        self.state.initial_write = false;
        Ok(())
    }

    /// Write a bitmap that is exactly `rect.w` x `rect.h` pixels
    ///
    /// `bitmap` is 1 bit per pixel, MSB first, rows padded to whole bytes.
    /// The rectangle is snapped to byte columns and clipped to the panel; a
    /// rectangle with nothing on the panel sends nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` before any bus traffic if `bitmap` is
    /// shorter than the clipped window needs.
    pub fn write_rect<D: DelayNs>(
        &mut self,
        bitmap: &[u8],
        rect: Rect,
        options: WriteOptions,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let Some(transfer) = window::plan_image(rect, self.config.dimensions, options.mirror_y)
        else {
            trace!("write of {:?} misses the panel, skipped", rect);
            return Ok(());
        };
        self.write_transfer(bitmap, &transfer, options.invert, delay)
    }

    /// Write the `rect.w` x `rect.h` portion of a larger bitmap at `part`
    ///
    /// Invalid bitmap parameters or an origin outside the bitmap make this a
    /// no-op, as does a rectangle with nothing on the panel.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` before any bus traffic if `bitmap` is
    /// shorter than `part` describes.
    pub fn write_sub_rect<D: DelayNs>(
        &mut self,
        bitmap: &[u8],
        part: SubImage,
        rect: Rect,
        options: WriteOptions,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let Some(transfer) =
            window::plan_image_part(part, rect, self.config.dimensions, options.mirror_y)
        else {
            trace!("write of {:?} from {:?} skipped", rect, part);
            return Ok(());
        };
        self.write_transfer(bitmap, &transfer, options.invert, delay)
    }

    /// Show the RAM contents on the panel
    ///
    /// Blocks until the waveform finishes or the mode's timeout runs out. A
    /// partial request before the first full refresh runs a full one.
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> DisplayResult<I> {
        self.initialize(delay)?;
        match mode {
            RefreshMode::Partial if !self.state.initial_refresh => self.update_partial(delay),
            RefreshMode::Partial => {
                debug!("{}: first refresh must be full", self.config.panel.name);
                self.full_refresh(delay)
            }
            RefreshMode::Full => self.full_refresh(delay),
        }
    }

    /// Partial refresh of an area
    ///
    /// The controller always redraws the whole panel, so `rect` only affects
    /// logging.
    pub fn refresh_area<D: DelayNs>(&mut self, rect: Rect, delay: &mut D) -> DisplayResult<I> {
        trace!("refresh of {:?} covers the whole panel", rect);
        self.refresh(RefreshMode::Partial, delay)
    }

    /// Switch off the panel supplies
    ///
    /// The update sequences already power down after every waveform, so there
    /// is nothing left to send.
    pub fn power_off(&mut self) {
        trace!(
            "{}: power off (power_on={})",
            self.config.panel.name,
            self.state.power_on
        );
    }

    /// Enter deep sleep
    ///
    /// Skipped with a warning when the interface has no reset line, since
    /// nothing else can wake the controller. The next operation wakes it with
    /// a reset pulse and runs initialization again.
    pub fn hibernate<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if !self.interface.has_reset() {
            warn!(
                "{}: no reset line, not entering deep sleep",
                self.config.panel.name
            );
            return Ok(());
        }
        if self.state.hibernating {
            return Ok(());
        }

        self.run_steps(self.config.panel.deep_sleep, delay)?;
        self.state.hibernating = true;
        self.state.init_done = false;
        delay.delay_ms(self.config.panel.timing.hibernate_settle_ms);
        debug!("{}: hibernating", self.config.panel.name);
        Ok(())
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current controller state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Access the interface, for example to adjust busy polarity
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Make sure the controller is initialized and the panel blanked
    fn prepare_write<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.initialize(delay)?;
        if self.state.initial_write {
            self.write_screen_buffer(self.config.clear_value, delay)?;
        }
        Ok(())
    }

    fn write_transfer<D: DelayNs>(
        &mut self,
        bitmap: &[u8],
        transfer: &Transfer,
        invert: bool,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let required = transfer.required_len();
        if bitmap.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: bitmap.len(),
            });
        }

        delay.delay_ms(1);
        self.prepare_write(delay)?;
        self.set_ram_area(transfer.region)?;
        self.send_command(WRITE_RAM_BW)?;

        let row_bytes = transfer.region.row_bytes();
        let mut row = [0u8; ROW_BUFFER_SIZE];
        for i in 0..transfer.region.h as usize {
            let start = transfer.source_index(i, 0);
            let source = bitmap
                .get(start..start + row_bytes)
                .ok_or(Error::BufferTooSmall {
                    required,
                    provided: bitmap.len(),
                })?;
            for (out, byte) in row.iter_mut().zip(source) {
                *out = if invert { !*byte } else { *byte };
            }
            self.send_data(&row[..row_bytes])?;
        }

        delay.delay_ms(1);
        Ok(())
    }

    fn fill_ram<D: DelayNs>(&mut self, value: u8, delay: &mut D) -> DisplayResult<I> {
        self.initialize(delay)?;
        let dims = self.config.dimensions;
        self.set_ram_area(Region::full(dims))?;
        self.send_command(WRITE_RAM_BW)?;

        let row = [value; ROW_BUFFER_SIZE];
        for _ in 0..dims.rows {
            self.send_data(&row[..dims.row_bytes()])?;
        }
        Ok(())
    }

    fn full_refresh<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_full(delay)?;
        self.state.initial_refresh = false;
        Ok(())
    }

    fn update_full<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel = self.config.panel;
        let steps = if self.config.fast_full_update {
            panel.fast_full_refresh
        } else {
            panel.full_refresh
        };
        self.run_steps(steps, delay)?;
        self.activate(
            "full",
            self.config.full_refresh_timeout_ms,
            panel.timing.full_refresh_ms,
            delay,
        )
    }

    fn update_partial<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel = self.config.panel;
        self.run_steps(panel.partial_refresh, delay)?;
        self.activate(
            "partial",
            self.config.partial_refresh_timeout_ms,
            panel.timing.partial_refresh_ms,
            delay,
        )
    }

    /// Start the waveform and wait for BUSY to drop
    ///
    /// The update sequence powers the analog supplies down at the end, so
    /// `power_on` is cleared whatever the outcome.
    fn activate<D: DelayNs>(
        &mut self,
        label: &str,
        timeout_ms: u32,
        typical_ms: u32,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.state.power_on = true;
        let outcome = self.trigger(timeout_ms, delay);
        self.state.power_on = false;

        match outcome? {
            BusyWait::Idle { elapsed_ms } => trace!(
                "{}: {} refresh took {} ms (typical {} ms)",
                self.config.panel.name,
                label,
                elapsed_ms,
                typical_ms
            ),
            BusyWait::TimedOut { waited_ms } => warn!(
                "{}: {} refresh still busy after {} ms, continuing",
                self.config.panel.name, label, waited_ms
            ),
        }
        Ok(())
    }

    fn trigger<D: DelayNs>(
        &mut self,
        timeout_ms: u32,
        delay: &mut D,
    ) -> core::result::Result<BusyWait, Error<I>> {
        self.send_command(MASTER_ACTIVATION)?;
        self.interface
            .busy_wait(delay, timeout_ms)
            .map_err(Error::Interface)
    }

    fn run_steps<D: DelayNs>(&mut self, steps: &[Step], delay: &mut D) -> DisplayResult<I> {
        for step in steps {
            match *step {
                Step::Write { command, data } => {
                    self.send_command(command)?;
                    if !data.is_empty() {
                        self.send_data(data)?;
                    }
                }
                Step::Delay { ms } => delay.delay_ms(ms),
                Step::DriverOutputControl { scanning } => {
                    let [lo, hi] = (self.config.dimensions.rows - 1).to_le_bytes();
                    self.send_command(DRIVER_OUTPUT_CONTROL)?;
                    self.send_data(&[lo, hi, scanning])?;
                }
                Step::FullWindow => self.set_ram_area(Region::full(self.config.dimensions))?,
            }
        }
        Ok(())
    }

    /// Set the RAM window for the next data write
    ///
    /// Callers clip first; a window that is empty, off the panel or not
    /// byte-aligned is rejected with `Error::InvalidRamArea`.
    fn set_ram_area(&mut self, region: Region) -> DisplayResult<I> {
        let Region { x, y, w, h } = region;
        let dims = self.config.dimensions;
        if w == 0 || h == 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x.saturating_add(w) > dims.cols || y.saturating_add(h) > dims.rows {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x % 8 != 0 || w % 8 != 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }

        let ram = window::ram_window(region, dims, &self.config.panel);

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[self.config.panel.data_entry_mode])?;

        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&ram.x_range())?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&ram.y_range())?;

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&ram.x_counter())?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&ram.y_counter())?;

        Ok(())
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }
}
