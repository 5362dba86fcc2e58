//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicDisplay`] struct which wraps [`Display`]
//! and a 1-bit frame buffer, and implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! Drawing only touches the buffer. [`GraphicDisplay::flush`] sends the whole
//! frame and refreshes; [`GraphicDisplay::flush_window`] sends just the part
//! that changed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use epd_ssd1677::{Color, GraphicDisplay, Rect, RefreshMode};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use epd_ssd1677::{Builder, Display, Interface, GDEQ0426T82};
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
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let config = match Builder::new().panel(GDEQ0426T82).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let display_driver = Display::new(interface, config);
//! # let mut delay = MockDelay;
//! let buffer = vec![0xFFu8; display_driver.dimensions().buffer_size()];
//! let mut display = GraphicDisplay::new(display_driver, buffer);
//!
//! display.clear(Color::White);
//! let _ = Text::new(
//!     "Hello, E-Paper!",
//!     Point::new(10, 20),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut display);
//! let _ = display.flush(RefreshMode::Full, &mut delay);
//!
//! // Later: redraw a small area with the fast waveform
//! let _ = Rectangle::new(Point::new(10, 40), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//! let _ = display.flush_window(Rect::new(10, 40, 50, 30), RefreshMode::Partial, &mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};
use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::{Display, RefreshMode};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation::{pixel_location, rotate_rect};
use crate::window::{Rect, SubImage, WriteOptions};

/// Display with a graphics buffer
///
/// The buffer is laid out in native panel orientation whatever the rotation,
/// so its size is always `dimensions().buffer_size()`.
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Buffer type implementing `AsMut<[u8]>`
pub struct GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// 1-bit frame buffer, set bits are white
    buffer: B,
}

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

impl<I, B> GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Panics
    ///
    /// Panics if the buffer is smaller than `dimensions().buffer_size()`.
    /// Use [`try_new`](Self::try_new) to get an error instead.
    pub fn new(display: Display<I>, mut buffer: B) -> Self {
        let required = display.dimensions().buffer_size();
        assert!(
            buffer.as_mut().len() >= required,
            "buffer too small: required {} bytes, got {}",
            required,
            buffer.as_mut().len()
        );
        Self { display, buffer }
    }

    /// Try to create a new GraphicDisplay, returning an error if the buffer is too small
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if the buffer is smaller than the
    /// full-frame size.
    pub fn try_new(display: Display<I>, mut buffer: B) -> GraphicsNewResult<I, Self> {
        let required = display.dimensions().buffer_size();
        if buffer.as_mut().len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.as_mut().len(),
            });
        }
        Ok(Self { display, buffer })
    }

    /// Fill the buffer with one color
    pub fn clear(&mut self, color: Color) {
        self.buffer.as_mut().fill(color.byte());
    }

    /// Send the whole buffer and refresh
    pub fn flush<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> GraphicsResult<I> {
        let dims = *self.display.dimensions();
        let frame = Rect::new(0, 0, dims.cols as i16, dims.rows as i16);
        self.display
            .write_rect(self.buffer.as_mut(), frame, WriteOptions::NONE, delay)?;
        self.display.refresh(mode, delay)
    }

    /// Send the part of the buffer under `rect` and refresh
    ///
    /// `rect` is in canvas coordinates, rotation applied. It is widened to
    /// whole bytes and cut to the panel; nothing is sent if no part of it is
    /// on the panel.
    pub fn flush_window<D: DelayNs>(
        &mut self,
        rect: Rect,
        mode: RefreshMode,
        delay: &mut D,
    ) -> GraphicsResult<I> {
        let dims = *self.display.dimensions();
        let (x, y, w, h) = rotate_rect(rect, dims, self.display.rotation());

        let x0 = x.clamp(0, i32::from(dims.cols)) & !7;
        let y0 = y.clamp(0, i32::from(dims.rows));
        let x1 = ((x + w + 7) & !7).min(i32::from(dims.cols));
        let y1 = (y + h).min(i32::from(dims.rows));
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let window = Rect::new(x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16);

        let part = SubImage::new(window.x, window.y, dims.cols as i16, dims.rows as i16);
        self.display.write_sub_rect(
            self.buffer.as_mut(),
            part,
            window,
            WriteOptions::NONE,
            delay,
        )?;
        match mode {
            RefreshMode::Partial => self.display.refresh_area(window, delay),
            RefreshMode::Full => self.display.refresh(RefreshMode::Full, delay),
        }
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// This can be used to access low-level operations directly, such as
    /// [`Display::hibernate`].
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Split into the driver and the buffer
    pub fn release(self) -> (Display<I>, B) {
        (self.display, self.buffer)
    }

    /// Set a single pixel to a color
    ///
    /// `(x, y)` must already be inside the rotated canvas.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let dims = *self.display.dimensions();
        let (index, bit) = pixel_location(x, y, dims, self.display.rotation());

        let Some(byte) = self.buffer.as_mut().get_mut(index) else {
            return;
        };
        match color {
            Color::Black => *byte &= !bit,
            Color::White => *byte |= bit,
        }
    }
}

impl<I, B> DrawTarget for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel(x, y, color);
        }

        Ok(())
    }
}

impl<I, B> OriginDimensions for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let rotated = self.display.config().rotated_dimensions();
        Size::new(rotated.cols as u32, rotated.rows as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DISPLAY_UPDATE_CTRL2, SET_RAM_X_RANGE, WRITE_RAM_BW};
    use crate::config::{Builder, Rotation};
    use crate::interface::BusyWait;
    use crate::profile::GDEQ0426T82;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[derive(Debug, Default)]
    struct MockInterface {
        trace: Vec<(u8, Vec<u8>)>,
    }

    impl MockInterface {
        fn data_for(&self, command: u8) -> Vec<&[u8]> {
            self.trace
                .iter()
                .filter(|(cmd, _)| *cmd == command)
                .map(|(_, data)| data.as_slice())
                .collect()
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.trace.push((command, Vec::new()));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            if let Some((_, bytes)) = self.trace.last_mut() {
                bytes.extend_from_slice(data);
            }
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn busy_wait<D: DelayNs>(
            &mut self,
            _delay: &mut D,
            _timeout_ms: u32,
        ) -> Result<BusyWait, Self::Error> {
            Ok(BusyWait::Idle { elapsed_ms: 0 })
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_display(rotation: Rotation) -> Display<MockInterface> {
        let config = Builder::new()
            .panel(GDEQ0426T82)
            .rotation(rotation)
            .build()
            .unwrap();
        Display::new(MockInterface::default(), config)
    }

    fn graphic_display(rotation: Rotation) -> GraphicDisplay<MockInterface, Vec<u8>> {
        let display = test_display(rotation);
        let buffer = vec![0xFFu8; display.dimensions().buffer_size()];
        GraphicDisplay::new(display, buffer)
    }

    /// Graphic display with the first write and refresh already done
    fn settled(rotation: Rotation) -> GraphicDisplay<MockInterface, Vec<u8>> {
        let mut gd = graphic_display(rotation);
        let display = gd.display_mut();
        display.clear_screen(0xFF, &mut MockDelay).unwrap();
        display.refresh(RefreshMode::Full, &mut MockDelay).unwrap();
        display.interface_mut().trace.clear();
        gd
    }

    #[test]
    fn test_graphic_display_size_follows_rotation() {
        assert_eq!(graphic_display(Rotation::Rotate0).size(), Size::new(800, 480));
        assert_eq!(graphic_display(Rotation::Rotate90).size(), Size::new(480, 800));
    }

    #[test]
    fn test_try_new_small_buffer_returns_error() {
        let display = test_display(Rotation::Rotate0);
        let required = display.dimensions().buffer_size();
        let result = GraphicDisplay::try_new(display, vec![0u8; required - 1]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 48_000,
                provided: 47_999
            })
        ));
    }

    #[test]
    fn test_try_new_valid_buffer_succeeds() {
        let display = test_display(Rotation::Rotate0);
        let required = display.dimensions().buffer_size();
        assert!(GraphicDisplay::try_new(display, vec![0u8; required]).is_ok());
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_new_panics_on_small_buffer() {
        let display = test_display(Rotation::Rotate0);
        let _ = GraphicDisplay::new(display, vec![0u8; 10]);
    }

    #[test]
    fn test_draw_black_pixel_clears_bit() {
        let mut gd = graphic_display(Rotation::Rotate0);
        Pixel(Point::new(9, 1), Color::Black).draw(&mut gd).unwrap();
        let (_, buffer) = gd.release();
        assert_eq!(buffer[101], 0xBF);
        assert_eq!(buffer.iter().filter(|byte| **byte != 0xFF).count(), 1);
    }

    #[test]
    fn test_draw_outside_canvas_is_ignored() {
        let mut gd = graphic_display(Rotation::Rotate90);
        // 800 is inside the native width but outside the rotated canvas
        Pixel(Point::new(800, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(-1, 0), Color::Black).draw(&mut gd).unwrap();
        let (_, buffer) = gd.release();
        assert!(buffer.iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn test_clear_fills_buffer() {
        let mut gd = graphic_display(Rotation::Rotate0);
        gd.clear(Color::Black);
        let (_, buffer) = gd.release();
        assert!(buffer.iter().all(|byte| *byte == 0x00));
    }

    #[test]
    fn test_flush_sends_whole_frame() {
        let mut gd = settled(Rotation::Rotate0);
        gd.clear(Color::Black);
        gd.flush(RefreshMode::Partial, &mut MockDelay).unwrap();

        let interface = gd.display_mut().interface_mut();
        let ram = interface.data_for(WRITE_RAM_BW);
        assert_eq!(ram.len(), 1);
        assert_eq!(ram[0].len(), 48_000);
        assert!(ram[0].iter().all(|byte| *byte == 0x00));
        assert_eq!(interface.data_for(DISPLAY_UPDATE_CTRL2), vec![&[0xFF][..]]);
    }

    #[test]
    fn test_flush_window_sends_byte_aligned_part() {
        let mut gd = settled(Rotation::Rotate0);
        Rectangle::new(Point::new(10, 5), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut gd)
            .unwrap();
        gd.flush_window(Rect::new(10, 5, 4, 2), RefreshMode::Partial, &mut MockDelay)
            .unwrap();

        let interface = gd.display_mut().interface_mut();
        // Columns 10..14 widen to the byte holding 8..16
        assert_eq!(interface.data_for(SET_RAM_X_RANGE), vec![&[8, 0, 15, 0][..]]);
        assert_eq!(interface.data_for(WRITE_RAM_BW), vec![&[0xC3, 0xC3][..]]);
    }

    #[test]
    fn test_flush_window_off_canvas_sends_nothing() {
        let mut gd = settled(Rotation::Rotate0);
        gd.flush_window(Rect::new(900, 0, 16, 16), RefreshMode::Partial, &mut MockDelay)
            .unwrap();
        let interface = gd.display_mut().interface_mut();
        assert!(interface.trace.is_empty());
    }

    #[test]
    fn test_flush_window_far_off_canvas_sends_nothing() {
        for rotation in [
            Rotation::Rotate0,
            Rotation::Rotate90,
            Rotation::Rotate180,
            Rotation::Rotate270,
        ] {
            let mut gd = settled(rotation);
            for rect in [Rect::new(-32000, 0, 100, 10), Rect::new(0, i16::MIN, 8, 8)] {
                gd.flush_window(rect, RefreshMode::Partial, &mut MockDelay)
                    .unwrap();
            }
            let interface = gd.display_mut().interface_mut();
            assert!(interface.data_for(WRITE_RAM_BW).is_empty(), "{rotation:?}");
        }
    }

    #[test]
    fn test_flush_window_rotated_maps_to_native_area() {
        let mut gd = settled(Rotation::Rotate180);
        gd.flush_window(Rect::new(0, 0, 8, 8), RefreshMode::Partial, &mut MockDelay)
            .unwrap();
        let interface = gd.display_mut().interface_mut();
        // Logical top-left is the native bottom-right corner
        assert_eq!(
            interface.data_for(SET_RAM_X_RANGE),
            vec![&[0x18, 0x03, 0x1F, 0x03][..]]
        );
        assert_eq!(interface.data_for(WRITE_RAM_BW)[0].len(), 8);
    }
}
