/*
 *  display/drivers/mock.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing without hardware
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

use std::sync::{Arc, Mutex};

/// Mock display driver for testing
///
/// Records lifecycle calls and keeps a copy of every flushed frame so a
/// test can check what was on screen at the moment of each repaint.
#[derive(Debug, Clone)]
pub struct MockDriver {
    framebuffer: VarFrameBuf<BinaryColor>,
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    pub init_count: usize,
    pub flush_count: usize,
    pub clear_count: usize,

    /// Lit pixel count at each flush
    pub flushed_on_pixels: Vec<usize>,

    /// Last invert state set
    pub last_invert: Option<bool>,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriver {
    pub fn new_with_size(width: u32, height: u32) -> Self {
        Self {
            framebuffer: VarFrameBuf::new(width, height, BinaryColor::Off),
            capabilities: DisplayCapabilities {
                width,
                height,
                supports_invert: true,
            },
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    pub fn framebuffer(&self) -> &VarFrameBuf<BinaryColor> {
        &self.framebuffer
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    pub fn count_on_pixels(&self) -> usize {
        self.framebuffer.count(BinaryColor::On)
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();
        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }
        state.init_count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let on = self.count_on_pixels();
        let mut state = self.state.lock().unwrap();
        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }
        state.flush_count += 1;
        state.flushed_on_pixels.push(on);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().clear_count += 1;
        self.framebuffer.fill(BinaryColor::Off);
        self.flush()
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.state.lock().unwrap().last_invert = Some(inverted);
        Ok(())
    }
}

impl DrawTarget for MockDriver {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }
}

impl OriginDimensions for MockDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new_with_size(144, 168);
        assert_eq!(driver.dimensions(), (144, 168));
        assert_eq!(driver.count_on_pixels(), 0);
    }

    #[test]
    fn test_mock_driver_records_flush() {
        let mut driver = MockDriver::new_with_size(32, 32);
        Line::new(Point::new(0, 0), Point::new(9, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut driver)
            .unwrap();
        driver.flush().unwrap();

        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.flush_count, 1);
        assert_eq!(state.flushed_on_pixels, vec![10]);
    }

    #[test]
    fn test_mock_driver_clear_blanks_and_flushes() {
        let mut driver = MockDriver::new_with_size(16, 16);
        Pixel(Point::new(3, 3), BinaryColor::On).draw(&mut driver).unwrap();
        DisplayDriver::clear(&mut driver).unwrap();

        assert_eq!(driver.count_on_pixels(), 0);
        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.clear_count, 1);
        assert_eq!(state.flush_count, 1);
        assert_eq!(state.flushed_on_pixels, vec![0]);
    }

    #[test]
    fn test_mock_driver_records_invert() {
        let mut driver = MockDriver::new_with_size(16, 16);
        assert_eq!(driver.state().lock().unwrap().last_invert, None);
        driver.set_invert(true).unwrap();
        assert_eq!(driver.state().lock().unwrap().last_invert, Some(true));
    }

    #[test]
    fn test_mock_driver_simulated_init_failure() {
        let mut driver = MockDriver::new_with_size(16, 16);
        driver.state().lock().unwrap().simulate_init_failure = true;
        assert!(matches!(driver.init(), Err(DisplayError::InitializationFailed(_))));
        assert_eq!(driver.state().lock().unwrap().init_count, 0);
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new_with_size(16, 16);
        driver.state().lock().unwrap().simulate_flush_failure = true;
        assert!(driver.flush().is_err());

        driver.state().lock().unwrap().simulate_flush_failure = false;
        assert!(driver.flush().is_ok());
    }
}
