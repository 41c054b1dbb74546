/*
 *  display/manager.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display manager - owns the driver and runs one render pass per tick
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

use std::fmt::Debug;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, info};

use crate::clock::{ClockSource, TimeSnapshot};
use crate::display::components::{BinaryClockFace, RenderContext};
use crate::display::error::DisplayError;
use crate::display::layout::DisplayGeometry;
use crate::display::traits::DisplayDriver;

/// Ties a driver, a clock and the face together.
///
/// The manager is owned by whatever runs the event loop; nothing here is
/// global. Each call to `render_frame` is one complete, independent pass.
pub struct DisplayManager<D, C> {
    driver: D,
    clock: C,
    face: BinaryClockFace,
}

impl<D, C> DisplayManager<D, C>
where
    D: DisplayDriver + DrawTarget<Color = BinaryColor>,
    D::Error: Debug,
    C: ClockSource,
{
    /// Bring the driver up for `geometry`.
    pub fn new(mut driver: D, clock: C, geometry: DisplayGeometry) -> Result<Self, DisplayError> {
        let (w, h) = driver.dimensions();
        if w < geometry.screen_width || h < geometry.screen_height {
            return Err(DisplayError::InvalidConfiguration(format!(
                "driver is {}x{}, face needs {}x{}",
                w, h, geometry.screen_width, geometry.screen_height
            )));
        }
        driver.init()?;
        info!(
            "Display ready {}x{}, cell {}px, side padding {}px",
            w,
            h,
            geometry.cell_size(),
            geometry.side_padding()
        );
        Ok(Self {
            driver,
            clock,
            face: BinaryClockFace::new(geometry),
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn face(&self) -> &BinaryClockFace {
        &self.face
    }

    /// Read the clock and draw the face for it
    pub fn render_frame(&mut self) -> Result<TimeSnapshot, DisplayError> {
        let snapshot = self.clock.snapshot();
        self.render_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Draw all four columns for `snapshot`, then flush once.
    pub fn render_snapshot(&mut self, snapshot: &TimeSnapshot) -> Result<(), DisplayError> {
        debug!(
            "render day {} {:02}:{:02}:{:02} ({})",
            snapshot.day_of_month,
            snapshot.hour,
            snapshot.minute,
            snapshot.second,
            if snapshot.is_24h { "24h" } else { "12h" }
        );

        // the hour column loses a row when switching to 12h, so start blank
        DrawTarget::clear(&mut self.driver, BinaryColor::Off)
            .map_err(|e| DisplayError::DrawingError(format!("{:?}", e)))?;

        let mut ctx = RenderContext::new(&mut self.driver, *self.face.geometry());
        self.face
            .render(&mut ctx, snapshot)
            .map_err(|e| DisplayError::DrawingError(format!("{:?}", e)))?;

        self.driver.flush()
    }
}
