/*
 *  display/mod.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - geometry, face rendering and output drivers
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

// Core trait definitions
pub mod traits;
pub mod error;

// Cell grid geometry
pub mod layout;

// Display drivers
pub mod drivers;

// Display manager
pub mod manager;

// UI components
pub mod components;

// Re-exports for convenience
pub use traits::{DisplayDriver, DisplayCapabilities};
pub use error::DisplayError;
pub use layout::{DisplayGeometry, GRID_COLUMNS, GRID_ROWS};
pub use manager::DisplayManager;
pub use components::{BinaryClockFace, Cell, CellSink, RenderContext, TimeField};
pub use drivers::framebuffer::{FramebufferDriver, FrameSink};
