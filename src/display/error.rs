/*
 *  display/error.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the display subsystem
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

use thiserror::Error;

/// Unified error type for all display operations
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Driver could not be brought up
    #[error("Display initialization failed: {0}")]
    InitializationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Drawing into the framebuffer failed
    #[error("Drawing error: {0}")]
    DrawingError(String),

    /// Writing a finished frame out failed
    #[error("Frame output failed: {0}")]
    Output(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
