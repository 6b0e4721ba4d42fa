// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised while configuring a renderer or presenting its
//! frames.  The field computation itself cannot fail.

use failure::Fail;
use std::io;
use std::path::Path;

/// Everything that can go wrong outside the per-pixel computation.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The integral plane has no pixels in it.
    #[fail(display = "viewport must be at least 1x1 pixels, got {}x{}", _0, _1)]
    EmptyViewport(usize, usize),

    /// The scale must be a positive, finite number of plane units per pixel.
    #[fail(display = "scale must be positive and finite, got {}", _0)]
    BadScale(f64),

    /// A filler without workers would never finish a frame.
    #[fail(display = "at least one worker thread is required")]
    NoWorkers,

    /// Chunks must contain at least one column.
    #[fail(display = "chunk size must be at least one column")]
    ZeroChunk,

    /// A command-line argument could not be understood.
    #[fail(display = "invalid value for --{}: {:?}", _0, _1)]
    BadArgument(&'static str, String),

    /// A frame could not be written to its destination.
    #[fail(display = "could not write frame to {}: {}", _0, _1)]
    Frame(String, #[cause] io::Error),
}

impl RenderError {
    /// Wraps an I/O failure that happened while writing `path`.
    pub fn frame(path: &Path, err: io::Error) -> Self {
        RenderError::Frame(path.display().to_string(), err)
    }
}
