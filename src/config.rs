// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Startup configuration.  Everything here is fixed once the renderer
//! is built; nothing can be changed mid-run.

use num::Complex;
use std::str::FromStr;

use crate::benchmark::RUN_TIME;
use crate::errors::RenderError;
use crate::escape::MAX_ITER;
use crate::field::{FieldFiller, CHUNK_SIZE};
use crate::planes::Viewport;

/// Default width of the framebuffer, in pixels.
pub const WIDTH: usize = 900;
/// Default height of the framebuffer, in pixels.
pub const HEIGHT: usize = 900;
/// Default plane units per pixel.
pub const SCALE: f64 = 1.0 / 300.0;
/// Default complex coordinate of pixel 0,0.
pub const OFFSET: (f64, f64) = (-2.25, -1.5);

/// The knobs a run is built from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Framebuffer width, in pixels.
    pub width: usize,
    /// Framebuffer height, in pixels.
    pub height: usize,
    /// Plane units per pixel.
    pub scale: f64,
    /// Complex coordinate of pixel 0,0.
    pub offset: Complex<f64>,
    /// Iteration limit per point.
    pub limit: usize,
    /// Columns per work chunk.
    pub chunk: usize,
    /// Worker threads per fill.
    pub threads: usize,
    /// Length of the benchmark window, in seconds.
    pub run_time: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: WIDTH,
            height: HEIGHT,
            scale: SCALE,
            offset: Complex::new(OFFSET.0, OFFSET.1),
            limit: MAX_ITER,
            chunk: CHUNK_SIZE,
            threads: num_cpus::get().max(1),
            run_time: RUN_TIME,
        }
    }
}

impl Config {
    /// The validated viewport described by this configuration.
    pub fn viewport(&self) -> Result<Viewport, RenderError> {
        Viewport::new(self.width, self.height, self.scale, self.offset)
    }

    /// The validated filler described by this configuration.
    pub fn filler(&self) -> Result<FieldFiller, RenderError> {
        FieldFiller::new(self.threads, self.chunk, self.limit)
    }
}

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

/// Clap-style validator: the string must be a pair split by `separator`.
pub fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

/// Clap-style validator: the string must parse and fall in `low..=high`.
pub fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}
