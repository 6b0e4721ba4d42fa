#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Animated Mandelbrot renderer and benchmark
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares it, adding the original point back each time,
//! measuring how quickly that number goes to infinity.  This
//! "velocity" is the number used to color the image.  Here every
//! pixel of a fixed framebuffer is evaluated once per frame and colored
//! with a palette that cycles with time, so the boundary of the set
//! appears to flow while the black heart stays still.
//!
//! Rendering a 900x900 frame dozens of times a second is the whole
//! point, so the evaluator recognizes the two largest interior regions
//! of the set in closed form, and the filler spreads the columns of the
//! image across every available CPU.  The frame driver measures how
//! many frames per second that achieves.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod benchmark;
pub mod buffer;
pub mod color;
pub mod config;
pub mod driver;
pub mod errors;
pub mod escape;
pub mod field;
pub mod planes;
pub mod sink;

pub use benchmark::{BenchStatus, Benchmark, Rating};
pub use buffer::PixelBuffer;
pub use color::{color_of, Rgb};
pub use config::Config;
pub use driver::{Clock, DisplaySink, FixedStep, FrameDriver, RunSummary, WallClock};
pub use errors::RenderError;
pub use escape::{evaluate, Escape, MAX_ITER};
pub use field::FieldFiller;
pub use planes::{Pixel, Viewport};
pub use sink::{NullSink, PpmSink};
