// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fills a framebuffer with one animated frame of the Mandelbrot set.
//!
//! The cost of a pixel varies wildly: points in the cardioid or the
//! bulb cost a handful of multiplications, while points near the
//! boundary run the full iteration limit.  Handing each worker a fixed
//! share of the image up front leaves most of them idle while one
//! grinds through the boundary, so instead the columns of the image are
//! cut into small chunks and placed in a shared queue.  Every worker
//! takes the next chunk as soon as it finishes the last one, until the
//! queue is empty.

use itertools::iproduct;
use log::trace;
use std::cmp::min;
use std::iter::StepBy;
use std::ops::Range;
use std::panic;
use std::sync::{Arc, Mutex};

use crate::buffer::PixelBuffer;
use crate::color::{color_of, Rgb};
use crate::errors::RenderError;
use crate::escape::{evaluate, MAX_ITER};
use crate::planes::{Pixel, Viewport};

/// The default number of adjacent columns handed to a worker at a time.
pub const CHUNK_SIZE: usize = 2;

/// The first column of every chunk not yet claimed by a worker.
type ColumnQueue = Arc<Mutex<StepBy<Range<usize>>>>;

/// A painted column, top to bottom, tagged with its x coordinate.
type Column = (usize, Vec<Option<Rgb>>);

/// Runs the escape-time evaluator and the palette over every pixel of
/// a buffer, spread across a fixed number of worker threads.
#[derive(Copy, Clone, Debug)]
pub struct FieldFiller {
    workers: usize,
    chunk: usize,
    limit: usize,
}

impl FieldFiller {
    /// Requires the number of worker threads, the number of columns
    /// per chunk, and the iteration limit per point.
    pub fn new(workers: usize, chunk: usize, limit: usize) -> Result<Self, RenderError> {
        if workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        if chunk == 0 {
            return Err(RenderError::ZeroChunk);
        }
        Ok(FieldFiller {
            workers,
            chunk,
            limit,
        })
    }

    /// One worker per logical CPU, two columns per chunk, and the
    /// default iteration limit.
    pub fn with_defaults() -> Self {
        FieldFiller {
            workers: num_cpus::get().max(1),
            chunk: CHUNK_SIZE,
            limit: MAX_ITER,
        }
    }

    /// The number of worker threads used per fill.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The number of columns handed out per chunk.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// The iteration limit per point.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The color of a single pixel at `time`, or None if the pixel is
    /// in the interior and should keep whatever it already shows.
    #[inline]
    pub fn paint(&self, viewport: &Viewport, pixel: Pixel, time: f64) -> Option<Rgb> {
        color_of(evaluate(viewport.pixel_to_point(&pixel), self.limit), time)
    }

    /// Overwrite every escaping pixel of `buffer` with its color at
    /// `time`.  Interior pixels are left untouched.  Returns only once
    /// every worker has finished.
    ///
    /// Panics if the buffer's dimensions differ from the viewport's.
    pub fn fill(&self, buffer: &mut PixelBuffer, viewport: &Viewport, time: f64) {
        let (width, height) = (viewport.width(), viewport.height());
        assert!(
            buffer.width() == width && buffer.height() == height,
            "buffer is {}x{} but the viewport is {}x{}",
            buffer.width(),
            buffer.height(),
            width,
            height
        );

        if self.workers == 1 {
            self.fill_single(buffer, viewport, time);
            return;
        }

        let queue: ColumnQueue = Arc::new(Mutex::new((0..width).step_by(self.chunk)));

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker| {
                    let queue = queue.clone();
                    spawner.spawn(move |_| {
                        let mut painted: Vec<Column> = Vec::new();
                        loop {
                            let start = { queue.lock().unwrap().next() };
                            match start {
                                Some(start) => {
                                    let end = min(start + self.chunk, width);
                                    trace!("worker {} took columns {}..{}", worker, start, end);
                                    for x in start..end {
                                        painted.push((x, self.paint_column(viewport, x, time)));
                                    }
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        painted
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Result<Vec<_>, _>>()
        });

        let columns = match joined {
            Ok(Ok(columns)) => columns,
            Ok(Err(cause)) | Err(cause) => panic::resume_unwind(cause),
        };

        let pixels = buffer.pixels_mut();
        for (x, column) in columns.into_iter().flatten() {
            for (y, color) in column.into_iter().enumerate() {
                if let Some(color) = color {
                    pixels[viewport.offset_of(&Pixel(x, y))] = color;
                }
            }
        }
    }

    /// Column `x` at `time`, top to bottom.
    fn paint_column(&self, viewport: &Viewport, x: usize, time: f64) -> Vec<Option<Rgb>> {
        (0..viewport.height())
            .map(|y| self.paint(viewport, Pixel(x, y), time))
            .collect()
    }

    fn fill_single(&self, buffer: &mut PixelBuffer, viewport: &Viewport, time: f64) {
        let pixels = buffer.pixels_mut();
        for (x, y) in iproduct!(0..viewport.width(), 0..viewport.height()) {
            let pixel = Pixel(x, y);
            if let Some(color) = self.paint(viewport, pixel, time) {
                pixels[viewport.offset_of(&pixel)] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    // 120x120 pixels over the same region of the plane as the full-size default.
    fn small_viewport() -> Viewport {
        Viewport::new(120, 120, 1.0 / 40.0, Complex::new(-2.25, -1.5)).unwrap()
    }

    const SENTINEL: Rgb = Rgb(1, 2, 3);

    #[test]
    fn filler_rejects_zero_workers_and_chunks() {
        assert!(FieldFiller::new(0, 2, MAX_ITER).is_err());
        assert!(FieldFiller::new(2, 0, MAX_ITER).is_err());
        assert!(FieldFiller::new(1, 1, MAX_ITER).is_ok());
    }

    #[test]
    fn defaults_use_every_cpu() {
        let filler = FieldFiller::with_defaults();
        assert_eq!(filler.workers(), num_cpus::get().max(1));
        assert_eq!(filler.chunk(), CHUNK_SIZE);
        assert_eq!(filler.limit(), MAX_ITER);
    }

    #[test]
    fn interior_pixels_keep_their_color() {
        let viewport = small_viewport();
        let filler = FieldFiller::new(4, CHUNK_SIZE, MAX_ITER).unwrap();
        let mut buffer = PixelBuffer::new(120, 120);
        buffer.fill_with(SENTINEL);

        filler.fill(&mut buffer, &viewport, 1.5);
        filler.fill(&mut buffer, &viewport, 1.5);

        let origin = viewport.point_to_pixel(&Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(origin, Pixel(90, 60));
        assert_eq!(buffer.get(origin), SENTINEL);
        assert_ne!(buffer.get(Pixel(0, 0)), SENTINEL);
    }

    #[test]
    fn every_escaping_pixel_is_painted() {
        let viewport = small_viewport();
        let filler = FieldFiller::new(3, CHUNK_SIZE, MAX_ITER).unwrap();
        let mut buffer = PixelBuffer::new(120, 120);
        buffer.fill_with(SENTINEL);
        filler.fill(&mut buffer, &viewport, 0.25);

        for (x, y) in iproduct!(0..120, 0..120) {
            let expected = filler.paint(&viewport, Pixel(x, y), 0.25).unwrap_or(SENTINEL);
            assert_eq!(buffer.get(Pixel(x, y)), expected, "pixel {},{}", x, y);
        }
    }

    #[test]
    fn worker_count_does_not_change_the_frame() {
        let viewport = small_viewport();
        let mut single = PixelBuffer::new(120, 120);
        FieldFiller::new(1, CHUNK_SIZE, MAX_ITER)
            .unwrap()
            .fill(&mut single, &viewport, 3.0);

        for &(workers, chunk) in &[(2, 2), (4, 2), (8, 7), (3, 90), (16, 200)] {
            let mut parallel = PixelBuffer::new(120, 120);
            FieldFiller::new(workers, chunk, MAX_ITER)
                .unwrap()
                .fill(&mut parallel, &viewport, 3.0);
            assert!(single == parallel, "{} workers, chunk {}", workers, chunk);
        }
    }

    #[test]
    fn columns_are_painted_top_to_bottom() {
        let viewport = small_viewport();
        let filler = FieldFiller::new(2, CHUNK_SIZE, MAX_ITER).unwrap();
        let column = filler.paint_column(&viewport, 90, 2.0);
        assert_eq!(column.len(), 120);
        // Column 90 passes through the origin at row 60.
        assert_eq!(column[60], None);
        for (y, color) in column.iter().enumerate() {
            assert_eq!(*color, filler.paint(&viewport, Pixel(90, y), 2.0));
        }
    }

    #[test]
    fn each_column_lands_at_its_own_offsets() {
        // Wide and short, so a transposed write would land out of place.
        let viewport = Viewport::new(40, 7, 1.0 / 10.0, Complex::new(-2.25, -0.3)).unwrap();
        let filler = FieldFiller::new(5, 3, MAX_ITER).unwrap();
        let mut buffer = PixelBuffer::new(40, 7);
        buffer.fill_with(SENTINEL);
        filler.fill(&mut buffer, &viewport, 0.5);

        for (x, y) in iproduct!(0..40, 0..7) {
            let pixel = Pixel(x, y);
            let expected = filler.paint(&viewport, pixel, 0.5).unwrap_or(SENTINEL);
            assert_eq!(buffer.pixels()[viewport.offset_of(&pixel)], expected, "pixel {},{}", x, y);
        }
    }

    #[test]
    fn more_workers_than_columns() {
        let viewport = Viewport::new(3, 5, 1.0, Complex::new(-2.0, -2.0)).unwrap();
        let mut buffer = PixelBuffer::new(3, 5);
        FieldFiller::new(12, 1, MAX_ITER)
            .unwrap()
            .fill(&mut buffer, &viewport, 0.0);
        assert_eq!(buffer.len(), 15);
        // (-2, -2) has |c|² = 8 and escapes at the second step.
        assert_ne!(buffer.get(Pixel(0, 0)), Rgb::BLACK);
    }

    #[test]
    #[should_panic]
    fn mismatched_buffers_panic() {
        let mut buffer = PixelBuffer::new(10, 10);
        FieldFiller::new(2, 2, MAX_ITER)
            .unwrap()
            .fill(&mut buffer, &small_viewport(), 0.0);
    }
}
