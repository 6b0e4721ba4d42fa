// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame loop: read the clock, refill the buffer, present it,
//! count it.

use log::{debug, info};
use std::time::Instant;

use crate::benchmark::{BenchStatus, Benchmark, Rating};
use crate::buffer::PixelBuffer;
use crate::errors::RenderError;
use crate::field::FieldFiller;
use crate::planes::Viewport;

/// A source of animation time, in seconds.  Successive readings never
/// decrease.
pub trait Clock {
    /// The animation time for the next frame.
    fn seconds(&mut self) -> f64;
}

/// Seconds elapsed since the clock was created.
#[derive(Clone, Debug)]
pub struct WallClock(Instant);

impl WallClock {
    /// Starts counting now.
    pub fn new() -> Self {
        WallClock(Instant::now())
    }
}

impl Default for WallClock {
    fn default() -> Self {
        WallClock::new()
    }
}

impl Clock for WallClock {
    fn seconds(&mut self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

/// A clock that starts at zero and advances by a fixed step on every
/// reading, so that a run's frames can be reproduced exactly.
#[derive(Clone, Debug)]
pub struct FixedStep {
    next: f64,
    step: f64,
}

impl FixedStep {
    /// A clock advancing `step` seconds per frame.
    pub fn new(step: f64) -> Self {
        FixedStep { next: 0.0, step }
    }
}

impl Clock for FixedStep {
    fn seconds(&mut self) -> f64 {
        let now = self.next;
        self.next += self.step;
        now
    }
}

/// Whatever finally shows a frame: a window, a file, or nothing.
pub trait DisplaySink {
    /// Show a completely filled frame along with the benchmark's state
    /// as of the previous frame.
    fn present(&mut self, frame: &PixelBuffer, status: &BenchStatus) -> Result<(), RenderError>;
}

/// What a finished run measured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Frames rendered and presented.
    pub frames: usize,
    /// The benchmark's average at the end of the run.
    pub avg_fps: f64,
    /// How that average rates.
    pub rating: Rating,
    /// True if the run ended because the measurement window closed.
    pub finished: bool,
}

/// Owns the framebuffer and drives one fill per tick.
pub struct FrameDriver<C: Clock, S: DisplaySink> {
    buffer: PixelBuffer,
    viewport: Viewport,
    filler: FieldFiller,
    clock: C,
    sink: S,
    bench: Benchmark,
    status: BenchStatus,
    frames: usize,
}

impl<C: Clock, S: DisplaySink> FrameDriver<C, S> {
    /// Allocates a black framebuffer the size of the viewport and
    /// starts the benchmark.
    pub fn new(
        viewport: Viewport,
        filler: FieldFiller,
        clock: C,
        sink: S,
        bench: Benchmark,
    ) -> Self {
        FrameDriver {
            buffer: PixelBuffer::new(viewport.width(), viewport.height()),
            viewport,
            filler,
            clock,
            sink,
            bench,
            status: BenchStatus::Running { fps: 0.0 },
            frames: 0,
        }
    }

    /// The framebuffer as of the last tick.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The display sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frames produced so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Render, present and count one frame.
    pub fn tick(&mut self) -> Result<BenchStatus, RenderError> {
        let time = self.clock.seconds();
        let started = Instant::now();
        self.filler.fill(&mut self.buffer, &self.viewport, time);
        debug!(
            "frame {} at t={:.3}s filled in {:?}",
            self.frames,
            time,
            started.elapsed()
        );
        self.sink.present(&self.buffer, &self.status)?;
        self.frames += 1;
        self.status = self.bench.tick();
        Ok(self.status)
    }

    /// Tick until the benchmark reports, or until `limit` frames have
    /// been produced, whichever comes first.
    pub fn run(&mut self, limit: Option<usize>) -> Result<RunSummary, RenderError> {
        info!(
            "rendering {}x{} with {} workers, {} columns per chunk, {} iterations",
            self.viewport.width(),
            self.viewport.height(),
            self.filler.workers(),
            self.filler.chunk(),
            self.filler.limit()
        );
        loop {
            if let Some(limit) = limit {
                if self.frames >= limit {
                    break;
                }
            }
            if self.tick()?.is_finished() {
                break;
            }
        }
        let avg_fps = self.bench.avg_fps();
        Ok(RunSummary {
            frames: self.frames,
            avg_fps,
            rating: Rating::of(avg_fps),
            finished: self.status.is_finished(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::escape::MAX_ITER;
    use crate::planes::Pixel;
    use num::Complex;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<PixelBuffer>,
    }

    impl DisplaySink for Recorder {
        fn present(&mut self, frame: &PixelBuffer, _: &BenchStatus) -> Result<(), RenderError> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn driver(step: f64) -> FrameDriver<FixedStep, Recorder> {
        let viewport = Viewport::new(60, 60, 1.0 / 20.0, Complex::new(-2.25, -1.5)).unwrap();
        FrameDriver::new(
            viewport,
            FieldFiller::new(2, 2, MAX_ITER).unwrap(),
            FixedStep::new(step),
            Recorder::default(),
            Benchmark::new(3600.0),
        )
    }

    #[test]
    fn fixed_step_clock_advances() {
        let mut clock = FixedStep::new(0.5);
        assert_eq!(clock.seconds(), 0.0);
        assert_eq!(clock.seconds(), 0.5);
        assert_eq!(clock.seconds(), 1.0);
    }

    #[test]
    fn wall_clock_never_goes_backwards() {
        let mut clock = WallClock::new();
        let first = clock.seconds();
        assert!(clock.seconds() >= first);
    }

    #[test]
    fn run_stops_at_the_frame_limit() {
        let mut driver = driver(0.1);
        let summary = driver.run(Some(3)).unwrap();
        assert_eq!(summary.frames, 3);
        assert!(!summary.finished);
        assert_eq!(driver.sink().frames.len(), 3);
        assert_eq!(driver.frames(), 3);
        assert_eq!(driver.buffer().len(), 60 * 60);
    }

    #[test]
    fn frames_animate_but_the_interior_stays_black() {
        let mut driver = driver(1.0);
        driver.run(Some(2)).unwrap();
        let frames = &driver.sink().frames;
        // Pixel 45,30 is the origin, inside the cardioid.
        assert_eq!(frames[0].get(Pixel(45, 30)), Rgb::BLACK);
        assert_eq!(frames[1].get(Pixel(45, 30)), Rgb::BLACK);
        assert_ne!(frames[0].get(Pixel(0, 0)), frames[1].get(Pixel(0, 0)));
    }

    #[test]
    fn run_ends_when_the_benchmark_reports() {
        let viewport = Viewport::new(8, 8, 0.5, Complex::new(-2.0, -2.0)).unwrap();
        let mut driver = FrameDriver::new(
            viewport,
            FieldFiller::new(1, 1, MAX_ITER).unwrap(),
            FixedStep::new(0.1),
            Recorder::default(),
            Benchmark::new(0.0),
        );
        let summary = driver.run(Some(100)).unwrap();
        // A zero-length window reports on the very first frame.
        assert_eq!(summary.frames, 1);
        assert!(summary.finished);
    }
}
