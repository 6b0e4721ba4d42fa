// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A running-average frame counter.  For the first `run_time` seconds
//! it tracks frames per second; after that it freezes and reports the
//! final average forever.

use log::info;
use std::fmt;
use std::time::Instant;

/// The default measurement window, in seconds.
pub const RUN_TIME: f64 = 30.0;

/// How the final average compares to common refresh rates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rating {
    /// Below 30 frames per second.
    Slow,
    /// At least 30 but below 60 frames per second.
    Fair,
    /// 60 frames per second or better.
    Smooth,
}

impl Rating {
    /// Classify an average frame rate.
    pub fn of(fps: f64) -> Rating {
        if fps < 30.0 {
            Rating::Slow
        } else if fps < 60.0 {
            Rating::Fair
        } else {
            Rating::Smooth
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Rating::Slow => "slow",
            Rating::Fair => "fair",
            Rating::Smooth => "smooth",
        };
        f.write_str(name)
    }
}

/// What the overlay should show after a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BenchStatus {
    /// Still measuring; the running average so far.
    Running {
        /// Frames per second averaged since the start.
        fps: f64,
    },
    /// The measurement window is over.
    Finished {
        /// The frozen average.
        avg_fps: f64,
        /// How that average rates.
        rating: Rating,
    },
}

impl BenchStatus {
    /// True once the benchmark has reached its report state.
    pub fn is_finished(&self) -> bool {
        match *self {
            BenchStatus::Finished { .. } => true,
            BenchStatus::Running { .. } => false,
        }
    }
}

/// Frame count and average rate over a fixed measurement window.
#[derive(Clone, Debug)]
pub struct Benchmark {
    frame_count: usize,
    avg_fps: f64,
    start: Instant,
    elapsed: f64,
    run_time: f64,
    reported: bool,
}

impl Benchmark {
    /// Starts measuring now, for `run_time` seconds.
    pub fn new(run_time: f64) -> Self {
        Benchmark::starting_at(Instant::now(), run_time)
    }

    /// Starts measuring at `start`, for `run_time` seconds.
    pub fn starting_at(start: Instant, run_time: f64) -> Self {
        Benchmark {
            frame_count: 0,
            avg_fps: 0.0,
            start,
            elapsed: 1e-6,
            run_time,
            reported: false,
        }
    }

    /// Frames counted inside the measurement window.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// The running (or, once finished, final) average.
    pub fn avg_fps(&self) -> f64 {
        self.avg_fps
    }

    /// Record a frame finished now.
    pub fn tick(&mut self) -> BenchStatus {
        self.tick_at(Instant::now())
    }

    /// Record a frame finished at `now`.
    pub fn tick_at(&mut self, now: Instant) -> BenchStatus {
        if self.elapsed < self.run_time {
            self.elapsed = now.duration_since(self.start).as_secs_f64();
            self.frame_count += 1;
            self.avg_fps = self.frame_count as f64 / self.elapsed;
            return BenchStatus::Running { fps: self.avg_fps };
        }
        let rating = Rating::of(self.avg_fps);
        if !self.reported {
            self.reported = true;
            info!(
                "Average FPS: {:.1} over {} frames ({})",
                self.avg_fps, self.frame_count, rating
            );
        }
        BenchStatus::Finished {
            avg_fps: self.avg_fps,
            rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ratings_follow_refresh_rates() {
        assert_eq!(Rating::of(12.0), Rating::Slow);
        assert_eq!(Rating::of(29.9), Rating::Slow);
        assert_eq!(Rating::of(30.0), Rating::Fair);
        assert_eq!(Rating::of(59.9), Rating::Fair);
        assert_eq!(Rating::of(60.0), Rating::Smooth);
        assert_eq!(Rating::of(240.0), Rating::Smooth);
    }

    #[test]
    fn running_average_counts_frames() {
        let start = Instant::now();
        let mut bench = Benchmark::starting_at(start, 30.0);
        assert_eq!(
            bench.tick_at(start + Duration::from_millis(500)),
            BenchStatus::Running { fps: 2.0 }
        );
        assert_eq!(
            bench.tick_at(start + Duration::from_secs(1)),
            BenchStatus::Running { fps: 2.0 }
        );
        assert_eq!(bench.frame_count(), 2);
    }

    #[test]
    fn report_is_terminal() {
        let start = Instant::now();
        let mut bench = Benchmark::starting_at(start, 2.0);
        for i in 1..=80 {
            let status = bench.tick_at(start + Duration::from_millis(i * 25));
            assert!(!status.is_finished());
        }
        // The 80th frame landed exactly at the end of the window.
        let report = bench.tick_at(start + Duration::from_secs(3));
        assert_eq!(
            report,
            BenchStatus::Finished {
                avg_fps: 40.0,
                rating: Rating::Fair
            }
        );
        let later = bench.tick_at(start + Duration::from_secs(60));
        assert_eq!(later, report);
        assert_eq!(bench.frame_count(), 80);
    }
}
