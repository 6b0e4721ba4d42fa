// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate log;
extern crate mandelbench;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::info;
use std::str::FromStr;

use mandelbench::config::{parse_complex, parse_pair, validate_pair, validate_range};
use mandelbench::{
    Benchmark, Clock, Config, DisplaySink, FixedStep, FrameDriver, NullSink, PpmSink,
    RenderError, RunSummary, WallClock,
};

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const SCALE: &str = "scale";
const OFFSET: &str = "offset";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const CHUNK: &str = "chunk";
const RUN_TIME: &str = "run-time";
const FRAMES: &str = "frames";
const TIME_STEP: &str = "time-step";

fn validate_positive(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandelbench")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Animated Mandelbrot renderer and frame-rate benchmark")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Directory to write every frame into, as binary PPM"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("900x900")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse framebuffer size"))
                .help("Size of the framebuffer"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .validator(|s| validate_positive(&s, "Scale must be a positive number"))
                .help("Units of the complex plane per pixel [default: 1/300]"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .required(false)
                .long(OFFSET)
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.25,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse offset"))
                .help("Point of the complex plane at the upper left pixel"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads per frame [default: one per CPU]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("50")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        10_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000",
                    )
                })
                .help("Iteration limit per point"),
        )
        .arg(
            Arg::with_name(CHUNK)
                .required(false)
                .long(CHUNK)
                .short("c")
                .takes_value(true)
                .default_value("2")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse chunk size",
                        "Chunk size must be at least 1",
                    )
                })
                .help("Columns handed to a worker at a time"),
        )
        .arg(
            Arg::with_name(RUN_TIME)
                .required(false)
                .long(RUN_TIME)
                .short("r")
                .takes_value(true)
                .default_value("30")
                .validator(|s| validate_positive(&s, "Run time must be a positive number"))
                .help("Seconds to measure before reporting the average frame rate"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .required(false)
                .long(FRAMES)
                .short("n")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse frame count",
                        "Frame count must be at least 1",
                    )
                })
                .help("Stop after this many frames"),
        )
        .arg(
            Arg::with_name(TIME_STEP)
                .required(false)
                .long(TIME_STEP)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0.0,
                        std::f64::MAX,
                        "Could not parse time step",
                        "Time step must not be negative",
                    )
                })
                .help("Advance the animation by a fixed step per frame instead of real time"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &'static str) -> Result<Option<T>, RenderError> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(raw) => T::from_str(raw)
            .map(Some)
            .map_err(|_| RenderError::BadArgument(name, raw.to_string())),
    }
}

fn config(matches: &ArgMatches) -> Result<Config, RenderError> {
    let mut config = Config::default();
    if let Some(raw) = matches.value_of(SIZE) {
        let (width, height) = parse_pair::<usize>(raw, 'x')
            .ok_or_else(|| RenderError::BadArgument(SIZE, raw.to_string()))?;
        config.width = width;
        config.height = height;
    }
    if let Some(raw) = matches.value_of(OFFSET) {
        config.offset = parse_complex(raw)
            .ok_or_else(|| RenderError::BadArgument(OFFSET, raw.to_string()))?;
    }
    if let Some(scale) = value(matches, SCALE)? {
        config.scale = scale;
    }
    if let Some(limit) = value(matches, ITERATIONS)? {
        config.limit = limit;
    }
    if let Some(chunk) = value(matches, CHUNK)? {
        config.chunk = chunk;
    }
    if let Some(threads) = value(matches, THREADS)? {
        config.threads = threads;
    }
    if let Some(run_time) = value(matches, RUN_TIME)? {
        config.run_time = run_time;
    }
    Ok(config)
}

fn render<C: Clock, S: DisplaySink>(
    config: &Config,
    clock: C,
    sink: S,
    frames: Option<usize>,
) -> Result<RunSummary, RenderError> {
    let mut driver = FrameDriver::new(
        config.viewport()?,
        config.filler()?,
        clock,
        sink,
        Benchmark::new(config.run_time),
    );
    driver.run(frames)
}

fn run(matches: &ArgMatches) -> Result<RunSummary, RenderError> {
    let config = config(matches)?;
    info!("{:?}", config);
    let frames = value(matches, FRAMES)?;
    let step = value::<f64>(matches, TIME_STEP)?;

    match (step, matches.value_of(OUTPUT)) {
        (Some(step), Some(dir)) => {
            render(&config, FixedStep::new(step), PpmSink::new(dir)?, frames)
        }
        (Some(step), None) => render(&config, FixedStep::new(step), NullSink, frames),
        (None, Some(dir)) => render(&config, WallClock::new(), PpmSink::new(dir)?, frames),
        (None, None) => render(&config, WallClock::new(), NullSink, frames),
    }
}

fn main() {
    env_logger::init();
    let matches = args();

    match run(&matches) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(summary) => {
            println!("Frames: {}", summary.frames);
            println!("Average FPS: {:.1} ({})", summary.avg_fps, summary.rating);
        }
    }
}
