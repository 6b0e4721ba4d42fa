// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Display sinks that need no window: one that throws frames away, for
//! pure throughput runs, and one that writes every frame to disk.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::benchmark::BenchStatus;
use crate::buffer::PixelBuffer;
use crate::driver::DisplaySink;
use crate::errors::RenderError;

/// Accepts every frame and does nothing with it.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _frame: &PixelBuffer, _status: &BenchStatus) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Writes each frame as `frame_NNNNN.ppm` (binary PPM) into a directory.
#[derive(Clone, Debug)]
pub struct PpmSink {
    directory: PathBuf,
    written: usize,
}

impl PpmSink {
    /// Creates the directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, RenderError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|e| RenderError::frame(&directory, e))?;
        Ok(PpmSink {
            directory,
            written: 0,
        })
    }

    /// The path the `index`th frame is written to.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("frame_{:05}.ppm", index))
    }

    /// Number of frames written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

fn write_image(path: &Path, frame: &PixelBuffer) -> Result<(), std::io::Error> {
    let mut output = BufWriter::new(File::create(path)?);
    {
        let mut encoder = PNMEncoder::new(&mut output)
            .with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(
            &frame.to_bytes()[..],
            frame.width() as u32,
            frame.height() as u32,
            ColorType::RGB(8),
        )?;
    }
    output.flush()
}

impl DisplaySink for PpmSink {
    fn present(&mut self, frame: &PixelBuffer, _status: &BenchStatus) -> Result<(), RenderError> {
        let path = self.frame_path(self.written);
        write_image(&path, frame).map_err(|e| RenderError::frame(&path, e))?;
        debug!("wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}
