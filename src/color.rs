// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps escape results to an animated palette.  Each channel is a
//! cosine of the smoothed count, phase-shifted by the animation time,
//! so the palette cycles as the clock advances.

use num::clamp;

use crate::escape::Escape;

/// A single 8-bit RGB pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// The color every buffer starts out as.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Spatial frequency of the red, green and blue channels.
pub const PHASES: [f64; 3] = [0.3, 0.7, 0.9];

#[inline]
fn channel(count: f64, phase: f64, time: f64) -> u8 {
    let v = (127.5 * (count * phase + time).cos() + 127.5).round();
    clamp(v, 0.0, 255.0) as u8
}

/// The color of an escaped point at `time`.  Bounded points have no
/// color: whatever the buffer already holds there is left alone.
#[inline]
pub fn color_of(escape: Escape, time: f64) -> Option<Rgb> {
    match escape {
        Escape::Bounded => None,
        Escape::Escaped(count) => Some(Rgb(
            channel(count, PHASES[0], time),
            channel(count, PHASES[1], time),
            channel(count, PHASES[2], time),
        )),
    }
}
