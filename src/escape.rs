// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time function.  A point `c` is iterated through
//! `z ← z² + c` from zero until `|z|` passes the escape radius, and the
//! step at which that happens, smoothed with a logarithmic correction,
//! becomes the point's "velocity."  Points in the two largest interior
//! regions of the set are recognized in closed form and never iterated.

use num::Complex;

/// The default bound on the number of iterations per point.
pub const MAX_ITER: usize = 50;

/// `|z|²` beyond which an orbit is considered escaped: a radius of 4.
pub const ESCAPE_NORM: f64 = 16.0;

/// The outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The orbit escaped; carries the smoothed iteration count.
    Escaped(f64),
    /// The orbit stayed bounded for every permitted iteration.
    Bounded,
}

impl Escape {
    /// The numeric escape result: the smoothed count, or `limit` for
    /// points that never escaped.
    pub fn count(&self, limit: usize) -> f64 {
        match *self {
            Escape::Escaped(count) => count,
            Escape::Bounded => limit as f64,
        }
    }

    /// True for points treated as part of the set's interior.
    pub fn is_bounded(&self) -> bool {
        *self == Escape::Bounded
    }
}

/// Closed-form test for the main cardioid.
#[inline]
pub fn in_main_cardioid(c: Complex<f64>) -> bool {
    let c_norm = c.norm_sqr();
    256.0 * c_norm * c_norm - 96.0 * c_norm + 32.0 * c.re < 3.0
}

/// Closed-form test for the period-2 bulb centred on -1.
#[inline]
pub fn in_main_bulb(c: Complex<f64>) -> bool {
    16.0 * c.norm_sqr() + 32.0 * c.re < -15.0
}

/// Evaluate a point, skipping the iteration entirely for points known
/// to lie in the main cardioid or the main bulb.
#[inline]
pub fn evaluate(c: Complex<f64>, limit: usize) -> Escape {
    if in_main_cardioid(c) || in_main_bulb(c) {
        return Escape::Bounded;
    }
    iterate(c, limit)
}

/// The classic iterator function, without any shortcuts.  Returns the
/// smoothed count `i - log2(log10(|z|²))` for the first step `i` at
/// which `|z|²` exceeds the escape norm.
pub fn iterate(c: Complex<f64>, limit: usize) -> Escape {
    let (mut z_re, mut z_im) = (0.0_f64, 0.0_f64);
    for i in 0..limit {
        let (z_re_sqr, z_im_sqr) = (z_re * z_re, z_im * z_im);
        z_im = 2.0 * z_re * z_im + c.im;
        z_re = z_re_sqr - z_im_sqr + c.re;

        let z_norm = z_re * z_re + z_im * z_im;
        if z_norm > ESCAPE_NORM {
            return Escape::Escaped(i as f64 - z_norm.log10().log2());
        }
    }
    Escape::Bounded
}
