// SPDX: CC0-1.0

pub mod curve;
pub mod envelope;
pub mod gnuplot;
pub mod shell;

use core::{fmt, num::NonZeroU16, ops::Range};

pub type Number = f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

/// Visible region of the plane, drawn like a textbook coordinate plane: axes
/// cross at the origin and both share one scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub x: Range<Number>,
    pub y: Range<Number>,
    /// distance between major tics on both axes
    pub tick: Number,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            x: -20.0..20.0,
            y: -5.0..10.0,
            tick: 5.0,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("x range", &self.x)
            .field("y range", &self.y)
            .field("tick", &self.tick)
            .finish()
    }
}

const DEFAULT_SAMPLES: NonZeroU16 = match NonZeroU16::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Evenly spaced x coordinates every curve is evaluated on.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    domain: Range<Number>,
    samples: NonZeroU16,
    xs: Vec<Number>,
}

impl SampleGrid {
    pub fn new(domain: Range<Number>, samples: NonZeroU16) -> Self {
        let xs = linspace(domain.start, domain.end, usize::from(samples.get()));
        Self {
            domain,
            samples,
            xs,
        }
    }

    #[inline]
    pub fn domain(&self) -> &Range<Number> {
        &self.domain
    }

    #[inline]
    pub const fn samples(&self) -> NonZeroU16 {
        self.samples
    }

    #[inline]
    pub fn xs(&self) -> &[Number] {
        &self.xs
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self::new(-20.0..20.0, DEFAULT_SAMPLES)
    }
}

impl fmt::Display for SampleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleGrid")
            .field("domain", &self.domain)
            .field("samples", &self.samples)
            .finish()
    }
}

/// `count` evenly spaced values from `start` to `end`, both included.
///
/// With a single sample the result is `[start]`. The last sample is pinned to
/// `end` so accumulated rounding never moves the closing endpoint.
pub fn linspace(start: Number, end: Number, count: usize) -> Vec<Number> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            // precision loss only past 2^53 samples
            let step = (end - start) / (count - 1) as Number;
            let mut ret: Vec<Number> = (0..count).map(|i| start + step * i as Number).collect();
            if let Some(last) = ret.last_mut() {
                *last = end;
            }
            ret
        }
    }
}
