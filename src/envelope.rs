// SPDX: CC0-1.0

//! Samples of a parabola `y = ax^2` and of a family of its tangent lines.
//!
//! Everything here is a pure function of its arguments: calling the same
//! operation twice yields the same samples, which is what lets a renderer
//! replay an envelope frame by frame.

use crate::{
    curve::{Parabola, TangentLine},
    linspace, Number, SampleGrid,
};
use core::{fmt, iter::FusedIterator, ops::Range};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnvelopeErr {
    /// a tangent family needs at least one line
    InvalidCount { count: usize },
    /// the tangent intercept `-m^2 / 4a` is undefined for `a == 0`, or
    /// overflows when `4a` is vanishingly small
    DivisionByZero { slope: Number },
}

impl fmt::Display for EnvelopeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount { count } => {
                write!(f, "tangent count must be at least 1, but found {count}")
            }
            Self::DivisionByZero { slope } => write!(
                f,
                "tangent of slope {slope} is undefined because the parabola coefficient is 0 or too close to it"
            ),
        }
    }
}

impl std::error::Error for EnvelopeErr {}

/// `y_i = a * x_i^2` for every sample.
///
/// `a == 0` is not rejected here and yields a flat line.
pub fn evaluate_parabola(xs: &[Number], a: Number) -> Vec<Number> {
    Parabola::new(a).sample(xs)
}

/// `y_i = m * x_i - m^2 / 4a` for every sample.
pub fn evaluate_tangent(m: Number, xs: &[Number], a: Number) -> Result<Vec<Number>, EnvelopeErr> {
    Ok(Parabola::new(a).tangent(m)?.sample(xs))
}

/// `count` evenly spaced slopes from `slope_min` to `slope_max` inclusive.
pub fn generate_slope_sequence(
    slope_min: Number,
    slope_max: Number,
    count: usize,
) -> Result<Vec<Number>, EnvelopeErr> {
    if count == 0 {
        return Err(EnvelopeErr::InvalidCount { count });
    }
    Ok(linspace(slope_min, slope_max, count))
}

/// Every tangent of the family paired with its slope, in slope order.
pub fn generate_envelope(
    a: Number,
    slope_min: Number,
    slope_max: Number,
    count: usize,
    xs: &[Number],
) -> Result<Vec<(Number, Vec<Number>)>, EnvelopeErr> {
    generate_slope_sequence(slope_min, slope_max, count)?
        .into_iter()
        .map(|m| Ok((m, evaluate_tangent(m, xs, a)?)))
        .collect()
}

/// A validated tangent family, ready to be replayed frame by frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    parabola: Parabola,
    slopes: Vec<Number>,
}

impl Envelope {
    pub fn new(a: Number, slopes: Range<Number>, count: usize) -> Result<Self, EnvelopeErr> {
        let slopes = generate_slope_sequence(slopes.start, slopes.end, count)?;
        let parabola = Parabola::new(a);
        // every frame must have a tangent to draw
        for &slope in &slopes {
            parabola.tangent(slope)?;
        }
        Ok(Self { parabola, slopes })
    }

    #[inline]
    pub const fn parabola(&self) -> Parabola {
        self.parabola
    }

    #[inline]
    pub fn slopes(&self) -> &[Number] {
        &self.slopes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    /// Always false: construction requires at least one tangent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }

    pub fn tangent(&self, idx: usize) -> Option<TangentLine> {
        let slope = *self.slopes.get(idx)?;
        self.parabola.tangent(slope).ok()
    }

    /// Starts the sequence from the first tangent. Each call is independent,
    /// so a renderer restarts an animation by calling this again.
    pub fn frames<'a>(&'a self, grid: &'a SampleGrid) -> Frames<'a> {
        Frames {
            envelope: self,
            xs: grid.xs(),
            next: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub slope: Number,
    pub curve: Vec<Number>,
}

#[derive(Clone, Debug)]
pub struct Frames<'a> {
    envelope: &'a Envelope,
    xs: &'a [Number],
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let tangent = self.envelope.tangent(index)?;
        self.next += 1;
        Some(Frame {
            index,
            slope: tangent.slope(),
            curve: tangent.sample(self.xs),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.envelope.len().saturating_sub(self.next);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}
