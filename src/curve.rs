// SPDX: CC0-1.0

use crate::{envelope::EnvelopeErr, Number, Point};
use core::fmt;

/// `y = ax + b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: Number,
    pub b: Number,
}

impl Line {
    #[inline]
    pub const fn new(a: Number, b: Number) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn at(&self, x: Number) -> Number {
        self.a * x + self.b
    }

    pub fn sample(&self, xs: &[Number]) -> Vec<Number> {
        xs.iter().map(|&x| self.at(x)).collect()
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.b < 0.0 {
            write!(f, "y = {a}x - {b}", a = self.a, b = -self.b)
        } else {
            write!(f, "y = {a}x + {b}", a = self.a, b = self.b)
        }
    }
}

/// `y = ax^2`, vertex at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parabola {
    pub a: Number,
}

impl Parabola {
    #[inline]
    pub const fn new(a: Number) -> Self {
        Self { a }
    }

    /// With `a == 0` the parabola collapses onto the x axis and has no
    /// well-defined tangent family.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0
    }

    #[inline]
    pub fn at(&self, x: Number) -> Number {
        self.a * x * x
    }

    #[inline]
    pub fn derivative_at(&self, x: Number) -> Number {
        2.0 * self.a * x
    }

    pub fn sample(&self, xs: &[Number]) -> Vec<Number> {
        xs.iter().map(|&x| self.at(x)).collect()
    }

    /// The line of slope `slope` touching this parabola.
    ///
    /// Fails when `a` is 0, and also when `4a` is so small (or `a` so
    /// malformed) that the intercept is not a finite number.
    pub fn tangent(&self, slope: Number) -> Result<TangentLine, EnvelopeErr> {
        if self.is_degenerate() {
            return Err(EnvelopeErr::DivisionByZero { slope });
        }
        let intercept = -(slope * slope) / (4.0 * self.a);
        if !intercept.is_finite() {
            return Err(EnvelopeErr::DivisionByZero { slope });
        }
        Ok(TangentLine {
            slope,
            intercept,
            a: self.a,
        })
    }
}

impl fmt::Display for Parabola {
    // f64 display already drops the fraction of integral values, so a = 1
    // prints as "y = 1x^2"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {}x^2", self.a)
    }
}

/// `y = mx + c` with `c = -m^2 / 4a`, tangent to `y = ax^2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentLine {
    slope: Number,
    intercept: Number,
    a: Number, // coefficient of the parabola this line touches, never zero
}

impl TangentLine {
    #[inline]
    pub const fn slope(&self) -> Number {
        self.slope
    }

    #[inline]
    pub const fn intercept(&self) -> Number {
        self.intercept
    }

    #[inline]
    pub fn at(&self, x: Number) -> Number {
        self.slope * x + self.intercept
    }

    pub fn sample(&self, xs: &[Number]) -> Vec<Number> {
        xs.iter().map(|&x| self.at(x)).collect()
    }

    /// Where the line meets its parabola: `x = m / 2a`, `y = m^2 / 4a`.
    pub fn touch_point(&self) -> Point<Number> {
        let x = self.slope / (2.0 * self.a);
        Point {
            x,
            y: Parabola::new(self.a).at(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn line_values() {
        let line = Line::default();
        assert_eq!(line.sample(&[-2.0, 0.0, 3.5]), vec![-2.0, 0.0, 3.5]);

        let line = Line::new(0.5, -1.0);
        assert_eq!(line.at(4.0), 1.0);
        assert_eq!(line.to_string(), "y = 0.5x - 1");
    }

    #[test]
    fn parabola_display_drops_integral_fraction() {
        assert_eq!(Parabola::new(1.0).to_string(), "y = 1x^2");
        assert_eq!(Parabola::new(0.2).to_string(), "y = 0.2x^2");
    }

    #[test]
    fn degenerate_parabola_has_no_tangent() {
        let p = Parabola::new(0.0);
        assert!(p.is_degenerate());
        assert_eq!(p.at(5.0), 0.0);
        assert_eq!(
            p.tangent(1.5),
            Err(EnvelopeErr::DivisionByZero { slope: 1.5 })
        );
    }

    #[test]
    fn tangent_needs_finite_intercept() {
        // 4a is subnormal, 1 / 4a overflows
        let tiny = Parabola::new(1e-320);
        assert!(!tiny.is_degenerate());
        assert_eq!(
            tiny.tangent(1.0),
            Err(EnvelopeErr::DivisionByZero { slope: 1.0 })
        );
        // a horizontal tangent stays at the vertex
        assert_eq!(tiny.tangent(0.0).unwrap().intercept(), 0.0);

        assert!(Parabola::new(Number::NAN).tangent(2.0).is_err());
        assert!(Parabola::new(1.0).tangent(Number::INFINITY).is_err());
    }

    #[test]
    fn tangent_touches_once() {
        for a in [0.2, 1.0, -3.0] {
            let p = Parabola::new(a);
            for m in [-10.0, -1.0, 0.0, 0.25, 7.0] {
                let t = p.tangent(m).unwrap();
                let touch = t.touch_point();
                assert_relative_eq!(touch.x, m / (2.0 * a), epsilon = 1e-12);
                assert_relative_eq!(t.at(touch.x), p.at(touch.x), epsilon = 1e-9);
                assert_relative_eq!(p.derivative_at(touch.x), t.slope(), epsilon = 1e-12);

                // the gap p(x) - t(x) = a (x - x0)^2 only vanishes at x0
                for dx in [-1.0, -0.1, 0.1, 1.0] {
                    let x = touch.x + dx;
                    assert_relative_eq!(p.at(x) - t.at(x), a * dx * dx, epsilon = 1e-9);
                }
            }
        }
    }
}
