//! A `min <= opt <= max` length triple.

use crate::geometry::Length;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// An immutable length range with an optimum.
///
/// Constructors keep `min <= opt <= max`; operations that could break the
/// ordering clamp instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MinOptMax {
    min: Length,
    opt: Length,
    max: Length,
}

impl MinOptMax {
    pub const ZERO: MinOptMax = MinOptMax { min: 0, opt: 0, max: 0 };

    /// Builds a triple, reordering the values if needed.
    pub fn new(min: Length, opt: Length, max: Length) -> Self {
        let min = min.min(max);
        let opt = opt.clamp(min, max.max(min));
        Self { min, opt, max: max.max(opt) }
    }

    /// A triple with no stretch or shrink.
    pub fn stiff(value: Length) -> Self {
        Self { min: value, opt: value, max: value }
    }

    pub fn min(&self) -> Length {
        self.min
    }

    pub fn opt(&self) -> Length {
        self.opt
    }

    pub fn max(&self) -> Length {
        self.max
    }

    pub fn stretch(&self) -> Length {
        self.max - self.opt
    }

    pub fn shrink(&self) -> Length {
        self.opt - self.min
    }

    pub fn is_stiff(&self) -> bool {
        self.min == self.max
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Raises the minimum to `new_min`, dragging `opt` and `max` up with it.
    pub fn extend_minimum(&self, new_min: Length) -> Self {
        if self.min < new_min {
            Self {
                min: new_min,
                opt: self.opt.max(new_min),
                max: self.max.max(new_min),
            }
        } else {
            *self
        }
    }

    pub fn mult(&self, factor: i32) -> Self {
        Self::new(self.min * factor, self.opt * factor, self.max * factor)
    }
}

impl Add for MinOptMax {
    type Output = MinOptMax;

    fn add(self, rhs: MinOptMax) -> MinOptMax {
        MinOptMax {
            min: self.min + rhs.min,
            opt: self.opt + rhs.opt,
            max: self.max + rhs.max,
        }
    }
}

impl Add<Length> for MinOptMax {
    type Output = MinOptMax;

    fn add(self, rhs: Length) -> MinOptMax {
        MinOptMax {
            min: self.min + rhs,
            opt: self.opt + rhs,
            max: self.max + rhs,
        }
    }
}

impl Sub<Length> for MinOptMax {
    type Output = MinOptMax;

    fn sub(self, rhs: Length) -> MinOptMax {
        MinOptMax {
            min: self.min - rhs,
            opt: self.opt - rhs,
            max: self.max - rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_ordering() {
        let m = MinOptMax::new(10, 5, 20);
        assert_eq!((m.min(), m.opt(), m.max()), (10, 10, 20));

        let m = MinOptMax::new(30, 40, 20);
        assert!(m.min() <= m.opt() && m.opt() <= m.max());
    }

    #[test]
    fn test_extend_minimum() {
        let m = MinOptMax::new(0, 100, 200);
        assert_eq!(m.extend_minimum(150), MinOptMax::new(150, 150, 200));
        assert_eq!(m.extend_minimum(300), MinOptMax::stiff(300));
        assert_eq!(m.extend_minimum(-5), m);
    }

    #[test]
    fn test_stretch_and_shrink() {
        let m = MinOptMax::new(80, 100, 150) + MinOptMax::stiff(10);
        assert_eq!(m.shrink(), 20);
        assert_eq!(m.stretch(), 50);
        assert_eq!(m.opt(), 110);
        assert!(!m.is_stiff());
        assert!(MinOptMax::stiff(3).is_stiff());
    }
}
