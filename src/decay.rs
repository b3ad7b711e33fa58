use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// The closed form of applying `v <- max(v_f, v * r)` once per unit of time, so the
/// value never drops below `vf` and lands on it exactly once the product undershoots.
#[derive(Debug, Clone, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Multiplicative {
    /// `rate` must be in `(0, 1]` and `vi` must not be below `vf`
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(Error::invalid_parameter(
                "rate",
                "must be in the interval (0, 1]",
            ));
        }
        if !(vi >= vf) {
            return Err(Error::invalid_parameter(
                "vi",
                "initial value must not be less than the final value",
            ));
        }
        Ok(Self { rate, vi, vf })
    }

    pub fn initial(&self) -> f32 {
        self.vi
    }

    pub fn floor(&self) -> f32 {
        self.vf
    }
}

impl Decay for Multiplicative {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicative_decay() {
        let x = Multiplicative::new(0.5, 2.0, 0.1).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.0);
        assert_eq!(x.evaluate(2.0), 0.5);
    }

    #[test]
    fn multiplicative_decay_floors_exactly() {
        let x = Multiplicative::new(0.995, 1.0, 0.1).unwrap();
        assert_eq!(x.evaluate(10_000.0), 0.1);
        let mut prev = x.evaluate(0.0);
        for t in 1..1000 {
            let eps = x.evaluate(t as f32);
            assert!(eps <= prev, "never increases");
            assert!(eps >= 0.1, "never below the floor");
            prev = eps;
        }
    }

    #[test]
    fn multiplicative_validation() {
        assert!(Multiplicative::new(1.0, 1.0, 1.0).is_ok());
        assert!(Multiplicative::new(0.0, 1.0, 0.1).is_err());
        assert!(Multiplicative::new(1.5, 1.0, 0.1).is_err());
        assert!(Multiplicative::new(0.9, 0.1, 1.0).is_err());
    }
}
