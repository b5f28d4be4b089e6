use crate::DfnError;

/// Floating point type used throughout the model.
pub type Real = f64;

/// Absolute and relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Threshold below which a value is considered zero relative to `scale`.
    pub fn threshold(&self, scale: Real) -> Real {
        self.abs + self.rel * scale.abs()
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DfnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DfnError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn is_strictly_positive(v: Real) -> bool {
    v.is_finite() && v > 0.0
}
