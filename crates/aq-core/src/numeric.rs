use crate::AqError;

/// Floating point type used throughout the engine.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AqError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AqError::NonFinite { what, value: v })
    }
}

/// Validate a strictly positive, finite quantity (volumes, spacings, depths).
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, AqError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(AqError::InvalidArg { what })
    }
}
