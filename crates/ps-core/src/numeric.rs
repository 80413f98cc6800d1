use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::NotPositive { what, value: v })
    }
}

/// Finite and inside the open interval `(min, max)`.
pub fn ensure_open_interval(
    v: Real,
    min: Real,
    max: Real,
    what: &'static str,
) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > min && v < max {
        Ok(v)
    } else {
        Err(CoreError::OutOfRange {
            what,
            value: v,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1e-9, "dp").is_ok());
        assert!(matches!(
            ensure_positive(0.0, "dp"),
            Err(CoreError::NotPositive { what: "dp", .. })
        ));
        assert!(ensure_positive(-4e5, "dp").is_err());
        assert!(ensure_positive(Real::INFINITY, "dp").is_err());
    }

    #[test]
    fn open_interval_excludes_endpoints() {
        assert!(ensure_open_interval(0.5, 0.0, 1.0, "phi").is_ok());
        assert!(ensure_open_interval(0.0, 0.0, 1.0, "phi").is_err());
        assert!(ensure_open_interval(1.0, 0.0, 1.0, "phi").is_err());
    }
}
