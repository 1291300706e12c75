use crate::errors::VerdictError;

// Validation
pub(crate) fn validate_fraction(value: f64, parameter: &'static str) -> Result<(), VerdictError> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(VerdictError::InvalidFraction { parameter, value });
    }
    Ok(())
}

/// Round a number to the given number of decimal digits.
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
