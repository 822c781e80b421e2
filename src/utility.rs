use log::warn;

use crate::Error;

#[allow(dead_code)]
pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: f64 = 90.;
    /// Minutes per degree
    pub const DM: f64 = 60.;
    /// Seconds per minute
    pub const MS: f64 = 60.;
    /// Seconds per degree
    pub const DS: f64 = DM * MS;
}

/// Evaluate a polynomial
pub(crate) fn polyval(p: &[f64], x: f64) -> f64 {
    p
        .iter()
        .fold(0_f64, |acc, val| acc*x + val)
}

/// Fails with [`Error::NumericDomain`] unless every value is finite.
pub(crate) fn ensure_finite(context: &str, values: &[f64]) -> Result<(), Error> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        warn!("Rejecting non-finite {context}: {values:?}");
        Err(Error::NumericDomain(format!("{context} is not finite: {values:?}")))
    }
}

pub(crate) trait GeoMath {
    fn is_zero(&self) -> bool;
    fn arcsec_to_radians(&self) -> Self;
    fn round_to(&self, decimals: i32) -> Self;
}

impl GeoMath for f64 {
    fn is_zero(&self) -> bool {
        self.abs() < f64::EPSILON
    }

    fn arcsec_to_radians(&self) -> f64 {
        (*self / dms::DS).to_radians()
    }

    fn round_to(&self, decimals: i32) -> f64 {
        let scale = 10_f64.powi(decimals);
        (*self * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn rounding() {
        assert_float_eq!(277_655.998_4_f64.round_to(3), 277_655.998, abs <= 1e-9);
        assert_float_eq!(549_165.016_6_f64.round_to(3), 549_165.017, abs <= 1e-9);
        assert_float_eq!((-0.000_4_f64).round_to(3), 0.0, abs <= 1e-12);
    }

    #[test]
    fn arcseconds() {
        assert_float_eq!(3600_f64.arcsec_to_radians(), 1_f64.to_radians(), ulps <= 2);
        assert!(0_f64.arcsec_to_radians().is_zero());
    }

    #[test]
    fn polynomial() {
        // 2x² + 3x + 4 at x = 2
        assert_float_eq!(polyval(&[2., 3., 4.], 2.), 18., abs <= 1e-12);
    }

    #[test]
    fn finiteness() {
        assert!(ensure_finite("pair", &[1., 2.]).is_ok());
        assert!(matches!(ensure_finite("pair", &[1., f64::NAN]), Err(Error::NumericDomain(_))));
    }
}
