use crate::{cartesian::CartesianVector, utility::GeoMath};

/// Seven parameter Helmert (Bursa-Wolf) similarity transform between two
/// earth-centred cartesian systems.
///
/// Rotations are applied through their first order (small angle)
/// expansion, which is only valid for the few arcseconds found between
/// geodetic datums. Translations are in metres, scale in parts per million
/// and rotations in arcseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HelmertTransform {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub s: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl HelmertTransform {
    /// The transform that leaves every vector untouched.
    pub const IDENTITY: HelmertTransform = HelmertTransform::new(0., 0., 0., 0., 0., 0., 0.);

    #[allow(clippy::too_many_arguments)]
    pub const fn new(tx: f64, ty: f64, tz: f64, s: f64, rx: f64, ry: f64, rz: f64) -> HelmertTransform {
        Self { tx, ty, tz, s, rx, ry, rz }
    }

    pub fn is_identity(&self) -> bool {
        [self.tx, self.ty, self.tz, self.s, self.rx, self.ry, self.rz]
            .iter()
            .all(|v| v.is_zero())
    }

    /// Applies the transform to `v`.
    ///
    /// The identity transform returns `v` bit for bit.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{CartesianVector, HelmertTransform};
    ///
    /// let shift = HelmertTransform::new(10., -5., 2., 0., 0., 0., 0.);
    /// let moved = shift.apply(&CartesianVector::new(1., 1., 1.));
    ///
    /// assert_eq!(moved, CartesianVector::new(11., -4., 3.));
    /// ```
    pub fn apply(&self, v: &CartesianVector) -> CartesianVector {
        if self.is_identity() {
            return *v;
        }

        let s1 = 1. + self.s / 1e6;
        let rx = self.rx.arcsec_to_radians();
        let ry = self.ry.arcsec_to_radians();
        let rz = self.rz.arcsec_to_radians();

        CartesianVector::new(
            self.tx + v.x * s1 - v.y * rz + v.z * ry,
            self.ty + v.x * rz + v.y * s1 - v.z * rx,
            self.tz - v.x * ry + v.y * rx + v.z * s1,
        )
    }

    /// Returns the transform with every parameter negated.
    ///
    /// This inverts the linearised model to first order only: a round trip
    /// leaves a residual of roughly `|t| * (s + r)`, which is about a
    /// centimetre for the larger datum shifts.
    pub fn inverse(&self) -> HelmertTransform {
        HelmertTransform::new(-self.tx, -self.ty, -self.tz, -self.s, -self.rx, -self.ry, -self.rz)
    }
}

impl Default for HelmertTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    const OSGB36: HelmertTransform = HelmertTransform::new(
        -446.448, 125.157, -542.060, 20.4894, -0.1502, -0.2470, -0.8421,
    );

    #[test]
    fn identity_is_exact() {
        let v = CartesianVector::new(3_909_833.018, -147_097.138, 5_020_322.484);
        let out = HelmertTransform::IDENTITY.apply(&v);

        assert_eq!(out.x.to_bits(), v.x.to_bits());
        assert_eq!(out.y.to_bits(), v.y.to_bits());
        assert_eq!(out.z.to_bits(), v.z.to_bits());
    }

    #[test]
    fn inverse_negates() {
        let inv = OSGB36.inverse();

        assert_eq!(inv.tx, 446.448);
        assert_eq!(inv.s, -20.4894);
        assert_eq!(inv.rz, 0.8421);
        assert_eq!(inv.inverse(), OSGB36);
        assert!(HelmertTransform::IDENTITY.inverse().is_identity());
    }

    #[test]
    fn rotation_and_scale() {
        // 1 ppm scale and 1" about z on a vector along x
        let t = HelmertTransform::new(0., 0., 0., 1., 0., 0., 1.);
        let out = t.apply(&CartesianVector::new(1e6, 0., 0.));

        assert_float_eq!(out.x, 1e6 + 1., abs <= 1e-9);
        assert_float_eq!(out.y, 1e6 * 1_f64.arcsec_to_radians(), abs <= 1e-9);
        assert_float_eq!(out.z, 0., abs <= 1e-12);
    }

    #[test]
    fn round_trip_residual_is_second_order() {
        let v = CartesianVector::new(3_790_644.9, -259_013.8, 5_104_571.1);
        let back = OSGB36.inverse().apply(&OSGB36.apply(&v));

        assert!(back.distance(&v) < 0.05);
    }
}
