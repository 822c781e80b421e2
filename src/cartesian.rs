use std::fmt::Display;

use crate::{datum::{self, DatumKey}, grid::GridRef, latlon::GeoPoint, utility::ensure_finite, Error};

/// Earth-centred, earth-fixed rectangular coordinates in metres.
///
/// The vector does not record which datum it belongs to; every operation
/// that needs one takes it as a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartesianVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianVector {
    pub const fn new(x: f64, y: f64, z: f64) -> CartesianVector {
        Self { x, y, z }
    }

    /// Straight line distance to `other` in metres.
    pub fn distance(&self, other: &CartesianVector) -> f64 {
        (self.x - other.x)
            .hypot(self.y - other.y)
            .hypot(self.z - other.z)
    }

    /// Interprets the vector on `datum` and converts it to latitude/longitude
    /// on that same datum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericDomain`] for the earth's centre or non-finite
    /// input.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{CartesianVector, DatumKey};
    ///
    /// let v = CartesianVector::new(6_378_137., 0., 0.);
    /// let point = v.to_geographic(DatumKey::Wgs84).unwrap();
    ///
    /// assert!(point.latitude().abs() < 1e-9);
    /// assert!(point.longitude().abs() < 1e-9);
    /// ```
    pub fn to_geographic(&self, datum: DatumKey) -> Result<GeoPoint, Error> {
        ensure_finite("cartesian vector", &[self.x, self.y, self.z])?;
        let (lat, lon) = datum::datum(datum)?.ellipsoid.geographic(self)?;
        Ok(GeoPoint::new(lat, lon, datum))
    }

    /// Interprets the vector on `datum` and re-expresses it on `target`.
    ///
    /// # Errors
    ///
    /// See [`CartesianVector::to_geographic`].
    pub fn to_datum(&self, datum: DatumKey, target: DatumKey) -> Result<CartesianVector, Error> {
        datum::transform_cartesian(self, datum, target)
    }

    /// Interprets the vector on `datum` and projects it onto the national grid.
    ///
    /// # Errors
    ///
    /// See [`CartesianVector::to_geographic`].
    pub fn to_grid(&self, datum: DatumKey) -> Result<GridRef, Error> {
        self.to_geographic(datum)?.to_grid()
    }
}

impl Display for CartesianVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let x = buf.format(self.x);
        let mut buf = ryu::Buffer::new();
        let y = buf.format(self.y);
        let mut buf = ryu::Buffer::new();
        let z = buf.format(self.z);
        write!(
            f,
            "{x} {y} {z}",
        )
    }
}
