use std::fmt::Display;

use crate::{
    cartesian::CartesianVector,
    datum::{self, DatumKey},
    ellipsoid::Ellipsoid,
    grid::GridRef,
    latlon::GeoPoint,
    utility::ensure_finite,
    Error,
};

/// A position in any of the three supported representations.
///
/// A cartesian vector carries no datum of its own, so the variant holds the
/// datum the vector is to be read on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Location {
    Geographic(GeoPoint),
    Cartesian {
        vector: CartesianVector,
        datum: DatumKey,
    },
    Grid(GridRef),
}

impl Location {
    pub fn cartesian(vector: CartesianVector, datum: DatumKey) -> Location {
        Location::Cartesian { vector, datum }
    }

    /// The datum the location is expressed on. Grid references report the
    /// national grid's datum.
    pub fn datum(&self) -> DatumKey {
        match self {
            Location::Geographic(point) => point.datum(),
            Location::Cartesian { datum, .. } => *datum,
            Location::Grid(grid) => grid.datum(),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownReferenceKey`] if the datum is not registered.
    pub fn ellipsoid(&self) -> Result<Ellipsoid, Error> {
        match self {
            Location::Grid(grid) => Ok(grid.ellipsoid()),
            _ => Ok(datum::datum(self.datum())?.ellipsoid),
        }
    }

    /// Converts to latitude/longitude on `target`.
    ///
    /// # Errors
    ///
    /// Propagates the conversion errors of the underlying representation.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{DatumKey, GridRef, Location};
    ///
    /// let location = Location::from(GridRef::new(277656., 549165.));
    /// let point = location.to_geographic(DatumKey::Wgs84).unwrap();
    ///
    /// assert!((point.latitude() - 54.822218).abs() < 1e-3);
    /// ```
    pub fn to_geographic(&self, target: DatumKey) -> Result<GeoPoint, Error> {
        match self {
            Location::Geographic(point) => point.to_geographic(target),
            Location::Cartesian { vector, datum } => {
                vector.to_geographic(*datum)?.to_geographic(target)
            }
            Location::Grid(grid) => grid.to_geographic(target),
        }
    }

    /// Converts to a cartesian vector on [`Location::datum`].
    ///
    /// # Errors
    ///
    /// Propagates the conversion errors of the underlying representation.
    pub fn to_cartesian(&self) -> Result<CartesianVector, Error> {
        match self {
            Location::Geographic(point) => point.to_cartesian(),
            Location::Cartesian { vector, .. } => {
                ensure_finite("cartesian vector", &[vector.x, vector.y, vector.z])?;
                Ok(*vector)
            }
            Location::Grid(grid) => grid.to_cartesian(),
        }
    }

    /// Projects onto the national grid.
    ///
    /// # Errors
    ///
    /// Propagates the conversion errors of the underlying representation.
    pub fn to_grid(&self) -> Result<GridRef, Error> {
        match self {
            Location::Geographic(point) => point.to_grid(),
            Location::Cartesian { vector, datum } => vector.to_grid(*datum),
            Location::Grid(grid) => Ok(*grid),
        }
    }

    /// Latitude in degrees on [`Location::datum`].
    ///
    /// # Errors
    ///
    /// See [`Location::to_geographic`].
    pub fn latitude(&self) -> Result<f64, Error> {
        Ok(self.to_geographic(self.datum())?.latitude())
    }

    /// Longitude in degrees on [`Location::datum`].
    ///
    /// # Errors
    ///
    /// See [`Location::to_geographic`].
    pub fn longitude(&self) -> Result<f64, Error> {
        Ok(self.to_geographic(self.datum())?.longitude())
    }
}

impl From<GeoPoint> for Location {
    fn from(value: GeoPoint) -> Self {
        Location::Geographic(value)
    }
}

impl From<GridRef> for Location {
    fn from(value: GridRef) -> Self {
        Location::Grid(value)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Geographic(point) => write!(f, "{point}"),
            Location::Cartesian { vector, datum } => write!(f, "{vector} {datum}"),
            Location::Grid(grid) => write!(f, "{grid}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn variants_agree() {
        let grid = GridRef::new(277_656., 549_165.);
        let point = grid.to_geographic(DatumKey::Osgb36).unwrap();
        let vector = point.to_cartesian().unwrap();

        let locations = [
            Location::from(grid),
            Location::from(point),
            Location::cartesian(vector, DatumKey::Osgb36),
        ];

        for location in locations {
            assert_eq!(location.datum(), DatumKey::Osgb36);
            assert_eq!(location.ellipsoid().unwrap().a, 6_377_563.396);
            assert_float_eq!(location.latitude().unwrap(), point.latitude(), abs <= 1e-9);
            assert_float_eq!(location.longitude().unwrap(), point.longitude(), abs <= 1e-9);

            let back = location.to_grid().unwrap();
            assert_float_eq!(back.easting(), grid.easting(), abs <= 1e-3);
            assert_float_eq!(back.northing(), grid.northing(), abs <= 1e-3);
        }
    }

    #[test]
    fn geographic_on_own_datum_is_unchanged() {
        let point = GeoPoint::create(51.5, -0.12, DatumKey::Ed50).unwrap();
        let location = Location::from(point);

        assert_eq!(location.to_geographic(DatumKey::Ed50).unwrap(), point);
        assert_eq!(location.to_cartesian().unwrap(), point.to_cartesian().unwrap());
    }

    #[test]
    fn cartesian_needs_its_datum() {
        let wgs84 = GeoPoint::create(51.5, -0.12, DatumKey::Wgs84).unwrap();
        let vector = wgs84.to_cartesian().unwrap();

        let as_wgs84 = Location::cartesian(vector, DatumKey::Wgs84);
        let as_osgb36 = Location::cartesian(vector, DatumKey::Osgb36);

        assert_float_eq!(as_wgs84.latitude().unwrap(), 51.5, abs <= 1e-6);
        // Same vector, different ellipsoid, different latitude
        assert!((as_osgb36.latitude().unwrap() - 51.5).abs() > 1e-4);
    }

    #[test]
    fn cartesian_onto_another_datum() {
        let osgb = GridRef::new(277_656., 549_165.).to_geographic(DatumKey::Osgb36).unwrap();
        let vector = osgb.to_cartesian().unwrap();
        let location = Location::cartesian(vector, DatumKey::Osgb36);

        // Same result as moving the geographic point across
        let expected = osgb.to_geographic(DatumKey::Ed50).unwrap();
        let ed50 = location.to_geographic(DatumKey::Ed50).unwrap();
        assert_eq!(ed50.datum(), DatumKey::Ed50);
        assert_float_eq!(ed50.latitude(), expected.latitude(), abs <= 1e-9);
        assert_float_eq!(ed50.longitude(), expected.longitude(), abs <= 1e-9);
        assert!((ed50.longitude() - osgb.longitude()).abs() > 1e-4);

        // And the same again when the vector itself is pivoted
        let pivoted = vector
            .to_datum(DatumKey::Osgb36, DatumKey::Ed50)
            .unwrap()
            .to_geographic(DatumKey::Ed50)
            .unwrap();
        assert_float_eq!(pivoted.latitude(), expected.latitude(), abs <= 1e-9);
        assert_float_eq!(pivoted.longitude(), expected.longitude(), abs <= 1e-9);
    }

    #[test]
    fn non_finite_cartesian_is_rejected() {
        let location = Location::cartesian(CartesianVector::new(f64::INFINITY, 0., 0.), DatumKey::Wgs84);

        assert!(matches!(location.to_cartesian(), Err(Error::NumericDomain(_))));
        assert!(matches!(location.to_geographic(DatumKey::Ed50), Err(Error::NumericDomain(_))));
    }
}
