use std::fmt::Display;

use crate::{
    cartesian::CartesianVector,
    constants::EARTH_MEAN_RADIUS_M,
    datum::{self, DatumKey},
    ellipsoid::Ellipsoid,
    grid::GridRef,
    projections::national_grid::NationalGrid,
    utility::ensure_finite,
    Error,
};

/// Latitude/longitude in decimal degrees on a named datum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
    pub(crate) datum: DatumKey,
}

impl GeoPoint {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64, datum: DatumKey) -> GeoPoint {
        Self {
            latitude: lat,
            longitude: lon,
            datum,
        }
    }

    /// Tries to create a point from a lat/lon pair on `datum`. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range [-180,180]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if either latitude or longitude are invalid.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{DatumKey, GeoPoint};
    ///
    /// let coord = GeoPoint::create(54.822218, -3.906009, DatumKey::Wgs84);
    ///
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    ///
    /// assert_eq!(coord.latitude(), 54.822218);
    /// assert_eq!(coord.longitude(), -3.906009);
    /// assert_eq!(coord.datum(), DatumKey::Wgs84);
    ///
    /// let invalid_coord_lat = GeoPoint::create(100.0, 0.0, DatumKey::Wgs84);
    /// assert!(invalid_coord_lat.is_err());
    ///
    /// let invalid_coord_lon = GeoPoint::create(0.0, -200.0, DatumKey::Wgs84);
    /// assert!(invalid_coord_lon.is_err());
    /// ```
    pub fn create(lat: f64, lon: f64, datum: DatumKey) -> Result<GeoPoint, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !(-180_f64..=180_f64).contains(&lon) {
            Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range [-180, 180].")))
        } else {
            Ok(GeoPoint::new(lat, lon, datum))
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn datum(&self) -> DatumKey {
        self.datum
    }

    /// Returns the ellipsoid of the point's datum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownReferenceKey`] if the datum is not registered.
    pub fn ellipsoid(&self) -> Result<Ellipsoid, Error> {
        Ok(datum::datum(self.datum)?.ellipsoid)
    }

    /// Converts to earth-centred cartesian coordinates on the point's own
    /// datum, at zero ellipsoidal height.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownReferenceKey`] if the datum is not registered,
    /// or [`Error::NumericDomain`] if latitude or longitude is not finite.
    pub fn to_cartesian(&self) -> Result<CartesianVector, Error> {
        ensure_finite("geographic position", &[self.latitude, self.longitude])?;
        Ok(self.ellipsoid()?.cartesian(self.latitude, self.longitude))
    }

    /// Expresses the point on `target`. A point already on `target` is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericDomain`] if the transformed position is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{DatumKey, GeoPoint};
    ///
    /// let coord = GeoPoint::create(54.822218, -3.906009, DatumKey::Wgs84).unwrap();
    /// let osgb = coord.to_geographic(DatumKey::Osgb36).unwrap();
    ///
    /// assert_eq!(osgb.datum(), DatumKey::Osgb36);
    /// // OSGB36 sits roughly 100m east of WGS84 in Scotland
    /// assert!(osgb.longitude() > coord.longitude());
    /// ```
    pub fn to_geographic(&self, target: DatumKey) -> Result<GeoPoint, Error> {
        datum::transform_point(self, target)
    }

    /// Projects the point onto the national grid, moving it onto the grid's
    /// datum first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericDomain`] if the projected position is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{DatumKey, GeoPoint};
    ///
    /// let coord = GeoPoint::create(52.657570, 1.717922, DatumKey::Osgb36).unwrap();
    /// let grid = coord.to_grid().unwrap();
    ///
    /// assert!((grid.easting() - 651409.903).abs() < 0.1);
    /// assert!((grid.northing() - 313177.270).abs() < 0.1);
    /// ```
    pub fn to_grid(&self) -> Result<GridRef, Error> {
        NationalGrid::osgb().forward(self)
    }

    /// Returns the distance in meters between two points
    /// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula),
    /// after bringing `other` onto this point's datum.
    /// Uses the [mean radius of the Earth](https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius)
    /// in the calculation: `6371.0088`
    ///
    /// # Errors
    ///
    /// Returns an error if `other` cannot be moved onto this point's datum.
    pub fn haversine(&self, other: &GeoPoint) -> Result<f64, Error> {
        let other = other.to_geographic(self.datum)?;
        let lat1_r = self.latitude.to_radians();
        let lat2_r = other.latitude.to_radians();

        Ok(2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.latitude - self.latitude).to_radians() / 2.0).sin().powi(2) +
            lat1_r.cos() * lat2_r.cos() *
            ((other.longitude - self.longitude).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin())
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon} {}",
            self.datum,
        )
    }
}
