use std::fmt::Display;

use crate::{
    cartesian::CartesianVector,
    datum::DatumKey,
    ellipsoid::Ellipsoid,
    latlon::GeoPoint,
    projections::national_grid::NationalGrid,
    utility::ensure_finite,
    Error,
};

/// Easting/northing in metres on the British national grid.
///
/// Grid coordinates always belong to the national grid projection and its
/// OSGB36 datum; converting to any other datum goes through
/// [`GridRef::to_geographic`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRef {
    #[cfg_attr(feature = "serde", serde(alias = "e"))]
    pub(crate) easting: f64,
    #[cfg_attr(feature = "serde", serde(alias = "n"))]
    pub(crate) northing: f64,
}

impl GridRef {
    /// Unchecked constructor, non-finite values surface when converting
    pub const fn new(easting: f64, northing: f64) -> GridRef {
        Self {
            easting,
            northing,
        }
    }

    /// Creates a grid reference, rejecting non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if easting or northing is NaN or infinite.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::GridRef;
    ///
    /// let grid = GridRef::create(277656., 549165.).unwrap();
    ///
    /// assert_eq!(grid.easting(), 277656.);
    /// assert_eq!(grid.northing(), 549165.);
    ///
    /// assert!(GridRef::create(f64::NAN, 549165.).is_err());
    /// ```
    pub fn create(easting: f64, northing: f64) -> Result<GridRef, Error> {
        ensure_finite("grid reference", &[easting, northing])
            .map_err(|_| Error::InvalidCoord(format!("Grid reference ({easting}, {northing}) is not finite.")))?;
        Ok(GridRef::new(easting, northing))
    }

    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// The datum of the national grid projection.
    pub fn datum(&self) -> DatumKey {
        NationalGrid::osgb().datum()
    }

    /// The ellipsoid of the national grid projection.
    pub fn ellipsoid(&self) -> Ellipsoid {
        NationalGrid::osgb().ellipsoid()
    }

    /// Planar distance on the grid in metres.
    pub fn distance(&self, other: &GridRef) -> f64 {
        (self.easting - other.easting).hypot(self.northing - other.northing)
    }

    /// Converts to latitude/longitude on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Convergence`] if the inverse projection does not settle,
    /// or [`Error::NumericDomain`] if the result is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{DatumKey, GridRef};
    ///
    /// let grid = GridRef::new(277656., 549165.);
    /// let point = grid.to_geographic(DatumKey::Wgs84).unwrap();
    ///
    /// assert!((point.latitude() - 54.822218).abs() < 1e-3);
    /// assert!((point.longitude() - -3.906009).abs() < 1e-3);
    /// ```
    pub fn to_geographic(&self, target: DatumKey) -> Result<GeoPoint, Error> {
        NationalGrid::osgb().inverse(self)?.to_geographic(target)
    }

    /// Converts to earth-centred cartesian coordinates on the grid's datum.
    ///
    /// # Errors
    ///
    /// See [`GridRef::to_geographic`].
    pub fn to_cartesian(&self) -> Result<CartesianVector, Error> {
        self.to_geographic(self.datum())?.to_cartesian()
    }
}

impl Display for GridRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(
            f,
            "{easting} {northing}",
        )
    }
}
