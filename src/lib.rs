#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::many_single_char_names,
    clippy::similar_names
)]

use thiserror::Error;

pub mod cartesian;
pub mod datum;
pub mod ellipsoid;
pub mod grid;
pub mod helmert;
pub mod latlon;
pub mod location;
pub mod utility;

pub use cartesian::CartesianVector;
pub use datum::{Datum, DatumKey};
pub use ellipsoid::{Ellipsoid, EllipsoidKey};
pub use grid::GridRef;
pub use helmert::HelmertTransform;
pub use latlon::GeoPoint;
pub use location::Location;
pub use projections::national_grid::NationalGrid;

pub mod projections {
    pub mod national_grid;
}

pub(crate) mod constants;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown reference key: {0}")]
    UnknownReferenceKey(String),
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),
    #[error("Inverse grid projection did not converge after {iterations} iterations (residual {residual} m)")]
    Convergence {
        iterations: usize,
        residual: f64,
    },
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
}

/// Converts a national grid easting/northing pair to latitude/longitude
/// (degrees) on `datum`.
///
/// # Errors
///
/// Returns [`Error::Convergence`] if the inverse projection does not settle,
/// or [`Error::NumericDomain`] if the result is not finite.
///
/// # Usage
///
/// ```
/// use geodatum::{to_geographic, DatumKey};
///
/// let (lat, lon) = to_geographic(277656., 549165., DatumKey::Wgs84).unwrap();
///
/// assert!((lat - 54.822218).abs() < 1e-3);
/// assert!((lon - -3.906009).abs() < 1e-3);
/// ```
pub fn to_geographic(easting: f64, northing: f64, datum: DatumKey) -> Result<(f64, f64), Error> {
    let point = GridRef::new(easting, northing).to_geographic(datum)?;
    Ok((point.latitude(), point.longitude()))
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }
}
