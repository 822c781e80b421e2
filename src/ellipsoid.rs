use std::{collections::HashMap, f64::consts::FRAC_PI_2, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use log::info;

use crate::{
    cartesian::CartesianVector,
    constants::{NATIONAL_GRID_A, NATIONAL_GRID_B, NATIONAL_GRID_F},
    utility::{dms, ensure_finite, GeoMath},
    Error, ThisOrThat,
};

/// Names of the built-in reference ellipsoids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EllipsoidKey {
    Wgs84,
    Airy1830,
    AiryModified,
    Bessel1841,
    Clarke1866,
    Clarke1880Ign,
    Grs80,
    Intl1924,
    Wgs72,
}

impl EllipsoidKey {
    pub const ALL: [EllipsoidKey; 9] = [
        EllipsoidKey::Wgs84,
        EllipsoidKey::Airy1830,
        EllipsoidKey::AiryModified,
        EllipsoidKey::Bessel1841,
        EllipsoidKey::Clarke1866,
        EllipsoidKey::Clarke1880Ign,
        EllipsoidKey::Grs80,
        EllipsoidKey::Intl1924,
        EllipsoidKey::Wgs72,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EllipsoidKey::Wgs84 => "WGS84",
            EllipsoidKey::Airy1830 => "Airy1830",
            EllipsoidKey::AiryModified => "AiryModified",
            EllipsoidKey::Bessel1841 => "Bessel1841",
            EllipsoidKey::Clarke1866 => "Clarke1866",
            EllipsoidKey::Clarke1880Ign => "Clarke1880IGN",
            EllipsoidKey::Grs80 => "GRS80",
            EllipsoidKey::Intl1924 => "Intl1924",
            EllipsoidKey::Wgs72 => "WGS72",
        }
    }
}

impl Display for EllipsoidKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EllipsoidKey {
    type Err = Error;

    /// Case-insensitive lookup by canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EllipsoidKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownReferenceKey(s.to_string()))
    }
}

/// Reference ellipsoid. `b` and `f` are stored as published rather than
/// derived from each other.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    pub a: f64,
    pub b: f64,
    pub f: f64,
}

lazy_static! {
    static ref ELLIPSOIDS: HashMap<EllipsoidKey, Ellipsoid> = {
        let table = HashMap::from([
            (EllipsoidKey::Wgs84, Ellipsoid::new(6_378_137., 6_356_752.314_245, 1. / 298.257_223_563)),
            (EllipsoidKey::Airy1830, Ellipsoid::new(NATIONAL_GRID_A, NATIONAL_GRID_B, NATIONAL_GRID_F)),
            (EllipsoidKey::AiryModified, Ellipsoid::new(6_377_340.189, 6_356_034.448, 1. / 299.324_964_6)),
            (EllipsoidKey::Bessel1841, Ellipsoid::new(6_377_397.155, 6_356_078.962_818, 1. / 299.152_812_8)),
            (EllipsoidKey::Clarke1866, Ellipsoid::new(6_378_206.4, 6_356_583.8, 1. / 294.978_698_214)),
            (EllipsoidKey::Clarke1880Ign, Ellipsoid::new(6_378_249.2, 6_356_515.0, 1. / 293.466_021_294)),
            (EllipsoidKey::Grs80, Ellipsoid::new(6_378_137., 6_356_752.314_140, 1. / 298.257_222_101)),
            (EllipsoidKey::Intl1924, Ellipsoid::new(6_378_388., 6_356_911.946, 1. / 297.)),
            (EllipsoidKey::Wgs72, Ellipsoid::new(6_378_135., 6_356_750.52, 1. / 298.26)),
        ]);
        info!("Initialised ellipsoid registry with {} entries", table.len());
        table
    };
}

/// Looks up a built-in ellipsoid.
///
/// # Errors
///
/// Returns [`Error::UnknownReferenceKey`] if `key` has no table entry.
///
/// # Usage
///
/// ```
/// use geodatum::{ellipsoid, EllipsoidKey};
///
/// let airy = ellipsoid::ellipsoid(EllipsoidKey::Airy1830).unwrap();
/// assert_eq!(airy.a, 6_377_563.396);
/// ```
pub fn ellipsoid(key: EllipsoidKey) -> Result<&'static Ellipsoid, Error> {
    ELLIPSOIDS
        .get(&key)
        .ok_or_else(|| Error::UnknownReferenceKey(key.to_string()))
}

/// Looks up a built-in ellipsoid by name, e.g. `"GRS80"`.
///
/// # Errors
///
/// Returns [`Error::UnknownReferenceKey`] if the name is not a built-in.
pub fn ellipsoid_named(name: &str) -> Result<&'static Ellipsoid, Error> {
    ellipsoid(name.parse()?)
}

impl Ellipsoid {
    pub const fn new(a: f64, b: f64, f: f64) -> Ellipsoid {
        Self { a, b, f }
    }

    /// The squared eccentricity *e² = 2f - f²*
    pub fn eccentricity_squared(&self) -> f64 {
        2. * self.f - self.f.powi(2)
    }

    /// The squared second eccentricity *ε² = e² / (1 - e²)*
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1. - e2)
    }

    /// Prime vertical radius of curvature at latitude `phi` (radians)
    pub fn prime_vertical_radius_of_curvature(&self, phi: f64) -> f64 {
        self.a / (1. - self.eccentricity_squared() * phi.sin().powi(2)).sqrt()
    }

    /// Latitude/longitude in degrees, at zero ellipsoidal height, to
    /// earth-centred cartesian coordinates.
    pub fn cartesian(&self, lat: f64, lon: f64) -> CartesianVector {
        let phi = lat.to_radians();
        let lam = lon.to_radians();

        let nu = self.prime_vertical_radius_of_curvature(phi);
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, coslam) = lam.sin_cos();

        CartesianVector::new(
            nu * cosphi * coslam,
            nu * cosphi * sinlam,
            nu * (1. - self.eccentricity_squared()) * sinphi,
        )
    }

    /// Cartesian to latitude/longitude in degrees, following Bowring's
    /// reduced latitude method.
    ///
    /// On the polar axis the latitude is ±90° by the sign of `z`. Off the
    /// axis, an undefined `cos β` (on the equatorial plane) is taken as
    /// `β = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericDomain`] at the earth's centre, deep inside the
    /// equatorial bulge where the method yields |φ| > 90°, or if the result is
    /// not finite.
    pub fn geographic(&self, v: &CartesianVector) -> Result<(f64, f64), Error> {
        let CartesianVector { x, y, z } = *v;
        let (a, b) = (self.a, self.b);
        let e2 = self.eccentricity_squared();
        let eps2 = self.second_eccentricity_squared();

        let p = x.hypot(y);
        let r = p.hypot(z);

        if r.is_zero() {
            return Err(Error::NumericDomain("latitude is undefined at the earth's centre".to_string()));
        }

        if p.is_zero() {
            return Ok(((z >= 0.).ternary(dms::QD, -dms::QD), 0.));
        }

        let tan_beta = (b * z) / (a * p) * (1. + eps2 * b / r);
        let sin_beta = tan_beta / (1. + tan_beta.powi(2)).sqrt();
        let cos_beta = sin_beta / tan_beta;
        let (sin_beta, cos_beta) = cos_beta.is_nan().ternary((0., 1.), (sin_beta, cos_beta));

        let phi = (z + eps2 * b * sin_beta.powi(3)).atan2(p - e2 * a * cos_beta.powi(3));
        if phi.abs() > FRAC_PI_2 {
            return Err(Error::NumericDomain(format!(
                "latitude {} is out of range for {v}",
                phi.to_degrees()
            )));
        }
        let lam = y.atan2(x);

        let (lat, lon) = (phi.to_degrees(), lam.to_degrees());
        ensure_finite("geographic position", &[lat, lon])?;
        Ok((lat, lon))
    }
}
