use std::{collections::HashMap, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use log::{debug, info, warn};

use crate::{
    cartesian::CartesianVector,
    ellipsoid::{self, Ellipsoid, EllipsoidKey},
    helmert::HelmertTransform,
    latlon::GeoPoint,
    utility::ensure_finite,
    Error,
};

/// Names of the built-in geodetic datums. [`DatumKey::Wgs84`] is the
/// reference datum every transform is expressed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatumKey {
    Ed50,
    Irl1975,
    Nad27,
    Nad83,
    Ntf,
    Osgb36,
    Potsdam,
    TokyoJapan,
    Wgs72,
    Wgs84,
}

impl DatumKey {
    pub const REFERENCE: DatumKey = DatumKey::Wgs84;

    pub const ALL: [DatumKey; 10] = [
        DatumKey::Ed50,
        DatumKey::Irl1975,
        DatumKey::Nad27,
        DatumKey::Nad83,
        DatumKey::Ntf,
        DatumKey::Osgb36,
        DatumKey::Potsdam,
        DatumKey::TokyoJapan,
        DatumKey::Wgs72,
        DatumKey::Wgs84,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DatumKey::Ed50 => "ED50",
            DatumKey::Irl1975 => "Irl1975",
            DatumKey::Nad27 => "NAD27",
            DatumKey::Nad83 => "NAD83",
            DatumKey::Ntf => "NTF",
            DatumKey::Osgb36 => "OSGB36",
            DatumKey::Potsdam => "Potsdam",
            DatumKey::TokyoJapan => "TokyoJapan",
            DatumKey::Wgs72 => "WGS72",
            DatumKey::Wgs84 => "WGS84",
        }
    }

    pub fn is_reference(self) -> bool {
        self == DatumKey::REFERENCE
    }
}

impl Display for DatumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatumKey {
    type Err = Error;

    /// Case-insensitive lookup by canonical name.
    ///
    /// ```
    /// use geodatum::DatumKey;
    ///
    /// assert_eq!("osgb36".parse::<DatumKey>().unwrap(), DatumKey::Osgb36);
    /// assert!("ETRS89".parse::<DatumKey>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatumKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownReferenceKey(s.to_string()))
    }
}

/// A reference ellipsoid together with the Helmert transform that takes
/// WGS84 cartesian coordinates into this datum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Datum {
    pub key: DatumKey,
    pub ellipsoid_key: EllipsoidKey,
    pub ellipsoid: Ellipsoid,
    pub transform: HelmertTransform,
}

impl Datum {
    fn build(
        key: DatumKey,
        ellipsoid_key: EllipsoidKey,
        transform: HelmertTransform,
    ) -> Result<Datum, Error> {
        Ok(Datum {
            key,
            ellipsoid_key,
            ellipsoid: *ellipsoid::ellipsoid(ellipsoid_key)?,
            transform,
        })
    }
}

lazy_static! {
    static ref DATUMS: HashMap<DatumKey, Datum> = {
        use EllipsoidKey as E;

        let rows = [
            (
                DatumKey::Ed50,
                E::Intl1924,
                HelmertTransform::new(89.5, 93.8, 123.1, -1.2, 0.0, 0.0, 0.156),
            ),
            (
                DatumKey::Irl1975,
                E::AiryModified,
                HelmertTransform::new(-482.530, 130.596, -564.557, -8.150, -1.042, -0.214, -0.631),
            ),
            (
                DatumKey::Nad27,
                E::Clarke1866,
                HelmertTransform::new(8., -160., -176., 0., 0., 0., 0.),
            ),
            (
                DatumKey::Nad83,
                E::Grs80,
                HelmertTransform::new(1.004, -1.910, -0.515, -0.0015, 0.0267, 0.000_34, 0.011),
            ),
            (
                DatumKey::Ntf,
                E::Clarke1880Ign,
                HelmertTransform::new(168., 60., -320., 0., 0., 0., 0.),
            ),
            (
                DatumKey::Osgb36,
                E::Airy1830,
                HelmertTransform::new(
                    -446.448, 125.157, -542.060, 20.4894, -0.1502, -0.2470, -0.8421,
                ),
            ),
            (
                DatumKey::Potsdam,
                E::Bessel1841,
                HelmertTransform::new(-582., -105., -414., -8.3, 1.04, 0.35, -3.08),
            ),
            (
                DatumKey::TokyoJapan,
                E::Bessel1841,
                HelmertTransform::new(148., -507., -685., 0., 0., 0., 0.),
            ),
            (
                DatumKey::Wgs72,
                E::Wgs72,
                HelmertTransform::new(0., 0., -4.5, -0.22, 0., 0., 0.554),
            ),
            (DatumKey::Wgs84, E::Wgs84, HelmertTransform::IDENTITY),
        ];

        // Rows whose ellipsoid is missing are left out, and surface as
        // UnknownReferenceKey on lookup.
        let table: HashMap<DatumKey, Datum> = rows
            .into_iter()
            .filter_map(|(key, ellipsoid, transform)| {
                match Datum::build(key, ellipsoid, transform) {
                    Ok(datum) => Some((key, datum)),
                    Err(err) => {
                        warn!("Dropping datum {key}: {err}");
                        None
                    }
                }
            })
            .collect();
        info!("Initialised datum registry with {} entries", table.len());
        table
    };
}

/// Looks up a built-in datum.
///
/// # Errors
///
/// Returns [`Error::UnknownReferenceKey`] if `key` has no table entry.
///
/// # Usage
///
/// ```
/// use geodatum::{datum, DatumKey, EllipsoidKey};
///
/// let osgb = datum::datum(DatumKey::Osgb36).unwrap();
///
/// assert_eq!(osgb.ellipsoid_key, EllipsoidKey::Airy1830);
/// assert_eq!(osgb.transform.tx, -446.448);
/// ```
pub fn datum(key: DatumKey) -> Result<&'static Datum, Error> {
    DATUMS
        .get(&key)
        .ok_or_else(|| Error::UnknownReferenceKey(key.to_string()))
}

/// Looks up a built-in datum by name, e.g. `"OSGB36"`.
///
/// # Errors
///
/// Returns [`Error::UnknownReferenceKey`] if the name is not a built-in.
pub fn datum_named(name: &str) -> Result<&'static Datum, Error> {
    datum(name.parse()?)
}

/// Re-expresses a cartesian vector given on `source` on `target`.
///
/// Identical datums return the vector unchanged. When either side is the
/// reference datum a single Helmert step is applied; otherwise the vector is
/// taken to the reference datum and from there to `target`.
///
/// # Errors
///
/// Returns [`Error::UnknownReferenceKey`] if either datum is missing from the
/// registry, or [`Error::NumericDomain`] if the vector is not finite.
pub fn transform_cartesian(
    v: &CartesianVector,
    source: DatumKey,
    target: DatumKey,
) -> Result<CartesianVector, Error> {
    ensure_finite("cartesian vector", &[v.x, v.y, v.z])?;

    if source == target {
        return Ok(*v);
    }

    let from = datum(source)?;
    let to = datum(target)?;

    let out = if source.is_reference() {
        debug!("{source} -> {target}: forward Helmert");
        to.transform.apply(v)
    } else if target.is_reference() {
        debug!("{source} -> {target}: inverse Helmert");
        from.transform.inverse().apply(v)
    } else {
        debug!("{source} -> {target}: pivot through {}", DatumKey::REFERENCE);
        let reference = from.transform.inverse().apply(v);
        to.transform.apply(&reference)
    };

    Ok(out)
}

/// Moves a geographic point onto `target`, going through cartesian
/// coordinates at zero ellipsoidal height.
pub(crate) fn transform_point(point: &GeoPoint, target: DatumKey) -> Result<GeoPoint, Error> {
    ensure_finite("geographic position", &[point.latitude, point.longitude])?;

    if point.datum == target {
        return Ok(*point);
    }

    let v = point.to_cartesian()?;
    transform_cartesian(&v, point.datum, target)?.to_geographic(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_total() {
        for key in DatumKey::ALL {
            let d = datum(key).unwrap();
            assert_eq!(d.key, key);
            assert_eq!(d.ellipsoid, *ellipsoid::ellipsoid(d.ellipsoid_key).unwrap());
            assert_eq!(key.name().parse::<DatumKey>().unwrap(), key);
        }
    }

    #[test]
    fn reference_is_identity() {
        assert!(datum(DatumKey::REFERENCE).unwrap().transform.is_identity());
        for key in DatumKey::ALL.into_iter().filter(|k| !k.is_reference()) {
            assert!(!datum(key).unwrap().transform.is_identity(), "{key}");
        }
    }

    #[test]
    fn unknown_names() {
        assert!(matches!(
            datum_named("ETRS89"),
            Err(Error::UnknownReferenceKey(name)) if name == "ETRS89"
        ));
        assert!(datum_named(" wgs84 ").is_ok());
    }

    #[test]
    fn same_datum_is_untouched() {
        let v = CartesianVector::new(3_790_644.9, -259_013.8, 5_104_571.1);
        assert_eq!(transform_cartesian(&v, DatumKey::Ed50, DatumKey::Ed50).unwrap(), v);
    }

    #[test]
    fn pivot_matches_two_single_steps() {
        let v = CartesianVector::new(3_790_644.9, -259_013.8, 5_104_571.1);

        let direct = transform_cartesian(&v, DatumKey::Osgb36, DatumKey::Ed50).unwrap();
        let via = transform_cartesian(&v, DatumKey::Osgb36, DatumKey::Wgs84).unwrap();
        let via = transform_cartesian(&via, DatumKey::Wgs84, DatumKey::Ed50).unwrap();

        assert_eq!(direct, via);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let v = CartesianVector::new(f64::NAN, 1., 1.);
        for (source, target) in [
            (DatumKey::Osgb36, DatumKey::Wgs84),
            (DatumKey::Wgs84, DatumKey::Ed50),
            (DatumKey::Osgb36, DatumKey::Ed50),
            (DatumKey::Ed50, DatumKey::Ed50),
        ] {
            assert!(matches!(
                v.to_datum(source, target),
                Err(Error::NumericDomain(_))
            ));
        }

        // Deserialised points skip the range check in GeoPoint::create
        let point = GeoPoint::new(f64::NAN, 0., DatumKey::Osgb36);
        assert!(matches!(point.to_cartesian(), Err(Error::NumericDomain(_))));
        assert!(matches!(point.to_geographic(DatumKey::Osgb36), Err(Error::NumericDomain(_))));
        assert!(matches!(point.to_geographic(DatumKey::Wgs84), Err(Error::NumericDomain(_))));
    }
}
