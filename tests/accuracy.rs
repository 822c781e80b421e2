use float_eq::assert_float_eq;

use geodatum::{
    datum, to_geographic, CartesianVector, DatumKey, Error, GeoPoint, GridRef, HelmertTransform,
    Location, NationalGrid,
};

const GRID: GridRef = GridRef::new(277_656., 549_165.);
const REFERENCE_LAT: f64 = 54.822_218;
const REFERENCE_LON: f64 = -3.906_009;

#[test]
fn reference_transform_is_exact() {
    let reference = datum::datum(DatumKey::REFERENCE).unwrap();

    for v in [
        CartesianVector::new(1., 1., 1.),
        CartesianVector::new(3_790_644.9, -259_013.8, 5_104_571.1),
        CartesianVector::new(-0.0, 1e-300, -6_356_752.314_245),
    ] {
        let out = reference.transform.apply(&v);
        assert_eq!(out.x.to_bits(), v.x.to_bits());
        assert_eq!(out.y.to_bits(), v.y.to_bits());
        assert_eq!(out.z.to_bits(), v.z.to_bits());
    }
}

#[test]
fn transform_inverse_round_trip() {
    let v = CartesianVector::new(1., 1., 1.);

    for key in DatumKey::ALL.into_iter().filter(|k| !k.is_reference()) {
        let t: HelmertTransform = datum::datum(key).unwrap().transform;
        let back = t.inverse().apply(&t.apply(&v));

        // Negating the parameters only inverts the linearised transform to
        // first order; the large shifts leave about a centimetre behind.
        let tolerance = match key {
            DatumKey::Osgb36 | DatumKey::Irl1975 | DatumKey::Potsdam => 0.02,
            _ => 0.001,
        };
        assert!((back.x - v.x).abs() < tolerance, "{key}: {back}");
        assert!((back.y - v.y).abs() < tolerance, "{key}: {back}");
        assert!((back.z - v.z).abs() < tolerance, "{key}: {back}");
    }
}

#[test]
fn grid_to_geographic() {
    let point = GRID.to_geographic(DatumKey::REFERENCE).unwrap();

    assert_eq!(point.datum(), DatumKey::Wgs84);
    assert_float_eq!(point.latitude(), REFERENCE_LAT, abs <= 1e-3);
    assert_float_eq!(point.longitude(), REFERENCE_LON, abs <= 1e-3);
}

#[test]
fn geographic_interface_for_address_ingest() {
    let (lat, lon) = to_geographic(GRID.easting(), GRID.northing(), DatumKey::Wgs84).unwrap();

    assert_float_eq!(lat, REFERENCE_LAT, abs <= 1e-3);
    assert_float_eq!(lon, REFERENCE_LON, abs <= 1e-3);
}

#[test]
fn geographic_to_grid() {
    // On the grid's own datum the projection reproduces the grid exactly
    let native = GRID.to_geographic(DatumKey::Osgb36).unwrap();
    let grid = native.to_grid().unwrap();
    assert_float_eq!(grid.northing(), 549_165., abs <= 1e-3);
    assert_float_eq!(grid.easting(), 277_656., abs <= 1e-3);

    // From WGS84 the seven parameter transform is good to a few tens of metres
    let point = GeoPoint::create(REFERENCE_LAT, REFERENCE_LON, DatumKey::Wgs84).unwrap();
    let grid = point.to_grid().unwrap();
    assert!(grid.distance(&GRID) < 25., "{grid}");
}

#[test]
fn grid_round_trip() {
    let native = GRID.to_geographic(DatumKey::Osgb36).unwrap().to_grid().unwrap();
    assert_float_eq!(native.easting(), GRID.easting(), abs <= 1e-3);
    assert_float_eq!(native.northing(), GRID.northing(), abs <= 1e-3);

    let via_wgs84 = GRID.to_geographic(DatumKey::Wgs84).unwrap().to_grid().unwrap();
    assert!(via_wgs84.distance(&GRID) < 0.05, "{via_wgs84}");
}

#[test]
fn cartesian_round_trip() {
    for key in DatumKey::ALL {
        for (lat, lon) in [(REFERENCE_LAT, REFERENCE_LON), (-41.29, 174.78), (0., 0.), (71.17, 25.78)] {
            let point = GeoPoint::create(lat, lon, key).unwrap();
            let back = point.to_cartesian().unwrap().to_geographic(key).unwrap();

            assert_eq!(back.datum(), key);
            assert_float_eq!(back.latitude(), lat, abs <= 1e-3);
            assert_float_eq!(back.longitude(), lon, abs <= 1e-3);
        }
    }
}

#[test]
fn pivot_between_non_reference_datums() {
    let osgb = GRID.to_geographic(DatumKey::Osgb36).unwrap();
    let ed50 = osgb.to_geographic(DatumKey::Ed50).unwrap();
    let back = ed50.to_geographic(DatumKey::Osgb36).unwrap();

    assert_eq!(ed50.datum(), DatumKey::Ed50);
    assert!((ed50.longitude() - osgb.longitude()).abs() > 1e-4);
    assert!(osgb.haversine(&back).unwrap() < 0.05);
}

#[test]
fn inverse_projection_is_bounded() {
    for grid in [GridRef::new(400_000., f64::NAN), GridRef::new(400_000., f64::INFINITY)] {
        assert!(matches!(
            grid.to_geographic(DatumKey::Wgs84),
            Err(Error::Convergence { .. })
        ));
    }

    assert!(matches!(
        NationalGrid::osgb().with_max_iterations(1).inverse(&GRID),
        Err(Error::Convergence { iterations: 1, .. })
    ));
}

#[test]
fn unknown_reference_keys() {
    assert!(matches!(datum::datum_named("ETRS89"), Err(Error::UnknownReferenceKey(_))));
    assert!(matches!("Everest".parse::<DatumKey>(), Err(Error::UnknownReferenceKey(_))));
}

#[test]
fn location_facade() {
    let location = Location::from(GRID);

    assert_eq!(location.datum(), DatumKey::Osgb36);
    let wgs84 = location.to_geographic(DatumKey::Wgs84).unwrap();
    let vector = wgs84.to_cartesian().unwrap();
    let cartesian = Location::cartesian(vector, DatumKey::Wgs84);

    assert_float_eq!(cartesian.latitude().unwrap(), wgs84.latitude(), abs <= 1e-9);
    assert_float_eq!(cartesian.longitude().unwrap(), wgs84.longitude(), abs <= 1e-9);
    assert!(cartesian.to_grid().unwrap().distance(&GRID) < 0.05);
}
