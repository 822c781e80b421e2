// National grid projection ellipsoid (Airy 1830), semi-major and semi-minor axes
pub(crate) const NATIONAL_GRID_A: f64 = 6_377_563.396;
pub(crate) const NATIONAL_GRID_B: f64 = 6_356_256.909;
pub(crate) const NATIONAL_GRID_F: f64 = 1. / 299.324_964_6;
// Central meridian scale factor
#[allow(clippy::unreadable_literal)]
pub(crate) const NATIONAL_GRID_F0: f64 = 0.9996012717;
// True origin, degrees
pub(crate) const NATIONAL_GRID_LAT0: f64 = 49.;
pub(crate) const NATIONAL_GRID_LON0: f64 = -2.;
// False origin, metres
pub(crate) const NATIONAL_GRID_N0: f64 = -100_000.;
pub(crate) const NATIONAL_GRID_E0: f64 = 400_000.;

// Inverse projection stops once the meridional arc is within this many metres
pub(crate) const ARC_TOLERANCE: f64 = 1e-5;
pub(crate) const DEFAULT_MAX_ITERATIONS: usize = 32;

// Grid coordinates are reported to the millimetre
pub(crate) const GRID_DECIMALS: i32 = 3;

/// Mean radius of Earth in meters
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
pub(crate) const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;
