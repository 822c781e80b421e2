use log::{debug, trace, warn};

use crate::{
    constants::{
        ARC_TOLERANCE, DEFAULT_MAX_ITERATIONS, GRID_DECIMALS, NATIONAL_GRID_A, NATIONAL_GRID_B,
        NATIONAL_GRID_E0, NATIONAL_GRID_F, NATIONAL_GRID_F0, NATIONAL_GRID_LAT0, NATIONAL_GRID_LON0,
        NATIONAL_GRID_N0,
    },
    datum::DatumKey,
    ellipsoid::Ellipsoid,
    grid::GridRef,
    latlon::GeoPoint,
    utility::{ensure_finite, polyval, GeoMath},
    Error,
};

// ================================
// Meridional arc series in n
// ================================

// Horner order, highest power of n first
const ARC_COEFF_A: [f64; 4] = [5. / 4., 5. / 4., 1., 1.];
const ARC_COEFF_B: [f64; 4] = [21. / 8., 3., 3., 0.];
const ARC_COEFF_C: [f64; 4] = [15. / 8., 15. / 8., 0., 0.];
const ARC_COEFF_D: [f64; 4] = [35. / 24., 0., 0., 0.];

/// Transverse Mercator projection of the Ordnance Survey national grid,
/// on the Airy 1830 ellipsoid.
#[derive(Clone, Copy, Debug)]
pub struct NationalGrid {
    a: f64,
    b: f64,
    f0: f64,
    lat0: f64,
    lon0: f64,
    n0: f64,
    e0: f64,
    e2: f64,
    n: f64,
    max_iterations: usize,
}

/// Radii of curvature scaled by `F0`, and `η² = ν/ρ - 1`.
struct Curvature {
    nu: f64,
    rho: f64,
    eta2: f64,
}

impl NationalGrid {
    pub fn osgb() -> NationalGrid {
        let a = NATIONAL_GRID_A;
        let b = NATIONAL_GRID_B;

        Self {
            a,
            b,
            f0: NATIONAL_GRID_F0,
            lat0: NATIONAL_GRID_LAT0.to_radians(),
            lon0: NATIONAL_GRID_LON0.to_radians(),
            n0: NATIONAL_GRID_N0,
            e0: NATIONAL_GRID_E0,
            e2: 1. - (b * b) / (a * a),
            n: (a - b) / (a + b),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Caps the number of fixed-point steps taken by [`NationalGrid::inverse`].
    pub fn with_max_iterations(mut self, max_iterations: usize) -> NationalGrid {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Datum that latitude/longitude must be on before projection.
    pub fn datum(&self) -> DatumKey {
        DatumKey::Osgb36
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        Ellipsoid::new(self.a, self.b, NATIONAL_GRID_F)
    }

    /// Distance along the meridian from the true origin to `phi` (radians),
    /// scaled by `F0`.
    fn meridional_arc(&self, phi: f64) -> f64 {
        let n = self.n;
        let dphi = phi - self.lat0;
        let sphi = phi + self.lat0;

        let ma = polyval(&ARC_COEFF_A, n) * dphi;
        let mb = polyval(&ARC_COEFF_B, n) * dphi.sin() * sphi.cos();
        let mc = polyval(&ARC_COEFF_C, n) * (2. * dphi).sin() * (2. * sphi).cos();
        let md = polyval(&ARC_COEFF_D, n) * (3. * dphi).sin() * (3. * sphi).cos();

        self.b * self.f0 * (ma - mb + mc - md)
    }

    fn curvature(&self, phi: f64) -> Curvature {
        let w = 1. - self.e2 * phi.sin().powi(2);
        let nu = self.a * self.f0 / w.sqrt();
        let rho = self.a * self.f0 * (1. - self.e2) / w.powf(1.5);

        Curvature {
            nu,
            rho,
            eta2: nu / rho - 1.,
        }
    }

    /// Projects `point` to easting/northing, rounded to the millimetre.
    /// Points on other datums are moved onto [`NationalGrid::datum`] first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericDomain`] if the projected position is not finite.
    pub fn forward(&self, point: &GeoPoint) -> Result<GridRef, Error> {
        let point = point.to_geographic(self.datum())?;
        let phi = point.latitude().to_radians();
        let dlam = point.longitude().to_radians() - self.lon0;

        let Curvature { nu, rho, eta2 } = self.curvature(phi);
        let m = self.meridional_arc(phi);

        let (sinphi, cosphi) = phi.sin_cos();
        let tan2 = phi.tan().powi(2);
        let tan4 = tan2.powi(2);

        let i = m + self.n0;
        let ii = nu / 2. * sinphi * cosphi;
        let iii = nu / 24. * sinphi * cosphi.powi(3) * (5. - tan2 + 9. * eta2);
        let iiia = nu / 720. * sinphi * cosphi.powi(5) * (61. - 58. * tan2 + tan4);
        let iv = nu * cosphi;
        let v = nu / 6. * cosphi.powi(3) * (nu / rho - tan2);
        let vi = nu / 120. * cosphi.powi(5) * (5. - 18. * tan2 + tan4 + 14. * eta2 - 58. * tan2 * eta2);

        let dlam2 = dlam.powi(2);
        let northing = polyval(&[iiia, iii, ii, i], dlam2);
        let easting = self.e0 + dlam * polyval(&[vi, v, iv], dlam2);

        ensure_finite("grid reference", &[easting, northing])?;
        Ok(GridRef::new(easting.round_to(GRID_DECIMALS), northing.round_to(GRID_DECIMALS)))
    }

    /// Finds the latitude whose meridional arc matches `northing`.
    fn footpoint_latitude(&self, northing: f64) -> Result<f64, Error> {
        let mut phi = self.lat0;
        let mut residual = northing - self.n0;

        for iteration in 1..=self.max_iterations {
            phi += residual / (self.a * self.f0);
            residual = northing - self.n0 - self.meridional_arc(phi);
            trace!("Footpoint iteration {iteration}: residual {residual} m");

            if residual.abs() < ARC_TOLERANCE {
                debug!("Footpoint latitude converged after {iteration} iterations");
                return Ok(phi);
            }
        }

        warn!(
            "Footpoint latitude for northing {northing} did not converge in {} iterations",
            self.max_iterations
        );
        Err(Error::Convergence {
            iterations: self.max_iterations,
            residual,
        })
    }

    /// Recovers latitude/longitude on [`NationalGrid::datum`] from a grid
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Convergence`] if the footpoint latitude does not
    /// settle within the iteration cap, and [`Error::NumericDomain`] if the
    /// result is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use geodatum::{GridRef, NationalGrid};
    ///
    /// let point = NationalGrid::osgb().inverse(&GridRef::new(651409.903, 313177.270)).unwrap();
    ///
    /// assert!((point.latitude() - 52.657570).abs() < 1e-6);
    /// assert!((point.longitude() - 1.717922).abs() < 1e-6);
    /// ```
    pub fn inverse(&self, grid: &GridRef) -> Result<GeoPoint, Error> {
        let phi = self.footpoint_latitude(grid.northing())?;

        let Curvature { nu, rho, eta2 } = self.curvature(phi);

        let tan = phi.tan();
        let tan2 = tan.powi(2);
        let tan4 = tan2.powi(2);
        let tan6 = tan2 * tan4;
        let sec = phi.cos().recip();

        let vii = tan / (2. * rho * nu);
        let viii = tan / (24. * rho * nu.powi(3)) * (5. + 3. * tan2 + eta2 - 9. * tan2 * eta2);
        let ix = tan / (720. * rho * nu.powi(5)) * (61. + 90. * tan2 + 45. * tan4);
        let x = sec / nu;
        let xi = sec / (6. * nu.powi(3)) * (nu / rho + 2. * tan2);
        let xii = sec / (120. * nu.powi(5)) * (5. + 28. * tan2 + 24. * tan4);
        let xiia = sec / (5040. * nu.powi(7)) * (61. + 662. * tan2 + 1320. * tan4 + 720. * tan6);

        let de = grid.easting() - self.e0;
        let de2 = de.powi(2);
        let lat = polyval(&[-ix, viii, -vii, phi], de2).to_degrees();
        let lon = (self.lon0 + de * polyval(&[-xiia, xii, -xi, x], de2)).to_degrees();

        ensure_finite("geographic position", &[lat, lon])?;
        Ok(GeoPoint::new(lat, lon, self.datum()))
    }
}
