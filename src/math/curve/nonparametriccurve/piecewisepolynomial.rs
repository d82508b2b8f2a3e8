use nalgebra::{
    DMatrix,
    DVector
};
use serde::Deserialize;
use thiserror::Error;

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("{polynomial_type:?} interpolation needs at least {required} points, {given} given")]
    InsufficientPoints {
        polynomial_type: PolynomialType,
        required: usize,
        given: usize
    },
    #[error("abscissae must be finite and strictly increasing (violated at index {0})")]
    NonIncreasingAbscissae(usize),
    #[error("singular linear system while fitting {0:?} spline")]
    SingularSystem(PolynomialType)
}

// ─────────────────────────────────────────────
// Subpolynomial
// ─────────────────────────────────────────────

/// One piece `a + b*(x-lhs) + c*(x-lhs)^2 + d*(x-lhs)^3`, coefficients stored
/// highest order first for Horner evaluation.
#[derive(Debug, Clone)]
struct Subpolynomial {
    coefs: Vec<f64>,
    deriv_coefs: Vec<f64>,
    lhs_x: f64,
}

impl Subpolynomial {
    pub fn new(coefs: Vec<f64>, lhs_x: f64) -> Subpolynomial {
        let deriv_coefs = Self::compute_deriv_coefs(&coefs);
        Subpolynomial { coefs, deriv_coefs, lhs_x }
    }

    fn compute_deriv_coefs(coefs: &[f64]) -> Vec<f64> {
        let order = coefs.len() - 1;
        if order == 0 {
            vec![0.0]
        } else {
            (0..order)
                .map(|i| (order - i) as f64 * coefs[i])
                .collect()
        }
    }

    pub fn value(&self, x: f64) -> f64 {
        self.evaluate(&self.coefs, x)
    }

    pub fn derivative(&self, x: f64) -> f64 {
        self.evaluate(&self.deriv_coefs, x)
    }

    fn evaluate(&self, coefs: &[f64], x: f64) -> f64 {
        let x_diff = x - self.lhs_x;
        let mut result = coefs[0];
        for &beta in &coefs[1..] {
            result = f64::mul_add(result, x_diff, beta);
        }
        result
    }
}

// ─────────────────────────────────────────────
// Linear
// ─────────────────────────────────────────────

fn interval_lengths(points: &[Point2D]) -> Vec<f64> {
    points.windows(2).map(|w| w[1].x() - w[0].x()).collect()
}

fn generate_linear_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    points
        .windows(2)
        .map(|w| vec![Point2D::slope(&w[0], &w[1]), w[0].y()])
        .collect()
}

/// Second-order coefficients of the single parabola through three points,
/// written piece by piece around each left knot.
fn generate_parabola_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    let s0 = Point2D::slope(&points[0], &points[1]);
    let s1 = Point2D::slope(&points[1], &points[2]);
    let c = (s1 - s0) / (points[2].x() - points[0].x());
    let (x0, x1) = (points[0].x(), points[1].x());

    points[..2]
        .iter()
        .map(|pt| {
            let x = pt.x();
            let b = s0 + c * (2.0 * x - x0 - x1);
            vec![c, b, pt.y()]
        })
        .collect()
}

// ─────────────────────────────────────────────
// Shared helpers
// ─────────────────────────────────────────────

/// Cubic coefficients `[d, c, b, a]` of each interval from the second
/// derivatives (moments) `m[0..=n]` at the knots.
fn cubic_coefs_from_moments(points: &[Point2D], h: &[f64], m: &[f64]) -> Vec<Vec<f64>> {
    (0..h.len())
        .map(|i| {
            let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
            let c = m[i] / 2.0;
            let b = (points[i + 1].y() - points[i].y()) / h[i]
                  - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
            let a = points[i].y();
            vec![d, c, b, a]
        })
        .collect()
}

/// Cubic coefficients `[d, c, b, a]` of each interval from the first
/// derivatives (Hermite slopes) `t[0..=n]` at the knots.
fn cubic_coefs_from_hermite(points: &[Point2D], h: &[f64], t: &[f64]) -> Vec<Vec<f64>> {
    (0..h.len())
        .map(|i| {
            let dy = points[i + 1].y() - points[i].y();
            let a = points[i].y();
            let b = t[i];
            let c = (3.0 * dy / h[i] - 2.0 * t[i] - t[i + 1]) / h[i];
            let d = (-2.0 * dy / h[i] + t[i] + t[i + 1]) / (h[i] * h[i]);
            vec![d, c, b, a]
        })
        .collect()
}

// ─────────────────────────────────────────────
// Cubic splines (Natural / Clamped / NotAKnot)
// ─────────────────────────────────────────────
//
// All three solve an (n+1)×(n+1) system for the moments m[0..=n]. Interior
// rows come from C² continuity:
//   h[i-1]*m[i-1] + 2*(h[i-1]+h[i])*m[i] + h[i]*m[i+1]
//     = 6*( (y[i+1]-y[i])/h[i] - (y[i]-y[i-1])/h[i-1] )
// Rows 0 and n carry the end conditions.

fn build_interior_system(points: &[Point2D], h: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
    let n = h.len();
    let mut mat = DMatrix::<f64>::zeros(n + 1, n + 1);
    let mut rhs = DVector::<f64>::zeros(n + 1);

    for i in 1..n {
        mat[(i, i - 1)] = h[i - 1];
        mat[(i, i)]     = 2.0 * (h[i - 1] + h[i]);
        mat[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (
            (points[i + 1].y() - points[i].y()) / h[i]
          - (points[i].y()     - points[i - 1].y()) / h[i - 1]
        );
    }
    (mat, rhs)
}

fn solve_moments(polynomial_type: PolynomialType,
                 mat: DMatrix<f64>,
                 rhs: DVector<f64>) -> Result<DVector<f64>, InterpolationError> {
    mat.lu()
        .solve(&rhs)
        .filter(|m| m.iter().all(|v| v.is_finite()))
        .ok_or(InterpolationError::SingularSystem(polynomial_type))
}

/// m[0] = m[n] = 0
fn generate_natural_cubic_coef_list(points: &[Point2D]) -> Result<Vec<Vec<f64>>, InterpolationError> {
    let n = points.len() - 1;
    let h = interval_lengths(points);

    let (mut mat, rhs) = build_interior_system(points, &h);
    mat[(0, 0)] = 1.0;
    mat[(n, n)] = 1.0;

    let m = solve_moments(PolynomialType::NaturalCubic, mat, rhs)?;
    Ok(cubic_coefs_from_moments(points, &h, m.as_slice()))
}

/// First derivative fixed at both ends:
///
///   left:  2*h[0]*m[0] + h[0]*m[1] = 6*( (y[1]-y[0])/h[0] - deriv_left )
///   right: h[n-1]*m[n-1] + 2*h[n-1]*m[n] = 6*( deriv_right - (y[n]-y[n-1])/h[n-1] )
fn generate_clamped_cubic_coef_list(
    points: &[Point2D],
    deriv_left: f64,
    deriv_right: f64,
) -> Result<Vec<Vec<f64>>, InterpolationError> {
    let n = points.len() - 1;
    let h = interval_lengths(points);

    let (mut mat, mut rhs) = build_interior_system(points, &h);

    mat[(0, 0)] = 2.0 * h[0];
    mat[(0, 1)] = h[0];
    rhs[0] = 6.0 * ((points[1].y() - points[0].y()) / h[0] - deriv_left);

    mat[(n, n - 1)] = h[n - 1];
    mat[(n, n)]     = 2.0 * h[n - 1];
    rhs[n] = 6.0 * (deriv_right - (points[n].y() - points[n - 1].y()) / h[n - 1]);

    let m = solve_moments(PolynomialType::ClampedCubic, mat, rhs)?;
    Ok(cubic_coefs_from_moments(points, &h, m.as_slice()))
}

/// Third derivative continuous at x[1] and x[n-1]:
///
///   -h[1]*m[0] + (h[0]+h[1])*m[1] - h[0]*m[2] = 0
///   -h[n-1]*m[n-2] + (h[n-2]+h[n-1])*m[n-1] - h[n-2]*m[n] = 0
///
/// With two points this is the straight line through them and with three the
/// single parabola through all of them.
fn generate_not_a_knot_cubic_coef_list(points: &[Point2D]) -> Result<Vec<Vec<f64>>, InterpolationError> {
    match points.len() {
        2 => return Ok(generate_linear_coef_list(points)),
        3 => return Ok(generate_parabola_coef_list(points)),
        _ => {}
    }

    let n = points.len() - 1;
    let h = interval_lengths(points);

    let (mut mat, rhs) = build_interior_system(points, &h);

    mat[(0, 0)] = -h[1];
    mat[(0, 1)] =  h[0] + h[1];
    mat[(0, 2)] = -h[0];

    mat[(n, n - 2)] = -h[n - 1];
    mat[(n, n - 1)] =  h[n - 2] + h[n - 1];
    mat[(n, n)]     = -h[n - 2];

    let m = solve_moments(PolynomialType::NotAKnotCubic, mat, rhs)?;
    Ok(cubic_coefs_from_moments(points, &h, m.as_slice()))
}

// ─────────────────────────────────────────────
// PCHIP (Fritsch-Carlson, shape preserving)
// ─────────────────────────────────────────────
//
// Interior slopes are weighted harmonic means of the neighbouring secants,
// zero at local extrema. End slopes use the three-point formula, set to zero
// on a sign change and capped at 3*s when the secants change sign.

fn pchip_end_slope(h0: f64, h1: f64, s0: f64, s1: f64) -> f64 {
    let raw = ((2.0 * h0 + h1) * s0 - h0 * s1) / (h0 + h1);
    if raw.signum() != s0.signum() {
        0.0
    } else if s0.signum() != s1.signum() && raw.abs() > 3.0 * s0.abs() {
        3.0 * s0
    } else {
        raw
    }
}

fn generate_pchip_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    let n = points.len() - 1;
    let h = interval_lengths(points);
    let s: Vec<f64> = points.windows(2).map(|w| Point2D::slope(&w[0], &w[1])).collect();

    if n == 1 {
        return cubic_coefs_from_hermite(points, &h, &[s[0], s[0]]);
    }

    let mut t = vec![0.0_f64; n + 1];
    for i in 1..n {
        if s[i - 1] * s[i] > 0.0 {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            t[i] = (w1 + w2) / (w1 / s[i - 1] + w2 / s[i]);
        }
    }
    t[0] = pchip_end_slope(h[0], h[1], s[0], s[1]);
    t[n] = pchip_end_slope(h[n - 1], h[n - 2], s[n - 1], s[n - 2]);

    cubic_coefs_from_hermite(points, &h, &t)
}

// ─────────────────────────────────────────────
// PolynomialType
// ─────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Deserialize)]
pub enum PolynomialType {
    Linear,
    NaturalCubic,
    /// End slopes fixed at zero.
    ClampedCubic,
    #[default]
    NotAKnotCubic,
    PiecewiseCubicHermite,
}

impl PolynomialType {
    pub fn necessary_points(&self) -> usize {
        2
    }
}

// ─────────────────────────────────────────────
// PiecewisePolynomial
// ─────────────────────────────────────────────

/// Piecewise polynomial interpolant. Outside `[min_x, max_x]` the first and
/// last pieces are continued, so extrapolated values are unconstrained.
#[derive(Debug, Clone)]
pub struct PiecewisePolynomial {
    max_x: f64,
    polynomial_type: PolynomialType,
    subpolynomial_list: Vec<Subpolynomial>,
}

impl PiecewisePolynomial {
    pub fn new(
        polynomial_type: PolynomialType,
        points: Vec<Point2D>,
    ) -> Result<PiecewisePolynomial, InterpolationError> {
        let required = polynomial_type.necessary_points();
        if points.len() < required {
            return Err(InterpolationError::InsufficientPoints {
                polynomial_type,
                required,
                given: points.len()
            });
        }
        if let Some(i) = points.iter().position(|pt| !pt.x().is_finite()) {
            return Err(InterpolationError::NonIncreasingAbscissae(i));
        }
        if let Some(i) = points.windows(2).position(|w| w[1].x() <= w[0].x()) {
            return Err(InterpolationError::NonIncreasingAbscissae(i + 1));
        }

        let coef_list = match polynomial_type {
            PolynomialType::Linear                => generate_linear_coef_list(&points),
            PolynomialType::NaturalCubic          => generate_natural_cubic_coef_list(&points)?,
            PolynomialType::ClampedCubic          => generate_clamped_cubic_coef_list(&points, 0.0, 0.0)?,
            PolynomialType::NotAKnotCubic         => generate_not_a_knot_cubic_coef_list(&points)?,
            PolynomialType::PiecewiseCubicHermite => generate_pchip_coef_list(&points),
        };

        let subpolynomial_list = coef_list
            .into_iter()
            .zip(points.iter())
            .map(|(coefs, pt)| Subpolynomial::new(coefs, pt.x()))
            .collect();

        Ok(PiecewisePolynomial {
            subpolynomial_list,
            max_x: points[points.len() - 1].x(),
            polynomial_type,
        })
    }

    pub fn polynomial_type(&self) -> PolynomialType {
        self.polynomial_type
    }

    fn find_segment(&self, x: f64) -> usize {
        self.subpolynomial_list
            .partition_point(|s| s.lhs_x <= x)
            .saturating_sub(1)
    }
}

// ─────────────────────────────────────────────
// Trait implementations
// ─────────────────────────────────────────────

impl NonparametricCurve for PiecewisePolynomial {
    fn points(&self) -> Vec<Point2D> {
        let mut pts: Vec<Point2D> = self
            .subpolynomial_list
            .iter()
            .map(|s| Point2D::new(s.lhs_x, s.value(s.lhs_x)))
            .collect();
        if let Some(last) = self.subpolynomial_list.last() {
            pts.push(Point2D::new(self.max_x, last.value(self.max_x)));
        }
        pts
    }

    fn min_x(&self) -> f64 {
        self.subpolynomial_list[0].lhs_x
    }

    fn max_x(&self) -> f64 {
        self.max_x
    }
}

impl Curve for PiecewisePolynomial {
    fn value(&self, x: f64) -> f64 {
        let i = self.find_segment(x);
        self.subpolynomial_list[i].value(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        let i = self.find_segment(x);
        self.subpolynomial_list[i].derivative(x)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL_TYPES: [PolynomialType; 5] = [
        PolynomialType::Linear,
        PolynomialType::NaturalCubic,
        PolynomialType::ClampedCubic,
        PolynomialType::NotAKnotCubic,
        PolynomialType::PiecewiseCubicHermite,
    ];

    fn points(xs: &[f64], f: impl Fn(f64) -> f64) -> Vec<Point2D> {
        xs.iter().map(|&x| Point2D::new(x, f(x))).collect()
    }

    fn market_like() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.030),
            Point2D::new(90.0, 0.032),
            Point2D::new(181.0, 0.035),
            Point2D::new(365.0, 0.033),
            Point2D::new(730.0, 0.036),
            Point2D::new(1826.0, 0.040),
        ]
    }

    #[test]
    fn every_type_reproduces_the_knots() {
        for polynomial_type in ALL_TYPES {
            let pts = market_like();
            let pp = PiecewisePolynomial::new(polynomial_type, pts.clone()).unwrap();
            for pt in &pts {
                assert_abs_diff_eq!(pp.value(pt.x()), pt.y(), epsilon = 1e-12);
            }
            assert_eq!(pp.points().len(), pts.len());
        }
    }

    #[test]
    fn not_a_knot_reproduces_a_cubic() {
        let f = |x: f64| 1.0 - 0.5 * x + 0.25 * x * x - 0.01 * x * x * x;
        let pp = PiecewisePolynomial::new(PolynomialType::NotAKnotCubic, points(&[0.0, 1.0, 2.5, 4.0, 7.0], f)).unwrap();
        for x in [-1.0, 0.5, 3.3, 6.0, 9.0] {
            assert_abs_diff_eq!(pp.value(x), f(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn not_a_knot_degenerate_sizes() {
        let line = PiecewisePolynomial::new(PolynomialType::NotAKnotCubic, points(&[0.0, 10.0], |x| 2.0 + 0.5 * x)).unwrap();
        assert_abs_diff_eq!(line.value(20.0), 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line.derivative(-5.0), 0.5, epsilon = 1e-12);

        let g = |x: f64| 3.0 - x + 0.2 * x * x;
        let parabola = PiecewisePolynomial::new(PolynomialType::NotAKnotCubic, points(&[0.0, 2.0, 7.0], g)).unwrap();
        for x in [-3.0, 1.0, 4.5, 10.0] {
            assert_abs_diff_eq!(parabola.value(x), g(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn natural_spline_has_zero_end_curvature() {
        let pp = PiecewisePolynomial::new(PolynomialType::NaturalCubic, market_like()).unwrap();
        let h = 1e-3;
        let second = |x: f64| (pp.derivative(x + h) - pp.derivative(x - h)) / (2.0 * h);
        assert_abs_diff_eq!(second(0.0 + h), 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(second(1826.0 - h), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn clamped_spline_has_flat_ends() {
        let pp = PiecewisePolynomial::new(PolynomialType::ClampedCubic, market_like()).unwrap();
        assert_abs_diff_eq!(pp.derivative(0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pp.derivative(1826.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn pchip_preserves_monotone_data() {
        let pts = points(&[0.0, 1.0, 2.0, 5.0, 6.0], |x| if x < 3.0 { x } else { 2.0 + 0.01 * x });
        let pp = PiecewisePolynomial::new(PolynomialType::PiecewiseCubicHermite, pts).unwrap();
        let mut previous = pp.value(0.0);
        for k in 1..=600 {
            let v = pp.value(k as f64 * 0.01);
            assert!(v >= previous - 1e-12);
            previous = v;
        }
    }

    #[test]
    fn linear_extrapolates_boundary_pieces() {
        let pp = PiecewisePolynomial::new(PolynomialType::Linear, points(&[0.0, 1.0, 3.0], |x| x * x)).unwrap();
        assert_abs_diff_eq!(pp.value(-1.0), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pp.value(4.0), 13.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pp.value(2.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_abscissae() {
        let err = PiecewisePolynomial::new(PolynomialType::NaturalCubic, points(&[0.0, 2.0, 2.0], |x| x)).unwrap_err();
        assert_eq!(err, InterpolationError::NonIncreasingAbscissae(2));
        let err = PiecewisePolynomial::new(PolynomialType::Linear, points(&[1.0], |x| x)).unwrap_err();
        assert!(matches!(err, InterpolationError::InsufficientPoints { required: 2, given: 1, .. }));
    }
}
