//! Finite-difference Jacobians.
//!
//! Sizing unknowns often sit close to the edge of the residual's domain
//! (fullness near zero, discharge coefficient near one), so an evaluation on one
//! side of an unknown may land where the residual is undefined. Both schemes
//! fall back to a one-sided difference in that case and only fail when
//! neither side can be evaluated.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

fn step(xj: f64, epsilon: f64) -> f64 {
    epsilon * xj.abs().max(1.0)
}

/// Residual at `x` with entry `j` moved by `h`, or `None` when it cannot be evaluated.
fn shifted<F>(f: &F, x: &DVector<f64>, j: usize, h: f64) -> Option<DVector<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut moved = x.clone();
    moved[j] += h;
    f(&moved).ok().filter(|r| r.iter().all(|v| v.is_finite()))
}

fn undefined(j: usize, x: &DVector<f64>) -> SolverError {
    SolverError::Numeric {
        what: format!(
            "residual undefined on both sides of unknown {j} at {:?}",
            x.as_slice()
        ),
    }
}

/// Forward differences, stepping backwards for columns whose forward evaluation fails.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let base = f(x)?;
    let mut jac = DMatrix::zeros(base.len(), x.len());

    for j in 0..x.len() {
        let h = step(x[j], epsilon);
        let column = if let Some(plus) = shifted(&f, x, j, h) {
            (plus - &base) / h
        } else if let Some(minus) = shifted(&f, x, j, -h) {
            (&base - minus) / h
        } else {
            return Err(undefined(j, x));
        };
        jac.set_column(j, &column);
    }

    Ok(jac)
}

/// Central differences, one-sided where only one side is defined.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let base = f(x)?;
    let mut jac = DMatrix::zeros(base.len(), x.len());

    for j in 0..x.len() {
        let h = step(x[j], epsilon);
        let column = match (shifted(&f, x, j, h), shifted(&f, x, j, -h)) {
            (Some(plus), Some(minus)) => (plus - minus) / (2.0 * h),
            (Some(plus), None) => (plus - &base) / h,
            (None, Some(minus)) => (&base - minus) / h,
            (None, None) => return Err(undefined(j, x)),
        };
        jac.set_column(j, &column);
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fullness_residual(v: &DVector<f64>) -> SolverResult<DVector<f64>> {
        // tan(alpha) - sqrt(2(1-phi)/phi) for alpha = 60 deg
        let phi = v[0];
        Ok(DVector::from_element(
            1,
            60f64.to_radians().tan() - (2.0 * (1.0 - phi) / phi).sqrt(),
        ))
    }

    #[test]
    fn central_matches_analytic_derivative() {
        // d/dphi of -sqrt(2(1-phi)/phi) = 1 / (phi^2 sqrt(2(1-phi)/phi))
        let phi = 0.4;
        let x = DVector::from_element(1, phi);
        let jac = central_difference_jacobian(&x, fullness_residual, 1e-6).unwrap();
        let exact = 1.0 / (phi * phi * (2.0 * (1.0 - phi) / phi).sqrt());
        assert!((jac[(0, 0)] - exact).abs() / exact < 1e-8);
    }

    #[test]
    fn forward_is_first_order_accurate() {
        let x = DVector::from_element(1, 0.4);
        let fwd = finite_difference_jacobian(&x, fullness_residual, 1e-7).unwrap();
        let ctr = central_difference_jacobian(&x, fullness_residual, 1e-7).unwrap();
        assert!((fwd[(0, 0)] - ctr[(0, 0)]).abs() / ctr[(0, 0)] < 1e-5);
    }

    #[test]
    fn two_unknown_swirl_system() {
        // (phi * mu, mu - phi^2) at (0.5, 0.3)
        let f = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0] * v[1], v[1] - v[0] * v[0]]))
        };
        let x = DVector::from_vec(vec![0.5, 0.3]);
        let jac = central_difference_jacobian(&x, f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 0.3).abs() < 1e-8);
        assert!((jac[(0, 1)] - 0.5).abs() < 1e-8);
        assert!((jac[(1, 0)] + 1.0).abs() < 1e-8);
        assert!((jac[(1, 1)] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn falls_back_to_one_side_at_domain_edge() {
        // Backward evaluation of sqrt(phi) at phi = 1e-8 is NaN
        let f = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, v[0].sqrt()))
        };
        let x = DVector::from_element(1, 1e-8);
        let jac = central_difference_jacobian(&x, f, 1e-7).unwrap();
        assert!(jac[(0, 0)].is_finite());
        assert!(jac[(0, 0)] > 0.0);
    }

    #[test]
    fn undefined_on_both_sides_is_an_error() {
        let f = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            if v[0] == 0.5 {
                Ok(DVector::from_element(1, 0.0))
            } else {
                Err(SolverError::Numeric {
                    what: "outside domain".into(),
                })
            }
        };
        let x = DVector::from_element(1, 0.5);
        assert!(matches!(
            central_difference_jacobian(&x, f, 1e-7),
            Err(SolverError::Numeric { .. })
        ));
        assert!(finite_difference_jacobian(&x, f, 1e-7).is_err());
    }
}
