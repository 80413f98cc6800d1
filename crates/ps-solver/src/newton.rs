//! Newton solver with bound constraints.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::central_difference_jacobian;
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (relative to the initial residual)
    pub rel_tol: f64,
    /// Step-size tolerance, relative to the norm of the current iterate
    pub step_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Largest fraction of the distance to a bound a single step may cover
    pub boundary_fraction: f64,
    /// Relative perturbation for finite-difference Jacobians
    pub fd_epsilon: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-12,
            rel_tol: 0.0,
            step_tol: 1e-12,
            line_search_beta: 0.5,
            max_line_search_iters: 40,
            boundary_fraction: 0.9,
            fd_epsilon: 1e-7,
        }
    }
}

/// Open interval a single unknown must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bound {
    pub const NONE: Bound = Bound {
        lower: None,
        upper: None,
    };

    pub fn open(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn positive() -> Self {
        Self {
            lower: Some(0.0),
            upper: None,
        }
    }

    /// The open unit interval (0, 1).
    pub fn unit_interval() -> Self {
        Self::open(0.0, 1.0)
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lower.is_none_or(|lo| v > lo) && self.upper.is_none_or(|hi| v < hi)
    }

    /// Largest step length in `[0, 1]` along `dx` that keeps `x` inside, scaled by `fraction`.
    fn step_limit(&self, x: f64, dx: f64, fraction: f64) -> f64 {
        let mut limit = 1.0_f64;
        if dx < 0.0 {
            if let Some(lo) = self.lower {
                limit = limit.min(fraction * (lo - x) / dx);
            }
        } else if dx > 0.0 {
            if let Some(hi) = self.upper {
                limit = limit.min(fraction * (hi - x) / dx);
            }
        }
        limit
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

fn within(bounds: &[Bound], x: &DVector<f64>) -> bool {
    bounds.iter().zip(x.iter()).all(|(b, &v)| b.contains(v))
}

/// Newton solver with line search and bound constraints.
///
/// Trial points outside `bounds`, or whose residual is non-finite or fails to
/// evaluate, are rejected by the line search.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    bounds: &[Bound],
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    if bounds.len() != x0.len() {
        return Err(SolverError::ProblemSetup {
            what: format!("{} bounds supplied for {} unknowns", bounds.len(), x0.len()),
        });
    }
    if !within(bounds, &x0) {
        return Err(SolverError::ProblemSetup {
            what: format!("initial guess {:?} violates bounds", x0.as_slice()),
        });
    }

    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::Numeric {
            what: "residual is not finite at the initial guess".to_string(),
        });
    }
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        // Compute Jacobian
        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "Jacobian solve failed".to_string(),
            })?;

        if dx.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Numeric {
                what: format!("non-finite Newton step at iteration {iter}"),
            });
        }

        // Step too small to move the iterate: the residual floor has been reached
        if dx.norm() <= config.step_tol * (x.norm() + config.step_tol) {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        // Fraction-to-boundary: never jump across a bound in one step
        let mut alpha = bounds
            .iter()
            .zip(x.iter().zip(dx.iter()))
            .map(|(b, (&xi, &dxi))| b.step_limit(xi, dxi, config.boundary_fraction))
            .fold(1.0_f64, f64::min);

        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if within(bounds, &x_new) {
                if let Ok(r_new) = residual_fn(&x_new) {
                    let r_new_norm = r_new.norm();
                    if r_new_norm.is_finite() && r_new_norm < r_norm {
                        accepted = Some((x_new, r_new, r_new_norm));
                        break;
                    }
                }
            }

            // Backtrack
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!(
                    "Line search stagnated at iteration {}, residual = {}",
                    iter, r_norm
                ),
            });
        };

        trace!(iter, alpha, residual = r_new_norm, "newton step");

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

/// Solve a square system using a central-difference Jacobian.
pub fn solve_system<F>(
    x0: &[f64],
    bounds: &[Bound],
    residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let jacobian_fn =
        |x: &DVector<f64>| central_difference_jacobian(x, &residual_fn, config.fd_epsilon);
    newton_solve(
        DVector::from_column_slice(x0),
        bounds,
        &residual_fn,
        jacobian_fn,
        config,
    )
}

/// Find a root of a single-variable function.
pub fn solve_scalar<F>(x0: f64, bound: Bound, f: F, config: &NewtonConfig) -> SolverResult<f64>
where
    F: Fn(f64) -> f64,
{
    let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, f(x[0])))
    };
    let result = solve_system(&[x0], &[bound], residual, config)?;
    Ok(result.x[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, &[Bound::positive()], residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn bound_keeps_iterate_on_positive_branch() {
        // From x0 = 0.1 a plain Newton step on x^2 - 4 overshoots to ~20 and back;
        // the negative root must never be reached.
        let config = NewtonConfig::default();
        let x = solve_scalar(0.1, Bound::positive(), |x| x * x - 4.0, &config).unwrap();
        assert!((x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn sqrt_domain_is_respected() {
        // sqrt(2(1-p)/p) = 3  =>  p = 2/11
        let p = solve_scalar(
            0.8,
            Bound::unit_interval(),
            |p| 3.0 - (2.0 * (1.0 - p) / p).sqrt(),
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!((p - 2.0 / 11.0).abs() < 1e-10);
    }

    #[test]
    fn two_variable_system() {
        // x + y = 3, x * y = 2, from (0.5, 2.5) -> (1, 2)
        let residual = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0] + v[1] - 3.0, v[0] * v[1] - 2.0]))
        };
        let result = solve_system(
            &[0.5, 2.5],
            &[Bound::NONE, Bound::NONE],
            residual,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!((result.x[0] - 1.0).abs() < 1e-9);
        assert!((result.x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn no_root_reports_convergence_failure() {
        let err = solve_scalar(1.0, Bound::NONE, |x| x * x + 1.0, &NewtonConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::ConvergenceFailed { .. } | SolverError::Numeric { .. }
        ));
    }

    #[test]
    fn initial_guess_outside_bounds_is_rejected() {
        let config = NewtonConfig::default();
        let err = solve_scalar(1.5, Bound::unit_interval(), |x| x - 0.5, &config).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn mismatched_bounds_are_rejected() {
        let residual = |v: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(v.clone()) };
        let config = NewtonConfig::default();
        let err = solve_system(&[1.0, 1.0], &[Bound::NONE], residual, &config).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }
}
