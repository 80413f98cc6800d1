//! Ideal swirl-nozzle relations between spray half-angle α, fullness φ,
//! discharge coefficient μ and the geometric characteristic A.
//!
//! - `tan α = √(2(1−φ)/φ)`
//! - `μ = φ·√(φ/(2−φ))`
//! - `μ = 1/√(A²/(1−φ) + 1/φ²)`
//!
//! On the maximum-flow branch the last two combine to `A = (1−φ)·√2/(φ·√φ)`.

use crate::error::{InjectorError, InjectorResult, open_interval, positive};
use nalgebra::DVector;
use ps_solver::{Bound, NewtonConfig, SolverResult, solve_scalar, solve_system};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, SQRT_2};

/// A mutually consistent (A, φ, μ) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometricSolution {
    /// Geometric characteristic parameter
    pub a: f64,
    /// Fullness coefficient, in (0, 1)
    pub phi: f64,
    /// Discharge coefficient, in (0, 1)
    pub mu: f64,
}

impl GeometricSolution {
    /// Spray half-angle implied by φ, rad.
    pub fn spray_half_angle(&self) -> f64 {
        alpha_from_phi(self.phi)
    }
}

pub fn mu_from_phi(phi: f64) -> f64 {
    phi * (phi / (2.0 - phi)).sqrt()
}

pub fn alpha_from_phi(phi: f64) -> f64 {
    (2.0 * (1.0 - phi) / phi).sqrt().atan()
}

pub fn a_from_phi(phi: f64) -> f64 {
    (1.0 - phi) * SQRT_2 / (phi * phi.sqrt())
}

/// Discharge coefficient of a nozzle with characteristic `a` at fullness `phi`.
pub fn mu_from_a_phi(a: f64, phi: f64) -> f64 {
    1.0 / (a * a / (1.0 - phi) + 1.0 / (phi * phi)).sqrt()
}

/// Solve the three defining relations for a spray half-angle in radians.
///
/// φ and μ come from a joint solve started at (0.8, 0.8); A then follows from
/// the third relation started at 0.5.
pub fn solve_geometry(alpha: f64, newton: &NewtonConfig) -> InjectorResult<GeometricSolution> {
    open_interval(alpha, 0.0, FRAC_PI_2, "spray half-angle")?;
    let no_solution = |reason: String| InjectorError::NoPhysicalSolution {
        alpha_rad: alpha,
        reason,
    };

    let tan_alpha = alpha.tan();
    let residual = |z: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let (phi, mu) = (z[0], z[1]);
        Ok(DVector::from_vec(vec![
            tan_alpha - (2.0 * (1.0 - phi) / phi).sqrt(),
            mu - mu_from_phi(phi),
        ]))
    };
    let fullness = solve_system(
        &[0.8, 0.8],
        &[Bound::unit_interval(), Bound::NONE],
        residual,
        newton,
    )
    .map_err(|e| no_solution(e.to_string()))?;
    let (phi, mu) = (fullness.x[0], fullness.x[1]);
    open_interval(mu, 0.0, 1.0, "discharge coefficient")
        .map_err(|_| no_solution(format!("discharge coefficient {mu} outside (0, 1)")))?;

    let a = solve_scalar(
        0.5,
        Bound::positive(),
        |a| mu - mu_from_a_phi(a, phi),
        newton,
    )
    .map_err(|e| no_solution(e.to_string()))?;

    Ok(GeometricSolution { a, phi, mu })
}

/// Fullness on the maximum-flow branch for a geometric characteristic `a` (guess 0.5).
pub fn phi_from_a(a: f64, newton: &NewtonConfig) -> InjectorResult<f64> {
    invert("A(phi)", a, 0.5, a_from_phi, newton)
}

/// Fullness for an ideal discharge coefficient `mu` (guess 0.8).
pub fn phi_from_mu(mu: f64, newton: &NewtonConfig) -> InjectorResult<f64> {
    invert("mu(phi)", mu, 0.8, mu_from_phi, newton)
}

fn invert(
    relation: &'static str,
    target: f64,
    guess: f64,
    f: fn(f64) -> f64,
    newton: &NewtonConfig,
) -> InjectorResult<f64> {
    positive(target, relation)?;
    solve_scalar(guess, Bound::unit_interval(), |phi| target - f(phi), newton).map_err(|e| {
        InjectorError::InversionFailed {
            relation,
            target,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NewtonConfig {
        NewtonConfig::default()
    }

    #[test]
    fn sixty_degree_reference_values() {
        let sol = solve_geometry(59.5_f64.to_radians(), &cfg()).unwrap();
        assert!((sol.a - 3.184011235).abs() < 1e-8);
        assert!((sol.phi - 0.409663128).abs() < 1e-8);
        assert!((sol.mu - 0.207919754).abs() < 1e-8);
    }

    #[test]
    fn a_matches_closed_form() {
        for deg in [10.0_f64, 35.0, 50.0, 70.0, 85.0] {
            let sol = solve_geometry(deg.to_radians(), &cfg()).unwrap();
            let closed = a_from_phi(sol.phi);
            assert!((sol.a - closed).abs() / closed < 1e-8, "alpha {deg}");
        }
    }

    #[test]
    fn phi_from_a_reference_table() {
        let table = [
            (0.1, 0.93597075),
            (0.5, 0.76393202),
            (1.0, 0.63889692),
            (3.0, 0.42084730),
            (10.0, 0.22835991),
            (50.0, 0.08734431),
            (200.0, 0.03595195),
        ];
        for (a, expected) in table {
            let phi = phi_from_a(a, &cfg()).unwrap();
            assert!((phi - expected).abs() < 1e-7, "A = {a}: {phi}");
        }
    }

    #[test]
    fn phi_from_mu_inverts_mu_from_phi() {
        let phi = phi_from_mu(0.27017286, &cfg()).unwrap();
        assert!((mu_from_phi(phi) - 0.27017286).abs() < 1e-10);
        assert!((phi - 0.48046797).abs() < 1e-6);
    }

    #[test]
    fn mu_above_one_has_no_fullness() {
        assert!(matches!(
            phi_from_mu(1.2, &cfg()),
            Err(InjectorError::InversionFailed { .. })
        ));
    }

    #[test]
    fn angle_outside_open_quadrant_is_invalid() {
        assert!(matches!(
            solve_geometry(0.0, &cfg()),
            Err(InjectorError::InvalidInput { .. })
        ));
        assert!(solve_geometry(FRAC_PI_2, &cfg()).is_err());
    }

    #[test]
    fn starved_solver_reports_no_physical_solution() {
        let starved = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        assert!(matches!(
            solve_geometry(1.0, &starved),
            Err(InjectorError::NoPhysicalSolution { .. })
        ));
    }

    #[test]
    fn spray_angle_round_trips_through_phi() {
        let alpha = 0.9;
        let sol = solve_geometry(alpha, &cfg()).unwrap();
        assert!((sol.spray_half_angle() - alpha).abs() < 1e-10);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn solution_satisfies_all_relations(deg in 1.0f64..89.0) {
            let alpha = deg.to_radians();
            let sol = solve_geometry(alpha, &NewtonConfig::default()).unwrap();

            prop_assert!(sol.phi > 0.0 && sol.phi < 1.0);
            prop_assert!(sol.mu > 0.0 && sol.mu < 1.0);
            prop_assert!(sol.a > 0.0);

            let r1 = alpha.tan() - (2.0 * (1.0 - sol.phi) / sol.phi).sqrt();
            let r2 = sol.mu - mu_from_phi(sol.phi);
            let r3 = sol.mu - mu_from_a_phi(sol.a, sol.phi);
            prop_assert!(r1.abs() < 1e-8 * alpha.tan().max(1.0));
            prop_assert!(r2.abs() < 1e-8);
            prop_assert!(r3.abs() < 1e-8);
        }

        #[test]
        fn fullness_decreases_with_angle(deg in 1.0f64..88.0, step in 0.1f64..1.0) {
            let lo = solve_geometry(deg.to_radians(), &NewtonConfig::default()).unwrap();
            let hi = solve_geometry((deg + step).to_radians(), &NewtonConfig::default()).unwrap();
            prop_assert!(hi.phi < lo.phi);
        }
    }
}
