//! Swirl characteristic curves μ(φ) for fixed A, with the ideal maximum-flow curve.

use crate::geometry::{mu_from_a_phi, mu_from_phi};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicCurve {
    /// `None` for the ideal curve
    pub a: Option<f64>,
    pub phi: Vec<f64>,
    pub mu: Vec<f64>,
}

fn phi_grid(points: usize) -> Vec<f64> {
    let points = points.max(2);
    let (lo, hi) = (0.01, 0.99);
    (0..points)
        .map(|i| lo + (hi - lo) * i as f64 / (points - 1) as f64)
        .collect()
}

/// μ(φ) = 1/√(A²/(1−φ) + 1/φ²) for each A, followed by the ideal curve
/// μ = φ·√(φ/(2−φ)), sampled on φ ∈ [0.01, 0.99].
pub fn characteristic_curves(a_values: &[f64], points: usize) -> Vec<CharacteristicCurve> {
    let phi = phi_grid(points);
    let mut curves: Vec<CharacteristicCurve> = a_values
        .iter()
        .map(|&a| CharacteristicCurve {
            a: Some(a),
            mu: phi.iter().map(|&p| mu_from_a_phi(a, p)).collect(),
            phi: phi.clone(),
        })
        .collect();
    curves.push(CharacteristicCurve {
        a: None,
        mu: phi.iter().map(|&p| mu_from_phi(p)).collect(),
        phi,
    });
    curves
}
