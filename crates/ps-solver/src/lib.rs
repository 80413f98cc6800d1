//! Small nonlinear root finder used by the sizing procedures.
//!
//! The unknown vectors here are tiny (one or two entries), so the solver favours
//! robustness over speed: a damped Newton iteration with a central-difference
//! Jacobian, per-variable open bounds and a backtracking line search.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian};
pub use newton::{Bound, NewtonConfig, NewtonResult, newton_solve, solve_scalar, solve_system};
