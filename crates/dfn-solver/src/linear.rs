//! Linear system backend.

use dfn_core::Real;
use nalgebra::{DMatrix, DVector};

use crate::error::{SolverError, SolverResult};

/// Solves `A x = b` for a square system.
pub trait LinearSolver {
    fn solve(&self, matrix: DMatrix<Real>, rhs: DVector<Real>) -> SolverResult<DVector<Real>>;
}

/// Dense LU factorisation with partial pivoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuSolver;

impl LinearSolver for LuSolver {
    fn solve(&self, matrix: DMatrix<Real>, rhs: DVector<Real>) -> SolverResult<DVector<Real>> {
        if !matrix.is_square() || matrix.nrows() != rhs.len() {
            return Err(SolverError::Numeric {
                what: format!(
                    "system shape {}x{} does not match rhs length {}",
                    matrix.nrows(),
                    matrix.ncols(),
                    rhs.len()
                ),
            });
        }

        let x = matrix
            .lu()
            .solve(&rhs)
            .ok_or_else(|| SolverError::SingularSystem {
                what: "pressure matrix is singular".to_string(),
            })?;

        if x.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::SingularSystem {
                what: "pressure solution is not finite".to_string(),
            });
        }

        Ok(x)
    }
}
