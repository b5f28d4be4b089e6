//! Error type for the command-line front end.

/// Wraps errors from the backend crates for reporting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Project(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<dfn_project::ProjectError> for AppError {
    fn from(err: dfn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<dfn_solver::SolverError> for AppError {
    fn from(err: dfn_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<dfn_results::ResultsError> for AppError {
    fn from(err: dfn_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Results(err.to_string())
    }
}
