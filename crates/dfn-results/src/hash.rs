//! Content-based hashing for run IDs.

use dfn_project::CaseDef;
use sha2::{Digest, Sha256};

/// Hex SHA-256 over the case content and solver version.
///
/// The case name and description do not affect the id, so renaming a case
/// reuses its stored runs.
pub fn compute_run_id(case: &CaseDef, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    for part in [
        serde_json::to_string(&case.fluid),
        serde_json::to_string(&case.network),
        serde_json::to_string(&case.boundary),
        serde_json::to_string(&case.settings),
    ] {
        hasher.update(part.unwrap_or_default().as_bytes());
    }
    hasher.update(case.version.to_le_bytes());
    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
