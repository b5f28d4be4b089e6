//! Solve a case, optionally through the on-disk run cache.

use std::path::Path;

use dfn_project::{CaseDef, compile_case, load_case};
use dfn_results::{RunManifest, RunRecord, RunStore, compute_run_id};
use dfn_solver::solve;
use tracing::info;

use crate::error::AppResult;

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Persist the run next to the case file.
    pub store: bool,
    /// Reuse a stored run with the same id instead of solving again.
    pub use_cache: bool,
}

#[derive(Debug)]
pub struct RunResponse {
    pub case: CaseDef,
    pub record: RunRecord,
    /// Present when the run was stored or loaded from the store.
    pub manifest: Option<RunManifest>,
    pub loaded_from_cache: bool,
}

pub fn ensure_run(case_path: &Path, options: RunOptions) -> AppResult<RunResponse> {
    let case = load_case(case_path)?;

    if !options.store {
        let record = solve_case(&case)?;
        return Ok(RunResponse {
            case,
            record,
            manifest: None,
            loaded_from_cache: false,
        });
    }

    let run_id = compute_run_id(&case, SOLVER_VERSION);
    let store = RunStore::for_case(case_path)?;

    if options.use_cache && store.has_run(&run_id) {
        info!(run_id = %run_id, "loading cached run");
        let manifest = store.load_manifest(&run_id)?;
        let record = store.load_record(&run_id)?;
        return Ok(RunResponse {
            case,
            record,
            manifest: Some(manifest),
            loaded_from_cache: true,
        });
    }

    let record = solve_case(&case)?;
    let manifest = RunManifest::new(run_id, &case.name, SOLVER_VERSION);
    store.save_run(&manifest, &record)?;
    info!(run_id = %manifest.run_id, "stored run");

    Ok(RunResponse {
        case,
        record,
        manifest: Some(manifest),
        loaded_from_cache: false,
    })
}

fn solve_case(case: &CaseDef) -> AppResult<RunRecord> {
    let compiled = compile_case(case)?;
    let solution = solve(
        &compiled.network,
        &compiled.fluid,
        &compiled.boundary,
        &compiled.settings,
    )?;
    Ok(RunRecord::from(&solution))
}

pub fn list_runs(case_path: &Path) -> AppResult<Vec<RunManifest>> {
    let case = load_case(case_path)?;
    let store = RunStore::for_case(case_path)?;
    Ok(store.list_runs(&case.name)?)
}

pub fn load_run(case_path: &Path, run_id: &str) -> AppResult<(RunManifest, RunRecord)> {
    let store = RunStore::for_case(case_path)?;
    let manifest = store.load_manifest(run_id)?;
    let record = store.load_record(run_id)?;
    Ok((manifest, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfn_project::save_json;
    use dfn_project::schema::*;

    fn write_case(dir: &Path) -> std::path::PathBuf {
        let _ = std::fs::remove_dir_all(dir);
        std::fs::create_dir_all(dir).unwrap();
        let case = CaseDef {
            version: 1,
            name: "single".to_string(),
            description: None,
            fluid: FluidDef::Water,
            network: NetworkDef {
                connectivity: vec![(0, 1)],
                lengths: vec![100.0],
                heights: vec![500.0],
                widths: vec![1e-3],
            },
            boundary: BoundaryDef {
                reference: PressureDef {
                    junction: 1,
                    pressure: 0.0,
                },
                fixed_pressures: vec![],
                external_flows: vec![
                    FlowDef {
                        junction: 0,
                        flow: 5.0e4,
                    },
                    FlowDef {
                        junction: 1,
                        flow: -5.0e4,
                    },
                ],
                injection_temperatures: vec![TemperatureDef {
                    junction: 0,
                    temperature: 20.0,
                }],
                ambient_temperature: 150.0,
            },
            settings: SettingsDef::default(),
        };
        let path = dir.join("single.json");
        save_json(&path, &case).unwrap();
        path
    }

    #[test]
    fn unstored_run_has_no_manifest() {
        let path = write_case(&std::env::temp_dir().join("dfn_cli_unstored"));
        let response = ensure_run(
            &path,
            RunOptions {
                store: false,
                use_cache: true,
            },
        )
        .unwrap();
        assert!(response.manifest.is_none());
        assert_eq!(response.record.fractures.len(), 1);
    }

    #[test]
    fn stored_run_is_reused() {
        let path = write_case(&std::env::temp_dir().join("dfn_cli_cache"));
        let options = RunOptions {
            store: true,
            use_cache: true,
        };

        let first = ensure_run(&path, options).unwrap();
        assert!(!first.loaded_from_cache);
        let second = ensure_run(&path, options).unwrap();
        assert!(second.loaded_from_cache);
        assert_eq!(first.record, second.record);

        let runs = list_runs(&path).unwrap();
        assert_eq!(runs.len(), 1);
        let (manifest, record) = load_run(&path, &runs[0].run_id).unwrap();
        assert_eq!(manifest.case_name, "single");
        assert_eq!(record, first.record);
    }
}
