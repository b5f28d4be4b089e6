//! Run storage API.

use crate::types::{RunManifest, RunRecord};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// One directory per run, holding `manifest.json` and `record.json`.
#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store kept in `.dfn/runs` next to a case file.
    pub fn for_case(case_path: &Path) -> ResultsResult<Self> {
        let case_dir = case_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "case path has no parent directory".to_string(),
            })?;
        Self::new(case_dir.join(".dfn").join("runs"))
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    pub fn save_run(&self, manifest: &RunManifest, record: &RunRecord) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        fs::write(
            run_dir.join("manifest.json"),
            serde_json::to_string_pretty(manifest)?,
        )?;
        fs::write(
            run_dir.join("record.json"),
            serde_json::to_string_pretty(record)?,
        )?;
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");
        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_record(&self, run_id: &str) -> ResultsResult<RunRecord> {
        let record_path = self.run_dir(run_id).join("record.json");
        if !record_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(record_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests of every stored run of the named case, oldest first.
    pub fn list_runs(&self, case_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.case_name == case_name
                {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
