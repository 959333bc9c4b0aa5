use crate::identity::IdRegistry;
use crate::inventory;
use crate::model::{AnalysisResult, FunctionEntry};
use crate::resolver;
use crate::scan::ScanOptions;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// One whole-project run: inventory every user-defined function, resolve
/// each one's call sites (recursively across imports), and assign stable
/// identities. All state is owned by the instance, so concurrent runs and
/// test runs never collide.
pub struct Analyzer {
    project_root: PathBuf,
    scan_options: ScanOptions,
    registry: IdRegistry,
}

impl Analyzer {
    pub fn new(project_root: PathBuf) -> Self {
        Self::new_with_options(project_root, ScanOptions::default())
    }

    pub fn new_with_options(project_root: PathBuf, scan_options: ScanOptions) -> Self {
        let project_root = std::fs::canonicalize(&project_root).unwrap_or(project_root);
        Self {
            project_root,
            scan_options,
            registry: IdRegistry::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Build the aggregate result: absolute file path -> resolved
    /// functions. A function whose resolution fails is logged and skipped;
    /// the run always covers the rest of the inventory.
    pub fn analyze(&mut self) -> Result<AnalysisResult> {
        let functions =
            inventory::defined_functions_with_options(&self.project_root, &self.scan_options)?;
        let mut result = AnalysisResult::new();
        for def in functions {
            let mut calls = match resolver::resolve_calls(&self.project_root, &def.path, &def.name)
            {
                Ok(buckets) => buckets,
                Err(err) => {
                    eprintln!("callmap: {err}");
                    continue;
                }
            };
            let function_id = self
                .registry
                .id_for(&def.name, &def.path, &self.project_root);
            for call in &mut calls.user_defined {
                call.id = Some(
                    self.registry
                        .id_for(&call.name, &call.path, &self.project_root),
                );
            }
            result
                .entry(def.path.display().to_string())
                .or_default()
                .push(FunctionEntry {
                    function_name: def.name,
                    function_id,
                    calls,
                });
        }
        Ok(result)
    }
}
