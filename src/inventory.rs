use crate::bindings;
use crate::model::FunctionDef;
use crate::parse;
use crate::scan::{self, ScanOptions};
use crate::source;
use anyhow::Result;
use std::path::Path;

/// Every user-defined function in the project as a (name, defining file)
/// pair. File-level failures (unreadable, unparsable, unsupported) are
/// logged and contribute zero functions; they never abort the pass.
pub fn defined_functions(project_root: &Path) -> Result<Vec<FunctionDef>> {
    defined_functions_with_options(project_root, &ScanOptions::default())
}

pub fn defined_functions_with_options(
    project_root: &Path,
    options: &ScanOptions,
) -> Result<Vec<FunctionDef>> {
    let files = scan::scan_project_with_options(project_root, options)?;
    let mut defs = Vec::new();
    for file in files {
        let bodies = match source::script_bodies(&file.abs_path) {
            Ok(bodies) => bodies,
            Err(err) => {
                eprintln!("callmap: {err}");
                continue;
            }
        };
        for body in &bodies {
            let tree = match parse::parse_script(body, &file.abs_path) {
                Ok(tree) => tree,
                Err(err) => {
                    eprintln!("callmap: {err}");
                    continue;
                }
            };
            let table = bindings::collect(tree.root_node(), body, project_root, &file.abs_path);
            for (name, path) in &table.user_defined_functions {
                // Imported bindings point at their source file; only names
                // defined here belong to this file's inventory.
                if path == &file.abs_path {
                    defs.push(FunctionDef {
                        name: name.clone(),
                        path: path.clone(),
                    });
                }
            }
        }
    }
    defs.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
    defs.dedup();
    Ok(defs)
}
