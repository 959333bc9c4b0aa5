use anyhow::{Result, bail};
use callmap::scan::ScanOptions;
use callmap::{analyzer, cli, diagram, filter, inventory, resolver, util};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

const RESULT_FILENAME: &str = "result.json";
const DIAGRAM_ID_FILENAME: &str = "diagram-id.mmd";
const DIAGRAM_READABLE_FILENAME: &str = "diagram-readable.mmd";
const DIAGRAM_FILTER_FILENAME: &str = "diagram-filter.mmd";
const FILTER_RESULT_FILENAME: &str = "filterResult.json";

fn scan_options(ignore: Vec<String>, no_ignore: bool) -> ScanOptions {
    if ignore.is_empty() {
        ScanOptions {
            no_ignore,
            ..ScanOptions::default()
        }
    } else {
        ScanOptions::new(ignore, no_ignore)
    }
}

fn write_artifact(out_dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let path = out_dir.join(filename);
    util::ensure_parent_dir(&path)?;
    fs::write(&path, content)?;
    Ok(path)
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            root,
            ignore,
            no_ignore,
            out_dir,
            filter_text,
        } => {
            let options = scan_options(ignore, no_ignore);
            let mut analyzer = analyzer::Analyzer::new_with_options(root, options);
            let result = analyzer.analyze()?;

            let json = serde_json::to_string_pretty(&result)?;
            let path = write_artifact(&out_dir, RESULT_FILENAME, &json)?;
            println!("Results have been written to {}", path.display());

            let id_diagram = diagram::id_diagram(&result);
            let path = write_artifact(&out_dir, DIAGRAM_ID_FILENAME, &id_diagram)?;
            println!("Id diagram has been written to {}", path.display());

            let readable =
                diagram::readable_diagram(&id_diagram, &result, analyzer.project_root());
            let readable_path = write_artifact(&out_dir, DIAGRAM_READABLE_FILENAME, &readable)?;
            println!(
                "Readable diagram has been written to {}",
                readable_path.display()
            );

            if let Some(text) = filter_text {
                let edges = diagram::parse_diagram(&readable);
                let chain = filter::extract_call_chain(&edges, &text);
                if chain.is_empty() {
                    eprintln!("callmap: no functions matching \"{text}\" were found");
                }
                let filtered = filter::filtered_diagram(&edges, &chain);
                let path = write_artifact(&out_dir, DIAGRAM_FILTER_FILENAME, &filtered)?;
                println!("Filtered diagram has been written to {}", path.display());
            }
            Ok(())
        }
        cli::Command::Functions {
            root,
            ignore,
            no_ignore,
        } => {
            let options = scan_options(ignore, no_ignore);
            let root = fs::canonicalize(&root).unwrap_or(root);
            let functions = inventory::defined_functions_with_options(&root, &options)?;
            println!("{}", serde_json::to_string_pretty(&functions)?);
            Ok(())
        }
        cli::Command::Resolve {
            root,
            file,
            function,
        } => {
            let root = fs::canonicalize(&root).unwrap_or(root);
            let file = if file.is_absolute() {
                file
            } else {
                root.join(file)
            };
            let buckets = resolver::resolve_calls(&root, &file, &function)?;
            println!("{}", serde_json::to_string_pretty(&buckets)?);
            Ok(())
        }
        cli::Command::Filter {
            result,
            diagram: diagram_path,
            text,
            root,
            out_dir,
        } => {
            let root = fs::canonicalize(&root).unwrap_or(root);
            match (result, diagram_path) {
                (Some(result_path), _) => {
                    let content = util::read_to_string(&result_path)?;
                    let result: callmap::model::AnalysisResult = serde_json::from_str(&content)?;
                    let filtered = filter::filter_result(&result, &text);
                    if filtered.is_empty() {
                        eprintln!("callmap: no functions matching \"{text}\" were found");
                    }
                    let json = serde_json::to_string_pretty(&filtered)?;
                    let path = write_artifact(&out_dir, FILTER_RESULT_FILENAME, &json)?;
                    println!("Filtered results have been written to {}", path.display());

                    let sub_diagram = filter::subgraph_diagram(&filtered, &root);
                    let path = write_artifact(&out_dir, DIAGRAM_FILTER_FILENAME, &sub_diagram)?;
                    println!("Filtered diagram has been written to {}", path.display());
                    Ok(())
                }
                (None, Some(diagram_file)) => {
                    let content = util::read_to_string(&diagram_file)?;
                    let edges = diagram::parse_diagram(&content);
                    if edges.is_empty() {
                        bail!("no edges found in {}", diagram_file.display());
                    }
                    let chain = filter::extract_call_chain(&edges, &text);
                    if chain.is_empty() {
                        eprintln!("callmap: no functions matching \"{text}\" were found");
                    }
                    let filtered = filter::filtered_diagram(&edges, &chain);
                    let path = write_artifact(&out_dir, DIAGRAM_FILTER_FILENAME, &filtered)?;
                    println!("Filtered diagram has been written to {}", path.display());
                    Ok(())
                }
                (None, None) => bail!("pass either --result or --diagram"),
            }
        }
    }
}
