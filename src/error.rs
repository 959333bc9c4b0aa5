use std::path::PathBuf;
use thiserror::Error;

/// File-level failures raised while extracting or parsing a source file.
///
/// All of these are contained at the file boundary: the caller logs and
/// moves on, they never abort a whole-project run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Extension outside the supported set (`.js`, `.vue`).
    #[error("unsupported file type: {path} (only .js and .vue are supported)")]
    UnsupportedFileType { path: PathBuf },

    /// Malformed syntax in a script body.
    #[error("parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Component file with no `<script>` block. Callers treat this as
    /// zero script bodies rather than a failure.
    #[error("no <script> content found in {path}")]
    MissingScriptContent { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
