use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("no such file: `{path}`")]
    FileNotFound { path: Utf8PathBuf },
    #[error("reading `{path}`")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{what}: line {line}: invalid JSON")]
    ParseLine {
        what: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{what}: invalid JSON")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record `{id}` has no numeric field `{field}`")]
    MissingField { id: String, field: String },
    #[error("bad shape: {actual} values, -W={width}, -H={height} (expected {expected})")]
    ShapeMismatch {
        expected: u128,
        actual: usize,
        width: usize,
        height: usize,
    },
    #[error("bad image: row {row}: {detail}")]
    ImageShape { row: usize, detail: String },
    #[error("{what}: length mismatch ({left} vs. {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },
    #[error("missing value at row {row}, column {column}")]
    MissingValue { row: usize, column: usize },
    #[error("invalid value `{value}` for {arg}: {reason}")]
    Argument {
        arg: &'static str,
        value: String,
        reason: String,
    },
}

impl PlotError {
    pub fn argument(
        arg: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlotError::Argument {
            arg,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
