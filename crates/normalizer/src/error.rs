use thiserror::Error;

/// Fatal data-validation failures. Any one of these aborts the whole run;
/// the message always names the offending sheet and field.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}', column '{column}', row {row}: expected {expected}")]
    InvalidCell {
        sheet: String,
        column: String,
        row: usize,
        expected: String,
    },

    #[error("Sheet '{sheet}', row {row}: {detail}")]
    InconsistentRow {
        sheet: String,
        row: usize,
        detail: String,
    },
}
