use chrono::NaiveDate;
use serde::Deserialize;

/// The root configuration structure for a reporting run.
///
/// Everything here has a sensible default; a missing `omzet.toml` means a
/// run with today's date and top-10 tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Evaluation date for receivable ages and loyalty recency. When unset,
    /// the binary uses today's date; the CLI flag overrides both.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Number of rows kept in the ranked geography and product tables.
    /// The aging engine's largest-open-items list is fixed at ten rows
    /// and does not read this.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self { as_of: None, top_n: default_top_n() }
    }
}
