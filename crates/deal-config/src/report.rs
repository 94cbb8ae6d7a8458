//! Reporting behaviour.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Exit non-zero when any scenario fails.
    #[serde(default)]
    pub strict: bool,
}
