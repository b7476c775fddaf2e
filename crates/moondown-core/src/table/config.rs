//! Tunable table editor settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for a table editor instance.
///
/// Deserializes from camelCase keys so a JS options object can be passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableEditorConfig {
    /// Base size in px of the edge buttons; also the hover margin around the table.
    pub edge_button_size: f64,
    /// Gap in px kept between edge buttons and the table or viewport edges.
    pub edge_spacing: f64,
    /// Time allowed for focus to settle after a cell blur before the table
    /// counts as blurred.
    pub blur_settle_delay_ms: u32,
}

impl Default for TableEditorConfig {
    fn default() -> Self {
        Self {
            edge_button_size: 30.0,
            edge_spacing: 5.0,
            blur_settle_delay_ms: 10,
        }
    }
}

impl TableEditorConfig {
    pub fn blur_settle_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.blur_settle_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TableEditorConfig::default();
        assert_eq!(config.edge_button_size, 30.0);
        assert_eq!(config.edge_spacing, 5.0);
        assert_eq!(
            TableEditorConfig::default().blur_settle_delay(),
            Duration::from_millis(10)
        );
    }
}
