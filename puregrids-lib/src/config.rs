//! Declarative grid description, read from JSON:
//!
//! ```json
//! {
//!   "columns": [5, 24],
//!   "selectorPrefix": ".pure-u-",
//!   "includeOldIEWidths": false,
//!   "breakpoints": { "sm": "screen and (min-width: 35.5em)" },
//!   "mediaQueries": [{ "minWidth": "480px", "gridName": "med" }]
//! }
//! ```

use crate::error::{validate_column_counts, Result};
use crate::media::BreakpointDescriptor;
use crate::units::GridOptions;
use indexmap::IndexMap;
use serde::Deserialize;

/// Option values the user set explicitly. Anything left `None` falls back to
/// the defaults of whichever generator the options are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    pub decimals: Option<usize>,
    #[serde(rename = "includeOldIEWidths")]
    pub include_old_ie_widths: Option<bool>,
    #[serde(rename = "includeOldIEDisplay")]
    pub include_old_ie_display: Option<bool>,
    pub include_reduced_fractions: Option<bool>,
    pub include_whole_numbers: Option<bool>,
    pub selector_prefix: Option<String>,
}

impl OptionOverrides {
    pub fn apply_to(&self, mut base: GridOptions) -> GridOptions {
        if let Some(decimals) = self.decimals {
            base.decimals = decimals;
        }
        if let Some(flag) = self.include_old_ie_widths {
            base.include_old_ie_widths = flag;
        }
        if let Some(flag) = self.include_old_ie_display {
            base.include_old_ie_display = flag;
        }
        if let Some(flag) = self.include_reduced_fractions {
            base.include_reduced_fractions = flag;
        }
        if let Some(flag) = self.include_whole_numbers {
            base.include_whole_numbers = flag;
        }
        if let Some(prefix) = &self.selector_prefix {
            base.selector_prefix = prefix.clone();
        }
        base
    }

    /// Layers `other` on top of `self`; values set in `other` win.
    pub fn merge(&mut self, other: OptionOverrides) {
        self.decimals = other.decimals.or(self.decimals);
        self.include_old_ie_widths = other.include_old_ie_widths.or(self.include_old_ie_widths);
        self.include_old_ie_display = other.include_old_ie_display.or(self.include_old_ie_display);
        self.include_reduced_fractions = other
            .include_reduced_fractions
            .or(self.include_reduced_fractions);
        self.include_whole_numbers = other.include_whole_numbers.or(self.include_whole_numbers);
        self.selector_prefix = other.selector_prefix.or(self.selector_prefix.take());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Column counts for the unscoped unit rules. Kept signed so that bad
    /// input is reported as an invalid count rather than a type error.
    #[serde(default)]
    pub columns: Vec<i64>,
    #[serde(flatten)]
    pub options: OptionOverrides,
    /// Named breakpoints, wrapped in media nodes in declaration order.
    #[serde(default)]
    pub breakpoints: IndexMap<String, String>,
    #[serde(default)]
    pub media_queries: Vec<BreakpointDescriptor>,
}

impl GridConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn column_counts(&self) -> Result<Vec<u32>> {
        validate_column_counts(&self.columns)
    }

    /// Options for the unscoped unit rules and the descriptor media queries.
    pub fn unit_options(&self) -> GridOptions {
        self.options.apply_to(GridOptions::default())
    }

    /// Options for the named breakpoint media queries.
    pub fn breakpoint_options(&self) -> GridOptions {
        self.options.apply_to(GridOptions::breakpoint_defaults())
    }
}
