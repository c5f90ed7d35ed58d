use crate::config::GridConfig;
use crate::media;
use crate::style::css_output::{self, OutputFormat};
use crate::style::owned_css::OwnedStylesheet;
use crate::units;

pub mod pure_grid {
    use super::*;
    use crate::error::Result;

    /// Builds the whole stylesheet a config describes: the unscoped units,
    /// then the named breakpoints, then the descriptor media queries.
    pub fn generate(config: &GridConfig) -> Result<OwnedStylesheet> {
        let columns = config.column_counts()?;
        let mut style = OwnedStylesheet::new();

        if !columns.is_empty() {
            units::units(&columns, config.unit_options())(&mut style)?;
        }

        if !config.breakpoints.is_empty() {
            media::media_queries(
                &columns,
                config.breakpoints.clone(),
                config.breakpoint_options(),
            )(&mut style)?;
        }

        if !config.media_queries.is_empty() {
            media::media_query_descriptors(config.media_queries.clone(), config.unit_options())(
                &mut style,
            )?;
        }

        log::info!("generated {} top-level stylesheet nodes", style.rules.len());
        Ok(style)
    }

    pub fn generate_to_string(config: &GridConfig, format: OutputFormat) -> Result<String> {
        let style = generate(config)?;
        css_output::render(&style, format)
    }
}
