use crate::error::{GridError, Result};
use crate::style::owned_css::OwnedStylesheet;
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};

/// The text forms a generated stylesheet can be written as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented CSS, every declaration kept.
    #[default]
    Css,
    /// CSS re-printed by LightningCSS with whitespace stripped.
    Minified,
    /// The node tree as JSON (`rule`, `media` and `declaration` objects).
    Json,
}

pub fn render(style: &OwnedStylesheet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Css => Ok(style.to_string()),
        OutputFormat::Minified => minify_css(&style.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(style).map_err(json_render_error),
    }
}

// Serializing the output is a render failure, not a config one, even though
// both come out of serde_json.
fn json_render_error(err: serde_json::Error) -> GridError {
    GridError::Render(err.to_string())
}

/// Re-prints CSS text through LightningCSS in minified form.
///
/// Error recovery is on so that the legacy star-hack declarations, which are
/// not valid CSS, do not abort the whole sheet; LightningCSS may drop them.
pub fn minify_css(css_text: &str) -> Result<String> {
    let parser_opts = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };

    let sheet = LightningStyleSheet::parse(css_text, parser_opts)
        .map_err(|e| GridError::Render(e.to_string()))?;

    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| GridError::Render(e.to_string()))?;

    Ok(printed.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{units, GridOptions};

    fn sheet() -> OwnedStylesheet {
        let options = GridOptions {
            include_old_ie_widths: false,
            include_old_ie_display: false,
            ..GridOptions::default()
        };
        let mut style = OwnedStylesheet::new();
        units(&[2], options)(&mut style).unwrap();
        style
    }

    #[test]
    fn test_render_css_matches_display() {
        let style = sheet();
        assert_eq!(render(&style, OutputFormat::Css).unwrap(), style.to_string());
    }

    #[test]
    fn test_render_minified() {
        let css = render(&sheet(), OutputFormat::Minified).unwrap();
        assert!(!css.contains('\n'));
        assert!(css.contains(".pure-u-1-2{width:50%}"));
    }

    #[test]
    fn test_render_json() {
        let json = render(&sheet(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rules"][0]["type"], "rule");
        assert_eq!(value["rules"][1]["declarations"][0]["value"], "50%");
    }

    #[test]
    fn test_json_failure_is_render_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(json_render_error(err), GridError::Render(_)));
    }
}
