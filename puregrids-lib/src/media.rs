//! Responsive grid units: the unit rules replayed inside `@media` blocks, one
//! independently generated, namespaced copy per breakpoint.

use crate::error::Result;
use crate::style::owned_css::{OwnedMedia, OwnedNode, OwnedStylesheet};
use crate::units::{self, GridOptions};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;

/// Column count used by the descriptor form, which has no column argument.
pub const DESCRIPTOR_GRID_COLUMNS: u32 = 12;

/// Prefix for a breakpoint's namespace: `.pure-u-` + `sm` -> `.pure-u-sm-`.
pub fn breakpoint_prefix(base_prefix: &str, name: &str) -> String {
    format!("{}{}-", base_prefix, name)
}

/// Wraps a fresh unit rule set in one media node per named breakpoint,
/// following the map's insertion order.
pub fn generate_with_breakpoints(
    columns: &[u32],
    breakpoints: &IndexMap<String, String>,
    options: &GridOptions,
) -> Result<Vec<OwnedMedia>> {
    units::check_column_counts(columns)?;
    let mut nodes = Vec::with_capacity(breakpoints.len());

    for (name, condition) in breakpoints {
        let media_options = options
            .clone()
            .with_prefix(breakpoint_prefix(&options.selector_prefix, name));

        let mut media = OwnedMedia::new(condition.as_str());
        units::units(columns, media_options)(&mut media)?;

        debug!(
            "breakpoint {:?} ({}) -> {} rules",
            name,
            condition,
            media.rules.len()
        );
        nodes.push(media);
    }

    Ok(nodes)
}

/// Curried form of [`generate_with_breakpoints`]. Nothing is appended when any
/// breakpoint fails to generate.
pub fn media_queries(
    columns: &[u32],
    breakpoints: IndexMap<String, String>,
    options: GridOptions,
) -> impl Fn(&mut OwnedStylesheet) -> Result<()> {
    let columns = columns.to_vec();
    move |style: &mut OwnedStylesheet| {
        let nodes = generate_with_breakpoints(&columns, &breakpoints, &options)?;
        style.rules.extend(nodes.into_iter().map(OwnedNode::Media));
        Ok(())
    }
}

/// A breakpoint given by its bounds rather than a ready-made condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointDescriptor {
    pub min_width: Option<String>,
    pub max_width: Option<String>,
    pub grid_name: Option<String>,
}

impl BreakpointDescriptor {
    pub fn new(
        min_width: Option<&str>,
        max_width: Option<&str>,
        grid_name: Option<&str>,
    ) -> Self {
        BreakpointDescriptor {
            min_width: min_width.map(str::to_string),
            max_width: max_width.map(str::to_string),
            grid_name: grid_name.map(str::to_string),
        }
    }

    /// `(min-width: X)`, `(max-width: Y)` or `(min-width: X) and (max-width: Y)`.
    /// Empty when neither bound is set.
    pub fn condition(&self) -> String {
        fn bound(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }
        match (bound(&self.min_width), bound(&self.max_width)) {
            (Some(min), Some(max)) => format!("(min-width: {}) and (max-width: {})", min, max),
            (Some(min), None) => format!("(min-width: {})", min),
            (None, Some(max)) => format!("(max-width: {})", max),
            (None, None) => String::new(),
        }
    }
}

/// Descriptor form: each entry with a `grid_name` gets a
/// [`DESCRIPTOR_GRID_COLUMNS`]-column rule set namespaced by that name.
/// Entries without one still produce their (empty) media node.
pub fn generate_with_descriptors(
    descriptors: &[BreakpointDescriptor],
    options: &GridOptions,
) -> Result<Vec<OwnedMedia>> {
    let mut nodes = Vec::with_capacity(descriptors.len());

    for (index, descriptor) in descriptors.iter().enumerate() {
        let mut media = OwnedMedia::new(descriptor.condition());
        if media.media.is_empty() {
            warn!("media query #{} has neither minWidth nor maxWidth", index);
        }

        match &descriptor.grid_name {
            Some(grid_name) => {
                let grid_options = options
                    .clone()
                    .with_prefix(breakpoint_prefix(&options.selector_prefix, grid_name));
                units::units(&[DESCRIPTOR_GRID_COLUMNS], grid_options)(&mut media)?;
            }
            None => warn!(
                "media query #{} ({}) has no gridName, emitting it without rules",
                index, media.media
            ),
        }

        nodes.push(media);
    }

    Ok(nodes)
}

/// Curried form of [`generate_with_descriptors`].
pub fn media_query_descriptors(
    descriptors: Vec<BreakpointDescriptor>,
    options: GridOptions,
) -> impl Fn(&mut OwnedStylesheet) -> Result<()> {
    move |style: &mut OwnedStylesheet| {
        let nodes = generate_with_descriptors(&descriptors, &options)?;
        style.rules.extend(nodes.into_iter().map(OwnedNode::Media));
        Ok(())
    }
}
