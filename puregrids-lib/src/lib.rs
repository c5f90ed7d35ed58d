pub mod config;
pub mod error;
pub mod fraction;
pub mod grid_generate;
pub mod media;
pub mod style;
pub mod units;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use media::{
    generate_with_breakpoints, generate_with_descriptors, media_queries, BreakpointDescriptor,
};
pub use style::css_output::OutputFormat;
pub use style::owned_css::{
    OwnedDeclaration, OwnedMedia, OwnedNode, OwnedRule, OwnedStylesheet,
};
pub use units::{generate_units, units, GridOptions, RuleSink};
