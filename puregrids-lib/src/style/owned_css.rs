// src/style/owned_css.rs
use serde::Serialize;
use std::fmt;

const INDENT: &str = "  ";

/// A fully-owned stylesheet: the generators only ever append to `rules`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct OwnedStylesheet {
    pub rules: Vec<OwnedNode>,
}

/// A top-level stylesheet entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OwnedNode {
    Rule(OwnedRule),
    Media(OwnedMedia),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "rule")]
pub struct OwnedRule {
    /// e.g. ".pure-u-1-2", ".pure-u-2-4"
    pub selectors: Vec<String>,
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "declaration")]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
}

/// An `@media` block wrapping a namespaced copy of the grid rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "media")]
pub struct OwnedMedia {
    pub media: String,
    pub rules: Vec<OwnedRule>,
}

impl OwnedStylesheet {
    pub fn new() -> Self {
        OwnedStylesheet { rules: Vec::new() }
    }

    /// Every rule in the sheet, including those nested in media blocks.
    pub fn all_rules(&self) -> impl Iterator<Item = &OwnedRule> {
        self.rules.iter().flat_map(|node| match node {
            OwnedNode::Rule(rule) => std::slice::from_ref(rule).iter(),
            OwnedNode::Media(media) => media.rules.iter(),
        })
    }
}

impl OwnedDeclaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        OwnedDeclaration {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl OwnedMedia {
    pub fn new(media: impl Into<String>) -> Self {
        OwnedMedia {
            media: media.into(),
            rules: Vec::new(),
        }
    }
}

impl OwnedRule {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        let separator = format!(",\n{}", indent);
        writeln!(f, "{}{} {{", indent, self.selectors.join(&separator))?;
        for decl in &self.declarations {
            writeln!(f, "{}{}{}: {};", indent, INDENT, decl.property, decl.value)?;
        }
        write!(f, "{}}}", indent)
    }
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, "")
    }
}

impl fmt::Display for OwnedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@media {} {{", self.media)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            rule.write_indented(f, INDENT)?;
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for OwnedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedNode::Rule(rule) => write!(f, "{}", rule),
            OwnedNode::Media(media) => write!(f, "{}", media),
        }
    }
}

impl fmt::Display for OwnedStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}
