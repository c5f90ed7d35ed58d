//! Grid unit rule generation.
//!
//! For every column count `N`, each fraction `1/N ..= N/N` becomes a selector.
//! Fractions with the same width (`2/4` and `1/2`) share one `width` rule, and
//! every generated selector also lands on a single base rule carrying the
//! shared `display`/spacing declarations.

use crate::error::{GridError, Result};
use crate::fraction::{self, Fraction};
use crate::style::owned_css::{OwnedDeclaration, OwnedMedia, OwnedNode, OwnedRule, OwnedStylesheet};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_SELECTOR_PREFIX: &str = ".pure-u-";
pub const DEFAULT_DECIMALS: usize = 4;

// IE < 8 has issues with rounding, reducing the width slightly prevents the
// grid units from wrapping to the next line.
pub const OLD_IE_WIDTH_DELTA: f64 = -0.00031;

/// Options shared by every generator entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Fractional digits for non-integer percentages.
    pub decimals: usize,
    /// Adds a `*width` declaration, nudged by [`OLD_IE_WIDTH_DELTA`], to every
    /// unit narrower than 100%.
    pub include_old_ie_widths: bool,
    /// Adds `*display: inline` and `zoom: 1` to the base rule.
    pub include_old_ie_display: bool,
    /// Adds the lowest-terms selector (`.pure-u-1-2` next to `.pure-u-2-4`).
    pub include_reduced_fractions: bool,
    /// Writes reduced whole units without a denominator (`.pure-u-1`).
    pub include_whole_numbers: bool,
    pub selector_prefix: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            decimals: DEFAULT_DECIMALS,
            include_old_ie_widths: true,
            include_old_ie_display: true,
            include_reduced_fractions: true,
            include_whole_numbers: true,
            selector_prefix: DEFAULT_SELECTOR_PREFIX.to_string(),
        }
    }
}

impl GridOptions {
    /// Defaults used when wrapping units in named breakpoints: same as
    /// [`GridOptions::default`] but without the `*width` declarations.
    pub fn breakpoint_defaults() -> Self {
        GridOptions {
            include_old_ie_widths: false,
            ..GridOptions::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.selector_prefix = prefix.into();
        self
    }
}

/// Anything generated rules can be appended to.
pub trait RuleSink {
    fn append_rules(&mut self, rules: Vec<OwnedRule>);
}

impl RuleSink for OwnedStylesheet {
    fn append_rules(&mut self, rules: Vec<OwnedRule>) {
        self.rules.extend(rules.into_iter().map(OwnedNode::Rule));
    }
}

impl RuleSink for OwnedMedia {
    fn append_rules(&mut self, rules: Vec<OwnedRule>) {
        self.rules.extend(rules);
    }
}

impl RuleSink for Vec<OwnedRule> {
    fn append_rules(&mut self, rules: Vec<OwnedRule>) {
        self.extend(rules);
    }
}

/// Formats a width ratio as a percentage: whole percentages get no decimals,
/// everything else gets exactly `decimals` digits.
pub fn to_percentage(ratio: f64, decimals: usize) -> String {
    let percent = ratio * 100.0;
    if percent.fract() == 0.0 {
        format!("{:.0}%", percent)
    } else {
        format!("{}%", to_fixed(percent, decimals))
    }
}

// Enough fractional digits to print any finite f64 exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Fixed-point formatting where an exact half rounds away from zero
/// (`6.25` -> `6.3`), unlike `{:.N}` which rounds halves to even.
fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() || decimals >= EXACT_FRACTION_DIGITS {
        return format!("{:.*}", decimals, value);
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let Some(tail) = frac_part.get(decimals..) else {
        return format!("{:.*}", decimals, value);
    };
    let is_half = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_half {
        return format!("{:.*}", decimals, value);
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part[..decimals].bytes())
        .collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let split = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&b| b as char));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&b| b as char));
    }
    out
}

/// Declarations of the `.pure-u` base rule applied to every generated unit.
pub fn base_declarations(options: &GridOptions) -> Vec<OwnedDeclaration> {
    let mut declarations = vec![OwnedDeclaration::new("display", "inline-block")];
    if options.include_old_ie_display {
        declarations.push(OwnedDeclaration::new("*display", "inline"));
        declarations.push(OwnedDeclaration::new("zoom", "1"));
    }
    declarations.extend([
        OwnedDeclaration::new("letter-spacing", "normal"),
        OwnedDeclaration::new("word-spacing", "normal"),
        OwnedDeclaration::new("vertical-align", "top"),
        OwnedDeclaration::new("text-rendering", "auto"),
    ]);
    declarations
}

fn width_declarations(width: f64, options: &GridOptions) -> Vec<OwnedDeclaration> {
    let mut declarations = vec![OwnedDeclaration::new(
        "width",
        to_percentage(width, options.decimals),
    )];
    if options.include_old_ie_widths && width < 1.0 {
        declarations.push(OwnedDeclaration::new(
            "*width",
            to_percentage(width + OLD_IE_WIDTH_DELTA, options.decimals),
        ));
    }
    declarations
}

/// Map key for a width ratio. Equal fractions divide to bit-identical floats,
/// so grouping on the float itself merges `2/4` with `1/2`.
#[derive(Debug, Clone, Copy)]
struct WidthKey(f64);

impl PartialEq for WidthKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WidthKey {}

impl PartialOrd for WidthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WidthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Pass-local state while walking one or more column counts.
struct UnitPass<'a> {
    options: &'a GridOptions,
    groups: BTreeMap<WidthKey, BTreeSet<String>>,
    selectors: BTreeSet<String>,
}

impl<'a> UnitPass<'a> {
    fn new(options: &'a GridOptions) -> Self {
        UnitPass {
            options,
            groups: BTreeMap::new(),
            selectors: BTreeSet::new(),
        }
    }

    fn add_column_count(&mut self, columns: u32) {
        let prefix = self.options.selector_prefix.as_str();

        for numerator in 1..=columns {
            let unit = Fraction::new(numerator, columns);
            let width = unit.ratio();

            let mut unit_selectors = vec![fraction::selector_for(prefix, unit, columns == 1)];

            if self.options.include_reduced_fractions {
                let reduced = unit.reduced();
                if reduced != unit {
                    unit_selectors.push(fraction::selector_for(
                        prefix,
                        reduced,
                        self.options.include_whole_numbers,
                    ));
                }
            }

            trace!("{}/{} -> {:?} at {}", numerator, columns, unit_selectors, width);

            let group = self.groups.entry(WidthKey(width)).or_default();
            for selector in unit_selectors {
                group.insert(selector.clone());
                self.selectors.insert(selector);
            }
        }
    }

    fn into_rules(self) -> Result<Vec<OwnedRule>> {
        if self.selectors.is_empty() {
            return Ok(Vec::new());
        }

        let options = self.options;
        let prefix = options.selector_prefix.as_str();
        let mut rules = Vec::with_capacity(self.groups.len() + 1);

        rules.push(OwnedRule {
            selectors: fraction::sort_selectors(prefix, self.selectors)?,
            declarations: base_declarations(options),
        });

        for (WidthKey(width), selectors) in self.groups {
            rules.push(OwnedRule {
                selectors: fraction::sort_selectors(prefix, selectors)?,
                declarations: width_declarations(width, options),
            });
        }

        Ok(rules)
    }
}

/// Rejects a zero column count before anything is generated.
pub(crate) fn check_column_counts(columns: &[u32]) -> Result<()> {
    match columns.iter().find(|&&count| count == 0) {
        Some(&invalid) => Err(GridError::InvalidColumnCount(i64::from(invalid))),
        None => Ok(()),
    }
}

/// Generates the base rule followed by one `width` rule per distinct width,
/// in ascending width order. Widths repeated across column counts are merged.
pub fn generate_units(columns: &[u32], options: &GridOptions) -> Result<Vec<OwnedRule>> {
    check_column_counts(columns)?;

    let mut pass = UnitPass::new(options);
    for &count in columns {
        pass.add_column_count(count);
    }

    debug!(
        "generated {} width groups and {} selectors for columns {:?} (prefix {:?})",
        pass.groups.len(),
        pass.selectors.len(),
        columns,
        options.selector_prefix
    );

    pass.into_rules()
}

/// Curried form of [`generate_units`]: the returned closure appends the rules
/// to a sink, leaving it untouched when generation fails.
pub fn units<S>(columns: &[u32], options: GridOptions) -> impl Fn(&mut S) -> Result<()>
where
    S: RuleSink + ?Sized,
{
    let columns = columns.to_vec();
    move |sink: &mut S| {
        let rules = generate_units(&columns, &options)?;
        sink.append_rules(rules);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(rule: &OwnedRule) -> Vec<&str> {
        rule.selectors.iter().map(String::as_str).collect()
    }

    fn value<'r>(rule: &'r OwnedRule, property: &str) -> Option<&'r str> {
        rule.declarations
            .iter()
            .find(|decl| decl.property == property)
            .map(|decl| decl.value.as_str())
    }

    fn options(prefix: &str) -> GridOptions {
        GridOptions::default().with_prefix(prefix)
    }

    #[test]
    fn test_percentage_formatting() {
        assert_eq!(to_percentage(1.0 / 3.0, 4), "33.3333%");
        assert_eq!(to_percentage(1.0 / 4.0, 4), "25%");
        assert_eq!(to_percentage(1.0 / 3.0, 2), "33.33%");
        assert_eq!(to_percentage(1.0, 4), "100%");
    }

    #[test]
    fn test_percentage_halves_round_up() {
        assert_eq!(to_percentage(1.0 / 128.0, 4), "0.7813%");
        assert_eq!(to_percentage(1.0 / 16.0, 1), "6.3%");
        assert_eq!(to_percentage(1.0 / 8.0, 0), "13%");
        // 99.95 is not an exact half in binary, so it keeps normal rounding.
        assert_eq!(to_fixed(99.95, 1), format!("{:.1}", 99.95));
        assert_eq!(to_fixed(9.995, 2), format!("{:.2}", 9.995));
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
    }

    #[test]
    fn test_first_of_128_columns() {
        let rules = generate_units(&[128], &GridOptions::default()).unwrap();
        assert_eq!(value(&rules[1], "width"), Some("0.7813%"));
    }

    #[test]
    fn test_old_ie_width_delta() {
        let rules = generate_units(&[2], &options(".p-")).unwrap();
        let half = &rules[1];
        assert_eq!(value(half, "width"), Some("50%"));
        assert_eq!(
            value(half, "*width"),
            Some(to_percentage(0.5 + OLD_IE_WIDTH_DELTA, 4).as_str())
        );
        assert_eq!(value(half, "*width"), Some("49.9690%"));
    }

    #[test]
    fn test_single_column_is_whole_number() {
        let rules = generate_units(&[1], &options(".p-")).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(selectors(&rules[0]), vec![".p-1"]);
        assert_eq!(selectors(&rules[1]), vec![".p-1"]);
        assert_eq!(value(&rules[1], "width"), Some("100%"));
        assert_eq!(value(&rules[1], "*width"), None);
    }

    #[test]
    fn test_equal_widths_share_one_rule() {
        let rules = generate_units(&[4], &options(".p-")).unwrap();
        // Base rule plus 1/4, 2/4, 3/4, 4/4.
        assert_eq!(rules.len(), 5);
        assert_eq!(selectors(&rules[2]), vec![".p-1-2", ".p-2-4"]);
        assert_eq!(value(&rules[2], "width"), Some("50%"));
    }

    #[test]
    fn test_widths_merge_across_column_counts() {
        let rules = generate_units(&[2, 4], &options(".p-")).unwrap();
        let halves: Vec<_> = rules[1..]
            .iter()
            .filter(|rule| value(rule, "width") == Some("50%"))
            .collect();
        assert_eq!(halves.len(), 1);
        assert_eq!(selectors(halves[0]), vec![".p-1-2", ".p-2-4"]);

        let wholes: Vec<_> = rules[1..]
            .iter()
            .filter(|rule| value(rule, "width") == Some("100%"))
            .collect();
        assert_eq!(wholes.len(), 1);
        assert_eq!(selectors(wholes[0]), vec![".p-1", ".p-2-2", ".p-4-4"]);
    }

    #[test]
    fn test_distinct_width_count() {
        for columns in 1..=24u32 {
            let rules = generate_units(&[columns], &options(".p-")).unwrap();
            // Every numerator/N is distinct for a single N.
            assert_eq!(rules.len() as u32, columns + 1);
        }
        // 1/2 and 2/2 reappear in quarters.
        let rules = generate_units(&[2, 4], &options(".p-")).unwrap();
        assert_eq!(rules.len(), 1 + 4);
    }

    #[test]
    fn test_widths_ascending() {
        let rules = generate_units(&[3, 5, 8], &options(".p-")).unwrap();
        let widths: Vec<f64> = rules[1..]
            .iter()
            .map(|rule| {
                value(rule, "width")
                    .unwrap()
                    .trim_end_matches('%')
                    .parse::<f64>()
                    .unwrap()
            })
            .collect();
        let mut sorted = widths.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(widths, sorted);
    }

    #[test]
    fn test_without_reduced_fractions() {
        let opts = GridOptions {
            include_reduced_fractions: false,
            ..options(".p-")
        };
        let rules = generate_units(&[4], &opts).unwrap();
        assert_eq!(
            selectors(&rules[0]),
            vec![".p-1-4", ".p-2-4", ".p-3-4", ".p-4-4"]
        );
    }

    #[test]
    fn test_without_whole_numbers() {
        let opts = GridOptions {
            include_whole_numbers: false,
            ..options(".p-")
        };
        let rules = generate_units(&[4], &opts).unwrap();
        let last = rules.last().unwrap();
        assert_eq!(selectors(last), vec![".p-1-1", ".p-4-4"]);
    }

    #[test]
    fn test_without_old_ie() {
        let opts = GridOptions {
            include_old_ie_widths: false,
            include_old_ie_display: false,
            ..options(".p-")
        };
        let rules = generate_units(&[3], &opts).unwrap();
        let properties: Vec<_> = rules[0]
            .declarations
            .iter()
            .map(|decl| decl.property.as_str())
            .collect();
        assert_eq!(
            properties,
            vec!["display", "letter-spacing", "word-spacing", "vertical-align", "text-rendering"]
        );
        assert!(rules[1..].iter().all(|rule| value(rule, "*width").is_none()));
    }

    #[test]
    fn test_base_declarations_with_old_ie_display() {
        let properties: Vec<_> = base_declarations(&GridOptions::default())
            .into_iter()
            .map(|decl| format!("{}: {}", decl.property, decl.value))
            .collect();
        assert_eq!(
            properties,
            vec![
                "display: inline-block",
                "*display: inline",
                "zoom: 1",
                "letter-spacing: normal",
                "word-spacing: normal",
                "vertical-align: top",
                "text-rendering: auto",
            ]
        );
    }

    #[test]
    fn test_custom_decimals() {
        let opts = GridOptions {
            decimals: 2,
            ..options(".p-")
        };
        let rules = generate_units(&[3], &opts).unwrap();
        assert_eq!(value(&rules[1], "width"), Some("33.33%"));
        assert_eq!(value(&rules[1], "*width"), Some("33.30%"));
    }

    #[test]
    fn test_zero_columns_rejected_without_mutation() {
        let mut sink: Vec<OwnedRule> = Vec::new();
        let result = units(&[12, 0], options(".p-"))(&mut sink);
        assert!(matches!(result, Err(GridError::InvalidColumnCount(0))));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_no_columns_no_rules() {
        assert!(generate_units(&[], &GridOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_units_appends_after_existing_entries() {
        let mut sheet = OwnedStylesheet::new();
        sheet.rules.push(OwnedNode::Media(OwnedMedia::new("print")));
        units(&[2], GridOptions::default())(&mut sheet).unwrap();

        assert_eq!(sheet.rules.len(), 4);
        assert_eq!(sheet.rules[0], OwnedNode::Media(OwnedMedia::new("print")));
        assert!(matches!(&sheet.rules[1], OwnedNode::Rule(rule) if rule.selectors.len() == 3));
    }

    #[test]
    fn test_units_into_media_node() {
        let mut media = OwnedMedia::new("(min-width: 480px)");
        units(&[3], GridOptions::default())(&mut media).unwrap();
        assert_eq!(media.rules.len(), 4);
    }
}
