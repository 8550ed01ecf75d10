//! Shape label parsing.
//!
//! draw.io stores HTML labels verbatim, so a router label may look like
//! `<div>R1</div>VRF: [red, blue]`. This module extracts the visible name and
//! the VRF list from such strings. Plain labels are taken as-is.
//!
//! All functions here are pure.

use indexmap::IndexSet;
use winnow::{
    Parser as _,
    ascii::{digit1, multispace0},
    combinator::{delimited, preceded, separated},
    error::{ContextError, ErrMode},
    token::{literal, take_till, take_until},
};

type PResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// A label split into its display name and VRF names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLabel {
    pub name: String,
    pub vrfs: IndexSet<String>,
}

/// Opening `<div ...>` tag, attributes included.
fn div_open(input: &mut &str) -> PResult<()> {
    (literal("<div"), take_till(0.., '>'), '>')
        .void()
        .parse_next(input)
}

/// Inner text of the first `<div>` element in the input.
fn first_div<'s>(input: &mut &'s str) -> PResult<&'s str> {
    preceded(
        take_until(0.., "<div"),
        delimited(div_open, take_until(0.., "</div>"), literal("</div>")),
    )
    .parse_next(input)
}

fn vrf_token<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_till(0.., [',', ']']).parse_next(input)
}

/// `VRF: [a, b, c]` anywhere in the input.
fn vrf_marker<'s>(input: &mut &'s str) -> PResult<Vec<&'s str>> {
    preceded(
        (take_until(0.., "VRF:"), literal("VRF:"), multispace0),
        delimited('[', separated(0.., vrf_token, ','), ']'),
    )
    .parse_next(input)
}

/// Dotted quad at the start of the input.
fn dotted_quad(input: &mut &str) -> PResult<()> {
    (digit1, '.', digit1, '.', digit1, '.', digit1)
        .void()
        .parse_next(input)
}

/// Strip markup and decode entities from an HTML fragment.
fn visible_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    htmlize::unescape(text.as_str())
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Parse a raw shape label.
///
/// If the label contains a `<div>` element, the name is the element's visible
/// text and a `VRF: [...]` marker anywhere in the label becomes the VRF list:
/// tokens trimmed, empty tokens dropped, duplicates collapsed in order.
/// Otherwise the name is the raw label verbatim and the VRF list is empty.
///
/// # Examples
///
/// ```
/// use drawnet_parser::label::parse_label;
///
/// let label = parse_label("<div>R1</div>VRF: [red, blue]");
/// assert_eq!(label.name, "R1");
/// assert_eq!(label.vrfs.iter().collect::<Vec<_>>(), ["red", "blue"]);
///
/// let plain = parse_label("Core");
/// assert_eq!(plain.name, "Core");
/// assert!(plain.vrfs.is_empty());
/// ```
pub fn parse_label(raw: &str) -> ParsedLabel {
    let Ok(inner) = first_div.parse_next(&mut &raw[..]) else {
        return ParsedLabel {
            name: raw.to_string(),
            vrfs: IndexSet::new(),
        };
    };

    let vrfs = vrf_marker
        .parse_next(&mut &raw[..])
        .map(|tokens| {
            tokens
                .into_iter()
                .map(visible_text)
                .filter(|token| !token.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ParsedLabel {
        name: visible_text(inner),
        vrfs,
    }
}

/// Returns `true` if `name` starts with an IPv4 dotted quad.
///
/// Such labels are addresses or subnets, never router names.
pub fn looks_like_ipv4(name: &str) -> bool {
    dotted_quad.parse_next(&mut name.trim_start()).is_ok()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn vrf_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,8}"
    }

    proptest! {
        #[test]
        fn parse_label_is_deterministic(raw in ".{0,80}") {
            prop_assert_eq!(parse_label(&raw), parse_label(&raw));
        }

        #[test]
        fn wrapped_labels_roundtrip(
            name in "[A-Za-z][A-Za-z0-9-]{0,10}",
            names in prop::collection::vec(vrf_name(), 0..5),
        ) {
            let raw = format!("<div>{}</div>VRF: [{}]", name, names.join(", "));
            let label = parse_label(&raw);

            let expected: IndexSet<String> = names.into_iter().collect();
            prop_assert_eq!(label.name, name);
            prop_assert_eq!(label.vrfs, expected);
        }

        #[test]
        fn plain_labels_are_verbatim(raw in "[^<]{0,40}") {
            let label = parse_label(&raw);
            prop_assert_eq!(label.name, raw);
            prop_assert!(label.vrfs.is_empty());
        }
    }
}
