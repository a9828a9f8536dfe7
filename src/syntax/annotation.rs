//! Opt-in annotation arguments.
//!
//! A doc comment opts a type in with the marker, optionally followed by
//! arguments:
//!
//! ```text
//! /// @mockable(typealias: T = Any; U = [String: Int]; rx: all = BehaviorSubject; feed = ReplaySubject)
//! ```
//!
//! Arguments are `;`-separated `name = value` pairs. A `section:` prefix
//! switches the section for that pair and the ones after it; pairs before
//! any prefix are type aliases. Sections other than `typealias` and `rx`
//! are skipped.

use smol_str::SmolStr;
use tracing::trace;
use unicode_ident::{is_xid_continue, is_xid_start};

use crate::base::split_top_level;
use crate::hir::AnnotationMetadata;

const TYPEALIAS_SECTION: &str = "typealias";
const RX_SECTION: &str = "rx";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    TypeAlias,
    Rx,
    Other,
}

/// Find `marker` in `comment` and parse its arguments.
///
/// Returns `None` when the marker is absent (or empty), and empty metadata
/// for a bare marker.
pub fn parse_metadata(comment: &str, marker: &str) -> Option<AnnotationMetadata> {
    let args = find_marker(comment, marker)?;
    let mut metadata = AnnotationMetadata::default();
    let Some(args) = args else {
        return Some(metadata);
    };

    let mut section = Section::TypeAlias;
    for item in split_top_level(args, ';') {
        let item = match section_prefix(item) {
            Some((name, rest)) => {
                section = match name {
                    TYPEALIAS_SECTION => Section::TypeAlias,
                    RX_SECTION => Section::Rx,
                    _ => Section::Other,
                };
                rest
            }
            None => item,
        };
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if !is_identifier(key) || value.is_empty() {
            trace!(item, "skipping annotation argument");
            continue;
        }
        let (key, value) = (SmolStr::new(key), SmolStr::new(value));
        match section {
            Section::TypeAlias => {
                metadata.alias_overrides.insert(key, value);
            }
            Section::Rx => {
                metadata.stream_overrides.insert(key, value);
            }
            Section::Other => {}
        }
    }
    Some(metadata)
}

/// Whether `comment` carries the marker at all.
pub fn has_marker(comment: &str, marker: &str) -> bool {
    find_marker(comment, marker).is_some()
}

/// Locate the marker. The inner option holds the argument text when the
/// marker is followed by `(`.
fn find_marker<'a>(comment: &'a str, marker: &str) -> Option<Option<&'a str>> {
    if marker.is_empty() {
        return None;
    }
    let mut search = 0;
    while let Some(found) = comment[search..].find(marker) {
        let end = search + found + marker.len();
        let rest = &comment[end..];
        // `@mockable` must not match `@mockableFoo`
        if rest.chars().next().is_some_and(is_xid_continue) {
            search = end;
            continue;
        }
        let rest = rest.trim_start();
        return Some(rest.strip_prefix('(').map(arguments));
    }
    None
}

/// Text up to the `)` closing the argument list, or to the end.
fn arguments(text: &str) -> &str {
    let mut depth = 0i32;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '<' | '{' => depth += 1,
            '>' if prev == '-' => {}
            ')' if depth == 0 => return &text[..i],
            ')' | ']' | '>' | '}' => depth -= 1,
            _ => {}
        }
        prev = c;
    }
    text
}

/// `rx: all = X` → `("rx", "all = X")`.
fn section_prefix(item: &str) -> Option<(&str, &str)> {
    let (head, rest) = item.split_once(':')?;
    let head = head.trim();
    (is_identifier(head) && !head.contains('=')).then_some((head, rest))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => (first == '_' || is_xid_start(first)) && chars.all(is_xid_continue),
        None => false,
    }
}
