//! Source inspection helpers for details pulldown-cmark does not report.

use cmout_ast::{ListKind, OrderedDelimiter};
use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Whether a heading's source starts with an ATX opening sequence.
///
/// Up to three spaces of indentation, one to six `#`, then whitespace or the
/// end of the line.
pub(crate) fn is_atx_heading(source: &str) -> bool {
    let indent = source.bytes().take_while(|&b| b == b' ').count();
    if indent > 3 {
        return false;
    }
    let rest = &source[indent..];
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    (1..=6).contains(&hashes)
        && rest[hashes..]
            .bytes()
            .next()
            .is_none_or(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

/// List kind from the source of a list's first marker.
pub(crate) fn list_kind(source: &str, start: Option<u64>) -> ListKind {
    let marker = source.trim_start_matches([' ', '\t']);
    match start {
        None => ListKind::Bullet {
            marker: marker.chars().next().unwrap_or('-'),
        },
        Some(start) => {
            let after_digits = marker.trim_start_matches(|c: char| c.is_ascii_digit());
            let delimiter = if after_digits.starts_with(')') {
                OrderedDelimiter::Paren
            } else {
                OrderedDelimiter::Period
            };
            ListKind::Ordered { start, delimiter }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_to_num() {
        assert_eq!(heading_level_to_num(HeadingLevel::H1), 1);
        assert_eq!(heading_level_to_num(HeadingLevel::H6), 6);
    }

    #[test]
    fn test_is_atx_heading() {
        assert!(is_atx_heading("# Title\n"));
        assert!(is_atx_heading("   ###### Six"));
        assert!(is_atx_heading("#"));
        assert!(is_atx_heading("##\n"));
        assert!(!is_atx_heading("#5 bolt\n===\n"));
        assert!(!is_atx_heading("####### seven"));
        assert!(!is_atx_heading("Title\n=====\n"));
        assert!(!is_atx_heading("    # indented"));
    }

    #[test]
    fn test_list_kind() {
        assert_eq!(list_kind("* a\n", None), ListKind::Bullet { marker: '*' });
        assert_eq!(list_kind("  + a\n", None), ListKind::Bullet { marker: '+' });
        assert_eq!(
            list_kind("3) a\n", Some(3)),
            ListKind::Ordered {
                start: 3,
                delimiter: OrderedDelimiter::Paren
            }
        );
        assert_eq!(
            list_kind("10. a\n", Some(10)),
            ListKind::Ordered {
                start: 10,
                delimiter: OrderedDelimiter::Period
            }
        );
    }
}
