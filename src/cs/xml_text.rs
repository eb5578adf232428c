//! XML text helpers for embedding raw documentation comments
//!
//! Raw comment text travels inside CDATA sections, so it has to be made safe
//! for that: characters XML 1.0 cannot carry are stripped and `]]>` is split
//! across sections. This module also decides whether a comment is well formed
//! markup at all.

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::sync::OnceLock;

const CDATA_END: &str = "]]>";
const PLACEHOLDER_PREFIX: &str = "<!-- Badly formed XML comment ignored for member \"";
const PLACEHOLDER_SUFFIX: &str = "\" -->";

/// Escape text for use in XML character data or attribute values
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Remove characters that XML 1.0 cannot represent
///
/// Tab, line feed and carriage return survive; every other C0 control
/// character and the non-characters U+FFFE/U+FFFF are dropped.
pub fn strip_illegal_chars(text: &str) -> String {
    text.chars().filter(|&c| is_legal_xml_char(c)).collect()
}

fn is_legal_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Split text into pieces that can each be written as one CDATA section
///
/// Every `]]>` is cut between `]]` and `>`, so consecutive sections
/// concatenate back to the original text.
pub fn split_cdata(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(index) = rest.find(CDATA_END) {
        // Keep `]]` in this piece, start the next one with `>`
        let cut = index + 2;
        pieces.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    pieces.push(rest);
    pieces
}

/// Placeholder emitted instead of a comment that is not well formed markup
pub fn malformed_placeholder(identity: &str) -> String {
    format!(
        "{}{}{}",
        PLACEHOLDER_PREFIX,
        identity.replace("--", "- -"),
        PLACEHOLDER_SUFFIX
    )
}

/// Whether a documentation text is exactly a malformed comment placeholder
pub fn is_malformed_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with(PLACEHOLDER_PREFIX)
        && trimmed.ends_with(PLACEHOLDER_SUFFIX)
        && !trimmed[PLACEHOLDER_PREFIX.len()..].contains('\n')
}

fn bare_ampersand_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"&(?:[A-Za-z_][A-Za-z0-9_.-]*;|#[0-9]+;|#x[0-9A-Fa-f]+;)")
            .expect("Failed to compile entity regex")
    })
}

/// Check that a documentation comment is well formed XML content
///
/// The text is a fragment (several top level elements and text are fine),
/// so it is parsed wrapped in a synthetic root element.
pub fn is_well_formed_fragment(text: &str) -> bool {
    // Every `&` must start an entity or character reference
    let ampersands = text.matches('&').count();
    if bare_ampersand_regex().find_iter(text).count() != ampersands {
        return false;
    }

    let wrapped = format!("<doc>{}</doc>", text);
    let mut reader = Reader::from_str(&wrapped);
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => return false,
            Ok(Event::Eof) => return depth == 0,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_strip_illegal_chars() {
        assert_eq!(strip_illegal_chars("a\u{0001}b\u{0008}c"), "abc");
        assert_eq!(strip_illegal_chars("keep\ttabs\r\nand lines"), "keep\ttabs\r\nand lines");
        assert_eq!(strip_illegal_chars("x\u{FFFF}y"), "xy");
    }

    #[test]
    fn test_split_cdata() {
        assert_eq!(split_cdata("no terminator"), vec!["no terminator"]);
        assert_eq!(split_cdata("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(split_cdata("]]>]]>"), vec!["]]", ">]]", ">"]);
        assert_eq!(split_cdata("a]]>b").concat(), "a]]>b");
    }

    #[test]
    fn test_well_formed_fragments() {
        assert!(is_well_formed_fragment("<summary>Hello</summary>"));
        assert!(is_well_formed_fragment(
            "<summary>Adds <paramref name=\"a\"/> &amp; b</summary>\n<returns>sum</returns>"
        ));
        assert!(is_well_formed_fragment("just text"));
        assert!(is_well_formed_fragment(""));
    }

    #[test]
    fn test_malformed_fragments() {
        assert!(!is_well_formed_fragment("<summary>unclosed"));
        assert!(!is_well_formed_fragment("<summary>x</remarks>"));
        assert!(!is_well_formed_fragment("<summary>a & b</summary>"));
        assert!(!is_well_formed_fragment("</summary>"));
    }

    #[test]
    fn test_placeholder_round_trip() {
        let placeholder = malformed_placeholder("Acme.Widget.Run()");
        assert_eq!(
            placeholder,
            "<!-- Badly formed XML comment ignored for member \"Acme.Widget.Run()\" -->"
        );
        assert!(is_malformed_placeholder(&placeholder));
        assert!(is_malformed_placeholder(&format!("\n{}\n", placeholder)));
        assert!(!is_malformed_placeholder("<summary>x</summary>"));
        assert!(is_well_formed_fragment(&placeholder));
    }
}
