//! Small XML helpers shared by the PresentationML readers and writers.

use aho_corasick::AhoCorasick;
use memchr::memchr;
use once_cell::sync::Lazy;
use quick_xml::events::BytesStart;
use std::borrow::Cow;

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "'"]).expect("Failed to build XML escaper")
});

/// Escape XML special characters.
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Make run text representable in XML 1.0.
///
/// A vertical tab becomes a line break (`\n`), which the text writers emit
/// as `<a:br/>`. Other characters XML 1.0 forbids are dropped.
pub fn sanitize_text(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .filter_map(|c| match c {
                '\u{b}' => Some('\n'),
                c if is_xml_char(c) => Some(c),
                _ => None,
            })
            .collect(),
    )
}

#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Resolve the predefined entities and numeric character references.
///
/// Unknown or malformed references are kept verbatim.
pub fn unescape_xml(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut rest = &s[first..];

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let resolved = memchr(b';', rest.as_bytes())
            .and_then(|semi| resolve_entity(&rest[1..semi]).map(|c| (c, semi)));
        match resolved {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            },
            None => {
                out.push('&');
                rest = &rest[1..];
            },
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        },
    }
}

/// Value of the attribute whose qualified name is exactly `key`.
pub fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| unescape_xml(&String::from_utf8_lossy(&a.value)).into_owned())
}

/// Value of a namespace-prefixed attribute such as `r:id` or `r:embed`,
/// whatever prefix the document binds to the relationships namespace.
pub fn prefixed_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == local)
        .map(|a| unescape_xml(&String::from_utf8_lossy(&a.value)).into_owned())
}

/// Prefix a start tag binds to `namespace`, e.g. `Some("r")` for
/// `xmlns:r="…/relationships"`. `Some("")` means the default namespace.
pub fn namespace_prefix(e: &BytesStart<'_>, namespace: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.value.as_ref() != namespace.as_bytes() {
            return None;
        }
        let key = a.key.as_ref();
        if key == b"xmlns" {
            Some(String::new())
        } else {
            key.strip_prefix(b"xmlns:")
                .map(|prefix| String::from_utf8_lossy(prefix).into_owned())
        }
    })
}

/// Qualify a local name with a prefix, `"p"` + `"sldId"` → `"p:sldId"`.
pub fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>\"hi\"'</tag>"), "&lt;tag&gt;&quot;hi&quot;&apos;&lt;/tag&gt;");
    }

    #[test]
    fn test_sanitize_text() {
        assert!(matches!(sanitize_text("plain\ttext\r\n"), Cow::Borrowed(_)));
        assert_eq!(sanitize_text("Page\u{c}break"), "Pagebreak");
        assert_eq!(sanitize_text("tab\u{b}vt"), "tab\nvt");
        assert_eq!(sanitize_text("nul\u{0}x\u{1f}\u{fffe}"), "nulx");
        assert_eq!(sanitize_text("caf\u{e9} \u{1f600}"), "caf\u{e9} \u{1f600}");
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("plain"), "plain");
        assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
        assert_eq!(unescape_xml("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape_xml("&invalid; & &amp"), "&invalid; & &amp");
    }

    #[test]
    fn test_attr_helpers() {
        let xml = r#"<p:sldId xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships" id="256" rel:id="rId7" name="A &amp; B"/>"#;
        let mut reader = Reader::from_str(xml);
        let Ok(Event::Empty(e)) = reader.read_event() else {
            panic!("expected empty element");
        };
        assert_eq!(attr(&e, b"id").as_deref(), Some("256"));
        assert_eq!(attr(&e, b"name").as_deref(), Some("A & B"));
        assert_eq!(prefixed_attr(&e, b"id").as_deref(), Some("rId7"));
        assert_eq!(
            namespace_prefix(&e, "http://schemas.openxmlformats.org/officeDocument/2006/relationships")
                .as_deref(),
            Some("rel")
        );
        assert_eq!(qualify("p", "sldId"), "p:sldId");
        assert_eq!(qualify("", "sldId"), "sldId");
    }
}
