//! ANSI to Pango markup conversion.
//!
//! The translator colours its output with a handful of SGR escape codes.
//! [`render`] maps those onto markup tags and escapes everything else so the
//! launcher can display the text as markup. Only the subset below is
//! understood:
//!
//! | SGR  | markup                        |
//! |------|-------------------------------|
//! | `1`  | `<b>`                         |
//! | `22` | `</b>`                        |
//! | `4`  | `<u>`                         |
//! | `24` | `</u>`                        |
//! | `33` | `<span foreground='yellow'>`  |
//! | `0`  | `</span>`                     |
//!
//! Any other escape sequence is passed through as literal escaped text.

const ESC: char = '\x1b';

/// SGR parameter strings and the markup they open or close.
const SGR_TAGS: &[(&str, &str)] = &[
    ("1", "<b>"),
    ("22", "</b>"),
    ("4", "<u>"),
    ("24", "</u>"),
    ("33", "<span foreground='yellow'>"),
    ("0", "</span>"),
];

/// Convert ANSI-tagged text into markup.
///
/// Total: unknown sequences never fail, their ESC byte is emitted as a
/// numeric character reference and the remaining bytes as plain text.
pub fn render(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    let mut rest = raw;

    while let Some(pos) = rest.find(ESC) {
        escape_into(&rest[..pos], &mut out);
        let after = &rest[pos + ESC.len_utf8()..];
        match parse_sgr(after) {
            Some((tag, consumed)) => {
                out.push_str(tag);
                rest = &after[consumed..];
            }
            None => {
                log::debug!(
                    "Unknown escape sequence: {:?}",
                    after.chars().take(8).collect::<String>()
                );
                escape_into(&rest[pos..pos + ESC.len_utf8()], &mut out);
                rest = after;
            }
        }
    }
    escape_into(rest, &mut out);
    out
}

/// Single-line summary: the second-to-last line (or the whole text when it
/// has no newline), trimmed, then rendered.
pub fn brief(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let line = if lines.len() > 1 {
        lines[lines.len() - 2]
    } else {
        raw
    };
    render(line.trim())
}

/// Full rendering of the translation, untrimmed.
pub fn detailed(raw: &str) -> String {
    render(raw)
}

/// Escape text for inclusion in markup without interpreting escape codes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

/// Match `[<params>m` directly after an ESC. Returns the tag and the number
/// of bytes consumed.
fn parse_sgr(s: &str) -> Option<(&'static str, usize)> {
    let body = s.strip_prefix('[')?;
    let end = body.find(|c: char| !(c.is_ascii_digit() || c == ';'))?;
    if !body[end..].starts_with('m') {
        return None;
    }
    let params = &body[..end];
    let tag = SGR_TAGS
        .iter()
        .find(|(code, _)| *code == params)
        .map(|(_, tag)| *tag)?;
    // '[' + params + 'm'
    Some((tag, 1 + end + 1))
}

/// Escape one character at a time, same table as GLib's markup escaping.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c if needs_char_ref(c) => out.push_str(&format!("&#x{:x};", c as u32)),
            c => out.push(c),
        }
    }
}

fn needs_char_ref(c: char) -> bool {
    matches!(c as u32, 0x01..=0x08 | 0x0b | 0x0c | 0x0e..=0x1f | 0x7f..=0x84 | 0x86..=0x9f)
}
