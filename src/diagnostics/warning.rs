//! Parser for the renderer's warning lines
//!
//! abcjs reports problems as `Music Line:<line>:<col>: <message>` where the
//! message is a fragment of HTML (the offending character is wrapped in a
//! styled `<span>`). The text version feeds the diagnostic message; the
//! original markup is kept for rich display.

use lazy_static::lazy_static;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WARNING_LINE: Regex =
        Regex::new(r"Music Line:([0-9]+):([0-9]+): (.*)").expect("warning pattern is valid");
    static ref ENTITY: Regex =
        Regex::new(r"^(?:#([0-9]+)|#x([0-9a-fA-F]+)|([A-Za-z][A-Za-z0-9]*));").expect("entity pattern is valid");
}

/// A warning the renderer attached to a source position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWarning {
    /// 1-based line in the score
    pub line_number: usize,
    /// 1-based column within that line
    pub column: usize,
    /// Message with markup removed and entities resolved
    pub message: String,
    /// Message exactly as the renderer produced it
    pub markup: String,
}

/// Parse one warning line, or `None` if it is not in the positional format
pub fn parse_warning(raw: &str) -> Option<ParsedWarning> {
    let parsed = WARNING_LINE.captures(raw).and_then(|caps| {
        let line_number = caps[1].parse().ok()?;
        let column = caps[2].parse().ok()?;
        let markup = caps[3].to_string();

        Some(ParsedWarning {
            line_number,
            column,
            message: markup_to_text(&markup),
            markup,
        })
    });

    if parsed.is_none() {
        log::warn!("Cannot parse error message: {}", raw);
    }

    parsed
}

/// Text content of an HTML fragment, as `textContent` would give it
///
/// abcjs does not escape the character it complains about, so a lone `&`
/// or `<` is read as text the way an HTML parser would.
pub fn markup_to_text(markup: &str) -> String {
    if !markup.contains(['<', '&']) {
        return markup.to_string();
    }

    let wrapped = format!("<div>{}</div>", escape_stray_markup(markup));
    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().check_end_names = false;

    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(chunk) => text.push_str(&chunk),
                Err(err) => {
                    log::debug!("Skipping undecodable text in warning: {}", err);
                }
            },
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                log::debug!("Warning markup ends early: {}", err);
                break;
            }
        }
    }

    text
}

/// Escape every `&` that does not begin a known entity and every `<` that
/// does not open a tag or comment. Tag bodies are copied untouched.
fn escape_stray_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len() + 8);
    let mut in_tag = false;
    let mut quote: Option<char> = None;

    for (i, c) in markup.char_indices() {
        if in_tag {
            out.push(c);
            match (quote, c) {
                (Some(q), _) if q == c => quote = None,
                (None, '"' | '\'') => quote = Some(c),
                (None, '>') => in_tag = false,
                _ => {}
            }
            continue;
        }

        let rest = &markup[i + c.len_utf8()..];
        match c {
            '<' if opens_tag(rest) => {
                in_tag = true;
                out.push(c);
            }
            '<' => out.push_str("&lt;"),
            '&' if starts_entity(rest) => out.push(c),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }

    out
}

fn opens_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some('!') => rest.starts_with("!--"),
        _ => false,
    }
}

fn starts_entity(rest: &str) -> bool {
    let Some(caps) = ENTITY.captures(rest) else {
        return false;
    };

    if let Some(dec) = caps.get(1) {
        return dec.as_str().parse::<u32>().ok().is_some_and(is_char_code);
    }
    if let Some(hex) = caps.get(2) {
        return u32::from_str_radix(hex.as_str(), 16).ok().is_some_and(is_char_code);
    }
    caps.get(3)
        .is_some_and(|name| resolve_predefined_entity(name.as_str()).is_some())
}

fn is_char_code(code: u32) -> bool {
    code != 0 && char::from_u32(code).is_some()
}
