//! Start-tag attribute parsing.
//!
//! Given the text between a tag's `<` and `>`, split off the tag name and
//! scan the remainder into an attribute map. HTML attribute syntax is
//! forgiving, so the scanner never fails: malformed input degrades into a
//! best-effort split instead of an error.

use tern_dom::AttrMap;

/// Parse the inside of a tag into its name and attributes.
///
/// The scanner is a small state machine tracking whether it is building a
/// key or a value and whether it sits inside a single- or double-quoted
/// value. Unquoted values end at whitespace; quoted values may contain
/// whitespace and the other quote kind, and end only at their matching
/// quote, which also commits the pair. A backslash escapes the next quote
/// character inside a quoted value. `=` ends a (non-empty) key; inside a
/// value it is a literal character. Whatever pair is still in progress at
/// the end of input is flushed.
///
/// Attribute names are lower-cased; a duplicate name overwrites the
/// earlier value.
#[must_use]
pub fn parse_tag(text: &str) -> (String, AttrMap) {
    let Some(split_at) = text.find(|c: char| c.is_ascii_whitespace()) else {
        return (text.to_string(), AttrMap::new());
    };
    let name = &text[..split_at];
    let rest = text[split_at..].trim_start();

    let mut attrs = AttrMap::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut building_key = true;
    let mut in_escape = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for c in rest.chars() {
        if c.is_ascii_whitespace() {
            if building_key {
                // Whitespace between attributes.
                continue;
            }
            if in_single_quote || in_double_quote {
                value.push(c);
            } else {
                // Whitespace ends an unquoted value.
                commit(&mut attrs, &mut key, &mut value);
                building_key = true;
            }
        } else if c == '=' {
            if building_key {
                // A tag like <div =x> starts an attribute name with '=';
                // keep the character rather than dropping it.
                if key.is_empty() {
                    key.push(c);
                } else {
                    building_key = false;
                }
            } else {
                value.push(c);
            }
        } else if c == '"' {
            if in_escape {
                value.push(c);
                in_escape = false;
            } else if in_single_quote {
                value.push(c);
            } else {
                if in_double_quote {
                    commit(&mut attrs, &mut key, &mut value);
                    building_key = true;
                }
                in_double_quote = !in_double_quote;
            }
        } else if c == '\'' {
            if in_escape {
                value.push(c);
                in_escape = false;
            } else if in_double_quote {
                value.push(c);
            } else {
                if in_single_quote {
                    commit(&mut attrs, &mut key, &mut value);
                    building_key = true;
                }
                in_single_quote = !in_single_quote;
            }
        } else if c == '\\' {
            if in_escape {
                value.push(c);
            }
            in_escape = !in_escape;
        } else if building_key {
            key.push(c);
        } else {
            value.push(c);
        }
    }

    if !key.is_empty() {
        commit(&mut attrs, &mut key, &mut value);
    }

    (name.to_string(), attrs)
}

/// Move the pending key/value pair into the map and reset the buffers.
fn commit(attrs: &mut AttrMap, key: &mut String, value: &mut String) {
    let _ = attrs.insert(key.to_lowercase(), std::mem::take(value));
    key.clear();
}
