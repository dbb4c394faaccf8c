//! Permissive HTML to text extraction for note bodies
//!
//! Never fails: a stray `<` that does not open a tag is kept as text, an
//! unterminated tag swallows the rest of the input, unknown character
//! references are kept verbatim.

/// Concatenated text content of `html`
///
/// Markup, comments and the contents of `<script>`, `<style>` and
/// `<template>` elements are dropped; character references are decoded
/// (`&nbsp;` becomes U+00A0).
pub fn extract_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        push_decoded(&mut out, &rest[..lt]);
        let tail = &rest[lt..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let after = &tail[1..];
        if !opens_tag(after) {
            out.push('<');
            rest = after;
            continue;
        }

        let Some(end) = tag_end(after) else {
            rest = "";
            break;
        };
        let tag = &after[..end];
        rest = &after[end + 1..];

        if let Some(name) = raw_text_element(tag) {
            rest = skip_past_close(rest, name);
        }
    }

    push_decoded(&mut out, rest);
    out
}

fn opens_tag(after_lt: &str) -> bool {
    after_lt
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

// Index of the `>` closing a tag, ignoring `>` inside quoted attribute values.
// Falls back to the first `>` when quotes are unbalanced.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (None, '>') => return Some(i),
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    tag.find('>')
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.trim_end().ends_with('/') {
        return None;
    }
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    match name.as_str() {
        "script" => Some("script"),
        "style" => Some("style"),
        "template" => Some("template"),
        _ => None,
    }
}

fn skip_past_close<'a>(rest: &'a str, name: &str) -> &'a str {
    let lower = rest.to_ascii_lowercase();
    let close = format!("</{}", name);
    let Some(start) = lower.find(&close) else {
        return "";
    };
    match rest[start..].find('>') {
        Some(end) => &rest[start + end + 1..],
        None => "",
    }
}

// Character references follow the HTML5 algorithm: the full named set,
// legacy names without `;`, invalid code points as U+FFFD.
fn push_decoded(out: &mut String, text: &str) {
    out.push_str(&htmlize::unescape(text));
}
