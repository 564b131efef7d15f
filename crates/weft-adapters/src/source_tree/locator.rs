//! Member location by brace matching.
//!
//! Artifact text is opaque. A member is the first `name(...)` declaration
//! inside the artifact's first declared type whose parameter list is followed
//! by a `{ ... }` block. Braces inside string literals and comments do not
//! count.

use weft_core::domain::InsertPosition;

const TYPE_KEYWORDS: [&str; 4] = ["class", "struct", "record", "interface"];
const INDENT: &str = "    ";

/// Byte offsets of a block's opening and closing braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySpan {
    pub open: usize,
    pub close: usize,
}

impl BodySpan {
    /// The block including both braces.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.open..=self.close]
    }
}

/// Body of the first declared type.
pub fn first_type_body(text: &str) -> Option<BodySpan> {
    let bytes = text.as_bytes();
    let mask = code_mask(text);

    let mut from = 0;
    loop {
        let (pos, keyword) = TYPE_KEYWORDS
            .iter()
            .filter_map(|kw| find_word(text, &mask, kw, from, bytes.len()).map(|p| (p, *kw)))
            .min_by_key(|(p, _)| *p)?;

        from = pos + keyword.len();
        let mut i = from;
        while i < bytes.len() {
            if mask[i] {
                match bytes[i] {
                    b'{' => {
                        let close = match_delim(bytes, &mask, i, b'{', b'}')?;
                        return Some(BodySpan { open: i, close });
                    }
                    b';' => break,
                    _ => {}
                }
            }
            i += 1;
        }
    }
}

/// Body of `member` inside the first declared type.
pub fn find_member_body(text: &str, member: &str) -> Option<BodySpan> {
    if member.is_empty() {
        return None;
    }

    let ty = first_type_body(text)?;
    let bytes = text.as_bytes();
    let mask = code_mask(text);

    let mut from = ty.open + 1;
    while let Some(pos) = find_word(text, &mask, member, from, ty.close) {
        from = pos + member.len();

        let mut i = skip_whitespace(bytes, from);
        if bytes.get(i) == Some(&b'<') {
            let Some(close) = match_delim(bytes, &mask, i, b'<', b'>') else {
                continue;
            };
            i = skip_whitespace(bytes, close + 1);
        }
        if bytes.get(i) != Some(&b'(') {
            continue;
        }
        let Some(params_end) = match_delim(bytes, &mask, i, b'(', b')') else {
            continue;
        };

        let mut j = params_end + 1;
        while j < ty.close {
            if mask[j] {
                match bytes[j] {
                    b'{' => {
                        let close = match_delim(bytes, &mask, j, b'{', b'}')?;
                        return Some(BodySpan { open: j, close });
                    }
                    // a call, a field initializer or an expression body
                    b';' | b'=' | b'}' => break,
                    _ => {}
                }
            }
            j += 1;
        }
    }

    None
}

/// Insert `code` on its own line at the start or end of the block.
///
/// The snippet is kept verbatim apart from the first line's indentation, so
/// its trimmed form stays a substring of the updated body.
pub fn insert_into_body(text: &str, span: BodySpan, code: &str, position: InsertPosition) -> String {
    let close_line = line_start(text, span.close);
    let base_indent = leading_whitespace(&text[close_line..span.close]);
    let line = format!("{base_indent}{INDENT}{}\n", code.trim());

    let mut out = String::with_capacity(text.len() + line.len() + 1);
    match position {
        InsertPosition::End => {
            if text[close_line..span.close].trim().is_empty() {
                out.push_str(&text[..close_line]);
                out.push_str(&line);
                out.push_str(&text[close_line..]);
            } else {
                out.push_str(&text[..span.close]);
                out.push('\n');
                out.push_str(&line);
                out.push_str(base_indent);
                out.push_str(&text[span.close..]);
            }
        }
        InsertPosition::Start => {
            let after_open = span.open + 1;
            match text[after_open..].find('\n').map(|n| after_open + n) {
                Some(eol) if eol < span.close && text[after_open..eol].trim().is_empty() => {
                    out.push_str(&text[..=eol]);
                    out.push_str(&line);
                    out.push_str(&text[eol + 1..]);
                }
                _ => {
                    out.push_str(&text[..after_open]);
                    out.push('\n');
                    out.push_str(&line);
                    out.push_str(&text[after_open..]);
                }
            }
        }
    }
    out
}

/// Per-byte flag: `true` when the byte is code, `false` inside strings and comments.
fn code_mask(text: &str) -> Vec<bool> {
    let bytes = text.as_bytes();
    let mut mask = vec![true; bytes.len()];
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i = (i + 1).min(bytes.len());
            }
            _ => {
                i += 1;
                continue;
            }
        }
        mask[start..i].fill(false);
    }

    mask
}

/// Matching close delimiter for the open delimiter at `open`, counting code bytes only.
fn match_delim(bytes: &[u8], mask: &[bool], open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        if !mask[i] {
            continue;
        }
        if *b == open_ch {
            depth += 1;
        } else if *b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// First whole-word occurrence of `word` in code between `from` and `to`.
fn find_word(text: &str, mask: &[bool], word: &str, from: usize, to: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut search = from;

    while search < to {
        let pos = search + text.get(search..to)?.find(word)?;
        let end = pos + word.len();
        let before_ok = pos == 0 || !is_ident(bytes[pos - 1]);
        let after_ok = end >= bytes.len() || !is_ident(bytes[end]);
        if mask[pos] && before_ok && after_ok {
            return Some(pos);
        }
        search = pos + 1;
        while search < to && !text.is_char_boundary(search) {
            search += 1;
        }
    }
    None
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn line_start(text: &str, idx: usize) -> usize {
    text[..idx].rfind('\n').map_or(0, |n| n + 1)
}

fn leading_whitespace(s: &str) -> &str {
    &s[..s.len() - s.trim_start().len()]
}
