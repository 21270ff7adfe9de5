//! Byte-level tag scanning primitives.
//!
//! Everything here works on `&[u8]` and only ever splits at ASCII
//! delimiters, so every index handed back is a valid `str` boundary.

use memchr::memchr;

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

const RAW_TEXT_ELEMENTS: &[&[u8]] = &[b"script", b"style", b"textarea", b"title", b"xmp"];

pub(crate) fn is_void(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

pub(crate) fn is_raw_text(name: &[u8]) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':' || b == b'.'
}

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Shape of a `<...>` construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagInfo<'a> {
    pub name: &'a [u8],
    pub is_end: bool,
    pub self_closing: bool,
    /// Offset (within the tag) where the attribute list starts.
    pub attrs_start: usize,
}

/// Find the `>` closing a tag that starts at `i` (`s[i] == b'<'`), skipping
/// over quoted attribute values.
pub(crate) fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Extract name and flags from raw `<...>` bytes.
pub(crate) fn parse_tag_info(tag: &[u8]) -> TagInfo<'_> {
    let n = tag.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && tag[i] == b'/' {
        is_end = true;
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(tag[i]) {
        i += 1;
    }
    let name = &tag[start..i];

    let self_closing = !is_end && ends_with_solidus(tag, i);

    TagInfo {
        name,
        is_end,
        self_closing,
        attrs_start: i,
    }
}

/// Whether the attribute list starting at `from` ends in a `/` that is not
/// part of an unquoted attribute value.
fn ends_with_solidus(tag: &[u8], from: usize) -> bool {
    let n = tag.len();
    let mut k = from;
    let mut solidus = false;
    while k < n && tag[k] != b'>' {
        match tag[k] {
            q @ (b'"' | b'\'') => {
                k = memchr(q, &tag[k + 1..]).map_or(n, |p| k + 1 + p) + 1;
                solidus = false;
            }
            b'=' => {
                k += 1;
                while k < n && is_ws(tag[k]) {
                    k += 1;
                }
                if k < n && (tag[k] == b'"' || tag[k] == b'\'') {
                    continue;
                }
                while k < n && !is_ws(tag[k]) && tag[k] != b'>' {
                    k += 1;
                }
                solidus = false;
            }
            b if is_ws(b) => k += 1,
            b => {
                solidus = b == b'/';
                k += 1;
            }
        }
    }
    solidus
}

/// Whether `<` at `i` opens something we should treat as markup.
///
/// A `<` followed by anything other than a letter, `/` or `!` is literal
/// text (`a < b`).
pub(crate) fn opens_markup(s: &[u8], i: usize) -> bool {
    match s.get(i + 1) {
        Some(b) => b.is_ascii_alphabetic() || *b == b'/' || *b == b'!' || *b == b'?',
        None => false,
    }
}

/// Return the index just past `-->` for a comment starting at `i`, or
/// `None` if the comment runs to end of input.
pub(crate) fn scan_comment(s: &[u8], i: usize) -> Option<usize> {
    let mut k = i + 4;
    while k < s.len() {
        let p = memchr(b'-', &s[k..])?;
        let j = k + p;
        if j + 2 < s.len() && s[j + 1] == b'-' && s[j + 2] == b'>' {
            return Some(j + 3);
        }
        k = j + 1;
    }
    None
}

/// Find the start of the `</name` end tag for a raw-text element whose
/// content begins at `from`.
pub(crate) fn find_raw_text_end(s: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut j = from;
    while j < s.len() {
        let pos = j + memchr(b'<', &s[j..])?;
        let after = pos + 2;
        if s.get(pos + 1) == Some(&b'/')
            && after + name.len() <= s.len()
            && s[after..after + name.len()].eq_ignore_ascii_case(name)
            && s
                .get(after + name.len())
                .map_or(true, |b| is_ws(*b) || *b == b'>' || *b == b'/')
        {
            return Some(pos);
        }
        j = pos + 1;
    }
    None
}

/// One attribute as it appeared in the source tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawAttribute<'a> {
    pub name: &'a str,
    /// Undecoded value, without quotes.
    pub value: Option<&'a str>,
    /// The whole `name="value"` span.
    pub source: &'a str,
}

/// Split the attribute list of a tag: `[name] ( '=' [value] )?` repeated,
/// values quoted or unquoted.
pub(crate) fn parse_attributes(tag: &str, from: usize) -> Vec<RawAttribute<'_>> {
    let bytes = tag.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();
    let mut i = from;

    while i < len && bytes[i] != b'>' {
        while i < len && (is_ws(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' {
            break;
        }
        if bytes[i] == b'=' || bytes[i] == b'"' || bytes[i] == b'\'' {
            // Stray punctuation; advance to avoid looping forever.
            i += 1;
            continue;
        }

        let name_start = i;
        while i < len && !is_ws(bytes[i]) && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let name_end = i;

        let mut k = i;
        while k < len && is_ws(bytes[k]) {
            k += 1;
        }

        let mut value = None;
        let mut end = name_end;
        if k < len && bytes[k] == b'=' {
            k += 1;
            while k < len && is_ws(bytes[k]) {
                k += 1;
            }
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let q = bytes[k];
                let v_start = k + 1;
                let v_end = memchr(q, &bytes[v_start..]).map_or(len, |p| v_start + p);
                value = Some(&tag[v_start..v_end]);
                end = (v_end + 1).min(len);
            } else {
                let v_start = k;
                while k < len && !is_ws(bytes[k]) && bytes[k] != b'>' {
                    k += 1;
                }
                value = Some(&tag[v_start..k]);
                end = k;
            }
            i = end;
        }

        attrs.push(RawAttribute {
            name: &tag[name_start..name_end],
            value,
            source: &tag[name_start..end],
        });
    }

    attrs
}
