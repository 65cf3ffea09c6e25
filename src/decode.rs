//! Tolerant percent-decoding for cookie values.
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Percent-decodes a cookie value without ever failing.
///
/// The whole value is decoded at once when every `%` starts a valid escape and the
/// decoded bytes are UTF-8. Otherwise each run of consecutive `%XX` escapes is decoded
/// on its own, and a run that does not decode to UTF-8 is kept verbatim, as is any `%`
/// that does not start an escape.
///
/// ```
/// use cookieseal::decode;
///
/// assert_eq!(decode("A%20B%GGC%ZZD%2E"), "A B%GGC%ZZD.");
/// assert_eq!(decode("apple%2"), "apple%2");
/// ```
pub fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    match decode_strict(raw) {
        Some(decoded) => Cow::Owned(decoded),
        None => Cow::Owned(decode_runs(raw)),
    }
}

fn is_escape(bytes: &[u8], at: usize) -> bool {
    at + 2 < bytes.len()
        && bytes[at] == b'%'
        && bytes[at + 1].is_ascii_hexdigit()
        && bytes[at + 2].is_ascii_hexdigit()
}

fn decode_strict(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|b| *b == b'%') {
        let at = i + offset;
        if !is_escape(bytes, at) {
            return None;
        }
        i = at + 3;
    }
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

fn decode_runs(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = String::with_capacity(raw.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_escape(bytes, i) {
            i += 1;
            continue;
        }
        let run_start = i;
        while is_escape(bytes, i) {
            i += 3;
        }
        decoded.push_str(&raw[literal_start..run_start]);

        let run = &raw[run_start..i];
        match percent_decode_str(run).decode_utf8() {
            Ok(text) => decoded.push_str(&text),
            Err(_) => decoded.push_str(run),
        }
        literal_start = i;
    }
    decoded.push_str(&raw[literal_start..]);

    decoded
}
