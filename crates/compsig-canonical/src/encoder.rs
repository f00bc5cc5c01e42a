//! JSON writer for canonical bytes.
//!
//! Strings are written the way Go's `encoding/json` marshals them: UTF-8 is
//! emitted raw, `<`, `>`, `&`, U+2028 and U+2029 are escaped as `\uXXXX`, and
//! backspace and form feed use the `\u0008` / `\u000c` forms. Signatures made
//! by other implementations of `jsonNormalisation/v1` depend on these bytes.

use std::io;

use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, Serializer};

/// Compact formatter with HTML-safe string escaping.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            let escaped: &[u8] = match ch {
                '<' => b"\\u003c",
                '>' => b"\\u003e",
                '&' => b"\\u0026",
                '\u{2028}' => b"\\u2028",
                '\u{2029}' => b"\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..index].as_bytes())?;
            writer.write_all(escaped)?;
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Backspace => writer.write_all(b"\\u0008"),
            CharEscape::FormFeed => writer.write_all(b"\\u000c"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

/// Serializes `value` as compact JSON with [`HtmlSafeFormatter`].
pub(crate) fn to_canonical_vec<T>(value: &T) -> serde_json::Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut bytes = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut bytes, HtmlSafeFormatter);
    value.serialize(&mut serializer)?;
    Ok(bytes)
}
