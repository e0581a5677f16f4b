//! RFC-4180 CSV record sets.
//!
//! The ordered-map leaf payload is a zlib-compressed CSV table, so this
//! stays deliberately small: comma delimiter, double-quote quoting with
//! `""` escapes, CRLF record terminators on write. The reader accepts both
//! CRLF and bare LF and skips blank lines, so tables written by either
//! newline policy decode identically.

use crate::CodecError;

/// Parses a complete CSV buffer into rows of fields.
///
/// Strict quoting: a double quote inside an unquoted field, trailing bytes
/// after a closing quote, or an unterminated quoted field are all
/// [`CodecError::BadCsv`]. Fields must be valid UTF-8.
pub fn read_rows(data: &[u8]) -> Result<Vec<Vec<String>>, CodecError> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field: Vec<u8> = Vec::new();
    let mut row_quoted = false;

    let mut i = 0;
    while i < data.len() {
        // One field per iteration; `i` sits at its first byte.
        if data[i] == b'"' {
            row_quoted = true;
            i += 1;
            let mut closed = false;
            while i < data.len() {
                if data[i] == b'"' {
                    if i + 1 < data.len() && data[i + 1] == b'"' {
                        field.push(b'"');
                        i += 2;
                    } else {
                        i += 1;
                        closed = true;
                        break;
                    }
                } else {
                    field.push(data[i]);
                    i += 1;
                }
            }
            if !closed {
                return Err(CodecError::BadCsv(
                    "unterminated quoted field".to_string(),
                ));
            }
            match peek_terminator(data, i) {
                Some(_) => {}
                None => {
                    return Err(CodecError::BadCsv(format!(
                        "unexpected byte 0x{:02x} after closing quote",
                        data[i]
                    )))
                }
            }
        } else {
            while i < data.len() {
                match data[i] {
                    b',' | b'\n' => break,
                    b'\r' if i + 1 < data.len() && data[i + 1] == b'\n' => break,
                    b'"' => {
                        return Err(CodecError::BadCsv(
                            "bare quote in unquoted field".to_string(),
                        ))
                    }
                    b => {
                        field.push(b);
                        i += 1;
                    }
                }
            }
        }

        // `i` now sits at a delimiter, a record terminator, or EOF.
        let utf8 = |bytes: Vec<u8>| {
            String::from_utf8(bytes)
                .map_err(|e| CodecError::BadCsv(format!("field is not utf-8: {e}")))
        };
        match peek_terminator(data, i) {
            Some(Terminator::Comma) => {
                row.push(utf8(std::mem::take(&mut field))?);
                i += 1;
            }
            Some(Terminator::Newline(len)) => {
                row.push(utf8(std::mem::take(&mut field))?);
                i += len;
                flush_row(&mut rows, &mut row, row_quoted);
                row_quoted = false;
            }
            Some(Terminator::Eof) => {
                row.push(utf8(std::mem::take(&mut field))?);
                flush_row(&mut rows, &mut row, row_quoted);
                row_quoted = false;
            }
            None => unreachable!("field loop stops only at a terminator"),
        }
    }

    // Data ending exactly on a record terminator leaves nothing pending;
    // anything else was flushed above because the field loop consumed to EOF.
    if !row.is_empty() || !field.is_empty() {
        let last = String::from_utf8(field)
            .map_err(|e| CodecError::BadCsv(format!("field is not utf-8: {e}")))?;
        row.push(last);
        flush_row(&mut rows, &mut row, row_quoted);
    }

    Ok(rows)
}

/// Serializes rows with minimal RFC-4180 quoting and CRLF terminators.
#[must_use]
pub fn write_rows(rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = Vec::new();
    for row in rows {
        for (idx, fieldval) in row.iter().enumerate() {
            if idx > 0 {
                out.push(b',');
            }
            write_field(&mut out, fieldval);
        }
        out.extend_from_slice(b"\r\n");
    }
    out
}

enum Terminator {
    Comma,
    Newline(usize),
    Eof,
}

fn peek_terminator(data: &[u8], i: usize) -> Option<Terminator> {
    if i >= data.len() {
        return Some(Terminator::Eof);
    }
    match data[i] {
        b',' => Some(Terminator::Comma),
        b'\n' => Some(Terminator::Newline(1)),
        b'\r' if i + 1 < data.len() && data[i + 1] == b'\n' => Some(Terminator::Newline(2)),
        _ => None,
    }
}

/// Commits a finished record, dropping blank lines (a single empty unquoted
/// field) so CRLF and LF inputs agree on row counts.
fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, row_quoted: bool) {
    let blank = !row_quoted && row.len() == 1 && row[0].is_empty();
    if blank {
        row.clear();
        return;
    }
    rows.push(std::mem::take(row));
}

fn write_field(out: &mut Vec<u8>, fieldval: &str) {
    let needs_quotes = fieldval
        .bytes()
        .any(|b| matches!(b, b',' | b'"' | b'\r' | b'\n'));
    if !needs_quotes {
        out.extend_from_slice(fieldval.as_bytes());
        return;
    }
    out.push(b'"');
    for b in fieldval.bytes() {
        if b == b'"' {
            out.push(b'"');
        }
        out.push(b);
    }
    out.push(b'"');
}
