use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};
use serde_json::Value;

use crate::Amf3Error;

const MARKER_NULL: u8 = 0x01;
const MARKER_FALSE: u8 = 0x02;
const MARKER_TRUE: u8 = 0x03;
const MARKER_INTEGER: u8 = 0x04;
const MARKER_DOUBLE: u8 = 0x05;
const MARKER_STRING: u8 = 0x06;
const MARKER_ARRAY: u8 = 0x09;
const MARKER_OBJECT: u8 = 0x0a;

/// Largest magnitude representable by the 29-bit integer marker.
const INTEGER_MAX: i64 = 0x0fff_ffff;
const INTEGER_MIN: i64 = -0x1000_0000;

/// Encodes a JSON value as one AMF3 value.
///
/// Objects become anonymous dynamic objects, arrays dense strict arrays;
/// integers within the 29-bit signed range use the integer marker and
/// everything else numeric a double. Strings are deduplicated through a
/// write-side reference table.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, Amf3Error> {
    let mut w = Writer::new();
    w.write_value(value)?;
    Ok(w.out)
}

struct Writer {
    out: Vec<u8>,
    strings: HashMap<String, u32>,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            strings: HashMap::new(),
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Amf3Error> {
        match value {
            Value::Null => {
                self.out.push(MARKER_NULL);
                Ok(())
            }
            Value::Bool(false) => {
                self.out.push(MARKER_FALSE);
                Ok(())
            }
            Value::Bool(true) => {
                self.out.push(MARKER_TRUE);
                Ok(())
            }
            Value::Number(n) => self.write_number(n),
            Value::String(s) => {
                self.out.push(MARKER_STRING);
                self.write_string(s)
            }
            Value::Array(items) => {
                self.out.push(MARKER_ARRAY);
                let count = u32::try_from(items.len())
                    .ok()
                    .filter(|&c| c < 0x1000_0000)
                    .ok_or_else(|| {
                        Amf3Error::Unencodable(format!("array too long: {} elements", items.len()))
                    })?;
                self.write_u29((count << 1) | 1)?;
                // Empty associative portion.
                self.write_u29(1)?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                self.out.push(MARKER_OBJECT);
                // Inline object, inline traits, not externalizable, dynamic,
                // zero sealed members.
                self.write_u29(0x0b)?;
                // Anonymous class name.
                self.write_u29(1)?;
                for (key, item) in map {
                    if key.is_empty() {
                        return Err(Amf3Error::Unencodable(
                            "empty object key collides with the member terminator".to_string(),
                        ));
                    }
                    self.write_string(key)?;
                    self.write_value(item)?;
                }
                // Dynamic-member terminator.
                self.write_u29(1)?;
                Ok(())
            }
        }
    }

    fn write_number(&mut self, n: &serde_json::Number) -> Result<(), Amf3Error> {
        if let Some(i) = n.as_i64() {
            if (INTEGER_MIN..=INTEGER_MAX).contains(&i) {
                self.out.push(MARKER_INTEGER);
                // 29-bit two's complement.
                return self.write_u29((i as u32) & 0x1fff_ffff);
            }
        }
        let d = n.as_f64().ok_or_else(|| {
            Amf3Error::Unencodable(format!("number {n} has no f64 representation"))
        })?;
        self.out.push(MARKER_DOUBLE);
        let mut buf = [0u8; 8];
        BigEndian::write_f64(&mut buf, d);
        self.out.extend_from_slice(&buf);
        Ok(())
    }

    fn write_u29(&mut self, v: u32) -> Result<(), Amf3Error> {
        if v >= 0x2000_0000 {
            return Err(Amf3Error::Unencodable(format!(
                "value {v} exceeds the u29 range"
            )));
        }
        match v {
            0..=0x7f => self.out.push(v as u8),
            0x80..=0x3fff => {
                self.out.push((v >> 7) as u8 | 0x80);
                self.out.push((v & 0x7f) as u8);
            }
            0x4000..=0x001f_ffff => {
                self.out.push((v >> 14) as u8 | 0x80);
                self.out.push(((v >> 7) & 0x7f) as u8 | 0x80);
                self.out.push((v & 0x7f) as u8);
            }
            _ => {
                self.out.push((v >> 22) as u8 | 0x80);
                self.out.push(((v >> 15) & 0x7f) as u8 | 0x80);
                self.out.push(((v >> 8) & 0x7f) as u8 | 0x80);
                self.out.push((v & 0xff) as u8);
            }
        }
        Ok(())
    }

    /// UTF-8-vr with the write-side reference table. The empty string is
    /// always written inline; it never enters the table.
    fn write_string(&mut self, s: &str) -> Result<(), Amf3Error> {
        if s.is_empty() {
            return self.write_u29(1);
        }
        if let Some(&idx) = self.strings.get(s) {
            return self.write_u29(idx << 1);
        }
        let len = u32::try_from(s.len())
            .ok()
            .filter(|&l| l < 0x1000_0000)
            .ok_or_else(|| {
                Amf3Error::Unencodable(format!("string too long: {} bytes", s.len()))
            })?;
        let idx = self.strings.len() as u32;
        self.strings.insert(s.to_string(), idx);
        self.write_u29((len << 1) | 1)?;
        self.out.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
