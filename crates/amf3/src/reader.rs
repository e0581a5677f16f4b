use byteorder::{BigEndian, ByteOrder};
use serde_json::{Map, Number, Value};

use crate::Amf3Error;

const MARKER_UNDEFINED: u8 = 0x00;
const MARKER_NULL: u8 = 0x01;
const MARKER_FALSE: u8 = 0x02;
const MARKER_TRUE: u8 = 0x03;
const MARKER_INTEGER: u8 = 0x04;
const MARKER_DOUBLE: u8 = 0x05;
const MARKER_STRING: u8 = 0x06;
const MARKER_DATE: u8 = 0x08;
const MARKER_ARRAY: u8 = 0x09;
const MARKER_OBJECT: u8 = 0x0a;

/// Decodes a single AMF3 value from an already-inflated buffer.
///
/// Trailing bytes after the value are ignored, matching the client, which
/// reads exactly one root value per asset.
pub fn decode_value(data: &[u8]) -> Result<Value, Amf3Error> {
    Reader::new(data).read_value()
}

#[derive(Clone)]
struct Traits {
    dynamic: bool,
    members: Vec<String>,
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    strings: Vec<String>,
    complexes: Vec<Value>,
    traits: Vec<Traits>,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            strings: Vec::new(),
            complexes: Vec::new(),
            traits: Vec::new(),
        }
    }

    fn read_value(&mut self) -> Result<Value, Amf3Error> {
        let marker = self.read_u8()?;
        match marker {
            MARKER_UNDEFINED | MARKER_NULL => Ok(Value::Null),
            MARKER_FALSE => Ok(Value::Bool(false)),
            MARKER_TRUE => Ok(Value::Bool(true)),
            MARKER_INTEGER => {
                let u = self.read_u29()?;
                // 29-bit two's complement.
                let n = if u & 0x1000_0000 != 0 {
                    i64::from(u) - 0x2000_0000
                } else {
                    i64::from(u)
                };
                Ok(Value::Number(Number::from(n)))
            }
            MARKER_DOUBLE => {
                let d = self.read_f64()?;
                Ok(number_from_f64(d))
            }
            MARKER_STRING => Ok(Value::String(self.read_string()?)),
            MARKER_DATE => self.read_date(),
            MARKER_ARRAY => self.read_array(),
            MARKER_OBJECT => self.read_object(),
            other => Err(Amf3Error::Unsupported(other)),
        }
    }

    // --- Primitives ---

    fn read_u8(&mut self) -> Result<u8, Amf3Error> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| Amf3Error::Corrupt("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Amf3Error> {
        let end = self.pos.checked_add(len).filter(|&e| e <= self.buf.len());
        match end {
            Some(end) => {
                let slice = &self.buf[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(Amf3Error::Corrupt(format!(
                "unexpected end of input: need {len} bytes at offset {}",
                self.pos
            ))),
        }
    }

    fn read_f64(&mut self) -> Result<f64, Amf3Error> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    /// Variable-length 29-bit unsigned integer: three 7-bit groups with a
    /// continuation bit, then one full trailing byte.
    fn read_u29(&mut self) -> Result<u32, Amf3Error> {
        let mut n: u32 = 0;
        for i in 0..4 {
            let b = self.read_u8()?;
            if i < 3 {
                n = (n << 7) | u32::from(b & 0x7f);
                if b & 0x80 == 0 {
                    return Ok(n);
                }
            } else {
                n = (n << 8) | u32::from(b);
            }
        }
        Ok(n)
    }

    /// UTF-8-vr: low bit selects inline (length) vs reference (table index).
    fn read_string(&mut self) -> Result<String, Amf3Error> {
        let u = self.read_u29()?;
        if u & 1 == 0 {
            let idx = (u >> 1) as usize;
            return self
                .strings
                .get(idx)
                .cloned()
                .ok_or_else(|| Amf3Error::Corrupt(format!("dangling string reference {idx}")));
        }
        let len = (u >> 1) as usize;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Amf3Error::Corrupt(format!("string is not utf-8: {e}")))?
            .to_string();
        // The empty string never enters the reference table.
        if !s.is_empty() {
            self.strings.push(s.clone());
        }
        Ok(s)
    }

    // --- Complex values ---

    /// Reserves a complex-table slot so nested values get the right indices,
    /// then runs `fill` and stores the finished value into the slot.
    fn with_complex_slot(
        &mut self,
        fill: impl FnOnce(&mut Self) -> Result<Value, Amf3Error>,
    ) -> Result<Value, Amf3Error> {
        let idx = self.complexes.len();
        self.complexes.push(Value::Null);
        let value = fill(self)?;
        self.complexes[idx] = value.clone();
        Ok(value)
    }

    fn complex_ref(&self, idx: usize) -> Result<Value, Amf3Error> {
        self.complexes
            .get(idx)
            .cloned()
            .ok_or_else(|| Amf3Error::Corrupt(format!("dangling complex reference {idx}")))
    }

    fn read_date(&mut self) -> Result<Value, Amf3Error> {
        let u = self.read_u29()?;
        if u & 1 == 0 {
            return self.complex_ref((u >> 1) as usize);
        }
        self.with_complex_slot(|r| {
            let millis = r.read_f64()?;
            Ok(number_from_f64(millis))
        })
    }

    fn read_array(&mut self) -> Result<Value, Amf3Error> {
        let u = self.read_u29()?;
        if u & 1 == 0 {
            return self.complex_ref((u >> 1) as usize);
        }
        let count = (u >> 1) as usize;
        self.with_complex_slot(|r| {
            // Associative portion: (key, value) pairs up to the empty key.
            let mut assoc: Vec<(String, Value)> = Vec::new();
            loop {
                let key = r.read_string()?;
                if key.is_empty() {
                    break;
                }
                let value = r.read_value()?;
                assoc.push((key, value));
            }

            let mut dense = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                dense.push(r.read_value()?);
            }

            if assoc.is_empty() {
                return Ok(Value::Array(dense));
            }
            // ECMA array: keep associative pairs, then dense elements under
            // their index keys. Game data never emits these, but the reader
            // should not die on them.
            let mut map = Map::new();
            for (key, value) in assoc {
                map.insert(key, value);
            }
            for (i, value) in dense.into_iter().enumerate() {
                map.insert(i.to_string(), value);
            }
            Ok(Value::Object(map))
        })
    }

    fn read_object(&mut self) -> Result<Value, Amf3Error> {
        let u = self.read_u29()?;
        if u & 1 == 0 {
            return self.complex_ref((u >> 1) as usize);
        }

        let traits = if u & 2 == 0 {
            let idx = (u >> 2) as usize;
            self.traits
                .get(idx)
                .cloned()
                .ok_or_else(|| Amf3Error::Corrupt(format!("dangling traits reference {idx}")))?
        } else {
            if u & 4 != 0 {
                return Err(Amf3Error::Corrupt(
                    "externalizable traits are not supported".to_string(),
                ));
            }
            let dynamic = u & 8 != 0;
            let sealed_count = (u >> 4) as usize;
            // Class name is read for wire correctness and dropped: decoded
            // trees are anonymous.
            let _class = self.read_string()?;
            let mut members = Vec::with_capacity(sealed_count.min(4096));
            for _ in 0..sealed_count {
                members.push(self.read_string()?);
            }
            let traits = Traits { dynamic, members };
            self.traits.push(traits.clone());
            traits
        };

        self.with_complex_slot(|r| {
            let mut map = Map::new();
            for name in &traits.members {
                let value = r.read_value()?;
                map.insert(name.clone(), value);
            }
            if traits.dynamic {
                loop {
                    let key = r.read_string()?;
                    if key.is_empty() {
                        break;
                    }
                    let value = r.read_value()?;
                    map.insert(key, value);
                }
            }
            Ok(Value::Object(map))
        })
    }
}

/// NaN and infinities have no JSON number form; the client treats them as
/// absent, so they decode to null.
fn number_from_f64(d: f64) -> Value {
    match Number::from_f64(d) {
        Some(n) => Value::Number(n),
        None => Value::Null,
    }
}
