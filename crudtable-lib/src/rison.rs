//! Rison codec for the `q` query parameter.
//!
//! Rison is a compact JSON notation that survives URL query strings with
//! little escaping:
//!
//! | JSON | Rison |
//! |------|-------|
//! | `{"a":1,"b":"x y"}` | `(a:1,b:'x y')` |
//! | `[1,2]` | `!(1,2)` |
//! | `true` / `false` / `null` | `!t` / `!f` / `!n` |
//! | `"it's"` | `'it!'s'` |
//!
//! Values go through [`serde_json::Value`], so any `Serialize` type can be
//! encoded and any `DeserializeOwned` type decoded.
//!
//! # Example
//!
//! ```
//! use crudtable_lib::rison;
//! use serde_json::json;
//!
//! let q = rison::to_string(&json!({"page": 0, "order_column": "name"}));
//! assert_eq!(q, "(order_column:name,page:0)");
//! assert_eq!(rison::from_str(&q).unwrap(), json!({"page": 0, "order_column": "name"}));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::error::Error;

/// Characters that may never appear in a bare identifier.
const NOT_ID_CHAR: &str = " '!:(),*@$";
/// Characters that may not start a bare identifier.
const NOT_ID_START: &str = "-0123456789";

/// Encodes a JSON value as rison.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Serializes any value and encodes it as rison.
pub fn encode<T: Serialize>(value: &T) -> Result<String, Error> {
    let value = serde_json::to_value(value).map_err(|e| Error::decode(e.to_string(), 0))?;
    Ok(to_string(&value))
}

/// Decodes rison into a JSON value.
pub fn from_str(input: &str) -> Result<Value, Error> {
    let mut parser = Parser { src: input, pos: 0 };
    let value = parser.parse_value()?;
    if parser.pos != input.len() {
        return Err(Error::decode("trailing characters", parser.pos));
    }
    Ok(value)
}

/// Decodes rison and deserializes the result.
pub fn decode<T: DeserializeOwned>(input: &str) -> Result<T, Error> {
    let value = from_str(input)?;
    serde_json::from_value(value).map_err(|e| Error::decode(e.to_string(), 0))
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("!n"),
        Value::Bool(true) => out.push_str("!t"),
        Value::Bool(false) => out.push_str("!f"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push_str("!(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(')');
        }
        Value::Object(map) => {
            out.push('(');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(item, out);
            }
            out.push(')');
        }
    }
}

fn is_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        None => false,
        Some(first) if NOT_ID_START.contains(first) || NOT_ID_CHAR.contains(first) => false,
        Some(_) => chars.all(|c| !NOT_ID_CHAR.contains(c)),
    }
}

fn write_string(s: &str, out: &mut String) {
    if is_id(s) {
        out.push_str(s);
        return;
    }
    out.push('\'');
    for c in s.chars() {
        if c == '!' || c == '\'' {
            out.push('!');
        }
        out.push(c);
    }
    out.push('\'');
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), Error> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(Error::decode(
                format!("expected '{expected}', found '{c}'"),
                self.pos - c.len_utf8(),
            )),
            None => Err(Error::decode(
                format!("expected '{expected}', found end of input"),
                self.pos,
            )),
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        match self.peek() {
            None => Err(Error::decode("unexpected end of input", self.pos)),
            Some('(') => self.parse_object(),
            Some('!') => self.parse_bang(),
            Some('\'') => self.parse_quoted().map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(_) => self.parse_id().map(Value::String),
        }
    }

    fn parse_object(&mut self) -> Result<Value, Error> {
        self.expect('(')?;
        let mut map = Map::new();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Value::Object(map));
        }
        loop {
            let key = match self.peek() {
                Some('\'') => self.parse_quoted()?,
                _ => self.parse_id()?,
            };
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(Value::Object(map)),
                Some(c) => {
                    return Err(Error::decode(
                        format!("expected ',' or ')' in object, found '{c}'"),
                        self.pos - c.len_utf8(),
                    ));
                }
                None => return Err(Error::decode("unterminated object", self.pos)),
            }
        }
    }

    fn parse_bang(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        self.expect('!')?;
        match self.bump() {
            Some('t') => Ok(Value::Bool(true)),
            Some('f') => Ok(Value::Bool(false)),
            Some('n') => Ok(Value::Null),
            Some('(') => self.parse_array_items(),
            Some(c) => Err(Error::decode(format!("unknown literal '!{c}'"), start)),
            None => Err(Error::decode("dangling '!'", start)),
        }
    }

    fn parse_array_items(&mut self) -> Result<Value, Error> {
        let mut items = Vec::new();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(Value::Array(items)),
                Some(c) => {
                    return Err(Error::decode(
                        format!("expected ',' or ')' in array, found '{c}'"),
                        self.pos - c.len_utf8(),
                    ));
                }
                None => return Err(Error::decode("unterminated array", self.pos)),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String, Error> {
        let start = self.pos;
        self.expect('\'')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(out),
                Some('!') => match self.bump() {
                    Some(c @ ('!' | '\'')) => out.push(c),
                    Some(c) => {
                        return Err(Error::decode(
                            format!("invalid string escape '!{c}'"),
                            self.pos - c.len_utf8() - 1,
                        ));
                    }
                    None => return Err(Error::decode("unterminated string", start)),
                },
                Some(c) => out.push(c),
                None => return Err(Error::decode("unterminated string", start)),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let number = if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().and_then(Number::from_f64)
        } else {
            text.parse::<i64>().ok().map(Number::from)
        };
        number
            .map(Value::Number)
            .ok_or_else(|| Error::decode(format!("invalid number '{text}'"), start))
    }

    fn parse_id(&mut self) -> Result<String, Error> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if NOT_ID_CHAR.contains(c) {
                break;
            }
            self.bump();
        }
        if start == self.pos {
            return Err(Error::decode("expected identifier", start));
        }
        Ok(self.src[start..self.pos].to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(to_string(&json!(null)), "!n");
        assert_eq!(to_string(&json!(true)), "!t");
        assert_eq!(to_string(&json!(false)), "!f");
        assert_eq!(to_string(&json!(42)), "42");
        assert_eq!(to_string(&json!(-1.5)), "-1.5");
    }

    #[test]
    fn test_encode_strings() {
        assert_eq!(to_string(&json!("name")), "name");
        assert_eq!(to_string(&json!("department.name")), "department.name");
        assert_eq!(to_string(&json!("")), "''");
        assert_eq!(to_string(&json!("two words")), "'two words'");
        assert_eq!(to_string(&json!("42")), "'42'");
        assert_eq!(to_string(&json!("-x")), "'-x'");
        assert_eq!(to_string(&json!("it's")), "'it!'s'");
        assert_eq!(to_string(&json!("wow!")), "'wow!!'");
    }

    #[test]
    fn test_encode_nested() {
        let value = json!({
            "filters": [{"col": "name", "opr": "ct", "value": "Jo"}],
            "page": 0,
        });
        assert_eq!(
            to_string(&value),
            "(filters:!((col:name,opr:ct,value:Jo)),page:0)"
        );
        assert_eq!(to_string(&json!([])), "!()");
        assert_eq!(to_string(&json!({})), "()");
    }

    #[test]
    fn test_decode_nested() {
        let value = from_str("(filters:!((col:name,opr:ct,value:'a b')),page:2,x:!t)").unwrap();
        assert_eq!(
            value,
            json!({
                "filters": [{"col": "name", "opr": "ct", "value": "a b"}],
                "page": 2,
                "x": true,
            })
        );
    }

    #[test]
    fn test_decode_escapes_and_unicode() {
        assert_eq!(from_str("'it!'s !!'").unwrap(), json!("it's !"));
        assert_eq!(from_str("Zürich").unwrap(), json!("Zürich"));
    }

    #[test]
    fn test_decode_errors_report_offset() {
        match from_str("(a:1") {
            Err(Error::Decode { offset, .. }) => assert_eq!(offset, 4),
            other => panic!("expected decode error, got {other:?}"),
        }
        match from_str("(a:1)x") {
            Err(Error::Decode { offset, .. }) => assert_eq!(offset, 5),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(from_str("!x").is_err());
        assert!(from_str("'open").is_err());
        assert!(from_str("").is_err());
    }

    #[test]
    fn test_roundtrip_awkward_strings() {
        for s in ["", "a b", "1abc", "(x)", "a:b", "!", "'", "email@example.com", "$5"] {
            let encoded = to_string(&json!(s));
            assert_eq!(from_str(&encoded).unwrap(), json!(s), "encoded as {encoded}");
        }
    }
}
