//! Numeric resource identifiers.
//!
//! Clients send the `id` for PUT and DELETE either as a JSON value or as a
//! query string. Both are coerced to a number with the loose rules of
//! JavaScript's `Number()`, which is what the web client produces and expects:
//! `"42"`, `" 42 "`, `42`, `true` and `null` are all numbers, `"abc"` and
//! `{}` are not.

use serde_json::Value;
use std::fmt;

/// A validated, non-NaN numeric id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericId(f64);

impl NumericId {
    /// Convert the `id` field of a JSON body.
    ///
    /// `None` means the field is absent, which never converts.
    pub fn from_json(value: Option<&Value>) -> Option<Self> {
        let value = value?;
        let number = match value {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => parse_number(s)?,
            Value::Array(_) => parse_number(&primitive_string(value))?,
            Value::Object(_) => return None,
        };
        Self::new(number)
    }

    /// Convert the first `id` query parameter. An absent parameter is `0`.
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value {
            None => Self::new(0.0),
            Some(s) => Self::new(parse_number(s)?),
        }
    }

    fn new(number: f64) -> Option<Self> {
        if number.is_nan() {
            None
        } else {
            Some(Self(number))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for NumericId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n == 0.0 {
            // covers -0
            f.write_str("0")
        } else if n.is_infinite() {
            f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
        } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
            // Exponent form outside [1e-6, 1e21), with an explicit `+` on
            // positive exponents: 1e+21, 1.5e-7.
            let exp = format!("{n:e}");
            match exp.split_once('e') {
                Some((mantissa, power)) if !power.starts_with('-') => {
                    write!(f, "{mantissa}e+{power}")
                }
                _ => f.write_str(&exp),
            }
        } else {
            write!(f, "{n}")
        }
    }
}

/// String form of a JSON value as an array join would produce it.
fn primitive_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => NumericId(f).to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(primitive_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// String to number; `None` stands for NaN.
fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // f64::from_str also takes "inf" and "nan", which are not numbers here.
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
