//! Host type classification and the `SqlField` conversion trait.

use chrono::NaiveDateTime;

use crate::error::{Error, Result, TypeError};
use crate::value::Value;

/// Storage timestamp format for drivers that keep datetimes as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Classification of a record field's Rust type.
///
/// A dialect turns this into a concrete column type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `bool`
    Bool,
    /// Fixed-width integers up to 32 bits
    Integer,
    /// 64-bit integers
    BigInt,
    /// Floating point
    Real,
    /// Strings
    Text,
    /// Byte vectors and byte arrays
    Blob,
    /// `chrono::NaiveDateTime`
    DateTime,
}

/// A Rust type that can be stored in a mapped column.
///
/// Only the types implementing this trait may appear as fields of a
/// `#[derive(Model)]` struct; anything else is rejected when the derive expands.
pub trait SqlField: Sized {
    /// Column classification for this type.
    const SQL_TYPE: SqlType;

    /// Convert to a bind value.
    fn to_value(&self) -> Value;

    /// Convert from a scanned value.
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> Error {
    Error::Type(TypeError {
        expected,
        actual: value.type_name().to_string(),
    })
}

fn out_of_range(expected: &'static str, v: i64) -> Error {
    Error::Type(TypeError {
        expected,
        actual: format!("out of range integer {}", v),
    })
}

impl SqlField for bool {
    const SQL_TYPE: SqlType = SqlType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            // SQLite stores booleans as integers
            Value::Int(_) | Value::BigInt(_) => Ok(value.as_i64() != Some(0)),
            other => Err(mismatch("bool", other)),
        }
    }
}

macro_rules! impl_small_int {
    ($($t:ty),*) => {$(
        impl SqlField for $t {
            const SQL_TYPE: SqlType = SqlType::Integer;

            fn to_value(&self) -> Value {
                Value::Int(i32::from(*self))
            }

            fn from_value(value: &Value) -> Result<Self> {
                let v = value.as_i64().ok_or_else(|| mismatch(stringify!($t), value))?;
                <$t>::try_from(v).map_err(|_| out_of_range(stringify!($t), v))
            }
        }
    )*};
}

impl_small_int!(i8, i16, i32, u8, u16);

impl SqlField for u32 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn to_value(&self) -> Value {
        Value::BigInt(i64::from(*self))
    }

    fn from_value(value: &Value) -> Result<Self> {
        let v = value.as_i64().ok_or_else(|| mismatch("u32", value))?;
        u32::try_from(v).map_err(|_| out_of_range("u32", v))
    }
}

impl SqlField for i64 {
    const SQL_TYPE: SqlType = SqlType::BigInt;

    fn to_value(&self) -> Value {
        Value::BigInt(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch("i64", value))
    }
}

impl SqlField for u64 {
    const SQL_TYPE: SqlType = SqlType::BigInt;

    fn to_value(&self) -> Value {
        // Stored bit-for-bit; values above i64::MAX come back through the same cast.
        Value::BigInt(*self as i64)
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_i64()
            .map(|v| v as u64)
            .ok_or_else(|| mismatch("u64", value))
    }
}

impl SqlField for f64 {
    const SQL_TYPE: SqlType = SqlType::Real;

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Double(f) => Ok(*f),
            Value::Int(i) => Ok(f64::from(*i)),
            Value::BigInt(i) => Ok(*i as f64),
            other => Err(mismatch("f64", other)),
        }
    }
}

impl SqlField for f32 {
    const SQL_TYPE: SqlType = SqlType::Real;

    fn to_value(&self) -> Value {
        Value::Double(f64::from(*self))
    }

    fn from_value(value: &Value) -> Result<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl SqlField for String {
    const SQL_TYPE: SqlType = SqlType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch("String", other)),
        }
    }
}

impl SqlField for Vec<u8> {
    const SQL_TYPE: SqlType = SqlType::Blob;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(mismatch("Vec<u8>", other)),
        }
    }
}

impl<const N: usize> SqlField for [u8; N] {
    const SQL_TYPE: SqlType = SqlType::Blob;

    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }

    fn from_value(value: &Value) -> Result<Self> {
        let bytes = Vec::<u8>::from_value(value)?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            Error::Type(TypeError {
                expected: "fixed-size byte array",
                actual: format!("{} bytes, wanted {}", len, N),
            })
        })
    }
}

impl SqlField for NaiveDateTime {
    const SQL_TYPE: SqlType = SqlType::DateTime;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(s) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| {
                Error::Type(TypeError {
                    expected: "datetime",
                    actual: format!("unparseable text {:?}: {}", s, e),
                })
            }),
            other => Err(mismatch("datetime", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(<bool as SqlField>::SQL_TYPE, SqlType::Bool);
        assert_eq!(<i8 as SqlField>::SQL_TYPE, SqlType::Integer);
        assert_eq!(<u32 as SqlField>::SQL_TYPE, SqlType::Integer);
        assert_eq!(<i64 as SqlField>::SQL_TYPE, SqlType::BigInt);
        assert_eq!(<u64 as SqlField>::SQL_TYPE, SqlType::BigInt);
        assert_eq!(<f32 as SqlField>::SQL_TYPE, SqlType::Real);
        assert_eq!(<String as SqlField>::SQL_TYPE, SqlType::Text);
        assert_eq!(<Vec<u8> as SqlField>::SQL_TYPE, SqlType::Blob);
        assert_eq!(<[u8; 4] as SqlField>::SQL_TYPE, SqlType::Blob);
        assert_eq!(<NaiveDateTime as SqlField>::SQL_TYPE, SqlType::DateTime);
    }

    #[test]
    fn test_integer_scan_accepts_driver_widths() {
        assert_eq!(i32::from_value(&Value::BigInt(18)).unwrap(), 18);
        assert!(i8::from_value(&Value::BigInt(300)).is_err());
        assert!(bool::from_value(&Value::BigInt(1)).unwrap());
        assert!(!bool::from_value(&Value::BigInt(0)).unwrap());
        assert!(i64::from_value(&Value::Text("1".into())).is_err());
    }

    #[test]
    fn test_timestamp_from_text() {
        let ts = NaiveDateTime::parse_from_str("2024-03-01 12:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let text = Value::Text(ts.format(TIMESTAMP_FORMAT).to_string());
        assert_eq!(NaiveDateTime::from_value(&text).unwrap(), ts);
    }

    #[test]
    fn test_byte_array_length_checked() {
        let v = Value::Bytes(vec![1, 2, 3]);
        assert_eq!(<[u8; 3]>::from_value(&v).unwrap(), [1, 2, 3]);
        assert!(<[u8; 4]>::from_value(&v).is_err());
    }
}
