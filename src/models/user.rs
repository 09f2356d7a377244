use rusqlite::types::Value;
use std::fmt;

/// users 表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// 演示数据：唯一的管理员账号
    pub fn admin() -> Self {
        Self::new("1", "admin")
    }
}

/// 原始查询返回的第一行，列数由 `SELECT *`（或注入的 UNION）决定
///
/// 以元组形式输出：`('1', 'admin')`，单列为 `('x',)`，无结果为 `None`。
/// 每个值的写法与 Python 的 `repr` 一致。
#[derive(Debug, Clone, PartialEq)]
pub struct RowDump(pub Option<Vec<Value>>);

impl RowDump {
    pub fn empty() -> Self {
        Self(None)
    }
}

impl fmt::Display for RowDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(values) = &self.0 else {
            return f.write_str("None");
        };

        f.write_str("(")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_value(f, value)?;
        }
        if values.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("None"),
        Value::Integer(i) => write!(f, "{}", i),
        Value::Real(r) => f.write_str(&float_repr(*r)),
        Value::Text(s) => write_text(f, s),
        Value::Blob(bytes) => write_blob(f, bytes),
    }
}

/// 含单引号且不含双引号时改用双引号
fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

fn write_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = pick_quote(s.contains('\''), s.contains('"'));

    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    write!(f, "\\x{:02x}", code)?
                } else {
                    write!(f, "\\u{:04x}", code)?
                }
            }
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

fn write_blob(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));

    write!(f, "b{}", quote)?;
    for &b in bytes {
        match b {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if b as char == quote => write!(f, "\\{}", quote)?,
            0x20..=0x7e => write!(f, "{}", b as char)?,
            _ => write!(f, "\\x{:02x}", b)?,
        }
    }
    write!(f, "{}", quote)
}

/// 指数部分带符号且至少两位：`1e+16`、`1e-05`
fn float_repr(r: f64) -> String {
    let debug = format!("{:?}", r);
    let Some((mantissa, exponent)) = debug.split_once('e') else {
        return debug;
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
