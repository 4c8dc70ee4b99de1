/// A single decoded element of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Byte-string payloads (fixed-length ASCII strings and the like). Decoded
    /// as UTF-8 only when a text value is requested.
    Bytes(Vec<u8>),
}

/// Dataset contents flattened in row-major order alongside their shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    shape: Vec<usize>,
    values: Vec<Value>,
}

impl Dataset {
    /// A zero-dimensional dataset.
    pub fn scalar(value: Value) -> Self {
        Self {
            shape: Vec::new(),
            values: vec![value],
        }
    }

    /// A one-dimensional dataset.
    pub fn array(values: Vec<Value>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    pub fn with_shape(shape: Vec<usize>, values: Vec<Value>) -> Self {
        Self { shape, values }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Collapses the dataset to the one element a metadata field stands for.
    ///
    /// Scalars yield themselves and non-empty vectors yield their first
    /// element (NeXus stores most scalars as shape `(1,)`). Higher-rank data
    /// only collapses when it holds exactly one element; anything else is not
    /// a scalar field and yields `None`.
    pub fn into_single(self) -> Option<Value> {
        match self.shape.len() {
            0 | 1 => self.values.into_iter().next(),
            _ if self.values.len() == 1 => self.values.into_iter().next(),
            _ => None,
        }
    }
}

/// Conversion from a decoded [`Value`] into a plain Rust type. `None` means
/// the value cannot stand in for the requested type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text),
            Value::Bytes(bytes) => decode_bytes(bytes),
            Value::Int(v) => Some(v.to_string()),
            Value::UInt(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Bool(v) => Some(v.to_string()),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        let number = match value {
            Value::Int(v) => v as f64,
            Value::UInt(v) => v as f64,
            Value::Float(v) => v,
            Value::Bool(v) => f64::from(u8::from(v)),
            Value::Text(text) => text.trim().parse().ok()?,
            Value::Bytes(bytes) => decode_bytes(bytes)?.trim().parse().ok()?,
        };
        number.is_finite().then_some(number)
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::UInt(v) => Some(v),
            Value::Int(v) => u64::try_from(v).ok(),
            Value::Bool(v) => Some(u64::from(v)),
            Value::Float(v) => float_to_u64(v),
            Value::Text(text) => parse_count(&text),
            Value::Bytes(bytes) => parse_count(&decode_bytes(bytes)?),
        }
    }
}

fn decode_bytes(bytes: Vec<u8>) -> Option<String> {
    // Fixed-length HDF5 strings are NUL padded.
    let text = String::from_utf8(bytes).ok()?;
    Some(text.trim_end_matches('\0').to_string())
}

fn float_to_u64(v: f64) -> Option<u64> {
    (v.is_finite() && v >= 0.0 && v <= u64::MAX as f64).then(|| v.trunc() as u64)
}

fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(float_to_u64))
}
