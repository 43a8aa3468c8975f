//! Closed set of scalar field kinds and their text encoding.
use crate::numeric::InvariantNumber as _;

/// Kind of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `String`
    Text,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl ScalarKind {
    /// Rust name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Decode item text into a value of this kind.
    ///
    /// Text always decodes; numbers return `None` when the text is not a
    /// valid invariant number of this width.
    #[must_use]
    pub fn decode(self, text: &str) -> Option<Scalar> {
        Some(match self {
            Self::Text => Scalar::Text(text.to_string()),
            Self::I8 => Scalar::I8(i8::parse_invariant(text)?),
            Self::I16 => Scalar::I16(i16::parse_invariant(text)?),
            Self::I32 => Scalar::I32(i32::parse_invariant(text)?),
            Self::I64 => Scalar::I64(i64::parse_invariant(text)?),
            Self::U8 => Scalar::U8(u8::parse_invariant(text)?),
            Self::U16 => Scalar::U16(u16::parse_invariant(text)?),
            Self::U32 => Scalar::U32(u32::parse_invariant(text)?),
            Self::U64 => Scalar::U64(u64::parse_invariant(text)?),
            Self::F32 => Scalar::F32(f32::parse_invariant(text)?),
            Self::F64 => Scalar::F64(f64::parse_invariant(text)?),
        })
    }
}

/// A scalar value read from or written to one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text value.
    Text(String),
    /// 8-bit signed.
    I8(i8),
    /// 16-bit signed.
    I16(i16),
    /// 32-bit signed.
    I32(i32),
    /// 64-bit signed.
    I64(i64),
    /// 8-bit unsigned.
    U8(u8),
    /// 16-bit unsigned.
    U16(u16),
    /// 32-bit unsigned.
    U32(u32),
    /// 64-bit unsigned.
    U64(u64),
    /// Single precision.
    F32(f32),
    /// Double precision.
    F64(f64),
}

impl Scalar {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Text(_) => ScalarKind::Text,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }

    /// Render the value as item text.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::I8(v) => v.format_invariant(),
            Self::I16(v) => v.format_invariant(),
            Self::I32(v) => v.format_invariant(),
            Self::I64(v) => v.format_invariant(),
            Self::U8(v) => v.format_invariant(),
            Self::U16(v) => v.format_invariant(),
            Self::U32(v) => v.format_invariant(),
            Self::U64(v) => v.format_invariant(),
            Self::F32(v) => v.format_invariant(),
            Self::F64(v) => v.format_invariant(),
        }
    }
}

/// A Rust type that can back a scalar field.
pub trait ScalarType: Sized + 'static {
    /// Kind tag for this type.
    const KIND: ScalarKind;

    /// Wrap the value.
    fn into_scalar(self) -> Scalar;

    /// Unwrap a value of the matching kind.
    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn into_scalar(self) -> Scalar {
        Scalar::Text(self)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

macro_rules! numeric_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl ScalarType for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }

                fn from_scalar(scalar: Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )+
    };
}

numeric_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);
