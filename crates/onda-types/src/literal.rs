//! Tagged constant values
//!
//! A [`Literal`] carries the bit pattern of one runtime value, matching a
//! value kind. Floats are stored as raw bits so literals stay `Eq`/`Hash`
//! and NaN payloads survive round trips.

use crate::types::Type;
use std::fmt;

/// A constant value of the bytecode format
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    I32(i32),
    I64(i64),
    /// f32 bits
    F32(u32),
    /// f64 bits
    F64(u64),
    /// 128-bit vector bytes, little-endian lane order
    V128([u8; 16]),
    /// A null reference
    Null,
    /// A function reference, by function name
    Func(String),
}

impl Literal {
    pub fn from_f32(v: f32) -> Self {
        Literal::F32(v.to_bits())
    }

    pub fn from_f64(v: f64) -> Self {
        Literal::F64(v.to_bits())
    }

    pub fn to_f32(&self) -> f32 {
        match self {
            Literal::F32(bits) => f32::from_bits(*bits),
            _ => panic!("to_f32 on a non-f32 literal"),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Literal::F64(bits) => f64::from_bits(*bits),
            _ => panic!("to_f64 on a non-f64 literal"),
        }
    }

    /// The value type this literal inhabits
    pub fn ty(&self) -> Type {
        match self {
            Literal::I32(_) => Type::I32,
            Literal::I64(_) => Type::I64,
            Literal::F32(_) => Type::F32,
            Literal::F64(_) => Type::F64,
            Literal::V128(_) => Type::V128,
            Literal::Null => Type::Nullref,
            Literal::Func(_) => Type::Funcref,
        }
    }

    /// The zero value of a concrete single type, if it has one
    pub fn zero_of(ty: &Type) -> Option<Literal> {
        match ty {
            Type::I32 => Some(Literal::I32(0)),
            Type::I64 => Some(Literal::I64(0)),
            Type::F32 => Some(Literal::F32(0)),
            Type::F64 => Some(Literal::F64(0)),
            Type::V128 => Some(Literal::V128([0; 16])),
            Type::Nullref => Some(Literal::Null),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::I32(v) => write!(f, "i32.const {}", v),
            Literal::I64(v) => write!(f, "i64.const {}", v),
            Literal::F32(bits) => write!(f, "f32.const {}", f32::from_bits(*bits)),
            Literal::F64(bits) => write!(f, "f64.const {}", f64::from_bits(*bits)),
            Literal::V128(bytes) => {
                write!(f, "v128.const")?;
                for b in bytes {
                    write!(f, " {:#04x}", b)?;
                }
                Ok(())
            }
            Literal::Null => write!(f, "ref.null"),
            Literal::Func(name) => write!(f, "ref.func ${}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_types() {
        assert_eq!(Literal::I32(7).ty(), Type::I32);
        assert_eq!(Literal::from_f64(1.5).ty(), Type::F64);
        assert_eq!(Literal::Null.ty(), Type::Nullref);
        assert_eq!(Literal::Func("f".to_string()).ty(), Type::Funcref);
    }

    #[test]
    fn test_float_bits_round_trip() {
        let nan = f32::from_bits(0x7fc0_0001);
        let lit = Literal::from_f32(nan);
        assert_eq!(lit.to_f32().to_bits(), 0x7fc0_0001);

        // bit-pattern equality distinguishes NaN payloads
        assert_ne!(Literal::from_f32(nan), Literal::from_f32(f32::NAN));
        assert_eq!(Literal::from_f64(0.0), Literal::F64(0));
    }

    #[test]
    fn test_zero_of() {
        assert_eq!(Literal::zero_of(&Type::I64), Some(Literal::I64(0)));
        assert_eq!(Literal::zero_of(&Type::None), None);
        assert_eq!(Literal::zero_of(&Type::Funcref), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::I32(-1).to_string(), "i32.const -1");
        assert_eq!(Literal::Func("main".to_string()).to_string(), "ref.func $main");
    }
}
