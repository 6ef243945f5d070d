//! Operator rosters for unary, binary, atomic and SIMD expressions
//!
//! The result type of an operator node is structural: it follows from the
//! operator itself and, for binary operations, the operand type. Relational
//! operators are the exception - they always produce an `i32` truth value
//! no matter what they compare.

use onda_types::Type;

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    // int
    ClzInt32,
    ClzInt64,
    CtzInt32,
    CtzInt64,
    PopcntInt32,
    PopcntInt64,

    // float
    NegFloat32,
    NegFloat64,
    AbsFloat32,
    AbsFloat64,
    CeilFloat32,
    CeilFloat64,
    FloorFloat32,
    FloorFloat64,
    TruncFloat32,
    TruncFloat64,
    NearestFloat32,
    NearestFloat64,
    SqrtFloat32,
    SqrtFloat64,

    // relational
    EqZInt32,
    EqZInt64,

    // conversions: extend i32 to i64
    ExtendSInt32,
    ExtendUInt32,
    // i64 to i32
    WrapInt64,
    // float to int
    TruncSFloat32ToInt32,
    TruncSFloat32ToInt64,
    TruncUFloat32ToInt32,
    TruncUFloat32ToInt64,
    TruncSFloat64ToInt32,
    TruncSFloat64ToInt64,
    TruncUFloat64ToInt32,
    TruncUFloat64ToInt64,
    // reinterpret float bits as int
    ReinterpretFloat32,
    ReinterpretFloat64,
    // int to float
    ConvertSInt32ToFloat32,
    ConvertSInt32ToFloat64,
    ConvertUInt32ToFloat32,
    ConvertUInt32ToFloat64,
    ConvertSInt64ToFloat32,
    ConvertSInt64ToFloat64,
    ConvertUInt64ToFloat32,
    ConvertUInt64ToFloat64,
    // f32 to f64
    PromoteFloat32,
    // f64 to f32
    DemoteFloat64,
    // reinterpret int bits as float
    ReinterpretInt32,
    ReinterpretInt64,

    // extend signed subword-sized integers
    ExtendS8Int32,
    ExtendS16Int32,
    ExtendS8Int64,
    ExtendS16Int64,
    ExtendS32Int64,

    // saturating float-to-int
    TruncSatSFloat32ToInt32,
    TruncSatUFloat32ToInt32,
    TruncSatSFloat64ToInt32,
    TruncSatUFloat64ToInt32,
    TruncSatSFloat32ToInt64,
    TruncSatUFloat32ToInt64,
    TruncSatSFloat64ToInt64,
    TruncSatUFloat64ToInt64,

    // SIMD splats
    SplatVecI8x16,
    SplatVecI16x8,
    SplatVecI32x4,
    SplatVecI64x2,
    SplatVecF32x4,
    SplatVecF64x2,

    // SIMD arithmetic
    NotVec128,
    AbsVecI8x16,
    NegVecI8x16,
    AnyTrueVecI8x16,
    AllTrueVecI8x16,
    BitmaskVecI8x16,
    AbsVecI16x8,
    NegVecI16x8,
    AnyTrueVecI16x8,
    AllTrueVecI16x8,
    BitmaskVecI16x8,
    AbsVecI32x4,
    NegVecI32x4,
    AnyTrueVecI32x4,
    AllTrueVecI32x4,
    BitmaskVecI32x4,
    NegVecI64x2,
    AnyTrueVecI64x2,
    AllTrueVecI64x2,
    AbsVecF32x4,
    NegVecF32x4,
    SqrtVecF32x4,
    CeilVecF32x4,
    FloorVecF32x4,
    TruncVecF32x4,
    NearestVecF32x4,
    AbsVecF64x2,
    NegVecF64x2,
    SqrtVecF64x2,
    CeilVecF64x2,
    FloorVecF64x2,
    TruncVecF64x2,
    NearestVecF64x2,

    // SIMD conversions
    TruncSatSVecF32x4ToVecI32x4,
    TruncSatUVecF32x4ToVecI32x4,
    TruncSatSVecF64x2ToVecI64x2,
    TruncSatUVecF64x2ToVecI64x2,
    ConvertSVecI32x4ToVecF32x4,
    ConvertUVecI32x4ToVecF32x4,
    ConvertSVecI64x2ToVecF64x2,
    ConvertUVecI64x2ToVecF64x2,
    WidenLowSVecI8x16ToVecI16x8,
    WidenHighSVecI8x16ToVecI16x8,
    WidenLowUVecI8x16ToVecI16x8,
    WidenHighUVecI8x16ToVecI16x8,
    WidenLowSVecI16x8ToVecI32x4,
    WidenHighSVecI16x8ToVecI32x4,
    WidenLowUVecI16x8ToVecI32x4,
    WidenHighUVecI16x8ToVecI32x4,
}

impl UnaryOp {
    /// Relational operators produce an `i32` truth value
    pub fn is_relational(&self) -> bool {
        matches!(self, UnaryOp::EqZInt32 | UnaryOp::EqZInt64)
    }

    /// The output type of this operator, independent of its operand
    pub fn result_type(&self) -> Type {
        use UnaryOp::*;
        match self {
            ClzInt32 | CtzInt32 | PopcntInt32 | EqZInt32 | EqZInt64 | WrapInt64
            | TruncSFloat32ToInt32 | TruncUFloat32ToInt32 | TruncSFloat64ToInt32
            | TruncUFloat64ToInt32 | ReinterpretFloat32 | ExtendS8Int32 | ExtendS16Int32
            | TruncSatSFloat32ToInt32 | TruncSatUFloat32ToInt32 | TruncSatSFloat64ToInt32
            | TruncSatUFloat64ToInt32 | AnyTrueVecI8x16 | AllTrueVecI8x16 | BitmaskVecI8x16
            | AnyTrueVecI16x8 | AllTrueVecI16x8 | BitmaskVecI16x8 | AnyTrueVecI32x4
            | AllTrueVecI32x4 | BitmaskVecI32x4 | AnyTrueVecI64x2 | AllTrueVecI64x2 => Type::I32,

            ClzInt64 | CtzInt64 | PopcntInt64 | ExtendSInt32 | ExtendUInt32
            | TruncSFloat32ToInt64 | TruncUFloat32ToInt64 | TruncSFloat64ToInt64
            | TruncUFloat64ToInt64 | ReinterpretFloat64 | ExtendS8Int64 | ExtendS16Int64
            | ExtendS32Int64 | TruncSatSFloat32ToInt64 | TruncSatUFloat32ToInt64
            | TruncSatSFloat64ToInt64 | TruncSatUFloat64ToInt64 => Type::I64,

            NegFloat32 | AbsFloat32 | CeilFloat32 | FloorFloat32 | TruncFloat32
            | NearestFloat32 | SqrtFloat32 | ConvertSInt32ToFloat32 | ConvertUInt32ToFloat32
            | ConvertSInt64ToFloat32 | ConvertUInt64ToFloat32 | DemoteFloat64
            | ReinterpretInt32 => Type::F32,

            NegFloat64 | AbsFloat64 | CeilFloat64 | FloorFloat64 | TruncFloat64
            | NearestFloat64 | SqrtFloat64 | ConvertSInt32ToFloat64 | ConvertUInt32ToFloat64
            | ConvertSInt64ToFloat64 | ConvertUInt64ToFloat64 | PromoteFloat32
            | ReinterpretInt64 => Type::F64,

            SplatVecI8x16 | SplatVecI16x8 | SplatVecI32x4 | SplatVecI64x2 | SplatVecF32x4
            | SplatVecF64x2 | NotVec128 | AbsVecI8x16 | NegVecI8x16 | AbsVecI16x8
            | NegVecI16x8 | AbsVecI32x4 | NegVecI32x4 | NegVecI64x2 | AbsVecF32x4
            | NegVecF32x4 | SqrtVecF32x4 | CeilVecF32x4 | FloorVecF32x4 | TruncVecF32x4
            | NearestVecF32x4 | AbsVecF64x2 | NegVecF64x2 | SqrtVecF64x2 | CeilVecF64x2
            | FloorVecF64x2 | TruncVecF64x2 | NearestVecF64x2 | TruncSatSVecF32x4ToVecI32x4
            | TruncSatUVecF32x4ToVecI32x4 | TruncSatSVecF64x2ToVecI64x2
            | TruncSatUVecF64x2ToVecI64x2 | ConvertSVecI32x4ToVecF32x4
            | ConvertUVecI32x4ToVecF32x4 | ConvertSVecI64x2ToVecF64x2
            | ConvertUVecI64x2ToVecF64x2 | WidenLowSVecI8x16ToVecI16x8
            | WidenHighSVecI8x16ToVecI16x8 | WidenLowUVecI8x16ToVecI16x8
            | WidenHighUVecI8x16ToVecI16x8 | WidenLowSVecI16x8ToVecI32x4
            | WidenHighSVecI16x8ToVecI32x4 | WidenLowUVecI16x8ToVecI32x4
            | WidenHighUVecI16x8ToVecI32x4 => Type::V128,
        }
    }
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // i32 arithmetic
    AddInt32,
    SubInt32,
    MulInt32,
    DivSInt32,
    DivUInt32,
    RemSInt32,
    RemUInt32,
    AndInt32,
    OrInt32,
    XorInt32,
    ShlInt32,
    ShrSInt32,
    ShrUInt32,
    RotLInt32,
    RotRInt32,
    // i32 relational
    EqInt32,
    NeInt32,
    LtSInt32,
    LtUInt32,
    LeSInt32,
    LeUInt32,
    GtSInt32,
    GtUInt32,
    GeSInt32,
    GeUInt32,

    // i64 arithmetic
    AddInt64,
    SubInt64,
    MulInt64,
    DivSInt64,
    DivUInt64,
    RemSInt64,
    RemUInt64,
    AndInt64,
    OrInt64,
    XorInt64,
    ShlInt64,
    ShrSInt64,
    ShrUInt64,
    RotLInt64,
    RotRInt64,
    // i64 relational
    EqInt64,
    NeInt64,
    LtSInt64,
    LtUInt64,
    LeSInt64,
    LeUInt64,
    GtSInt64,
    GtUInt64,
    GeSInt64,
    GeUInt64,

    // f32 arithmetic
    AddFloat32,
    SubFloat32,
    MulFloat32,
    DivFloat32,
    CopySignFloat32,
    MinFloat32,
    MaxFloat32,
    // f32 relational
    EqFloat32,
    NeFloat32,
    LtFloat32,
    LeFloat32,
    GtFloat32,
    GeFloat32,

    // f64 arithmetic
    AddFloat64,
    SubFloat64,
    MulFloat64,
    DivFloat64,
    CopySignFloat64,
    MinFloat64,
    MaxFloat64,
    // f64 relational
    EqFloat64,
    NeFloat64,
    LtFloat64,
    LeFloat64,
    GtFloat64,
    GeFloat64,

    // SIMD comparisons (these return vectors, not truth values)
    EqVecI8x16,
    NeVecI8x16,
    LtSVecI8x16,
    LtUVecI8x16,
    GtSVecI8x16,
    GtUVecI8x16,
    LeSVecI8x16,
    LeUVecI8x16,
    GeSVecI8x16,
    GeUVecI8x16,
    EqVecI16x8,
    NeVecI16x8,
    LtSVecI16x8,
    LtUVecI16x8,
    GtSVecI16x8,
    GtUVecI16x8,
    LeSVecI16x8,
    LeUVecI16x8,
    GeSVecI16x8,
    GeUVecI16x8,
    EqVecI32x4,
    NeVecI32x4,
    LtSVecI32x4,
    LtUVecI32x4,
    GtSVecI32x4,
    GtUVecI32x4,
    LeSVecI32x4,
    LeUVecI32x4,
    GeSVecI32x4,
    GeUVecI32x4,
    EqVecF32x4,
    NeVecF32x4,
    LtVecF32x4,
    GtVecF32x4,
    LeVecF32x4,
    GeVecF32x4,
    EqVecF64x2,
    NeVecF64x2,
    LtVecF64x2,
    GtVecF64x2,
    LeVecF64x2,
    GeVecF64x2,

    // SIMD arithmetic
    AndVec128,
    OrVec128,
    XorVec128,
    AndNotVec128,
    AddVecI8x16,
    AddSatSVecI8x16,
    AddSatUVecI8x16,
    SubVecI8x16,
    SubSatSVecI8x16,
    SubSatUVecI8x16,
    MulVecI8x16,
    MinSVecI8x16,
    MinUVecI8x16,
    MaxSVecI8x16,
    MaxUVecI8x16,
    AvgrUVecI8x16,
    AddVecI16x8,
    AddSatSVecI16x8,
    AddSatUVecI16x8,
    SubVecI16x8,
    SubSatSVecI16x8,
    SubSatUVecI16x8,
    MulVecI16x8,
    MinSVecI16x8,
    MinUVecI16x8,
    MaxSVecI16x8,
    MaxUVecI16x8,
    AvgrUVecI16x8,
    AddVecI32x4,
    SubVecI32x4,
    MulVecI32x4,
    MinSVecI32x4,
    MinUVecI32x4,
    MaxSVecI32x4,
    MaxUVecI32x4,
    DotSVecI16x8ToVecI32x4,
    AddVecI64x2,
    SubVecI64x2,
    MulVecI64x2,
    AddVecF32x4,
    SubVecF32x4,
    MulVecF32x4,
    DivVecF32x4,
    MinVecF32x4,
    MaxVecF32x4,
    PMinVecF32x4,
    PMaxVecF32x4,
    AddVecF64x2,
    SubVecF64x2,
    MulVecF64x2,
    DivVecF64x2,
    MinVecF64x2,
    MaxVecF64x2,
    PMinVecF64x2,
    PMaxVecF64x2,

    // SIMD conversions
    NarrowSVecI16x8ToVecI8x16,
    NarrowUVecI16x8ToVecI8x16,
    NarrowSVecI32x4ToVecI16x8,
    NarrowUVecI32x4ToVecI16x8,

    // SIMD swizzle
    SwizzleVec8x16,
}

impl BinaryOp {
    /// Relational operators produce an `i32` truth value regardless of the
    /// operand type. SIMD comparisons are not relational in this sense;
    /// they produce a `v128` lane mask, the same type as their operands.
    pub fn is_relational(&self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            EqInt32
                | NeInt32
                | LtSInt32
                | LtUInt32
                | LeSInt32
                | LeUInt32
                | GtSInt32
                | GtUInt32
                | GeSInt32
                | GeUInt32
                | EqInt64
                | NeInt64
                | LtSInt64
                | LtUInt64
                | LeSInt64
                | LeUInt64
                | GtSInt64
                | GtUInt64
                | GeSInt64
                | GeUInt64
                | EqFloat32
                | NeFloat32
                | LtFloat32
                | LeFloat32
                | GtFloat32
                | GeFloat32
                | EqFloat64
                | NeFloat64
                | LtFloat64
                | LeFloat64
                | GtFloat64
                | GeFloat64
        )
    }
}

/// Atomic read-modify-write operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicRmwOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Xchg,
}

/// SIMD lane extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdExtractOp {
    ExtractLaneSVecI8x16,
    ExtractLaneUVecI8x16,
    ExtractLaneSVecI16x8,
    ExtractLaneUVecI16x8,
    ExtractLaneVecI32x4,
    ExtractLaneVecI64x2,
    ExtractLaneVecF32x4,
    ExtractLaneVecF64x2,
}

impl SimdExtractOp {
    /// The scalar type of the extracted lane
    pub fn lane_type(&self) -> Type {
        use SimdExtractOp::*;
        match self {
            ExtractLaneSVecI8x16 | ExtractLaneUVecI8x16 | ExtractLaneSVecI16x8
            | ExtractLaneUVecI16x8 | ExtractLaneVecI32x4 => Type::I32,
            ExtractLaneVecI64x2 => Type::I64,
            ExtractLaneVecF32x4 => Type::F32,
            ExtractLaneVecF64x2 => Type::F64,
        }
    }
}

/// SIMD lane replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdReplaceOp {
    ReplaceLaneVecI8x16,
    ReplaceLaneVecI16x8,
    ReplaceLaneVecI32x4,
    ReplaceLaneVecI64x2,
    ReplaceLaneVecF32x4,
    ReplaceLaneVecF64x2,
}

/// SIMD lane shifts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdShiftOp {
    ShlVecI8x16,
    ShrSVecI8x16,
    ShrUVecI8x16,
    ShlVecI16x8,
    ShrSVecI16x8,
    ShrUVecI16x8,
    ShlVecI32x4,
    ShrSVecI32x4,
    ShrUVecI32x4,
    ShlVecI64x2,
    ShrSVecI64x2,
    ShrUVecI64x2,
}

/// SIMD loads that widen, splat or zero-extend into a vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdLoadOp {
    LoadSplatVec8x16,
    LoadSplatVec16x8,
    LoadSplatVec32x4,
    LoadSplatVec64x2,
    LoadExtSVec8x8ToVecI16x8,
    LoadExtUVec8x8ToVecI16x8,
    LoadExtSVec16x4ToVecI32x4,
    LoadExtUVec16x4ToVecI32x4,
    LoadExtSVec32x2ToVecI64x2,
    LoadExtUVec32x2ToVecI64x2,
    Load32Zero,
    Load64Zero,
}

impl SimdLoadOp {
    /// How many bytes the load touches in linear memory
    pub fn mem_bytes(&self) -> u8 {
        use SimdLoadOp::*;
        match self {
            LoadSplatVec8x16 => 1,
            LoadSplatVec16x8 => 2,
            LoadSplatVec32x4 | Load32Zero => 4,
            LoadSplatVec64x2
            | LoadExtSVec8x8ToVecI16x8
            | LoadExtUVec8x8ToVecI16x8
            | LoadExtSVec16x4ToVecI32x4
            | LoadExtUVec16x4ToVecI32x4
            | LoadExtSVec32x2ToVecI64x2
            | LoadExtUVec32x2ToVecI64x2
            | Load64Zero => 8,
        }
    }
}

/// SIMD three-operand operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdTernaryOp {
    Bitselect,
    QFMAF32x4,
    QFMSF32x4,
    QFMAF64x2,
    QFMSF64x2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_result_types() {
        assert_eq!(UnaryOp::ClzInt32.result_type(), Type::I32);
        assert_eq!(UnaryOp::SqrtFloat64.result_type(), Type::F64);
        assert_eq!(UnaryOp::WrapInt64.result_type(), Type::I32);
        assert_eq!(UnaryOp::PromoteFloat32.result_type(), Type::F64);
        assert_eq!(UnaryOp::SplatVecI8x16.result_type(), Type::V128);
        assert_eq!(UnaryOp::AllTrueVecI32x4.result_type(), Type::I32);
    }

    #[test]
    fn test_relational_classification() {
        assert!(UnaryOp::EqZInt32.is_relational());
        assert!(!UnaryOp::ClzInt32.is_relational());
        assert!(BinaryOp::LtSInt32.is_relational());
        assert!(BinaryOp::GeFloat64.is_relational());
        assert!(!BinaryOp::AddInt32.is_relational());
        // SIMD comparisons yield a v128 mask, not an i32
        assert!(!BinaryOp::EqVecI8x16.is_relational());
    }

    #[test]
    fn test_simd_helpers() {
        assert_eq!(SimdExtractOp::ExtractLaneUVecI16x8.lane_type(), Type::I32);
        assert_eq!(SimdExtractOp::ExtractLaneVecF64x2.lane_type(), Type::F64);
        assert_eq!(SimdLoadOp::LoadSplatVec8x16.mem_bytes(), 1);
        assert_eq!(SimdLoadOp::LoadExtSVec32x2ToVecI64x2.mem_bytes(), 8);
    }
}
