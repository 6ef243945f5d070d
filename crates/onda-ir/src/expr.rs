//! The tagged expression hierarchy
//!
//! Expressions form a closed set of 63 node kinds. A node's kind is fixed
//! at construction; its output type is mutable and maintained by the
//! finalization rules in [`typing`](crate::typing). Children are referenced
//! by [`ExprId`] into the owning module's arena, so the overall structure is
//! a tree. The only non-tree links are the *names* carried by `Break`,
//! `Switch` and `BrOnExn`, which refer to an enclosing `Block` or `Loop`.
//!
//! Kind queries follow the format's three-operation contract: `is` (boolean
//! test), `dyn_cast` (checked, returns `None` on mismatch) and `cast`
//! (unchecked; a mismatch is a caller bug and panics).

use crate::arena::{ExprArena, ExprId};
use crate::ops::{
    AtomicRmwOp, BinaryOp, SimdExtractOp, SimdLoadOp, SimdReplaceOp, SimdShiftOp, SimdTernaryOp,
    UnaryOp,
};
use crate::{Address, Index};
use onda_types::{Literal, Signature, Type};

/// A node: the immutable kind tag plus the mutable output type
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    /// The type of the expression's *output*, not necessarily its inputs
    pub ty: Type,
}

impl Expression {
    /// The fieldless discriminant of this node
    pub fn id(&self) -> Kind {
        self.kind.kind()
    }

    /// The bytecode-format mnemonic of this node's kind
    pub fn name(&self) -> &'static str {
        self.id().name()
    }

    pub fn is<T: Specific>(&self) -> bool {
        self.id() == T::KIND
    }

    /// Checked downcast: `None` when the tag does not match
    pub fn dyn_cast<T: Specific>(&self) -> Option<&T> {
        T::downcast(&self.kind)
    }

    pub fn dyn_cast_mut<T: Specific>(&mut self) -> Option<&mut T> {
        T::downcast_mut(&mut self.kind)
    }

    /// Unchecked downcast. Panics when the tag does not match; that is a
    /// bug in the caller, not a data condition.
    pub fn cast<T: Specific>(&self) -> &T {
        match self.dyn_cast::<T>() {
            Some(inner) => inner,
            None => panic!(
                "cast of {} to {}",
                self.name(),
                T::KIND.name()
            ),
        }
    }

    pub fn cast_mut<T: Specific>(&mut self) -> &mut T {
        let name = self.name();
        match self.dyn_cast_mut::<T>() {
            Some(inner) => inner,
            None => panic!("cast of {} to {}", name, T::KIND.name()),
        }
    }
}

/// Implemented by every payload struct; ties it to its [`Kind`] tag
pub trait Specific: Sized {
    const KIND: Kind;
    fn downcast(kind: &ExprKind) -> Option<&Self>;
    fn downcast_mut(kind: &mut ExprKind) -> Option<&mut Self>;
}

// Control flow

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nop;

/// A sequence of expressions with an optional label. Branches targeting the
/// label jump past the block's end.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub name: Option<String>,
    pub list: Vec<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: ExprId,
    pub if_true: ExprId,
    pub if_false: Option<ExprId>,
}

/// A labelled body; branches targeting the label jump back to the loop's
/// *start*, so the label never carries a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub name: Option<String>,
    pub body: ExprId,
}

/// Branch to an enclosing block or loop, optionally conditional and
/// optionally carrying a value
#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub name: String,
    pub value: Option<ExprId>,
    pub condition: Option<ExprId>,
}

/// Multi-way branch on an index, with a default target
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub targets: Vec<String>,
    pub default: String,
    pub condition: ExprId,
    pub value: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Return {
    pub value: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unreachable;

// Calls

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: String,
    pub operands: Vec<ExprId>,
    pub is_return: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallIndirect {
    pub sig: Signature,
    pub target: ExprId,
    pub operands: Vec<ExprId>,
    pub is_return: bool,
}

// Variable access

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalGet {
    pub index: Index,
}

/// Covers both plain sets and tees; a tee is a set whose output type is the
/// stored value's type (see `is_tee`/`make_tee`/`make_set` on
/// [`Expression`]-level helpers in `typing`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSet {
    pub index: Index,
    pub value: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalGet {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSet {
    pub name: String,
    pub value: ExprId,
}

// Memory access

/// The loaded type is fixed at creation; it cannot be inferred from the
/// operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Load {
    pub bytes: u8,
    pub signed: bool,
    pub offset: Address,
    pub align: Address,
    pub atomic: bool,
    pub ptr: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub bytes: u8,
    pub offset: Address,
    pub align: Address,
    pub atomic: bool,
    pub ptr: ExprId,
    pub value: ExprId,
    pub value_ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemorySize {
    pub ptr_ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGrow {
    pub delta: ExprId,
    pub ptr_ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInit {
    pub segment: Index,
    pub dest: ExprId,
    pub offset: ExprId,
    pub size: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDrop {
    pub segment: Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCopy {
    pub dest: ExprId,
    pub source: ExprId,
    pub size: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFill {
    pub dest: ExprId,
    pub value: ExprId,
    pub size: ExprId,
}

// Atomics

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicRmw {
    pub op: AtomicRmwOp,
    pub bytes: u8,
    pub offset: Address,
    pub ptr: ExprId,
    pub value: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicCmpxchg {
    pub bytes: u8,
    pub offset: Address,
    pub ptr: ExprId,
    pub expected: ExprId,
    pub replacement: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomicWait {
    pub offset: Address,
    pub ptr: ExprId,
    pub expected: ExprId,
    pub timeout: ExprId,
    pub expected_ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicNotify {
    pub offset: Address,
    pub ptr: ExprId,
    pub notify_count: ExprId,
}

/// Only sequentially consistent ordering exists today; the order byte is
/// reserved and currently zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomicFence {
    pub order: u8,
}

// SIMD

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdExtract {
    pub op: SimdExtractOp,
    pub vec: ExprId,
    pub index: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdReplace {
    pub op: SimdReplaceOp,
    pub vec: ExprId,
    pub index: u8,
    pub value: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdShuffle {
    pub left: ExprId,
    pub right: ExprId,
    pub mask: [u8; 16],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdTernary {
    pub op: SimdTernaryOp,
    pub a: ExprId,
    pub b: ExprId,
    pub c: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdShift {
    pub op: SimdShiftOp,
    pub vec: ExprId,
    pub shift: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdLoad {
    pub op: SimdLoadOp,
    pub offset: Address,
    pub align: Address,
    pub ptr: ExprId,
}

// Numeric

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unary {
    pub op: UnaryOp,
    pub value: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: ExprId,
    pub right: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Select {
    pub if_true: ExprId,
    pub if_false: ExprId,
    pub condition: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drop {
    pub value: ExprId,
}

// References and exception handling

/// A value that arrives as an implicit argument to the current block;
/// used by exception handling. Its type is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefNull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefIsNull {
    pub value: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefFunc {
    pub func: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefEq {
    pub left: ExprId,
    pub right: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Try {
    pub body: ExprId,
    pub catch_body: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Throw {
    pub event: String,
    pub operands: Vec<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rethrow {
    pub exnref: ExprId,
}

/// Branch to `name` when the exception matches `event`, sending the
/// event's payload; otherwise the exnref flows out
#[derive(Debug, Clone, PartialEq)]
pub struct BrOnExn {
    pub name: String,
    pub event: String,
    pub exnref: ExprId,
    /// The type sent to the target block when the branch is taken. This
    /// duplicates the event's signature so typing needs no module context.
    pub sent: Type,
}

// Tuples

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TupleMake {
    pub operands: Vec<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleExtract {
    pub tuple: ExprId,
    pub index: Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I31New {
    pub value: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I31Get {
    pub i31: ExprId,
    pub signed: bool,
}

// Typed-aggregate and RTT placeholders. Finalizing one reports
// `IrError::Unimplemented` so callers can reject the module.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefTest;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefCast;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrOnCast;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RttCanon;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RttSub;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructNew;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructGet;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructSet;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayNew;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayGet;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArraySet;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayLen;

macro_rules! expressions {
    ($( $name:ident => $mnemonic:literal, )*) => {
        /// The closed set of node kinds, with payloads
        #[derive(Debug, Clone, PartialEq)]
        pub enum ExprKind {
            $( $name($name), )*
        }

        /// Fieldless discriminant of [`ExprKind`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Kind {
            $( $name, )*
        }

        impl ExprKind {
            pub fn kind(&self) -> Kind {
                match self {
                    $( ExprKind::$name(_) => Kind::$name, )*
                }
            }
        }

        impl Kind {
            /// The bytecode-format mnemonic of this kind
            pub fn name(self) -> &'static str {
                match self {
                    $( Kind::$name => $mnemonic, )*
                }
            }
        }

        $(
            impl Specific for $name {
                const KIND: Kind = Kind::$name;

                fn downcast(kind: &ExprKind) -> Option<&Self> {
                    match kind {
                        ExprKind::$name(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn downcast_mut(kind: &mut ExprKind) -> Option<&mut Self> {
                    match kind {
                        ExprKind::$name(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$name> for ExprKind {
                fn from(payload: $name) -> ExprKind {
                    ExprKind::$name(payload)
                }
            }
        )*
    };
}

expressions! {
    Nop => "nop",
    Block => "block",
    If => "if",
    Loop => "loop",
    Break => "br",
    Switch => "br_table",
    Return => "return",
    Unreachable => "unreachable",
    Call => "call",
    CallIndirect => "call_indirect",
    LocalGet => "local.get",
    LocalSet => "local.set",
    GlobalGet => "global.get",
    GlobalSet => "global.set",
    Load => "load",
    Store => "store",
    MemorySize => "memory.size",
    MemoryGrow => "memory.grow",
    MemoryInit => "memory.init",
    DataDrop => "data.drop",
    MemoryCopy => "memory.copy",
    MemoryFill => "memory.fill",
    AtomicRmw => "atomic.rmw",
    AtomicCmpxchg => "atomic.cmpxchg",
    AtomicWait => "atomic.wait",
    AtomicNotify => "atomic.notify",
    AtomicFence => "atomic.fence",
    SimdExtract => "simd.extract",
    SimdReplace => "simd.replace",
    SimdShuffle => "simd.shuffle",
    SimdTernary => "simd.ternary",
    SimdShift => "simd.shift",
    SimdLoad => "simd.load",
    Const => "const",
    Unary => "unary",
    Binary => "binary",
    Select => "select",
    Drop => "drop",
    Pop => "pop",
    RefNull => "ref.null",
    RefIsNull => "ref.is_null",
    RefFunc => "ref.func",
    RefEq => "ref.eq",
    Try => "try",
    Throw => "throw",
    Rethrow => "rethrow",
    BrOnExn => "br_on_exn",
    TupleMake => "tuple.make",
    TupleExtract => "tuple.extract",
    I31New => "i31.new",
    I31Get => "i31.get",
    RefTest => "ref.test",
    RefCast => "ref.cast",
    BrOnCast => "br_on_cast",
    RttCanon => "rtt.canon",
    RttSub => "rtt.sub",
    StructNew => "struct.new",
    StructGet => "struct.get",
    StructSet => "struct.set",
    ArrayNew => "array.new",
    ArrayGet => "array.get",
    ArraySet => "array.set",
    ArrayLen => "array.len",
}

impl ExprKind {
    /// The type a freshly constructed node of this kind starts with, before
    /// finalization. Diverting kinds are born `unreachable`; memory size
    /// queries are born with their pointer type.
    pub fn initial_type(&self) -> Type {
        match self {
            ExprKind::Break(_)
            | ExprKind::Switch(_)
            | ExprKind::Return(_)
            | ExprKind::BrOnExn(_)
            | ExprKind::Unreachable(_)
            | ExprKind::Throw(_)
            | ExprKind::Rethrow(_) => Type::Unreachable,
            ExprKind::MemorySize(e) => e.ptr_ty.clone(),
            ExprKind::MemoryGrow(e) => e.ptr_ty.clone(),
            _ => Type::None,
        }
    }

    /// Invokes `f` on each direct child, in execution order
    pub fn for_each_child(&self, mut f: impl FnMut(ExprId)) {
        match self {
            ExprKind::Nop(_)
            | ExprKind::Unreachable(_)
            | ExprKind::LocalGet(_)
            | ExprKind::GlobalGet(_)
            | ExprKind::Const(_)
            | ExprKind::MemorySize(_)
            | ExprKind::DataDrop(_)
            | ExprKind::AtomicFence(_)
            | ExprKind::Pop(_)
            | ExprKind::RefNull(_)
            | ExprKind::RefFunc(_)
            | ExprKind::RefTest(_)
            | ExprKind::RefCast(_)
            | ExprKind::BrOnCast(_)
            | ExprKind::RttCanon(_)
            | ExprKind::RttSub(_)
            | ExprKind::StructNew(_)
            | ExprKind::StructGet(_)
            | ExprKind::StructSet(_)
            | ExprKind::ArrayNew(_)
            | ExprKind::ArrayGet(_)
            | ExprKind::ArraySet(_)
            | ExprKind::ArrayLen(_) => {}
            ExprKind::Block(e) => {
                for &child in &e.list {
                    f(child);
                }
            }
            ExprKind::If(e) => {
                f(e.condition);
                f(e.if_true);
                if let Some(if_false) = e.if_false {
                    f(if_false);
                }
            }
            ExprKind::Loop(e) => f(e.body),
            ExprKind::Break(e) => {
                if let Some(value) = e.value {
                    f(value);
                }
                if let Some(condition) = e.condition {
                    f(condition);
                }
            }
            ExprKind::Switch(e) => {
                if let Some(value) = e.value {
                    f(value);
                }
                f(e.condition);
            }
            ExprKind::Return(e) => {
                if let Some(value) = e.value {
                    f(value);
                }
            }
            ExprKind::Call(e) => {
                for &operand in &e.operands {
                    f(operand);
                }
            }
            ExprKind::CallIndirect(e) => {
                for &operand in &e.operands {
                    f(operand);
                }
                f(e.target);
            }
            ExprKind::LocalSet(e) => f(e.value),
            ExprKind::GlobalSet(e) => f(e.value),
            ExprKind::Load(e) => f(e.ptr),
            ExprKind::Store(e) => {
                f(e.ptr);
                f(e.value);
            }
            ExprKind::MemoryGrow(e) => f(e.delta),
            ExprKind::MemoryInit(e) => {
                f(e.dest);
                f(e.offset);
                f(e.size);
            }
            ExprKind::MemoryCopy(e) => {
                f(e.dest);
                f(e.source);
                f(e.size);
            }
            ExprKind::MemoryFill(e) => {
                f(e.dest);
                f(e.value);
                f(e.size);
            }
            ExprKind::AtomicRmw(e) => {
                f(e.ptr);
                f(e.value);
            }
            ExprKind::AtomicCmpxchg(e) => {
                f(e.ptr);
                f(e.expected);
                f(e.replacement);
            }
            ExprKind::AtomicWait(e) => {
                f(e.ptr);
                f(e.expected);
                f(e.timeout);
            }
            ExprKind::AtomicNotify(e) => {
                f(e.ptr);
                f(e.notify_count);
            }
            ExprKind::SimdExtract(e) => f(e.vec),
            ExprKind::SimdReplace(e) => {
                f(e.vec);
                f(e.value);
            }
            ExprKind::SimdShuffle(e) => {
                f(e.left);
                f(e.right);
            }
            ExprKind::SimdTernary(e) => {
                f(e.a);
                f(e.b);
                f(e.c);
            }
            ExprKind::SimdShift(e) => {
                f(e.vec);
                f(e.shift);
            }
            ExprKind::SimdLoad(e) => f(e.ptr),
            ExprKind::Unary(e) => f(e.value),
            ExprKind::Binary(e) => {
                f(e.left);
                f(e.right);
            }
            ExprKind::Select(e) => {
                f(e.if_true);
                f(e.if_false);
                f(e.condition);
            }
            ExprKind::Drop(e) => f(e.value),
            ExprKind::RefIsNull(e) => f(e.value),
            ExprKind::RefEq(e) => {
                f(e.left);
                f(e.right);
            }
            ExprKind::Try(e) => {
                f(e.body);
                f(e.catch_body);
            }
            ExprKind::Throw(e) => {
                for &operand in &e.operands {
                    f(operand);
                }
            }
            ExprKind::Rethrow(e) => f(e.exnref),
            ExprKind::BrOnExn(e) => f(e.exnref),
            ExprKind::TupleMake(e) => {
                for &operand in &e.operands {
                    f(operand);
                }
            }
            ExprKind::TupleExtract(e) => f(e.tuple),
            ExprKind::I31New(e) => f(e.value),
            ExprKind::I31Get(e) => f(e.i31),
        }
    }

    /// Collects the direct children, in execution order
    pub fn children(&self) -> Vec<ExprId> {
        let mut out = Vec::new();
        self.for_each_child(|c| out.push(c));
        out
    }

    /// Invokes `f` on a mutable reference to each child slot, in execution
    /// order. Used by subtree copying and by passes that rewire children.
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut ExprId)) {
        match self {
            ExprKind::Nop(_)
            | ExprKind::Unreachable(_)
            | ExprKind::LocalGet(_)
            | ExprKind::GlobalGet(_)
            | ExprKind::Const(_)
            | ExprKind::MemorySize(_)
            | ExprKind::DataDrop(_)
            | ExprKind::AtomicFence(_)
            | ExprKind::Pop(_)
            | ExprKind::RefNull(_)
            | ExprKind::RefFunc(_)
            | ExprKind::RefTest(_)
            | ExprKind::RefCast(_)
            | ExprKind::BrOnCast(_)
            | ExprKind::RttCanon(_)
            | ExprKind::RttSub(_)
            | ExprKind::StructNew(_)
            | ExprKind::StructGet(_)
            | ExprKind::StructSet(_)
            | ExprKind::ArrayNew(_)
            | ExprKind::ArrayGet(_)
            | ExprKind::ArraySet(_)
            | ExprKind::ArrayLen(_) => {}
            ExprKind::Block(e) => {
                for child in &mut e.list {
                    f(child);
                }
            }
            ExprKind::If(e) => {
                f(&mut e.condition);
                f(&mut e.if_true);
                if let Some(if_false) = &mut e.if_false {
                    f(if_false);
                }
            }
            ExprKind::Loop(e) => f(&mut e.body),
            ExprKind::Break(e) => {
                if let Some(value) = &mut e.value {
                    f(value);
                }
                if let Some(condition) = &mut e.condition {
                    f(condition);
                }
            }
            ExprKind::Switch(e) => {
                if let Some(value) = &mut e.value {
                    f(value);
                }
                f(&mut e.condition);
            }
            ExprKind::Return(e) => {
                if let Some(value) = &mut e.value {
                    f(value);
                }
            }
            ExprKind::Call(e) => {
                for operand in &mut e.operands {
                    f(operand);
                }
            }
            ExprKind::CallIndirect(e) => {
                for operand in &mut e.operands {
                    f(operand);
                }
                f(&mut e.target);
            }
            ExprKind::LocalSet(e) => f(&mut e.value),
            ExprKind::GlobalSet(e) => f(&mut e.value),
            ExprKind::Load(e) => f(&mut e.ptr),
            ExprKind::Store(e) => {
                f(&mut e.ptr);
                f(&mut e.value);
            }
            ExprKind::MemoryGrow(e) => f(&mut e.delta),
            ExprKind::MemoryInit(e) => {
                f(&mut e.dest);
                f(&mut e.offset);
                f(&mut e.size);
            }
            ExprKind::MemoryCopy(e) => {
                f(&mut e.dest);
                f(&mut e.source);
                f(&mut e.size);
            }
            ExprKind::MemoryFill(e) => {
                f(&mut e.dest);
                f(&mut e.value);
                f(&mut e.size);
            }
            ExprKind::AtomicRmw(e) => {
                f(&mut e.ptr);
                f(&mut e.value);
            }
            ExprKind::AtomicCmpxchg(e) => {
                f(&mut e.ptr);
                f(&mut e.expected);
                f(&mut e.replacement);
            }
            ExprKind::AtomicWait(e) => {
                f(&mut e.ptr);
                f(&mut e.expected);
                f(&mut e.timeout);
            }
            ExprKind::AtomicNotify(e) => {
                f(&mut e.ptr);
                f(&mut e.notify_count);
            }
            ExprKind::SimdExtract(e) => f(&mut e.vec),
            ExprKind::SimdReplace(e) => {
                f(&mut e.vec);
                f(&mut e.value);
            }
            ExprKind::SimdShuffle(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            ExprKind::SimdTernary(e) => {
                f(&mut e.a);
                f(&mut e.b);
                f(&mut e.c);
            }
            ExprKind::SimdShift(e) => {
                f(&mut e.vec);
                f(&mut e.shift);
            }
            ExprKind::SimdLoad(e) => f(&mut e.ptr),
            ExprKind::Unary(e) => f(&mut e.value),
            ExprKind::Binary(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            ExprKind::Select(e) => {
                f(&mut e.if_true);
                f(&mut e.if_false);
                f(&mut e.condition);
            }
            ExprKind::Drop(e) => f(&mut e.value),
            ExprKind::RefIsNull(e) => f(&mut e.value),
            ExprKind::RefEq(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            ExprKind::Try(e) => {
                f(&mut e.body);
                f(&mut e.catch_body);
            }
            ExprKind::Throw(e) => {
                for operand in &mut e.operands {
                    f(operand);
                }
            }
            ExprKind::Rethrow(e) => f(&mut e.exnref),
            ExprKind::BrOnExn(e) => f(&mut e.exnref),
            ExprKind::TupleMake(e) => {
                for operand in &mut e.operands {
                    f(operand);
                }
            }
            ExprKind::TupleExtract(e) => f(&mut e.tuple),
            ExprKind::I31New(e) => f(&mut e.value),
            ExprKind::I31Get(e) => f(&mut e.i31),
        }
    }
}

/// Extracts the literal of an already-folded constant expression, or `None`
/// when the expression is not a recognized constant form
pub fn literal_of(arena: &ExprArena, id: ExprId) -> Option<Literal> {
    match &arena[id].kind {
        ExprKind::Const(c) => Some(c.value.clone()),
        ExprKind::RefNull(_) => Some(Literal::Null),
        ExprKind::RefFunc(r) => Some(Literal::Func(r.func.clone())),
        _ => None,
    }
}

/// Like [`literal_of`], but flattens a tuple of constant forms
pub fn literals_of(arena: &ExprArena, id: ExprId) -> Option<Vec<Literal>> {
    match &arena[id].kind {
        ExprKind::TupleMake(t) => t
            .operands
            .iter()
            .map(|&operand| literal_of(arena, operand))
            .collect(),
        _ => literal_of(arena, id).map(|lit| vec![lit]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn const_expr(v: i32) -> Expression {
        Expression {
            kind: ExprKind::Const(Const {
                value: Literal::I32(v),
            }),
            ty: Type::I32,
        }
    }

    #[test]
    fn test_kind_queries() {
        let expr = const_expr(3);
        assert_eq!(expr.id(), Kind::Const);
        assert!(expr.is::<Const>());
        assert!(!expr.is::<Nop>());
        assert!(!expr.is::<Binary>());

        assert!(expr.dyn_cast::<Const>().is_some());
        assert!(expr.dyn_cast::<Block>().is_none());
        assert_eq!(expr.cast::<Const>().value, Literal::I32(3));
    }

    #[test]
    #[should_panic(expected = "cast of const to block")]
    fn test_mismatched_cast_panics() {
        let expr = const_expr(0);
        let _ = expr.cast::<Block>();
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Kind::Block.name(), "block");
        assert_eq!(Kind::Switch.name(), "br_table");
        assert_eq!(Kind::StructNew.name(), "struct.new");
    }

    #[test]
    fn test_children_order() {
        let mut arena = ExprArena::new();
        let cond = arena.alloc(Nop);
        let if_true = arena.alloc(Nop);
        let if_false = arena.alloc(Nop);
        let kind = ExprKind::If(If {
            condition: cond,
            if_true,
            if_false: Some(if_false),
        });
        assert_eq!(kind.children(), vec![cond, if_true, if_false]);

        let kind = ExprKind::If(If {
            condition: cond,
            if_true,
            if_false: None,
        });
        assert_eq!(kind.children(), vec![cond, if_true]);
    }

    #[test]
    fn test_literal_extraction() {
        let mut arena = ExprArena::new();
        let c = arena.alloc(Const {
            value: Literal::I32(5),
        });
        let nop = arena.alloc(Nop);
        assert_eq!(literal_of(&arena, c), Some(Literal::I32(5)));
        assert_eq!(literal_of(&arena, nop), None);

        let c2 = arena.alloc(Const {
            value: Literal::from_f64(2.0),
        });
        let tuple = arena.alloc(TupleMake {
            operands: vec![c, c2],
        });
        assert_eq!(
            literals_of(&arena, tuple),
            Some(vec![Literal::I32(5), Literal::from_f64(2.0)])
        );

        let bad = arena.alloc(TupleMake {
            operands: vec![c, nop],
        });
        assert_eq!(literals_of(&arena, bad), None);
    }
}
