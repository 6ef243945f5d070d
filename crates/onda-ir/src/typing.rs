//! Type finalization
//!
//! Each node kind has a rule that (re)computes the node's output type from
//! its current children. Builders call [`finalize`] as children settle;
//! passes that mutate a subtree must re-finalize affected ancestors before
//! relying on their types.
//!
//! The general law: a type is a concrete value type, `none`, or
//! `unreachable` - the last meaning control never returns normally from the
//! expression. `unreachable` operands propagate upward. When several types
//! can flow to the same point (a named block's branches, an if's arms),
//! `unreachable` is the identity of the merge and disagreeing concrete
//! types poison the result to `none` for the validator to reject.
//!
//! Finalization never fails for well-formed children of implemented kinds;
//! the typed-aggregate placeholders report [`IrError::Unimplemented`].

use crate::arena::{ExprArena, ExprId};
use crate::expr::*;
use onda_error::{IrError, Result};
use onda_types::Type;

/// Recomputes the output type of `id` from its children
pub fn finalize(arena: &mut ExprArena, id: ExprId) -> Result<()> {
    let ty = compute_type(arena, id)?;
    arena[id].ty = ty;
    Ok(())
}

/// Known-type variant: trusts `ty` (which an explicitly typed encoding
/// supplies) and only does the work of deciding whether the node is in fact
/// unreachable
pub fn finalize_with(arena: &mut ExprArena, id: ExprId, ty: Type) -> Result<()> {
    let ty = match &arena[id].kind {
        ExprKind::Block(block) => known_block_type(arena, block, ty, None),
        ExprKind::If(e) => {
            let cond_diverges = arena[e.condition].ty.is_unreachable();
            let arms_diverge = match e.if_false {
                Some(if_false) => {
                    arena[e.if_true].ty.is_unreachable() && arena[if_false].ty.is_unreachable()
                }
                None => false,
            };
            if ty.is_none() && (cond_diverges || arms_diverge) {
                Type::Unreachable
            } else {
                ty
            }
        }
        ExprKind::Loop(e) => {
            if ty.is_none() && arena[e.body].ty.is_unreachable() {
                Type::Unreachable
            } else {
                ty
            }
        }
        ExprKind::Try(e) => {
            if ty.is_none()
                && arena[e.body].ty.is_unreachable()
                && arena[e.catch_body].ty.is_unreachable()
            {
                Type::Unreachable
            } else {
                ty
            }
        }
        _ => ty,
    };
    arena[id].ty = ty;
    Ok(())
}

/// Block variant for callers that already know both the type and whether
/// anything branches to the block; skips the subtree scan entirely
pub fn finalize_block_with_break(arena: &mut ExprArena, id: ExprId, ty: Type, has_break: bool) {
    let ty = match &arena[id].kind {
        ExprKind::Block(block) => known_block_type(arena, block, ty, Some(has_break)),
        other => panic!("finalize_block_with_break on {}", other.kind().name()),
    };
    arena[id].ty = ty;
}

/// A tee is a `LocalSet` whose output is the stored value
pub fn is_tee(arena: &ExprArena, id: ExprId) -> bool {
    arena[id].is::<LocalSet>() && !arena[id].ty.is_none()
}

pub fn make_tee(arena: &mut ExprArena, id: ExprId, ty: Type) {
    debug_assert!(arena[id].is::<LocalSet>());
    arena[id].ty = ty;
}

pub fn make_set(arena: &mut ExprArena, id: ExprId) {
    debug_assert!(arena[id].is::<LocalSet>());
    arena[id].ty = Type::None;
}

fn compute_type(arena: &ExprArena, id: ExprId) -> Result<Type> {
    let expr = &arena[id];
    let unreachable = |child: ExprId| arena[child].ty.is_unreachable();

    let ty = match &expr.kind {
        ExprKind::Nop(_) => Type::None,
        ExprKind::Block(block) => block_type(arena, block),
        ExprKind::If(e) => {
            let ty = match e.if_false {
                Some(if_false) => merge_arms(&arena[e.if_true].ty, &arena[if_false].ty),
                None => Type::None,
            };
            // the arms' value survives a diverging condition; a valueless if
            // does not
            if ty.is_none() && unreachable(e.condition) {
                Type::Unreachable
            } else {
                ty
            }
        }
        // a loop's label marks its start, so no branch delivers a value to
        // the loop itself; its type is its body's
        ExprKind::Loop(e) => arena[e.body].ty.clone(),
        // control diverts outward and never returns to this position
        ExprKind::Break(_)
        | ExprKind::Switch(_)
        | ExprKind::Return(_)
        | ExprKind::Unreachable(_)
        | ExprKind::Throw(_)
        | ExprKind::Rethrow(_) => Type::Unreachable,
        ExprKind::Call(e) => {
            if e.is_return || e.operands.iter().any(|&o| unreachable(o)) {
                Type::Unreachable
            } else {
                // the base type comes from the callee's signature, known at
                // construction
                expr.ty.clone()
            }
        }
        ExprKind::CallIndirect(e) => {
            if e.is_return || unreachable(e.target) || e.operands.iter().any(|&o| unreachable(o)) {
                Type::Unreachable
            } else {
                e.sig.results.clone()
            }
        }
        // type fixed at creation from the local's declared type
        ExprKind::LocalGet(_) => expr.ty.clone(),
        ExprKind::LocalSet(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else if !expr.ty.is_none() {
                // a tee passes the stored value through
                arena[e.value].ty.clone()
            } else {
                Type::None
            }
        }
        ExprKind::GlobalGet(_) => expr.ty.clone(),
        ExprKind::GlobalSet(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        // the loaded type is fixed at creation and cannot be inferred
        ExprKind::Load(e) => {
            if unreachable(e.ptr) {
                Type::Unreachable
            } else {
                expr.ty.clone()
            }
        }
        ExprKind::Store(e) => {
            if unreachable(e.ptr) || unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        ExprKind::MemorySize(e) => e.ptr_ty.clone(),
        ExprKind::MemoryGrow(e) => {
            if unreachable(e.delta) {
                Type::Unreachable
            } else {
                e.ptr_ty.clone()
            }
        }
        ExprKind::MemoryInit(e) => {
            if unreachable(e.dest) || unreachable(e.offset) || unreachable(e.size) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        ExprKind::DataDrop(_) => Type::None,
        ExprKind::MemoryCopy(e) => {
            if unreachable(e.dest) || unreachable(e.source) || unreachable(e.size) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        ExprKind::MemoryFill(e) => {
            if unreachable(e.dest) || unreachable(e.value) || unreachable(e.size) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        ExprKind::AtomicRmw(e) => {
            if unreachable(e.ptr) || unreachable(e.value) {
                Type::Unreachable
            } else {
                arena[e.value].ty.clone()
            }
        }
        ExprKind::AtomicCmpxchg(e) => {
            if unreachable(e.ptr) || unreachable(e.expected) || unreachable(e.replacement) {
                Type::Unreachable
            } else {
                arena[e.expected].ty.clone()
            }
        }
        ExprKind::AtomicWait(e) => {
            if unreachable(e.ptr) || unreachable(e.expected) || unreachable(e.timeout) {
                Type::Unreachable
            } else {
                Type::I32
            }
        }
        ExprKind::AtomicNotify(e) => {
            if unreachable(e.ptr) || unreachable(e.notify_count) {
                Type::Unreachable
            } else {
                Type::I32
            }
        }
        ExprKind::AtomicFence(_) => Type::None,
        ExprKind::SimdExtract(e) => {
            if unreachable(e.vec) {
                Type::Unreachable
            } else {
                e.op.lane_type()
            }
        }
        ExprKind::SimdReplace(e) => {
            if unreachable(e.vec) || unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::V128
            }
        }
        ExprKind::SimdShuffle(e) => {
            if unreachable(e.left) || unreachable(e.right) {
                Type::Unreachable
            } else {
                Type::V128
            }
        }
        ExprKind::SimdTernary(e) => {
            if unreachable(e.a) || unreachable(e.b) || unreachable(e.c) {
                Type::Unreachable
            } else {
                Type::V128
            }
        }
        ExprKind::SimdShift(e) => {
            if unreachable(e.vec) || unreachable(e.shift) {
                Type::Unreachable
            } else {
                Type::V128
            }
        }
        ExprKind::SimdLoad(e) => {
            if unreachable(e.ptr) {
                Type::Unreachable
            } else {
                Type::V128
            }
        }
        ExprKind::Const(e) => e.value.ty(),
        ExprKind::Unary(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else {
                e.op.result_type()
            }
        }
        ExprKind::Binary(e) => {
            if unreachable(e.left) || unreachable(e.right) {
                Type::Unreachable
            } else if e.op.is_relational() {
                Type::I32
            } else {
                // the type of the operands, except for relationals
                arena[e.left].ty.clone()
            }
        }
        ExprKind::Select(e) => {
            if unreachable(e.if_true) || unreachable(e.if_false) || unreachable(e.condition) {
                Type::Unreachable
            } else {
                merge_arms(&arena[e.if_true].ty, &arena[e.if_false].ty)
            }
        }
        ExprKind::Drop(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::None
            }
        }
        // type fixed at creation: the implicit value the current block
        // receives
        ExprKind::Pop(_) => expr.ty.clone(),
        ExprKind::RefNull(_) => Type::Nullref,
        ExprKind::RefIsNull(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::I32
            }
        }
        ExprKind::RefFunc(_) => Type::Funcref,
        ExprKind::RefEq(e) => {
            if unreachable(e.left) || unreachable(e.right) {
                Type::Unreachable
            } else {
                Type::I32
            }
        }
        ExprKind::Try(e) => merge_arms(&arena[e.body].ty, &arena[e.catch_body].ty),
        // when the branch is not taken, the exnref flows out
        ExprKind::BrOnExn(e) => {
            if unreachable(e.exnref) {
                Type::Unreachable
            } else {
                Type::Exnref
            }
        }
        ExprKind::TupleMake(e) => {
            if e.operands.iter().any(|&o| unreachable(o)) {
                Type::Unreachable
            } else {
                Type::tuple(
                    e.operands
                        .iter()
                        .map(|&o| arena[o].ty.clone())
                        .collect(),
                )
            }
        }
        ExprKind::TupleExtract(e) => {
            if unreachable(e.tuple) {
                Type::Unreachable
            } else {
                let components = arena[e.tuple].ty.components();
                components
                    .get(e.index as usize)
                    .unwrap_or_else(|| {
                        panic!("tuple.extract index {} out of bounds", e.index)
                    })
                    .clone()
            }
        }
        ExprKind::I31New(e) => {
            if unreachable(e.value) {
                Type::Unreachable
            } else {
                Type::I31ref
            }
        }
        ExprKind::I31Get(e) => {
            if unreachable(e.i31) {
                Type::Unreachable
            } else {
                Type::I32
            }
        }
        ExprKind::RefTest(_)
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
        | ExprKind::ArrayLen(_) => {
            return Err(IrError::Unimplemented(expr.kind.kind().name()));
        }
    };
    Ok(ty)
}

/// Merge of two arm types: `unreachable` is the identity, disagreeing
/// concrete types poison to `none`
fn merge_arms(a: &Type, b: &Type) -> Type {
    if a == b {
        a.clone()
    } else if a.is_unreachable() {
        b.clone()
    } else if b.is_unreachable() {
        a.clone()
    } else {
        Type::None
    }
}

/// Merge of every type that can flow to one point
fn merge_types(types: Vec<Type>) -> Type {
    let mut merged = Type::Unreachable;
    for ty in types {
        if merged.is_none() {
            break;
        }
        if ty.is_unreachable() {
            continue;
        }
        if merged.is_unreachable() {
            merged = ty;
        } else if merged != ty {
            merged = Type::None;
        }
    }
    merged
}

fn block_type(arena: &ExprArena, block: &Block) -> Type {
    if block.list.is_empty() {
        return Type::None;
    }
    match &block.name {
        // nothing can branch here, so the type is whatever flows out the end
        None => fallthrough_type(arena, &block.list),
        Some(name) => {
            let mut candidates = Vec::new();
            for &child in &block.list {
                collect_branch_types(arena, child, name, &mut candidates);
            }
            candidates.push(fallthrough_type(arena, &block.list));
            merge_types(candidates)
        }
    }
}

/// The type flowing out of a nonempty statement sequence at its end: the
/// last statement's type, unless an earlier statement already diverges
fn fallthrough_type(arena: &ExprArena, list: &[ExprId]) -> Type {
    if list.iter().any(|&child| arena[child].ty.is_unreachable()) {
        return Type::Unreachable;
    }
    arena[*list.last().unwrap()].ty.clone()
}

fn known_block_type(
    arena: &ExprArena,
    block: &Block,
    ty: Type,
    has_break: Option<bool>,
) -> Type {
    if !ty.is_none() || block.list.is_empty() {
        return ty;
    }
    let has_break = has_break.unwrap_or_else(|| match &block.name {
        Some(name) => block
            .list
            .iter()
            .any(|&child| branches_to(arena, child, name)),
        None => false,
    });
    if !has_break && block.list.iter().any(|&child| arena[child].ty.is_unreachable()) {
        return Type::Unreachable;
    }
    ty
}

/// Collects the types every branch targeting `target` would send, walking
/// the subtree at `id`. An inner Block or Loop with the same name shadows
/// the target, so its subtree is skipped.
fn collect_branch_types(arena: &ExprArena, id: ExprId, target: &str, out: &mut Vec<Type>) {
    let kind = &arena[id].kind;
    match kind {
        ExprKind::Block(b) if b.name.as_deref() == Some(target) => return,
        ExprKind::Loop(l) if l.name.as_deref() == Some(target) => return,
        ExprKind::Break(b) if b.name == target => {
            out.push(match b.value {
                Some(value) => arena[value].ty.clone(),
                None => Type::None,
            });
        }
        ExprKind::Switch(s) if s.default == target || s.targets.iter().any(|t| t == target) => {
            out.push(match s.value {
                Some(value) => arena[value].ty.clone(),
                None => Type::None,
            });
        }
        ExprKind::BrOnExn(b) if b.name == target => out.push(b.sent.clone()),
        _ => {}
    }
    kind.for_each_child(|child| collect_branch_types(arena, child, target, out));
}

/// Whether anything in the subtree at `id` branches to `target`
fn branches_to(arena: &ExprArena, id: ExprId, target: &str) -> bool {
    let kind = &arena[id].kind;
    match kind {
        ExprKind::Block(b) if b.name.as_deref() == Some(target) => return false,
        ExprKind::Loop(l) if l.name.as_deref() == Some(target) => return false,
        ExprKind::Break(b) if b.name == target => return true,
        ExprKind::Switch(s) if s.default == target || s.targets.iter().any(|t| t == target) => {
            return true;
        }
        ExprKind::BrOnExn(b) if b.name == target => return true,
        _ => {}
    }
    let mut found = false;
    kind.for_each_child(|child| {
        if !found {
            found = branches_to(arena, child, target);
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{BinaryOp, UnaryOp};
    use onda_types::Literal;

    fn alloc_finalized(arena: &mut ExprArena, kind: impl Into<ExprKind>) -> ExprId {
        let id = arena.alloc(kind);
        finalize(arena, id).unwrap();
        id
    }

    fn i32_const(arena: &mut ExprArena, v: i32) -> ExprId {
        alloc_finalized(
            arena,
            Const {
                value: Literal::I32(v),
            },
        )
    }

    fn i64_const(arena: &mut ExprArena, v: i64) -> ExprId {
        alloc_finalized(
            arena,
            Const {
                value: Literal::I64(v),
            },
        )
    }

    #[test]
    fn test_empty_block_is_none() {
        let mut arena = ExprArena::new();
        let block = alloc_finalized(&mut arena, Block::default());
        assert_eq!(arena[block].ty, Type::None);
    }

    #[test]
    fn test_block_of_return_is_unreachable() {
        let mut arena = ExprArena::new();
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: None,
                list: vec![ret],
            },
        );
        assert_eq!(arena[block].ty, Type::Unreachable);
    }

    #[test]
    fn test_block_takes_last_reachable_type() {
        let mut arena = ExprArena::new();
        let nop = alloc_finalized(&mut arena, Nop);
        let c = i32_const(&mut arena, 2);
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: None,
                list: vec![nop, c],
            },
        );
        assert_eq!(arena[block].ty, Type::I32);
    }

    #[test]
    fn test_block_diverging_before_last_is_unreachable() {
        let mut arena = ExprArena::new();
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let c = i32_const(&mut arena, 2);
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: None,
                list: vec![ret, c],
            },
        );
        assert_eq!(arena[block].ty, Type::Unreachable);
    }

    #[test]
    fn test_named_block_merges_break_values() {
        let mut arena = ExprArena::new();
        let v = i32_const(&mut arena, 1);
        let br = alloc_finalized(
            &mut arena,
            Break {
                name: "l".to_string(),
                value: Some(v),
                condition: None,
            },
        );
        let tail = i32_const(&mut arena, 2);
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: Some("l".to_string()),
                list: vec![br, tail],
            },
        );
        // the break sends an i32 and the fallthrough is diverged past, so
        // the merge is i32
        assert_eq!(arena[block].ty, Type::I32);
    }

    #[test]
    fn test_named_block_valueless_break_is_none() {
        let mut arena = ExprArena::new();
        let br = alloc_finalized(
            &mut arena,
            Break {
                name: "l".to_string(),
                value: None,
                condition: None,
            },
        );
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: Some("l".to_string()),
                list: vec![br],
            },
        );
        assert_eq!(arena[block].ty, Type::None);
    }

    #[test]
    fn test_inner_block_shadows_branch_target() {
        let mut arena = ExprArena::new();
        let v = i32_const(&mut arena, 1);
        let br = alloc_finalized(
            &mut arena,
            Break {
                name: "l".to_string(),
                value: Some(v),
                condition: None,
            },
        );
        let inner = alloc_finalized(
            &mut arena,
            Block {
                name: Some("l".to_string()),
                list: vec![br],
            },
        );
        assert_eq!(arena[inner].ty, Type::I32);

        // the outer block with the same name must not see the inner break,
        // so its type comes from its own fallthrough
        let tail = i64_const(&mut arena, 7);
        let outer = alloc_finalized(
            &mut arena,
            Block {
                name: Some("l".to_string()),
                list: vec![inner, tail],
            },
        );
        assert_eq!(arena[outer].ty, Type::I64);
    }

    #[test]
    fn test_diverting_nodes_are_unreachable_regardless_of_operands() {
        let mut arena = ExprArena::new();
        let v = i32_const(&mut arena, 1);
        let cond = i32_const(&mut arena, 0);

        let br = alloc_finalized(
            &mut arena,
            Break {
                name: "l".to_string(),
                value: Some(v),
                condition: Some(cond),
            },
        );
        assert_eq!(arena[br].ty, Type::Unreachable);

        let v = i32_const(&mut arena, 1);
        let cond = i32_const(&mut arena, 0);
        let sw = alloc_finalized(
            &mut arena,
            Switch {
                targets: vec!["a".to_string()],
                default: "b".to_string(),
                condition: cond,
                value: Some(v),
            },
        );
        assert_eq!(arena[sw].ty, Type::Unreachable);

        let v = i32_const(&mut arena, 1);
        let ret = alloc_finalized(&mut arena, Return { value: Some(v) });
        assert_eq!(arena[ret].ty, Type::Unreachable);
    }

    #[test]
    fn test_if_without_else_is_none() {
        let mut arena = ExprArena::new();
        let cond = i32_const(&mut arena, 1);
        let then = i32_const(&mut arena, 2);
        let if_ = alloc_finalized(
            &mut arena,
            If {
                condition: cond,
                if_true: then,
                if_false: None,
            },
        );
        // the then-branch's value is discarded
        assert_eq!(arena[if_].ty, Type::None);
    }

    #[test]
    fn test_if_with_diverging_condition_is_unreachable() {
        let mut arena = ExprArena::new();
        let cond = alloc_finalized(&mut arena, Unreachable);
        let then = alloc_finalized(&mut arena, Nop);
        let if_ = alloc_finalized(
            &mut arena,
            If {
                condition: cond,
                if_true: then,
                if_false: None,
            },
        );
        assert_eq!(arena[if_].ty, Type::Unreachable);
    }

    #[test]
    fn test_if_arm_merging() {
        let mut arena = ExprArena::new();
        let cond = i32_const(&mut arena, 1);

        let a = i32_const(&mut arena, 2);
        let b = i32_const(&mut arena, 3);
        let both = alloc_finalized(
            &mut arena,
            If {
                condition: cond,
                if_true: a,
                if_false: Some(b),
            },
        );
        assert_eq!(arena[both].ty, Type::I32);

        // a diverging arm does not constrain the result
        let cond = i32_const(&mut arena, 1);
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let b = i32_const(&mut arena, 3);
        let mixed = alloc_finalized(
            &mut arena,
            If {
                condition: cond,
                if_true: ret,
                if_false: Some(b),
            },
        );
        assert_eq!(arena[mixed].ty, Type::I32);

        let cond = i32_const(&mut arena, 1);
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let ret2 = alloc_finalized(&mut arena, Return { value: None });
        let diverging = alloc_finalized(
            &mut arena,
            If {
                condition: cond,
                if_true: ret,
                if_false: Some(ret2),
            },
        );
        assert_eq!(arena[diverging].ty, Type::Unreachable);
    }

    #[test]
    fn test_loop_follows_its_body() {
        let mut arena = ExprArena::new();
        let c = i32_const(&mut arena, 1);
        let looped = alloc_finalized(
            &mut arena,
            Loop {
                name: Some("top".to_string()),
                body: c,
            },
        );
        assert_eq!(arena[looped].ty, Type::I32);

        let ret = alloc_finalized(&mut arena, Return { value: None });
        let diverging = alloc_finalized(
            &mut arena,
            Loop {
                name: None,
                body: ret,
            },
        );
        assert_eq!(arena[diverging].ty, Type::Unreachable);
    }

    #[test]
    fn test_operator_typing() {
        let mut arena = ExprArena::new();
        let a = i64_const(&mut arena, 1);
        let b = i64_const(&mut arena, 2);

        let add = alloc_finalized(
            &mut arena,
            Binary {
                op: BinaryOp::AddInt64,
                left: a,
                right: b,
            },
        );
        assert_eq!(arena[add].ty, Type::I64);

        // relationals are i32 no matter the operand type
        let a = i64_const(&mut arena, 1);
        let b = i64_const(&mut arena, 2);
        let lt = alloc_finalized(
            &mut arena,
            Binary {
                op: BinaryOp::LtSInt64,
                left: a,
                right: b,
            },
        );
        assert_eq!(arena[lt].ty, Type::I32);

        let a = i64_const(&mut arena, 1);
        let eqz = alloc_finalized(
            &mut arena,
            Unary {
                op: UnaryOp::EqZInt64,
                value: a,
            },
        );
        assert_eq!(arena[eqz].ty, Type::I32);

        let a = i64_const(&mut arena, 1);
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let poisoned = alloc_finalized(
            &mut arena,
            Binary {
                op: BinaryOp::AddInt64,
                left: a,
                right: ret,
            },
        );
        assert_eq!(arena[poisoned].ty, Type::Unreachable);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut arena = ExprArena::new();
        let c = i32_const(&mut arena, 1);
        let br = alloc_finalized(
            &mut arena,
            Break {
                name: "l".to_string(),
                value: Some(c),
                condition: None,
            },
        );
        let block = alloc_finalized(
            &mut arena,
            Block {
                name: Some("l".to_string()),
                list: vec![br],
            },
        );
        let first = arena[block].ty.clone();
        finalize(&mut arena, block).unwrap();
        assert_eq!(arena[block].ty, first);
    }

    #[test]
    fn test_known_type_variants() {
        let mut arena = ExprArena::new();
        let ret = alloc_finalized(&mut arena, Return { value: None });
        let block = arena.alloc(Block {
            name: Some("l".to_string()),
            list: vec![ret],
        });

        // no break reaches the block, so a none annotation collapses to
        // unreachable
        finalize_with(&mut arena, block, Type::None).unwrap();
        assert_eq!(arena[block].ty, Type::Unreachable);

        // the caller vouching for a break keeps it at none
        finalize_block_with_break(&mut arena, block, Type::None, true);
        assert_eq!(arena[block].ty, Type::None);

        // a concrete annotation is trusted as-is
        finalize_with(&mut arena, block, Type::I32).unwrap();
        assert_eq!(arena[block].ty, Type::I32);
    }

    #[test]
    fn test_local_set_and_tee() {
        let mut arena = ExprArena::new();
        let v = i32_const(&mut arena, 5);
        let set = arena.alloc(LocalSet { index: 0, value: v });
        finalize(&mut arena, set).unwrap();
        assert_eq!(arena[set].ty, Type::None);
        assert!(!is_tee(&arena, set));

        make_tee(&mut arena, set, Type::I32);
        assert!(is_tee(&arena, set));
        finalize(&mut arena, set).unwrap();
        assert_eq!(arena[set].ty, Type::I32);

        make_set(&mut arena, set);
        finalize(&mut arena, set).unwrap();
        assert_eq!(arena[set].ty, Type::None);
    }

    #[test]
    fn test_tuple_typing() {
        let mut arena = ExprArena::new();
        let a = i32_const(&mut arena, 1);
        let b = i64_const(&mut arena, 2);
        let tuple = alloc_finalized(&mut arena, TupleMake {
            operands: vec![a, b],
        });
        assert_eq!(
            arena[tuple].ty,
            Type::tuple(vec![Type::I32, Type::I64])
        );

        let second = alloc_finalized(&mut arena, TupleExtract { tuple, index: 1 });
        assert_eq!(arena[second].ty, Type::I64);
    }

    #[test]
    fn test_aggregate_stubs_report_unimplemented() {
        let mut arena = ExprArena::new();
        let stub = arena.alloc(StructNew);
        assert_eq!(
            finalize(&mut arena, stub),
            Err(IrError::Unimplemented("struct.new"))
        );
    }

    #[test]
    fn test_select_and_drop() {
        let mut arena = ExprArena::new();
        let cond = i32_const(&mut arena, 1);
        let a = i64_const(&mut arena, 2);
        let b = i64_const(&mut arena, 3);
        let select = alloc_finalized(
            &mut arena,
            Select {
                if_true: a,
                if_false: b,
                condition: cond,
            },
        );
        assert_eq!(arena[select].ty, Type::I64);

        let value = i64_const(&mut arena, 4);
        let dropped = alloc_finalized(&mut arena, Drop { value });
        assert_eq!(arena[dropped].ty, Type::None);
    }
}
