//! Bottom-up construction of expression trees
//!
//! A [`Builder`] wraps a module and offers one method per common node kind:
//! each allocates the node in the module's arena, wires the children, and
//! finalizes it, so types settle as the tree grows. Where a type cannot be
//! inferred (calls, loads, variable access) the caller supplies it.

use crate::arena::ExprId;
use crate::expr::*;
use crate::module::Module;
use crate::ops::{BinaryOp, UnaryOp};
use crate::typing;
use crate::{Address, Index};
use onda_error::Result;
use onda_types::{Literal, Signature, Type};

pub struct Builder<'a> {
    module: &'a mut Module,
}

impl<'a> Builder<'a> {
    pub fn new(module: &'a mut Module) -> Self {
        Self { module }
    }

    fn finish(&mut self, kind: impl Into<ExprKind>) -> Result<ExprId> {
        let id = self.module.arena.alloc(kind);
        typing::finalize(&mut self.module.arena, id)?;
        Ok(id)
    }

    /// Allocates a node whose type must be supplied rather than inferred
    fn finish_typed(&mut self, kind: impl Into<ExprKind>, ty: Type) -> Result<ExprId> {
        let id = self.module.arena.alloc(kind);
        self.module.arena[id].ty = ty;
        typing::finalize(&mut self.module.arena, id)?;
        Ok(id)
    }

    pub fn nop(&mut self) -> Result<ExprId> {
        self.finish(Nop)
    }

    pub fn const_(&mut self, value: Literal) -> Result<ExprId> {
        self.finish(Const { value })
    }

    pub fn block(&mut self, name: Option<&str>, list: Vec<ExprId>) -> Result<ExprId> {
        self.finish(Block {
            name: name.map(str::to_string),
            list,
        })
    }

    pub fn if_(
        &mut self,
        condition: ExprId,
        if_true: ExprId,
        if_false: Option<ExprId>,
    ) -> Result<ExprId> {
        self.finish(If {
            condition,
            if_true,
            if_false,
        })
    }

    pub fn loop_(&mut self, name: Option<&str>, body: ExprId) -> Result<ExprId> {
        self.finish(Loop {
            name: name.map(str::to_string),
            body,
        })
    }

    pub fn break_(
        &mut self,
        name: &str,
        value: Option<ExprId>,
        condition: Option<ExprId>,
    ) -> Result<ExprId> {
        self.finish(Break {
            name: name.to_string(),
            value,
            condition,
        })
    }

    pub fn switch(
        &mut self,
        targets: Vec<String>,
        default: impl Into<String>,
        condition: ExprId,
        value: Option<ExprId>,
    ) -> Result<ExprId> {
        self.finish(Switch {
            targets,
            default: default.into(),
            condition,
            value,
        })
    }

    pub fn return_(&mut self, value: Option<ExprId>) -> Result<ExprId> {
        self.finish(Return { value })
    }

    pub fn unreachable(&mut self) -> Result<ExprId> {
        self.finish(Unreachable)
    }

    /// The result type comes from the callee's signature
    pub fn call(
        &mut self,
        target: impl Into<String>,
        operands: Vec<ExprId>,
        results: Type,
        is_return: bool,
    ) -> Result<ExprId> {
        self.finish_typed(
            Call {
                target: target.into(),
                operands,
                is_return,
            },
            results,
        )
    }

    pub fn call_indirect(
        &mut self,
        sig: Signature,
        target: ExprId,
        operands: Vec<ExprId>,
        is_return: bool,
    ) -> Result<ExprId> {
        self.finish(CallIndirect {
            sig,
            target,
            operands,
            is_return,
        })
    }

    pub fn local_get(&mut self, index: Index, ty: Type) -> Result<ExprId> {
        self.finish_typed(LocalGet { index }, ty)
    }

    pub fn local_set(&mut self, index: Index, value: ExprId) -> Result<ExprId> {
        self.finish(LocalSet { index, value })
    }

    /// A set that also passes the stored value through
    pub fn local_tee(&mut self, index: Index, value: ExprId, ty: Type) -> Result<ExprId> {
        self.finish_typed(LocalSet { index, value }, ty)
    }

    pub fn global_get(&mut self, name: impl Into<String>, ty: Type) -> Result<ExprId> {
        self.finish_typed(GlobalGet { name: name.into() }, ty)
    }

    pub fn global_set(&mut self, name: impl Into<String>, value: ExprId) -> Result<ExprId> {
        self.finish(GlobalSet {
            name: name.into(),
            value,
        })
    }

    /// The loaded type cannot be inferred and is fixed here
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        &mut self,
        bytes: u8,
        signed: bool,
        offset: Address,
        align: Address,
        ty: Type,
        ptr: ExprId,
    ) -> Result<ExprId> {
        self.finish_typed(
            Load {
                bytes,
                signed,
                offset,
                align,
                atomic: false,
                ptr,
            },
            ty,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        bytes: u8,
        offset: Address,
        align: Address,
        ptr: ExprId,
        value: ExprId,
        value_ty: Type,
    ) -> Result<ExprId> {
        self.finish(Store {
            bytes,
            offset,
            align,
            atomic: false,
            ptr,
            value,
            value_ty,
        })
    }

    pub fn unary(&mut self, op: UnaryOp, value: ExprId) -> Result<ExprId> {
        self.finish(Unary { op, value })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<ExprId> {
        self.finish(Binary { op, left, right })
    }

    pub fn select(
        &mut self,
        condition: ExprId,
        if_true: ExprId,
        if_false: ExprId,
    ) -> Result<ExprId> {
        self.finish(Select {
            if_true,
            if_false,
            condition,
        })
    }

    pub fn drop_(&mut self, value: ExprId) -> Result<ExprId> {
        self.finish(Drop { value })
    }

    pub fn memory_size(&mut self) -> Result<ExprId> {
        self.finish(MemorySize { ptr_ty: Type::I32 })
    }

    pub fn memory_grow(&mut self, delta: ExprId) -> Result<ExprId> {
        self.finish(MemoryGrow {
            delta,
            ptr_ty: Type::I32,
        })
    }

    pub fn ref_null(&mut self) -> Result<ExprId> {
        self.finish(RefNull)
    }

    pub fn ref_is_null(&mut self, value: ExprId) -> Result<ExprId> {
        self.finish(RefIsNull { value })
    }

    pub fn ref_func(&mut self, func: impl Into<String>) -> Result<ExprId> {
        self.finish(RefFunc { func: func.into() })
    }

    pub fn ref_eq(&mut self, left: ExprId, right: ExprId) -> Result<ExprId> {
        self.finish(RefEq { left, right })
    }

    pub fn try_(&mut self, body: ExprId, catch_body: ExprId) -> Result<ExprId> {
        self.finish(Try { body, catch_body })
    }

    pub fn throw(&mut self, event: impl Into<String>, operands: Vec<ExprId>) -> Result<ExprId> {
        self.finish(Throw {
            event: event.into(),
            operands,
        })
    }

    pub fn rethrow(&mut self, exnref: ExprId) -> Result<ExprId> {
        self.finish(Rethrow { exnref })
    }

    pub fn br_on_exn(
        &mut self,
        name: impl Into<String>,
        event: impl Into<String>,
        exnref: ExprId,
        sent: Type,
    ) -> Result<ExprId> {
        self.finish(BrOnExn {
            name: name.into(),
            event: event.into(),
            exnref,
            sent,
        })
    }

    pub fn tuple_make(&mut self, operands: Vec<ExprId>) -> Result<ExprId> {
        self.finish(TupleMake { operands })
    }

    pub fn tuple_extract(&mut self, tuple: ExprId, index: Index) -> Result<ExprId> {
        self.finish(TupleExtract { tuple, index })
    }
}
