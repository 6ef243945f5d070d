//! Debugging output
//!
//! A compact s-expression rendering of expression trees, meant for use
//! while debugging, plus a summary `Display` for whole modules. This is
//! not a faithful text encoding of the format; encoders live elsewhere.

use crate::arena::{ExprArena, ExprId};
use crate::expr::ExprKind;
use crate::module::Module;
use std::fmt::{self, Write};

/// Renders the subtree at `id` as one s-expression line
pub fn dump(arena: &ExprArena, id: ExprId) -> String {
    let mut out = String::new();
    write_expr(&mut out, arena, id);
    out
}

fn write_expr(out: &mut String, arena: &ExprArena, id: ExprId) {
    let expr = &arena[id];
    match &expr.kind {
        ExprKind::Const(c) => {
            let _ = write!(out, "({})", c.value);
            return;
        }
        ExprKind::LocalGet(e) => {
            let _ = write!(out, "(local.get {})", e.index);
            return;
        }
        ExprKind::LocalSet(e) => {
            let mnemonic = if expr.ty.is_none() { "local.set" } else { "local.tee" };
            let _ = write!(out, "({} {} ", mnemonic, e.index);
            write_expr(out, arena, e.value);
            out.push(')');
            return;
        }
        _ => {}
    }

    let _ = write!(out, "({}", expr.name());
    match &expr.kind {
        ExprKind::Block(b) => {
            if let Some(name) = &b.name {
                let _ = write!(out, " ${}", name);
            }
        }
        ExprKind::Loop(l) => {
            if let Some(name) = &l.name {
                let _ = write!(out, " ${}", name);
            }
        }
        ExprKind::Break(b) => {
            let _ = write!(out, " ${}", b.name);
        }
        ExprKind::Switch(s) => {
            for target in &s.targets {
                let _ = write!(out, " ${}", target);
            }
            let _ = write!(out, " ${}", s.default);
        }
        ExprKind::Call(c) => {
            let _ = write!(out, " ${}", c.target);
        }
        ExprKind::GlobalGet(g) => {
            let _ = write!(out, " ${}", g.name);
        }
        ExprKind::GlobalSet(g) => {
            let _ = write!(out, " ${}", g.name);
        }
        ExprKind::RefFunc(r) => {
            let _ = write!(out, " ${}", r.func);
        }
        ExprKind::Throw(t) => {
            let _ = write!(out, " ${}", t.event);
        }
        ExprKind::BrOnExn(b) => {
            let _ = write!(out, " ${} ${}", b.name, b.event);
        }
        _ => {}
    }
    expr.kind.for_each_child(|child| {
        out.push(' ');
        write_expr(out, arena, child);
    });
    out.push(')');
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "; Module: {}",
            self.name.as_deref().unwrap_or("<anonymous>")
        )?;

        if !self.exports.is_empty() {
            writeln!(f, "; Exports")?;
            for export in self.exports.iter() {
                writeln!(f, ";   \"{}\" = {} ({:?})", export.name, export.value, export.kind)?;
            }
        }

        for global in self.globals.iter() {
            let mutability = if global.mutable { "mut " } else { "" };
            writeln!(f, "global {}{} @{}", mutability, global.ty, global.name)?;
        }

        for function in self.functions.iter() {
            write!(f, "define {} @{}", function.sig, function.name)?;
            match function.body {
                Some(body) => writeln!(f, " {{\n  {}\n}}", dump(&self.arena, body))?,
                None => writeln!(f, " ; import")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::function::Function;
    use onda_types::{Literal, Signature, Type};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dump() {
        let mut module = Module::new();
        let mut b = Builder::new(&mut module);
        let v = b.const_(Literal::I32(1)).unwrap();
        let br = b.break_("l", Some(v), None).unwrap();
        let block = b.block(Some("l"), vec![br]).unwrap();

        assert_eq!(dump(&module.arena, block), "(block $l (br $l (i32.const 1)))");
    }

    #[test]
    fn test_module_display() {
        let mut module = Module::new();
        module.name = Some("demo".to_string());

        let mut b = Builder::new(&mut module);
        let two = b.const_(Literal::I32(2)).unwrap();
        let mut function = Function::new("f", Signature::new(Type::None, Type::I32));
        function.body = Some(two);
        module.add_function(function).unwrap();

        let output = module.to_string();
        assert!(output.contains("; Module: demo"));
        assert!(output.contains("define none -> i32 @f"));
        assert!(output.contains("(i32.const 2)"));
    }
}
