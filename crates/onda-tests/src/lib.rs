//! Integration tests for the Onda IR toolkit
//!
//! This crate exercises the full flow a front end drives: build expression
//! trees bottom-up inside a module's arena, finalize as children settle,
//! register top-level entities, and hand the finished module to (here,
//! simulated) consumers.

use onda_ir::{Builder, Export, ExternalKind, Function, Global, Module};
use onda_types::{Literal, Signature, Type};

/// Initializes logging for tests and embedding toolchains; safe to call
/// more than once
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Builds a small but complete module: an exported `add1` function over a
/// mutable counter global, with a unit memory.
///
/// ```text
/// (global $count (mut i32))
/// (func $add1 (param i32) (result i32)
///   (global.set $count (binary add (global.get $count) (local.get 0)))
///   (global.get $count))
/// (export "add1" (func $add1))
/// ```
pub fn build_counter_module() -> Module {
    let mut module = Module::new();
    module.name = Some("counter".to_string());

    let zero = Builder::new(&mut module).const_(Literal::I32(0)).unwrap();
    let mut count = Global::new("count", Type::I32);
    count.init = Some(zero);
    count.mutable = true;
    module.add_global(count).unwrap();

    let mut b = Builder::new(&mut module);
    let old = b.global_get("count", Type::I32).unwrap();
    let delta = b.local_get(0, Type::I32).unwrap();
    let sum = b
        .binary(onda_ir::BinaryOp::AddInt32, old, delta)
        .unwrap();
    let set = b.global_set("count", sum).unwrap();
    let read_back = b.global_get("count", Type::I32).unwrap();
    let body = b.block(None, vec![set, read_back]).unwrap();

    let mut add1 = Function::new("add1", Signature::new(Type::I32, Type::I32));
    add1.body = Some(body);
    add1.set_local_name(0, "delta");
    module.add_function(add1).unwrap();

    module
        .add_export(Export {
            name: "add1".to_string(),
            value: "add1".to_string(),
            kind: ExternalKind::Function,
        })
        .unwrap();

    module.memory.exists = true;
    module.memory.initial = 1;

    module
}
