mod common;

use common::*;
use javelin_runtime::keys::FieldKey;
use javelin_runtime::rt::ClassState;
use javelin_runtime::{JvmError, Value, VirtualMachine, VmConfig};
use std::path::Path;
use std::rc::Rc;

fn vm_over(dir: &Path) -> VirtualMachine {
    let config = VmConfig {
        class_path: vec![dir.to_path_buf()],
        main_class: String::new(),
    };
    VirtualMachine::new(&config)
}

fn write_base_class(dir: &Path) {
    let mut builder = ClassFileBuilder::new("A", "java/lang/Object");
    let seven = builder.integer(7);
    builder.field_with_constant(ACC_STATIC | ACC_FINAL, "C", "I", seven);
    builder.field(ACC_STATIC, "X", "I");
    builder.method(ACC_STATIC, "<clinit>", "()V", 1, 0, &[0xb1]);
    let source = builder.utf8("A.java");
    builder.class_attribute("SourceFile", &idx(source));
    write_class(dir, "A", &builder.build());
}

#[test]
fn linking_prepares_statics_and_discovers_clinit() {
    let dir = tempfile::tempdir().unwrap();
    write_base_class(dir.path());

    let mut vm = vm_over(dir.path());
    let class = vm.load_class("A").unwrap();
    assert_eq!(class.name(), "A");
    assert_eq!(class.super_name(), Some("java/lang/Object"));
    assert_eq!(class.state(), ClassState::Linked);
    assert_eq!(class.source_file(), Some("A.java"));

    // static final with ConstantValue
    assert_eq!(
        class.static_field_value(&FieldKey::new("C", "I")).unwrap(),
        Value::Int(7)
    );
    // plain static keeps its default
    assert_eq!(
        class.static_field_value(&FieldKey::new("X", "I")).unwrap(),
        Value::Int(0)
    );
    // discovered but never executed
    assert!(class.has_clinit());
    assert_eq!(class.clinit_method().unwrap().name(), "<clinit>");
}

#[test]
fn loading_a_subclass_populates_the_cache_transitively() {
    let dir = tempfile::tempdir().unwrap();
    write_base_class(dir.path());
    let builder = ClassFileBuilder::new("B", "A");
    write_class(dir.path(), "B", &builder.build());

    let mut vm = vm_over(dir.path());
    let b = vm.load_class("B").unwrap();
    assert_eq!(b.super_name(), Some("A"));

    let a = vm.loaded_class("A").expect("superclass must be cached");
    assert_eq!(
        a.static_field_value(&FieldKey::new("C", "I")).unwrap(),
        Value::Int(7)
    );

    // the cache hands out the same record on every lookup
    let b_again = vm.load_class("B").unwrap();
    assert!(Rc::ptr_eq(&b, &b_again));
}

#[test]
fn string_constant_values_are_interned() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ClassFileBuilder::new("Greeter", "java/lang/Object");
    let hello = builder.string("hello");
    builder.field_with_constant(
        ACC_STATIC | ACC_FINAL,
        "GREETING",
        "Ljava/lang/String;",
        hello,
    );
    write_class(dir.path(), "Greeter", &builder.build());

    let mut vm = vm_over(dir.path());
    let class = vm.load_class("Greeter").unwrap();
    let value = class
        .static_field_value(&FieldKey::new("GREETING", "Ljava/lang/String;"))
        .unwrap();
    let Value::Ref(Some(handle)) = value else {
        panic!("expected an interned reference, got {value:?}");
    };
    assert_eq!(vm.string_pool().get(handle).unwrap(), "hello");
}

#[test]
fn missing_classes_are_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = vm_over(dir.path());
    assert!(matches!(
        vm.load_class("does/not/Exist"),
        Err(JvmError::ClassNotFound(name)) if name == "does/not/Exist"
    ));
}

#[test]
fn classpath_roots_are_probed_in_order() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for (dir, constant) in [(&first, 1), (&second, 2)] {
        let mut builder = ClassFileBuilder::new("Dup", "java/lang/Object");
        let value = builder.integer(constant);
        builder.field_with_constant(ACC_STATIC | ACC_FINAL, "WHICH", "I", value);
        write_class(dir.path(), "Dup", &builder.build());
    }

    let config = VmConfig {
        class_path: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        main_class: String::new(),
    };
    let mut vm = VirtualMachine::new(&config);
    let class = vm.load_class("Dup").unwrap();
    assert_eq!(
        class
            .static_field_value(&FieldKey::new("WHICH", "I"))
            .unwrap(),
        Value::Int(1)
    );
}

#[test]
fn packaged_names_map_to_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let builder = ClassFileBuilder::new("pkg/sub/Deep", "java/lang/Object");
    write_class(dir.path(), "pkg/sub/Deep", &builder.build());

    let mut vm = vm_over(dir.path());
    let class = vm.load_class("pkg/sub/Deep").unwrap();
    assert_eq!(class.name(), "pkg/sub/Deep");
}

#[test]
fn unknown_heap_ids_fail() {
    let dir = tempfile::tempdir().unwrap();
    let vm = vm_over(dir.path());
    assert!(matches!(
        vm.heap().get(999),
        Err(JvmError::UnknownObject(999))
    ));
}
