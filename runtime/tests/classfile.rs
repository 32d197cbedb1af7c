mod common;

use common::*;
use javelin_runtime::JvmError;
use javelin_runtime::classfile::ClassFile;
use javelin_runtime::classfile::attribute::AttributeInfo;
use javelin_runtime::classfile::constant::ConstantInfo;

#[test]
fn parses_header_and_constant_pool() {
    let mut builder = ClassFileBuilder::new("CpDemo", "java/lang/Object");
    let int_index = builder.integer(-42);
    let string_index = builder.string("howdy");
    let float_index = builder.float(1.5);
    let bytes = builder.build();

    let cf = ClassFile::parse(&bytes).unwrap();
    assert_eq!(cf.minor_version, 0);
    assert_eq!(cf.major_version, 52);
    assert_eq!(
        cf.constant_pool.get(int_index).unwrap(),
        &ConstantInfo::Integer(-42)
    );
    assert_eq!(
        cf.constant_pool.get(float_index).unwrap(),
        &ConstantInfo::Float(1.5)
    );
    assert!(matches!(
        cf.constant_pool.get(string_index).unwrap(),
        ConstantInfo::String { .. }
    ));
    assert!(matches!(
        cf.constant_pool.get(cf.this_class).unwrap(),
        ConstantInfo::Class { .. }
    ));
}

#[test]
fn long_and_double_occupy_two_slots() {
    let mut builder = ClassFileBuilder::new("WideDemo", "java/lang/Object");
    let long_index = builder.long(-1);
    let double_index = builder.double(2.5);
    let after = builder.integer(9);
    let bytes = builder.build();

    let cf = ClassFile::parse(&bytes).unwrap();
    assert_eq!(
        cf.constant_pool.get(long_index).unwrap(),
        &ConstantInfo::Long(-1)
    );
    assert_eq!(
        cf.constant_pool.get(long_index + 1).unwrap(),
        &ConstantInfo::Placeholder
    );
    assert_eq!(
        cf.constant_pool.get(double_index).unwrap(),
        &ConstantInfo::Double(2.5)
    );
    assert_eq!(
        cf.constant_pool.get(double_index + 1).unwrap(),
        &ConstantInfo::Placeholder
    );
    assert_eq!(cf.constant_pool.get(after).unwrap(), &ConstantInfo::Integer(9));
}

#[test]
fn index_zero_is_not_addressable() {
    let bytes = ClassFileBuilder::new("ZeroDemo", "java/lang/Object").build();
    let cf = ClassFile::parse(&bytes).unwrap();
    assert!(matches!(
        cf.constant_pool.get(0),
        Err(JvmError::ConstantPoolIndex(0))
    ));
    assert!(matches!(
        cf.constant_pool.get(999),
        Err(JvmError::ConstantPoolIndex(999))
    ));
}

#[test]
fn parsing_is_deterministic() {
    let mut builder = ClassFileBuilder::new("TwiceDemo", "java/lang/Object");
    builder.long(7);
    builder.field(ACC_STATIC, "X", "I");
    builder.method(ACC_PUBLIC | ACC_STATIC, "run", "()I", 1, 0, &[0x03, 0xac]);
    let bytes = builder.build();

    let first = ClassFile::parse(&bytes).unwrap();
    let second = ClassFile::parse(&bytes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = ClassFileBuilder::new("MagicDemo", "java/lang/Object").build();
    bytes[0] = 0xde;
    assert!(matches!(
        ClassFile::parse(&bytes),
        Err(JvmError::BadMagic(_))
    ));
}

#[test]
fn rejects_other_major_versions() {
    let mut bytes = ClassFileBuilder::new("VersionDemo", "java/lang/Object").build();
    // major version lives right after magic + minor
    bytes[6] = 0x00;
    bytes[7] = 0x33;
    assert!(matches!(
        ClassFile::parse(&bytes),
        Err(JvmError::UnsupportedMajorVersion(51))
    ));
}

#[test]
fn rejects_unsupported_constant_tags() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&52u16.to_be_bytes());
    bytes.extend_from_slice(&2u16.to_be_bytes());
    bytes.push(15); // MethodHandle
    bytes.extend_from_slice(&[0x01, 0x00, 0x02]);
    assert!(matches!(
        ClassFile::parse(&bytes),
        Err(JvmError::UnsupportedConstantTag(15))
    ));
}

#[test]
fn truncated_input_is_an_error() {
    let bytes = ClassFileBuilder::new("TruncDemo", "java/lang/Object").build();
    assert!(matches!(
        ClassFile::parse(&bytes[..bytes.len() - 3]),
        Err(JvmError::Cursor(_))
    ));
}

#[test]
fn unknown_attributes_are_kept_opaque_and_aligned() {
    let mut builder = ClassFileBuilder::new("AttrDemo", "java/lang/Object");
    builder.class_attribute("X-Custom", b"abc");
    let source_index = builder.utf8("AttrDemo.java");
    builder.class_attribute("SourceFile", &idx(source_index));
    let bytes = builder.build();

    let cf = ClassFile::parse(&bytes).unwrap();
    assert_eq!(cf.attributes.len(), 2);
    assert!(matches!(
        &cf.attributes[0],
        AttributeInfo::Unknown { info, .. } if info == b"abc"
    ));
    // the blob was consumed exactly, so the next attribute decodes cleanly
    assert_eq!(
        cf.attributes[1],
        AttributeInfo::SourceFile {
            sourcefile_index: source_index
        }
    );
}

#[test]
fn code_attributes_carry_their_nested_structure() {
    let mut builder = ClassFileBuilder::new("CodeDemo", "java/lang/Object");
    builder.method(ACC_PUBLIC | ACC_STATIC, "run", "()I", 2, 3, &[0x03, 0xac]);
    let bytes = builder.build();

    let cf = ClassFile::parse(&bytes).unwrap();
    let method = &cf.methods[0];
    let code = method
        .attributes
        .iter()
        .find_map(|attr| match attr {
            AttributeInfo::Code(code) => Some(code),
            _ => None,
        })
        .unwrap();
    assert_eq!(code.max_stack, 2);
    assert_eq!(code.max_locals, 3);
    assert_eq!(code.code, vec![0x03, 0xac]);
    assert!(code.exception_table.is_empty());
}
