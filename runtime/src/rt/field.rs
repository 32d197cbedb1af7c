use crate::classfile::descriptor::FieldType;
use crate::classfile::flags::FieldFlags;
use crate::keys::FieldKey;
use crate::vm::Value;
use std::cell::Cell;

/// One declared field of a class, static or instance.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub flags: FieldFlags,
    pub key: FieldKey,
    pub ty: FieldType,
    pub constant_value_index: Option<u16>,
}

impl FieldDecl {
    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }
}

#[derive(Debug)]
pub struct StaticField {
    pub flags: FieldFlags,
    pub value: Cell<Value>,
}
