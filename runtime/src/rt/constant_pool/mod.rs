use crate::classfile::constant::{ConstantInfo, ConstantKind, ConstantPool};
use crate::error::JvmError;

/// Resolved view of a `Fieldref` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRefView<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub desc: &'a str,
}

/// Resolved view of a `Methodref` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRefView<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub desc: &'a str,
}

/// A constant usable as a `ConstantValue` field initializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedConstant<'a> {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(&'a str),
}

fn mismatch(index: u16, expected: ConstantKind, actual: ConstantKind) -> JvmError {
    JvmError::ConstantPoolMismatch {
        index,
        expected,
        actual,
    }
}

/// Per-class constant table with typed, index-checked accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConstantPool {
    pool: ConstantPool,
}

impl RuntimeConstantPool {
    pub fn new(pool: ConstantPool) -> Self {
        Self { pool }
    }

    pub fn get_utf8(&self, index: u16) -> Result<&str, JvmError> {
        self.pool.get_utf8(index)
    }

    pub fn get_class_name(&self, index: u16) -> Result<&str, JvmError> {
        match self.pool.get(index)? {
            ConstantInfo::Class { name_index } => self.get_utf8(*name_index),
            other => Err(mismatch(index, ConstantKind::Class, other.kind())),
        }
    }

    pub fn get_name_and_type(&self, index: u16) -> Result<(&str, &str), JvmError> {
        match self.pool.get(index)? {
            ConstantInfo::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.get_utf8(*name_index)?, self.get_utf8(*descriptor_index)?)),
            other => Err(mismatch(index, ConstantKind::NameAndType, other.kind())),
        }
    }

    pub fn get_field_ref(&self, index: u16) -> Result<FieldRefView<'_>, JvmError> {
        match self.pool.get(index)? {
            ConstantInfo::FieldRef {
                class_index,
                name_and_type_index,
            } => {
                let class_name = self.get_class_name(*class_index)?;
                let (name, desc) = self.get_name_and_type(*name_and_type_index)?;
                Ok(FieldRefView {
                    class_name,
                    name,
                    desc,
                })
            }
            other => Err(mismatch(index, ConstantKind::FieldRef, other.kind())),
        }
    }

    pub fn get_method_ref(&self, index: u16) -> Result<MethodRefView<'_>, JvmError> {
        match self.pool.get(index)? {
            ConstantInfo::MethodRef {
                class_index,
                name_and_type_index,
            } => {
                let class_name = self.get_class_name(*class_index)?;
                let (name, desc) = self.get_name_and_type(*name_and_type_index)?;
                Ok(MethodRefView {
                    class_name,
                    name,
                    desc,
                })
            }
            other => Err(mismatch(index, ConstantKind::MethodRef, other.kind())),
        }
    }

    pub fn get_constant_value(&self, index: u16) -> Result<ResolvedConstant<'_>, JvmError> {
        match self.pool.get(index)? {
            ConstantInfo::Integer(value) => Ok(ResolvedConstant::Integer(*value)),
            ConstantInfo::Float(value) => Ok(ResolvedConstant::Float(*value)),
            ConstantInfo::Long(value) => Ok(ResolvedConstant::Long(*value)),
            ConstantInfo::Double(value) => Ok(ResolvedConstant::Double(*value)),
            ConstantInfo::String { string_index } => {
                Ok(ResolvedConstant::String(self.get_utf8(*string_index)?))
            }
            other => Err(JvmError::UnsupportedConstantValue {
                index,
                actual: other.kind(),
            }),
        }
    }
}
