use crate::classfile::cursor::Cursor;
use crate::error::JvmError;
use std::fmt::Display;

pub const CONSTANT_UTF8: u8 = 1;
pub const CONSTANT_INTEGER: u8 = 3;
pub const CONSTANT_FLOAT: u8 = 4;
pub const CONSTANT_LONG: u8 = 5;
pub const CONSTANT_DOUBLE: u8 = 6;
pub const CONSTANT_CLASS: u8 = 7;
pub const CONSTANT_STRING: u8 = 8;
pub const CONSTANT_FIELDREF: u8 = 9;
pub const CONSTANT_METHODREF: u8 = 10;
pub const CONSTANT_INTERFACE_METHODREF: u8 = 11;
pub const CONSTANT_NAME_AND_TYPE: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantInfo {
    /// Index 0, which the format never addresses.
    Unused,
    /// The second slot of a Long or Double entry. Addressable, holds no value.
    Placeholder,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    Unused,
    Placeholder,
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    NameAndType,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
}

impl Display for ConstantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConstantKind::Unused => "Unused",
            ConstantKind::Placeholder => "Placeholder",
            ConstantKind::Utf8 => "Utf8",
            ConstantKind::Integer => "Integer",
            ConstantKind::Float => "Float",
            ConstantKind::Long => "Long",
            ConstantKind::Double => "Double",
            ConstantKind::Class => "Class",
            ConstantKind::String => "String",
            ConstantKind::NameAndType => "NameAndType",
            ConstantKind::FieldRef => "Fieldref",
            ConstantKind::MethodRef => "Methodref",
            ConstantKind::InterfaceMethodRef => "InterfaceMethodref",
        };
        write!(f, "{}", name)
    }
}

impl ConstantInfo {
    pub fn kind(&self) -> ConstantKind {
        match self {
            ConstantInfo::Unused => ConstantKind::Unused,
            ConstantInfo::Placeholder => ConstantKind::Placeholder,
            ConstantInfo::Utf8(_) => ConstantKind::Utf8,
            ConstantInfo::Integer(_) => ConstantKind::Integer,
            ConstantInfo::Float(_) => ConstantKind::Float,
            ConstantInfo::Long(_) => ConstantKind::Long,
            ConstantInfo::Double(_) => ConstantKind::Double,
            ConstantInfo::Class { .. } => ConstantKind::Class,
            ConstantInfo::String { .. } => ConstantKind::String,
            ConstantInfo::NameAndType { .. } => ConstantKind::NameAndType,
            ConstantInfo::FieldRef { .. } => ConstantKind::FieldRef,
            ConstantInfo::MethodRef { .. } => ConstantKind::MethodRef,
            ConstantInfo::InterfaceMethodRef { .. } => ConstantKind::InterfaceMethodRef,
        }
    }
}

/// 1-based constant table. Long and Double occupy two consecutive indices;
/// the upper one holds a [`ConstantInfo::Placeholder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    entries: Vec<ConstantInfo>,
}

impl ConstantPool {
    pub fn parse(cursor: &mut Cursor) -> Result<Self, JvmError> {
        let count = cursor.read_u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(ConstantInfo::Unused);
        while entries.len() < count as usize {
            let entry = Self::parse_entry(cursor)?;
            let wide = matches!(entry, ConstantInfo::Long(_) | ConstantInfo::Double(_));
            entries.push(entry);
            if wide {
                entries.push(ConstantInfo::Placeholder);
            }
        }
        Ok(Self { entries })
    }

    fn parse_entry(cursor: &mut Cursor) -> Result<ConstantInfo, JvmError> {
        let tag = cursor.read_u8()?;
        let entry = match tag {
            CONSTANT_UTF8 => {
                let length = cursor.read_u16()? as usize;
                let raw = cursor.read_bytes(length)?;
                ConstantInfo::Utf8(String::from_utf8_lossy(raw).into_owned())
            }
            CONSTANT_INTEGER => ConstantInfo::Integer(cursor.read_i32()?),
            CONSTANT_FLOAT => ConstantInfo::Float(cursor.read_f32()?),
            CONSTANT_LONG => ConstantInfo::Long(cursor.read_i64()?),
            CONSTANT_DOUBLE => ConstantInfo::Double(cursor.read_f64()?),
            CONSTANT_CLASS => ConstantInfo::Class {
                name_index: cursor.read_u16()?,
            },
            CONSTANT_STRING => ConstantInfo::String {
                string_index: cursor.read_u16()?,
            },
            CONSTANT_NAME_AND_TYPE => ConstantInfo::NameAndType {
                name_index: cursor.read_u16()?,
                descriptor_index: cursor.read_u16()?,
            },
            CONSTANT_FIELDREF => ConstantInfo::FieldRef {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            CONSTANT_METHODREF => ConstantInfo::MethodRef {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            CONSTANT_INTERFACE_METHODREF => ConstantInfo::InterfaceMethodRef {
                class_index: cursor.read_u16()?,
                name_and_type_index: cursor.read_u16()?,
            },
            other => return Err(JvmError::UnsupportedConstantTag(other)),
        };
        Ok(entry)
    }

    /// Number of addressable slots, including index 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&ConstantInfo, JvmError> {
        if index == 0 || index as usize >= self.entries.len() {
            return Err(JvmError::ConstantPoolIndex(index));
        }
        Ok(&self.entries[index as usize])
    }

    pub fn get_utf8(&self, index: u16) -> Result<&str, JvmError> {
        match self.get(index)? {
            ConstantInfo::Utf8(value) => Ok(value),
            other => Err(JvmError::ConstantPoolMismatch {
                index,
                expected: ConstantKind::Utf8,
                actual: other.kind(),
            }),
        }
    }
}
