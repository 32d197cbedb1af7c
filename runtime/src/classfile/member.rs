use crate::classfile::attribute::{AttributeInfo, parse_attributes};
use crate::classfile::constant::ConstantPool;
use crate::classfile::cursor::Cursor;
use crate::classfile::flags::{FieldFlags, MethodFlags};
use crate::error::JvmError;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: FieldFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: MethodFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

pub fn parse_fields(
    cursor: &mut Cursor,
    pool: &ConstantPool,
    count: u16,
) -> Result<Vec<FieldInfo>, JvmError> {
    (0..count)
        .map(|_| {
            let access_flags = FieldFlags::from_bits_truncate(cursor.read_u16()?);
            let name_index = cursor.read_u16()?;
            let descriptor_index = cursor.read_u16()?;
            let attributes_count = cursor.read_u16()?;
            let attributes = parse_attributes(cursor, pool, attributes_count)?;
            Ok(FieldInfo {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
            })
        })
        .collect()
}

pub fn parse_methods(
    cursor: &mut Cursor,
    pool: &ConstantPool,
    count: u16,
) -> Result<Vec<MethodInfo>, JvmError> {
    (0..count)
        .map(|_| {
            let access_flags = MethodFlags::from_bits_truncate(cursor.read_u16()?);
            let name_index = cursor.read_u16()?;
            let descriptor_index = cursor.read_u16()?;
            let attributes_count = cursor.read_u16()?;
            let attributes = parse_attributes(cursor, pool, attributes_count)?;
            Ok(MethodInfo {
                access_flags,
                name_index,
                descriptor_index,
                attributes,
            })
        })
        .collect()
}
