use crate::classfile::attribute::{AttributeInfo, parse_attributes};
use crate::classfile::constant::ConstantPool;
use crate::classfile::cursor::Cursor;
use crate::classfile::flags::ClassFlags;
use crate::classfile::member::{FieldInfo, MethodInfo, parse_fields, parse_methods};
use crate::error::JvmError;

pub mod attribute;
pub mod constant;
pub mod cursor;
pub mod descriptor;
pub mod flags;
pub mod member;

pub const MAGIC: u32 = 0xCAFE_BABE;
pub const SUPPORTED_MAJOR_VERSION: u16 = 52;

/// Structural decoding of one `.class` file. No name resolution or linking
/// happens here; indices stay indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: ClassFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, JvmError> {
        let mut cursor = Cursor::new(bytes);

        let magic = cursor.read_u32()?;
        if magic != MAGIC {
            return Err(JvmError::BadMagic(magic));
        }
        let minor_version = cursor.read_u16()?;
        let major_version = cursor.read_u16()?;
        if major_version != SUPPORTED_MAJOR_VERSION {
            return Err(JvmError::UnsupportedMajorVersion(major_version));
        }

        let constant_pool = ConstantPool::parse(&mut cursor)?;

        let access_flags = ClassFlags::from_bits_truncate(cursor.read_u16()?);
        let this_class = cursor.read_u16()?;
        let super_class = cursor.read_u16()?;

        let interfaces_count = cursor.read_u16()?;
        let mut interfaces = Vec::with_capacity(interfaces_count as usize);
        for _ in 0..interfaces_count {
            interfaces.push(cursor.read_u16()?);
        }

        let fields_count = cursor.read_u16()?;
        let fields = parse_fields(&mut cursor, &constant_pool, fields_count)?;
        let methods_count = cursor.read_u16()?;
        let methods = parse_methods(&mut cursor, &constant_pool, methods_count)?;
        let attributes_count = cursor.read_u16()?;
        let attributes = parse_attributes(&mut cursor, &constant_pool, attributes_count)?;

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}
