use crate::classfile::constant::ConstantPool;
use crate::classfile::cursor::Cursor;
use crate::error::JvmError;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeInfo {
    Code(CodeAttribute),
    LineNumberTable(Vec<LineNumberEntry>),
    SourceFile { sourcefile_index: u16 },
    ConstantValue { constantvalue_index: u16 },
    /// Anything else is kept as an opaque blob of the declared length.
    Unknown { name_index: u16, info: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// 0 means catch-all.
    pub catch_type: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

pub fn parse_attributes(
    cursor: &mut Cursor,
    pool: &ConstantPool,
    count: u16,
) -> Result<Vec<AttributeInfo>, JvmError> {
    (0..count).map(|_| parse_attribute(cursor, pool)).collect()
}

fn parse_attribute(cursor: &mut Cursor, pool: &ConstantPool) -> Result<AttributeInfo, JvmError> {
    let name_index = cursor.read_u16()?;
    let length = cursor.read_u32()? as usize;
    let attribute = match pool.get_utf8(name_index)? {
        "Code" => AttributeInfo::Code(parse_code(cursor, pool)?),
        "LineNumberTable" => AttributeInfo::LineNumberTable(parse_line_number_table(cursor)?),
        "SourceFile" => AttributeInfo::SourceFile {
            sourcefile_index: cursor.read_u16()?,
        },
        "ConstantValue" => AttributeInfo::ConstantValue {
            constantvalue_index: cursor.read_u16()?,
        },
        _ => AttributeInfo::Unknown {
            name_index,
            info: cursor.read_bytes(length)?.to_vec(),
        },
    };
    Ok(attribute)
}

fn parse_code(cursor: &mut Cursor, pool: &ConstantPool) -> Result<CodeAttribute, JvmError> {
    let max_stack = cursor.read_u16()?;
    let max_locals = cursor.read_u16()?;
    let code_length = cursor.read_u32()? as usize;
    let code = cursor.read_bytes(code_length)?.to_vec();

    let exception_table_length = cursor.read_u16()?;
    let mut exception_table = Vec::with_capacity(exception_table_length as usize);
    for _ in 0..exception_table_length {
        exception_table.push(ExceptionTableEntry {
            start_pc: cursor.read_u16()?,
            end_pc: cursor.read_u16()?,
            handler_pc: cursor.read_u16()?,
            catch_type: cursor.read_u16()?,
        });
    }

    let attributes_count = cursor.read_u16()?;
    let attributes = parse_attributes(cursor, pool, attributes_count)?;
    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    })
}

fn parse_line_number_table(cursor: &mut Cursor) -> Result<Vec<LineNumberEntry>, JvmError> {
    let table_length = cursor.read_u16()?;
    let mut entries = Vec::with_capacity(table_length as usize);
    for _ in 0..table_length {
        entries.push(LineNumberEntry {
            start_pc: cursor.read_u16()?,
            line_number: cursor.read_u16()?,
        });
    }
    Ok(entries)
}
