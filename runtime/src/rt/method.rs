use crate::classfile::attribute::{
    AttributeInfo, CodeAttribute, ExceptionTableEntry, LineNumberEntry,
};
use crate::classfile::descriptor::{MethodDescriptor, parse_method_descriptor};
use crate::classfile::flags::MethodFlags;
use crate::classfile::member::MethodInfo;
use crate::error::JvmError;
use crate::rt::constant_pool::RuntimeConstantPool;

#[derive(Debug)]
pub struct CodeBody {
    pub code: Vec<u8>,
    pub max_stack: u16,
    pub max_locals: u16,
    pub line_numbers: Option<Vec<LineNumberEntry>>,
    /// Parsed but never consulted; exception handling is not part of this core.
    pub exception_table: Vec<ExceptionTableEntry>,
}

impl From<CodeAttribute> for CodeBody {
    fn from(attr: CodeAttribute) -> Self {
        let mut line_numbers: Option<Vec<LineNumberEntry>> = None;
        for nested in attr.attributes {
            if let AttributeInfo::LineNumberTable(entries) = nested {
                line_numbers.get_or_insert_with(Vec::new).extend(entries);
            }
        }
        Self {
            code: attr.code,
            max_stack: attr.max_stack,
            max_locals: attr.max_locals,
            line_numbers,
            exception_table: attr.exception_table,
        }
    }
}

#[derive(Debug)]
pub enum MethodBody {
    Interpreted(CodeBody),
    Native,
    Abstract,
}

#[derive(Debug)]
pub struct Method {
    name: String,
    desc: String,
    descriptor: MethodDescriptor,
    flags: MethodFlags,
    body: MethodBody,
}

impl Method {
    pub fn new(
        info: MethodInfo,
        cp: &RuntimeConstantPool,
        class_name: &str,
    ) -> Result<Self, JvmError> {
        let name = cp.get_utf8(info.name_index)?.to_string();
        let desc = cp.get_utf8(info.descriptor_index)?.to_string();
        let descriptor = parse_method_descriptor(&desc)?;
        let flags = info.access_flags;
        let body = if flags.is_abstract() {
            MethodBody::Abstract
        } else if flags.is_native() {
            MethodBody::Native
        } else {
            let code = info.attributes.into_iter().find_map(|attr| match attr {
                AttributeInfo::Code(code) => Some(code),
                _ => None,
            });
            match code {
                Some(code) => MethodBody::Interpreted(CodeBody::from(code)),
                None => {
                    return Err(JvmError::MissingCode {
                        class: class_name.to_string(),
                        name,
                    });
                }
            }
        };
        Ok(Self {
            name,
            desc,
            descriptor,
            flags,
            body,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn flags(&self) -> MethodFlags {
        self.flags
    }

    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }

    pub fn code(&self) -> Option<&CodeBody> {
        match &self.body {
            MethodBody::Interpreted(code) => Some(code),
            _ => None,
        }
    }
}
