use crate::classfile::constant::ConstantKind;
use crate::classfile::cursor::CursorError;
use crate::classfile::descriptor::DescriptorError;
use crate::heap::HeapRef;
use std::fmt::Display;

#[derive(Debug)]
pub enum JvmError {
    Io(std::io::Error),
    Cursor(CursorError),
    Descriptor(DescriptorError),
    BadMagic(u32),
    UnsupportedMajorVersion(u16),
    UnsupportedConstantTag(u8),
    ConstantPoolIndex(u16),
    ConstantPoolMismatch {
        index: u16,
        expected: ConstantKind,
        actual: ConstantKind,
    },
    UnsupportedConstantValue {
        index: u16,
        actual: ConstantKind,
    },
    MissingSuperClass(String),
    ClassNotFound(String),
    ClassNotLinked(String),
    AlreadyLinked(String),
    MethodNotFound {
        class: String,
        name: String,
        desc: String,
    },
    FieldNotFound {
        class: String,
        name: String,
        desc: String,
    },
    MissingCode {
        class: String,
        name: String,
    },
    UnsupportedParameter {
        desc: String,
    },
    UnsupportedReturn {
        desc: String,
    },
    UnsupportedFieldKind {
        desc: String,
    },
    StackOverflow,
    StackUnderflow,
    OperandType {
        expected: &'static str,
    },
    ValueType {
        expected: &'static str,
    },
    LocalIndexOutOfRange {
        index: usize,
        max_locals: usize,
    },
    LocalType {
        index: usize,
        expected: &'static str,
    },
    LocalNotInitialized {
        index: usize,
    },
    NullPointer {
        context: &'static str,
    },
    DivisionByZero,
    UnknownObject(HeapRef),
    UnknownStringHandle(usize),
    UnsupportedOpcode {
        opcode: u8,
        pc: usize,
    },
    UnexpectedEndOfCode {
        pc: usize,
    },
}

impl From<std::io::Error> for JvmError {
    fn from(value: std::io::Error) -> Self {
        JvmError::Io(value)
    }
}

impl From<CursorError> for JvmError {
    fn from(value: CursorError) -> Self {
        JvmError::Cursor(value)
    }
}

impl From<DescriptorError> for JvmError {
    fn from(value: DescriptorError) -> Self {
        JvmError::Descriptor(value)
    }
}

impl Display for JvmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JvmError::Io(e) => write!(f, "i/o error: {}", e),
            JvmError::Cursor(e) => write!(f, "{}", e),
            JvmError::Descriptor(e) => write!(f, "{}", e),
            JvmError::BadMagic(magic) => {
                write!(f, "not a class file: magic 0x{:08X}", magic)
            }
            JvmError::UnsupportedMajorVersion(major) => {
                write!(
                    f,
                    "unsupported class file major version {} (expected 52)",
                    major
                )
            }
            JvmError::UnsupportedConstantTag(tag) => {
                write!(f, "unsupported constant pool tag {}", tag)
            }
            JvmError::ConstantPoolIndex(index) => {
                write!(f, "constant pool index {} is out of range", index)
            }
            JvmError::ConstantPoolMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "constant pool index {} holds {}, expected {}",
                index, actual, expected
            ),
            JvmError::UnsupportedConstantValue { index, actual } => write!(
                f,
                "ConstantValue at constant pool index {} has unsupported kind {}",
                index, actual
            ),
            JvmError::MissingSuperClass(name) => {
                write!(f, "class {} has no superclass", name)
            }
            JvmError::ClassNotFound(name) => {
                write!(f, "class not found on the classpath: {}", name)
            }
            JvmError::ClassNotLinked(name) => {
                write!(f, "class {} is not linked yet", name)
            }
            JvmError::AlreadyLinked(name) => {
                write!(f, "class {} is already linked", name)
            }
            JvmError::MethodNotFound { class, name, desc } => {
                write!(f, "method not found: {}.{}{}", class, name, desc)
            }
            JvmError::FieldNotFound { class, name, desc } => {
                write!(f, "field not found: {}.{}:{}", class, name, desc)
            }
            JvmError::MissingCode { class, name } => {
                write!(f, "method {}.{} has no Code attribute", class, name)
            }
            JvmError::UnsupportedParameter { desc } => {
                write!(f, "only int parameters are supported: {}", desc)
            }
            JvmError::UnsupportedReturn { desc } => {
                write!(f, "only int and void returns are supported: {}", desc)
            }
            JvmError::UnsupportedFieldKind { desc } => {
                write!(f, "unsupported field descriptor for data access: {}", desc)
            }
            JvmError::StackOverflow => write!(f, "operand stack overflow"),
            JvmError::StackUnderflow => write!(f, "operand stack underflow"),
            JvmError::OperandType { expected } => {
                write!(f, "top of the operand stack is not {}", expected)
            }
            JvmError::ValueType { expected } => {
                write!(f, "value is not {}", expected)
            }
            JvmError::LocalIndexOutOfRange { index, max_locals } => {
                write!(f, "local index {} out of range (max_locals {})", index, max_locals)
            }
            JvmError::LocalType { index, expected } => {
                write!(f, "local {} does not hold {}", index, expected)
            }
            JvmError::LocalNotInitialized { index } => {
                write!(f, "local {} read before initialization", index)
            }
            JvmError::NullPointer { context } => {
                write!(f, "null reference ({})", context)
            }
            JvmError::DivisionByZero => write!(f, "division by zero"),
            JvmError::UnknownObject(heap_ref) => {
                write!(f, "unknown heap object id {}", heap_ref)
            }
            JvmError::UnknownStringHandle(handle) => {
                write!(f, "unknown string pool handle {}", handle)
            }
            JvmError::UnsupportedOpcode { opcode, pc } => {
                write!(f, "unsupported opcode 0x{:02x} at pc {}", opcode, pc)
            }
            JvmError::UnexpectedEndOfCode { pc } => {
                write!(f, "code ends in the middle of an instruction at pc {}", pc)
            }
        }
    }
}
