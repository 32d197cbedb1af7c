use crate::classfile::descriptor::{BaseType, FieldType};
use crate::error::JvmError;
use crate::heap::method_area::MethodArea;
use crate::heap::{Heap, HeapRef, Instance};
use crate::interpreter::Interpreter;
use crate::interpreter::frame::Frame;
use crate::rt::JAVA_LANG_OBJECT;
use crate::rt::class::InstanceClass;
use crate::string_pool::StringPool;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_log::log::debug;

/// Stack operands, locals, arguments, and field values. `Top` only ever
/// occupies the upper slot of a long or double and is never a readable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Ref(Option<HeapRef>),
    Top,
}

impl Value {
    pub fn as_int(&self) -> Result<i32, JvmError> {
        match self {
            Value::Int(value) => Ok(*value),
            _ => Err(JvmError::ValueType { expected: "int" }),
        }
    }

    pub fn as_long(&self) -> Result<i64, JvmError> {
        match self {
            Value::Long(value) => Ok(*value),
            _ => Err(JvmError::ValueType { expected: "long" }),
        }
    }

    pub fn as_float(&self) -> Result<f32, JvmError> {
        match self {
            Value::Float(value) => Ok(*value),
            _ => Err(JvmError::ValueType { expected: "float" }),
        }
    }

    pub fn as_double(&self) -> Result<f64, JvmError> {
        match self {
            Value::Double(value) => Ok(*value),
            _ => Err(JvmError::ValueType { expected: "double" }),
        }
    }

    pub fn as_ref(&self) -> Result<Option<HeapRef>, JvmError> {
        match self {
            Value::Ref(value) => Ok(*value),
            _ => Err(JvmError::ValueType {
                expected: "reference",
            }),
        }
    }
}

/// Default (pre-`<clinit>`) value for a field of the given type.
impl From<&FieldType> for Value {
    fn from(ty: &FieldType) -> Self {
        match ty {
            FieldType::Base(
                BaseType::Int
                | BaseType::Byte
                | BaseType::Char
                | BaseType::Short
                | BaseType::Boolean,
            ) => Value::Int(0),
            FieldType::Base(BaseType::Long) => Value::Long(0),
            FieldType::Base(BaseType::Float) => Value::Float(0.0),
            FieldType::Base(BaseType::Double) => Value::Double(0.0),
            FieldType::Object(_) | FieldType::Array { .. } => Value::Ref(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VmConfig {
    pub class_path: Vec<PathBuf>,
    pub main_class: String,
}

/// The mutable world of one execution: loaded classes, the heap, and the
/// string pool, threaded explicitly through the interpreter.
pub struct VirtualMachine {
    pub(crate) method_area: MethodArea,
    pub(crate) heap: Heap,
    pub(crate) string_pool: StringPool,
}

impl VirtualMachine {
    pub fn new(config: &VmConfig) -> Self {
        Self {
            method_area: MethodArea::new(config),
            heap: Heap::new(),
            string_pool: StringPool::new(),
        }
    }

    pub fn load_class(&mut self, binary_name: &str) -> Result<Rc<InstanceClass>, JvmError> {
        self.method_area
            .get_or_load(binary_name, &mut self.string_pool)
    }

    /// Cache lookup without loading.
    pub fn loaded_class(&self, binary_name: &str) -> Option<Rc<InstanceClass>> {
        self.method_area.get(binary_name)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn string_pool(&self) -> &StringPool {
        &self.string_pool
    }

    /// Allocates an instance of `class` with default-initialized fields from
    /// the whole super-chain, each keyed by its declaring class.
    pub fn new_object(&mut self, class: &Rc<InstanceClass>) -> Result<HeapRef, JvmError> {
        let mut instance = Instance::new(class.name().to_string());
        let mut current = class.clone();
        loop {
            for decl in current.instance_fields() {
                instance.insert_field(current.name(), decl.key.clone(), Value::from(&decl.ty));
            }
            let super_name = match current.super_name() {
                Some(name) if name != JAVA_LANG_OBJECT => name.to_string(),
                _ => break,
            };
            current = self.load_class(&super_name)?;
        }
        Ok(self.heap.alloc(instance))
    }

    /// Loads `class_name`, finds `(method_name, desc)` on that class, and
    /// interprets it in a fresh frame.
    pub fn run_static(
        &mut self,
        class_name: &str,
        method_name: &str,
        desc: &str,
    ) -> Result<Option<Value>, JvmError> {
        let class = self.load_class(class_name)?;
        let (_, method) =
            class
                .find_method(method_name, desc)
                .ok_or_else(|| JvmError::MethodNotFound {
                    class: class.name().to_string(),
                    name: method_name.to_string(),
                    desc: desc.to_string(),
                })?;
        let code = method.code().ok_or_else(|| JvmError::MissingCode {
            class: class.name().to_string(),
            name: method_name.to_string(),
        })?;
        debug!("invoking {}.{}{}", class_name, method_name, desc);
        let mut frame = Frame::new(code.max_locals as usize, code.max_stack as usize);
        Interpreter::interpret_method(self, &class, code, &mut frame)
    }
}
