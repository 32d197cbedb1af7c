use crate::classfile::ClassFile;
use crate::classfile::attribute::AttributeInfo;
use crate::classfile::descriptor::parse_field_descriptor;
use crate::classfile::flags::ClassFlags;
use crate::error::JvmError;
use crate::keys::FieldKey;
use crate::rt::constant_pool::{ResolvedConstant, RuntimeConstantPool};
use crate::rt::field::{FieldDecl, StaticField};
use crate::rt::method::Method;
use crate::rt::{ClassState, JAVA_LANG_OBJECT};
use crate::string_pool::StringPool;
use crate::vm::Value;
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::collections::HashMap;

/// A loaded class: resolved names, methods, field declarations, and (once
/// linked) the static field area. The super link is a name, resolved through
/// the loader cache on every walk.
pub struct InstanceClass {
    name: String,
    super_name: Option<String>,
    flags: ClassFlags,
    source_file: Option<String>,
    cp: RuntimeConstantPool,
    methods: Vec<Method>,
    fields: Vec<FieldDecl>,
    static_fields: OnceCell<HashMap<FieldKey, StaticField>>,
    clinit: OnceCell<usize>,
    state: Cell<ClassState>,
}

impl InstanceClass {
    pub fn new(cf: ClassFile) -> Result<Self, JvmError> {
        let cp = RuntimeConstantPool::new(cf.constant_pool);
        let name = cp.get_class_name(cf.this_class)?.to_string();
        let super_name = if cf.super_class == 0 {
            if name != JAVA_LANG_OBJECT {
                return Err(JvmError::MissingSuperClass(name));
            }
            None
        } else {
            Some(cp.get_class_name(cf.super_class)?.to_string())
        };

        let source_file = cf
            .attributes
            .iter()
            .find_map(|attr| match attr {
                AttributeInfo::SourceFile { sourcefile_index } => Some(*sourcefile_index),
                _ => None,
            })
            .map(|index| cp.get_utf8(index).map(str::to_string))
            .transpose()?;

        let methods = cf
            .methods
            .into_iter()
            .map(|info| Method::new(info, &cp, &name))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = cf
            .fields
            .into_iter()
            .map(|info| {
                let key = FieldKey::new(
                    cp.get_utf8(info.name_index)?,
                    cp.get_utf8(info.descriptor_index)?,
                );
                let ty = parse_field_descriptor(&key.desc)?;
                let constant_value_index = info.attributes.iter().find_map(|attr| match attr {
                    AttributeInfo::ConstantValue { constantvalue_index } => {
                        Some(*constantvalue_index)
                    }
                    _ => None,
                });
                Ok(FieldDecl {
                    flags: info.access_flags,
                    key,
                    ty,
                    constant_value_index,
                })
            })
            .collect::<Result<Vec<_>, JvmError>>()?;

        Ok(Self {
            name,
            super_name,
            flags: cf.access_flags,
            source_file,
            cp,
            methods,
            fields,
            static_fields: OnceCell::new(),
            clinit: OnceCell::new(),
            state: Cell::new(ClassState::Loaded),
        })
    }

    /// Prepares the static field area: zero/null defaults first, then
    /// `ConstantValue` overrides on static finals. `<clinit>` is recorded but
    /// not executed.
    pub fn link(&self, string_pool: &mut StringPool) -> Result<(), JvmError> {
        if self.state.get() != ClassState::Loaded {
            return Ok(());
        }

        let mut statics = HashMap::new();
        for decl in self.fields.iter().filter(|decl| decl.is_static()) {
            let mut value = Value::from(&decl.ty);
            if decl.flags.is_final() {
                if let Some(index) = decl.constant_value_index {
                    value = match self.cp.get_constant_value(index)? {
                        ResolvedConstant::Integer(v) => Value::Int(v),
                        ResolvedConstant::Long(v) => Value::Long(v),
                        ResolvedConstant::Float(v) => Value::Float(v),
                        ResolvedConstant::Double(v) => Value::Double(v),
                        ResolvedConstant::String(s) => Value::Ref(Some(string_pool.intern(s))),
                    };
                }
            }
            statics.insert(
                decl.key.clone(),
                StaticField {
                    flags: decl.flags,
                    value: Cell::new(value),
                },
            );
        }
        self.static_fields
            .set(statics)
            .map_err(|_| JvmError::AlreadyLinked(self.name.clone()))?;

        if let Some(index) = self
            .methods
            .iter()
            .position(|m| m.name() == "<clinit>" && m.desc() == "()V")
        {
            let _ = self.clinit.set(index);
        }

        self.state.set(ClassState::Linked);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn super_name(&self) -> Option<&str> {
        self.super_name.as_deref()
    }

    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    pub fn cp(&self) -> &RuntimeConstantPool {
        &self.cp
    }

    pub fn state(&self) -> ClassState {
        self.state.get()
    }

    pub fn has_clinit(&self) -> bool {
        self.clinit.get().is_some()
    }

    pub fn clinit_method(&self) -> Option<&Method> {
        self.clinit.get().map(|&index| &self.methods[index])
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> &Method {
        &self.methods[index]
    }

    /// Declared methods only; hierarchy-aware lookup lives in the interpreter.
    pub fn find_method(&self, name: &str, desc: &str) -> Option<(usize, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.name() == name && m.desc() == desc)
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn find_field(&self, key: &FieldKey, expect_static: bool) -> Option<&FieldDecl> {
        self.fields
            .iter()
            .find(|decl| decl.is_static() == expect_static && decl.key == *key)
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter().filter(|decl| !decl.is_static())
    }

    fn static_area(&self) -> Result<&HashMap<FieldKey, StaticField>, JvmError> {
        self.static_fields
            .get()
            .ok_or_else(|| JvmError::ClassNotLinked(self.name.clone()))
    }

    fn static_slot(&self, key: &FieldKey) -> Result<&StaticField, JvmError> {
        self.static_area()?
            .get(key)
            .ok_or_else(|| JvmError::FieldNotFound {
                class: self.name.clone(),
                name: key.name.clone(),
                desc: key.desc.clone(),
            })
    }

    pub fn static_field_value(&self, key: &FieldKey) -> Result<Value, JvmError> {
        Ok(self.static_slot(key)?.value.get())
    }

    pub fn set_static_field_value(&self, key: &FieldKey, value: Value) -> Result<(), JvmError> {
        self.static_slot(key)?.value.set(value);
        Ok(())
    }
}
