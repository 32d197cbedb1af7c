use crate::error::JvmError;
use crate::keys::FieldKey;
use crate::vm::Value;
use std::collections::HashMap;

pub mod method_area;

pub type HeapRef = usize;

/// One allocated object: the class it was created as plus its field storage.
/// Fields are keyed by `(declaring class, name, descriptor)` so a shadowed
/// superclass field keeps its own slot.
pub struct Instance {
    class_name: String,
    fields: HashMap<(String, FieldKey), Value>,
}

impl Instance {
    pub fn new(class_name: String) -> Self {
        Self {
            class_name,
            fields: HashMap::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn insert_field(&mut self, declaring_class: &str, key: FieldKey, value: Value) {
        self.fields.insert((declaring_class.to_string(), key), value);
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field(&self, declaring_class: &str, key: &FieldKey) -> Result<Value, JvmError> {
        self.fields
            .get(&(declaring_class.to_string(), key.clone()))
            .copied()
            .ok_or_else(|| JvmError::FieldNotFound {
                class: declaring_class.to_string(),
                name: key.name.clone(),
                desc: key.desc.clone(),
            })
    }

    pub fn set_field(
        &mut self,
        declaring_class: &str,
        key: &FieldKey,
        value: Value,
    ) -> Result<(), JvmError> {
        match self.fields.get_mut(&(declaring_class.to_string(), key.clone())) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(JvmError::FieldNotFound {
                class: declaring_class.to_string(),
                name: key.name.clone(),
                desc: key.desc.clone(),
            }),
        }
    }
}

/// Object store keyed by monotonically increasing ids. Ids start at 1 so a
/// zero handle never aliases a live object.
pub struct Heap {
    next_id: HeapRef,
    objects: HashMap<HeapRef, Instance>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            objects: HashMap::new(),
        }
    }

    pub fn alloc(&mut self, instance: Instance) -> HeapRef {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, instance);
        id
    }

    pub fn get(&self, id: HeapRef) -> Result<&Instance, JvmError> {
        self.objects.get(&id).ok_or(JvmError::UnknownObject(id))
    }

    pub fn get_mut(&mut self, id: HeapRef) -> Result<&mut Instance, JvmError> {
        self.objects.get_mut(&id).ok_or(JvmError::UnknownObject(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
