use crate::class_loader::ClassLoader;
use crate::classfile::ClassFile;
use crate::error::JvmError;
use crate::rt::JAVA_LANG_OBJECT;
use crate::rt::class::InstanceClass;
use crate::string_pool::StringPool;
use crate::vm::VmConfig;
use std::collections::HashMap;
use std::rc::Rc;
use tracing_log::log::debug;

/// Cache of loaded classes plus the load/link driver. A class record is
/// inserted before its superclass is resolved so that mutually-referencing
/// constant pools terminate.
pub struct MethodArea {
    loader: ClassLoader,
    classes: HashMap<String, Rc<InstanceClass>>,
}

impl MethodArea {
    pub fn new(config: &VmConfig) -> Self {
        Self {
            loader: ClassLoader::new(config),
            classes: HashMap::new(),
        }
    }

    pub fn get(&self, binary_name: &str) -> Option<Rc<InstanceClass>> {
        self.classes.get(binary_name).cloned()
    }

    pub fn get_or_load(
        &mut self,
        binary_name: &str,
        string_pool: &mut StringPool,
    ) -> Result<Rc<InstanceClass>, JvmError> {
        if let Some(class) = self.classes.get(binary_name) {
            return Ok(class.clone());
        }

        debug!("loading class {binary_name}");
        let bytes = self.loader.load(binary_name)?;
        let class_file = ClassFile::parse(&bytes)?;
        let class = Rc::new(InstanceClass::new(class_file)?);
        self.classes.insert(class.name().to_string(), class.clone());

        if let Some(super_name) = class.super_name() {
            if super_name != JAVA_LANG_OBJECT {
                let super_name = super_name.to_string();
                self.get_or_load(&super_name, string_pool)?;
            }
        }

        class.link(string_pool)?;
        debug!(
            "linked class {} ({} methods, {} fields)",
            class.name(),
            class.methods().len(),
            class.fields().len()
        );
        Ok(class)
    }
}
