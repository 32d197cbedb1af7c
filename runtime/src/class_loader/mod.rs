use crate::class_loader::class_path::ClassPath;
use crate::error::JvmError;
use crate::vm::VmConfig;
use tracing_log::log::debug;

pub mod class_path;

/// Maps binary class names to raw class-file bytes.
pub struct ClassLoader {
    class_path: ClassPath,
}

impl ClassLoader {
    pub fn new(config: &VmConfig) -> Self {
        debug!("creating class loader over {:?}", config.class_path);
        Self {
            class_path: ClassPath::new(config.class_path.clone()),
        }
    }

    pub fn load(&self, binary_name: &str) -> Result<Vec<u8>, JvmError> {
        let bytes = self.class_path.read_class_bytes(binary_name)?;
        debug!("resolved {binary_name} on the classpath ({} bytes)", bytes.len());
        Ok(bytes)
    }
}
