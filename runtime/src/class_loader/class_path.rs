use crate::error::JvmError;
use std::fs;
use std::path::PathBuf;

/// Ordered list of directory roots. A binary name `pkg/Sub/Name` resolves to
/// `root/pkg/Sub/Name.class`; the first root with a hit wins.
pub struct ClassPath {
    roots: Vec<PathBuf>,
}

impl ClassPath {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn read_class_bytes(&self, binary_name: &str) -> Result<Vec<u8>, JvmError> {
        let relative = format!("{binary_name}.class");
        for root in &self.roots {
            let candidate = root.join(&relative);
            if candidate.is_file() {
                return Ok(fs::read(&candidate)?);
            }
        }
        Err(JvmError::ClassNotFound(binary_name.to_string()))
    }
}
