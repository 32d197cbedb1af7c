use crate::error::JvmError;
use lasso::{Key, Rodeo, Spur};

/// Intern pool for string constants. Equal texts share one handle; handles
/// are positive, stable for the lifetime of the pool, and never reused.
pub struct StringPool {
    interner: Rodeo,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        Self {
            interner: Rodeo::new(),
        }
    }

    pub fn intern(&mut self, value: &str) -> usize {
        self.interner.get_or_intern(value).into_usize() + 1
    }

    pub fn get(&self, handle: usize) -> Result<&str, JvmError> {
        handle
            .checked_sub(1)
            .and_then(Spur::try_from_usize)
            .and_then(|key| self.interner.try_resolve(&key))
            .ok_or(JvmError::UnknownStringHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }
}
