pub mod class;
pub mod constant_pool;
pub mod field;
pub mod method;

/// The super-chain terminates here; the class itself is never loaded.
pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassState {
    /// Parsed, inserted into the cache.
    Loaded,
    /// Static defaults and `ConstantValue` bindings prepared.
    Linked,
    /// Reserved for `<clinit>` execution.
    Initialized,
}
