use crate::error::Result;

/// Durable string storage keyed by name
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}
