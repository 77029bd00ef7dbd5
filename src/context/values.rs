//! Arbitrary user values keyed by string.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

/// An opaque stored value.
pub type UserValue = Arc<dyn Any + Send + Sync>;

/// Key/value store with no validation: empty keys and values are accepted,
/// last write wins.
#[derive(Default)]
pub struct UserValues {
    values: DashMap<String, UserValue>,
}

impl UserValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    pub fn get(&self, key: &str) -> Option<UserValue> {
        self.values.get(key).map(|r| r.value().clone())
    }

    /// Fetch and downcast; `None` on a miss or a different type.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key)?.downcast::<T>().ok()
    }

    /// Snapshot of every value.
    pub fn list(&self) -> HashMap<String, UserValue> {
        self.values
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    pub fn remove(&self, key: &str) {
        self.values.remove(key);
    }

    pub fn clear(&self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key() {
        let values = UserValues::new();
        values.add("", "value".to_string());
        assert_eq!(values.get_as::<String>("").unwrap().as_str(), "value");
        assert_eq!(values.list().len(), 1);
    }

    #[test]
    fn test_empty_value() {
        let values = UserValues::new();
        values.add("key", String::new());
        assert_eq!(values.get_as::<String>("key").unwrap().as_str(), "");
    }

    #[test]
    fn test_wrong_type_is_none() {
        let values = UserValues::new();
        values.add("port", 8080u16);
        assert!(values.get("port").is_some());
        assert!(values.get_as::<String>("port").is_none());
        assert_eq!(*values.get_as::<u16>("port").unwrap(), 8080);
    }

    #[test]
    fn test_remove_and_clear() {
        let values = UserValues::new();
        values.add("key", "value");
        values.remove("non-exist-value");
        assert_eq!(values.len(), 1);

        values.remove("key");
        assert!(values.is_empty());

        values.add("a", 1);
        values.add("b", 2);
        values.clear();
        assert!(values.list().is_empty());
    }
}
