use crate::error::{Error, Result};

use std::collections::HashMap;

/// Option keys every driver understands.
pub const COMMON_OPTIONS: &[&str] = &["debug", "verbose", "quiet", "matrix"];

/// Ordered list of driver configuration settings. Later entries win when a key repeats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceOptions {
    entries: Vec<(String, String)>,
}

impl DeviceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fails on the first key that is neither common nor in `accepted`.
    pub(crate) fn check(&self, accepted: &[&str]) -> Result<()> {
        for (key, value) in self.iter() {
            if !COMMON_OPTIONS.contains(&key) && !accepted.contains(&key) {
                return Err(Error::bad_option(key, value));
            }
        }

        Ok(())
    }
}

impl From<HashMap<String, String>> for DeviceOptions {
    fn from(map: HashMap<String, String>) -> Self {
        // Sorted so that the resulting list doesn't depend on hash order.
        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort();
        DeviceOptions { entries }
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for DeviceOptions {
    fn from(pairs: Vec<(K, V)>) -> Self {
        DeviceOptions {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_value_wins() {
        let mut options = DeviceOptions::new();
        options.append("dev", "hw:0").append("dev", "hw:1");
        assert_eq!(options.get("dev"), Some("hw:1"));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn contains_sees_flags_without_values() {
        let options = DeviceOptions::from(vec![("debug", ""), ("dev", "hw:0")]);
        assert!(options.contains("debug"));
        assert!(options.contains("dev"));
        assert!(!options.contains("verbose"));
        assert!(!DeviceOptions::new().contains("debug"));
    }

    #[test]
    fn check_accepts_common_and_listed_keys() {
        let options = DeviceOptions::from(vec![("debug", ""), ("verbose", ""), ("dev", "x")]);
        assert!(options.check(&["dev"]).is_ok());
        assert!(matches!(
            options.check(&[]),
            Err(Error::BadOption { ref key, .. }) if key == "dev"
        ));
    }

    #[test]
    fn from_map_is_sorted() {
        let mut map = HashMap::new();
        map.insert("verbose".to_string(), String::new());
        map.insert("debug".to_string(), String::new());
        let options = DeviceOptions::from(map);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["debug", "verbose"]);
    }
}
