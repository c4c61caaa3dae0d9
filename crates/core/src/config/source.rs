//! Key/value configuration sources used by `init_app`

use crate::error::{ApiError, ApiResult};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::hash::BuildHasher;

/// A read-only source of string configuration values
pub trait ConfigSource {
    /// Look up a key
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a key that must be present
    fn require(&self, key: &str) -> ApiResult<String> {
        self.get(key)
            .ok_or_else(|| ApiError::config(format!("missing configuration key {key}")))
    }
}

impl<S: BuildHasher> ConfigSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Configuration read from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Parse a `KEY=value,KEY=value` string into a map
///
/// Values may themselves contain `=`; only the first one splits. Empty
/// segments are skipped. Segment contents never appear in the error, since
/// these strings usually carry API keys.
pub fn parse_key_values(raw: &str) -> ApiResult<HashMap<String, String>> {
    let mut pairs = HashMap::new();

    for (index, segment) in raw.split(',').enumerate() {
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment.split_once('=').ok_or_else(|| {
            ApiError::config(format!("entry {index} of key/value list has no '='"))
        })?;
        pairs.insert(key.to_string(), value.to_string());
    }

    Ok(pairs)
}
