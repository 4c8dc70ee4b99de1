use tracing::debug;

use crate::Container;
use crate::FromValue;

/// Reads individual keys from a [`Container`], substituting a caller-supplied
/// default whenever a key is absent, malformed, or fails to decode.
///
/// Failures are contained to the key being read: one unreadable dataset
/// never affects the others.
pub struct KeyReader<'c> {
    container: &'c dyn Container,
}

impl<'c> KeyReader<'c> {
    pub fn new(container: &'c dyn Container) -> Self {
        Self { container }
    }

    /// Returns the value at `key` when it is present and representable as
    /// `T`.
    pub fn lookup<T: FromValue>(&self, key: &str) -> Option<T> {
        let dataset = match self.container.dataset(key) {
            Ok(Some(dataset)) => dataset,
            Ok(None) => return None,
            Err(err) => {
                debug!(key, error = %err, "unreadable dataset, falling back to default");
                return None;
            }
        };
        let value = dataset.into_single().and_then(T::from_value);
        if value.is_none() {
            debug!(key, "dataset has an unexpected shape or type, falling back to default");
        }
        value
    }

    pub fn read<T: FromValue>(&self, key: &str, default: T) -> T {
        self.lookup(key).unwrap_or(default)
    }

    /// Tries each key in order and returns the first readable value.
    pub fn read_first<T: FromValue>(&self, keys: &[&str], default: T) -> T {
        keys.iter()
            .find_map(|key| self.lookup(key))
            .unwrap_or(default)
    }
}
