use std::sync::{Arc, Mutex, PoisonError};

use crate::params::TransformParams;

/// Identifies one transformed stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CacheKey {
    pub width: usize,
    pub height: usize,
    pub params: TransformParams,
}

/// Remembers the most recent transform result.
#[derive(Debug)]
pub(crate) struct TransformCache<T> {
    entry: Mutex<Option<(CacheKey, Arc<T>)>>,
}

impl<T> Default for TransformCache<T> {
    fn default() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }
}

impl<T> TransformCache<T> {
    /// Return the cached value for `key`, or compute and store it.
    ///
    /// The lock is not held while `f` runs.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: CacheKey,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(value) = self.get(&key) {
            log::trace!("transform cache hit for {key:?}");
            return Ok(value);
        }

        log::debug!("transform cache miss for {key:?}");
        let value = Arc::new(f()?);

        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = Some((key, value.clone()));

        Ok(value)
    }

    fn get(&self, key: &CacheKey) -> Option<Arc<T>> {
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);

        match entry.as_ref() {
            Some((cached, value)) if cached == key => Some(value.clone()),
            _ => None,
        }
    }

    /// Drop the cached value.
    pub fn clear(&self) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
