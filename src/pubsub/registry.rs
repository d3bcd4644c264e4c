use std::{fmt, sync::Arc};

use courier_error::RegistryError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::Courier;

type CourierKey = Arc<str>;

/// Settings applied to every courier created by a [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Initial capacity of a freshly created route.
    pub route_capacity: usize,
    /// Emit a `debug` event when `deliver` targets a route that does not exist.
    pub log_unrouted: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            route_capacity: 4,
            log_unrouted: false,
        }
    }
}

/// Name-keyed table of couriers, at most one per name.
///
/// The registry is an ordinary value: construct it once and share it (by
/// reference or inside an `Arc`) with whoever needs to look couriers up.
/// Entries live as long as the registry; there is no removal.
pub struct Registry<T = Value> {
    couriers: DashMap<CourierKey, Arc<Courier<T>>>,
    config: RegistryConfig,
}

impl Registry {
    /// Registry whose couriers deliver `serde_json::Value` arguments.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl<T> Registry<T> {
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            couriers: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the courier registered under `name`, creating it on first use.
    ///
    /// An empty name yields `None` and creates nothing. Repeated calls with
    /// the same name return clones of the same `Arc`.
    pub fn get_or_create(
        &self,
        name: &str,
    ) -> Option<Arc<Courier<T>>> {
        if name.is_empty() {
            return None;
        }
        if let Some(existing) = self.couriers.get(name) {
            return Some(Arc::clone(existing.value()));
        }

        let key: CourierKey = Arc::from(name);
        let entry = self.couriers.entry(Arc::clone(&key)).or_insert_with(|| {
            debug!(courier = %key, "courier created");
            Arc::new(Courier::new(key, self.config.clone()))
        });
        Some(Arc::clone(entry.value()))
    }

    /// Same as [`get_or_create`](Self::get_or_create) but reports an empty
    /// name as an error.
    pub fn try_get_or_create(
        &self,
        name: &str,
    ) -> Result<Arc<Courier<T>>, RegistryError> {
        self.get_or_create(name).ok_or(RegistryError::InvalidName)
    }

    /// Existing courier for `name`; never creates one.
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<Arc<Courier<T>>> {
        self.couriers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn require(
        &self,
        name: &str,
    ) -> Result<Arc<Courier<T>>, RegistryError> {
        self.lookup(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.couriers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.couriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couriers.is_empty()
    }

    /// Courier names in alphabetical order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.couriers.iter().map(|e| e.key().to_string()).collect();
        names.sort_unstable();
        names
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Registry")
            .field("couriers", &self.couriers.len())
            .field("config", &self.config)
            .finish()
    }
}
