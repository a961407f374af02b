use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vehicle::VehicleData;

pub const CART_VEHICLE_STORAGE_KEY: &str = "partsquote.cart.vehicle.v1";
pub const CART_SERVICES_STORAGE_KEY: &str = "partsquote.cart.services.v1";

#[must_use]
pub fn is_cart_storage_key(key: &str) -> bool {
    key == CART_VEHICLE_STORAGE_KEY || key == CART_SERVICES_STORAGE_KEY
}

/// One part or service category the customer wants quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartServiceItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CartServiceItem {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub vehicle: Option<VehicleData>,
    pub services: Vec<CartServiceItem>,
}

impl CartSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none() && self.services.is_empty()
    }

    #[must_use]
    pub fn service_labels(&self) -> Vec<&str> {
        self.services
            .iter()
            .map(|service| service.label.as_str())
            .collect()
    }
}

/// Synchronous string key-value storage, e.g. browser `localStorage`.
pub trait CartStorage {
    type Error: fmt::Display;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InMemoryStorageError {
    #[error("storage mutex poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct InMemoryCartStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl CartStorage for InMemoryCartStorage {
    type Error = InMemoryStorageError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| InMemoryStorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| InMemoryStorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| InMemoryStorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    type Error = T::Error;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    ServicesReplaced,
    VehicleSaved,
    VehicleRemoved,
    ServiceRemoved { index: usize },
    /// Another tab or window wrote the cart keys.
    External,
}

type CartListener = Arc<dyn Fn(CartChange) + Send + Sync>;

#[derive(Default)]
struct SubscriberRegistry {
    next_id: u64,
    listeners: Vec<(u64, CartListener)>,
}

/// Handle returned by [`CartStore::subscribe_to_cart_updates`].
#[must_use = "keep the handle to be able to unsubscribe later"]
pub struct CartSubscription {
    id: u64,
    registry: Weak<Mutex<SubscriberRegistry>>,
}

impl CartSubscription {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns false when the store is gone or the callback was already removed.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = registry.listeners.len();
        registry.listeners.retain(|(id, _)| *id != self.id);
        registry.listeners.len() != before
    }
}

impl fmt::Debug for CartSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Persisted in-progress quote request: selected vehicle plus services.
///
/// Reads never fail: missing or malformed entries degrade to the empty
/// cart. Writes that the storage rejects are logged and dropped, and do
/// not notify subscribers.
pub struct CartStore<S> {
    storage: S,
    subscribers: Arc<Mutex<SubscriberRegistry>>,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl<S> CartStore<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            subscribers: Arc::new(Mutex::new(SubscriberRegistry::default())),
        }
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|registry| registry.listeners.len())
            .unwrap_or_default()
    }

    pub fn subscribe_to_cart_updates<F>(&self, callback: F) -> CartSubscription
    where
        F: Fn(CartChange) + Send + Sync + 'static,
    {
        let mut registry = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.next_id = registry.next_id.saturating_add(1);
        let id = registry.next_id;
        registry.listeners.push((id, Arc::new(callback)));
        CartSubscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Relays a change made outside this store (another tab) to subscribers.
    pub fn notify_external_change(&self) {
        self.notify(CartChange::External);
    }

    fn notify(&self, change: CartChange) {
        // Snapshot first so callbacks may subscribe or unsubscribe re-entrantly.
        let listeners = {
            let registry = self
                .subscribers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            registry
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect::<Vec<_>>()
        };
        tracing::debug!(?change, subscribers = listeners.len(), "cart updated");
        for listener in listeners {
            listener(change);
        }
    }
}

impl<S: CartStorage> CartStore<S> {
    pub fn load_cart_summary(&self) -> CartSummary {
        CartSummary {
            vehicle: self.load_vehicle(),
            services: self.load_services(),
        }
    }

    /// Overwrites the stored services wholesale; an empty slice clears them.
    pub fn persist_services_selection(&self, services: &[CartServiceItem]) {
        if self.write_services(services) {
            self.notify(CartChange::ServicesReplaced);
        }
    }

    pub fn persist_vehicle_selection(&self, vehicle: &VehicleData) {
        let encoded = match serde_json::to_string(vehicle) {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!(%error, "failed to encode cart vehicle");
                return;
            }
        };
        if self.write_raw(CART_VEHICLE_STORAGE_KEY, &encoded) {
            self.notify(CartChange::VehicleSaved);
        }
    }

    /// Clears the vehicle only; services are left in place.
    pub fn remove_vehicle_from_cart(&self) {
        match self.storage.remove_item(CART_VEHICLE_STORAGE_KEY) {
            Ok(()) => self.notify(CartChange::VehicleRemoved),
            Err(error) => tracing::warn!(%error, "failed to remove cart vehicle"),
        }
    }

    /// Out-of-range indices leave the stored list untouched.
    pub fn remove_service_by_index(&self, index: usize) {
        let mut services = self.load_services();
        if index >= services.len() {
            tracing::debug!(index, len = services.len(), "ignoring out of range cart removal");
            return;
        }
        services.remove(index);
        if self.write_services(&services) {
            self.notify(CartChange::ServiceRemoved { index });
        }
    }

    /// Adds the item, or removes every entry sharing its id when already
    /// selected. Returns whether the item is selected in storage afterwards,
    /// so a failed write reports the unchanged selection.
    pub fn toggle_service(&self, item: CartServiceItem) -> bool {
        let mut services = self.load_services();
        let before = services.len();
        services.retain(|service| service.id != item.id);
        let was_selected = services.len() != before;
        if !was_selected {
            services.push(item);
        }
        if !self.write_services(&services) {
            return was_selected;
        }
        self.notify(CartChange::ServicesReplaced);
        !was_selected
    }

    fn load_vehicle(&self) -> Option<VehicleData> {
        let raw = self.read_raw(CART_VEHICLE_STORAGE_KEY)?;
        match serde_json::from_str::<Option<VehicleData>>(&raw) {
            Ok(vehicle) => vehicle,
            Err(error) => {
                tracing::warn!(%error, "ignoring malformed cart vehicle");
                None
            }
        }
    }

    fn load_services(&self) -> Vec<CartServiceItem> {
        let Some(raw) = self.read_raw(CART_SERVICES_STORAGE_KEY) else {
            return Vec::new();
        };
        decode_services(&raw)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(key, %error, "failed to read cart storage");
                None
            }
        }
    }

    fn write_services(&self, services: &[CartServiceItem]) -> bool {
        match serde_json::to_string(services) {
            Ok(encoded) => self.write_raw(CART_SERVICES_STORAGE_KEY, &encoded),
            Err(error) => {
                tracing::warn!(%error, "failed to encode cart services");
                false
            }
        }
    }

    fn write_raw(&self, key: &str, value: &str) -> bool {
        match self.storage.set_item(key, value) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(key, %error, "failed to write cart storage");
                false
            }
        }
    }
}

/// Keeps every well-formed entry; anything that is not a JSON array
/// decodes to an empty list.
#[must_use]
pub fn decode_services(raw: &str) -> Vec<CartServiceItem> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
        tracing::warn!("ignoring malformed cart services");
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<CartServiceItem>(entry).ok())
        .collect()
}
