use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::StorageKeys;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::format::format_currency;
use crate::listing::Product;
use crate::storage::{load_state, save_state, KeyValueStore};
use crate::types::{PropertyId, PropertySpecs, PropertyType};

/// saved property card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteProperty {
    pub id: PropertyId,
    pub title: String,
    pub price: Money,
    pub address: String,
    pub specs: PropertySpecs,
    pub image: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl FavoriteProperty {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.listing_code(),
            title: product.title.clone(),
            price: product.price,
            address: product.address.clone(),
            specs: product.specs(),
            image: product.cover_image().to_string(),
            property_type: product.property_type(),
            added_at: None,
        }
    }

    fn share_block(&self) -> String {
        format!(
            "🏠 {}\n💰 {}\n📍 {}\n🛏️ {} KT | 🚿 {} KM | 📐 {} m²",
            self.title,
            format_currency(self.price),
            self.address,
            self.specs.beds,
            self.specs.baths,
            self.specs.area
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FavoritesState {
    favorites: Vec<FavoriteProperty>,
}

/// ordered, de-duplicated favorites persisted after every change
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    key: String,
    state: FavoritesState,
    events: EventStore,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn open(store: S, keys: &StorageKeys) -> Result<Self> {
        let state: FavoritesState = load_state(&store, &keys.favorites)?.unwrap_or_default();
        debug!("loaded {} favorites", state.favorites.len());
        Ok(Self {
            store,
            key: keys.favorites.clone(),
            state,
            events: EventStore::new(),
        })
    }

    /// append unless already saved; returns whether it was added
    pub fn add(&mut self, mut property: FavoriteProperty, time: &SafeTimeProvider) -> Result<bool> {
        if self.is_favorite(&property.id) {
            return Ok(false);
        }
        let now = time.now();
        property.added_at.get_or_insert(now);
        let property_id = property.id.clone();
        let mut next = self.state.clone();
        next.favorites.push(property);
        self.commit(next)?;

        info!("favorite added: {}", property_id);
        self.events.emit(Event::FavoriteAdded {
            property_id,
            timestamp: now,
        });
        Ok(true)
    }

    pub fn remove(&mut self, id: &str, time: &SafeTimeProvider) -> Result<bool> {
        Ok(self.remove_many(&[id.to_string()], time)? > 0)
    }

    /// drop every listed id; returns how many were removed
    pub fn remove_many(&mut self, ids: &[PropertyId], time: &SafeTimeProvider) -> Result<usize> {
        let (removed, kept): (Vec<FavoriteProperty>, Vec<FavoriteProperty>) = self
            .state
            .favorites
            .iter()
            .cloned()
            .partition(|f| ids.contains(&f.id));
        let count = removed.len();
        if count == 0 {
            return Ok(0);
        }
        self.commit(FavoritesState { favorites: kept })?;
        let removed = removed.into_iter().map(|f| f.id).collect();

        info!("removed {} favorites", count);
        self.events.emit(Event::FavoritesRemoved {
            property_ids: removed,
            timestamp: time.now(),
        });
        Ok(count)
    }

    /// heart button; returns true when the property is now saved
    pub fn toggle(&mut self, property: FavoriteProperty, time: &SafeTimeProvider) -> Result<bool> {
        if self.is_favorite(&property.id) {
            self.remove(&property.id, time)?;
            Ok(false)
        } else {
            self.add(property, time)
        }
    }

    pub fn clear(&mut self, time: &SafeTimeProvider) -> Result<usize> {
        let count = self.state.favorites.len();
        self.commit(FavoritesState::default())?;

        self.events.emit(Event::FavoritesCleared {
            count,
            timestamp: time.now(),
        });
        Ok(count)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.favorites.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&FavoriteProperty> {
        self.state.favorites.iter().find(|f| f.id == id)
    }

    pub fn list(&self) -> &[FavoriteProperty] {
        &self.state.favorites
    }

    pub fn len(&self) -> usize {
        self.state.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.favorites.is_empty()
    }

    /// share text for the selected favorites, in saved order
    pub fn share_message(&self, ids: &[PropertyId]) -> Option<String> {
        let blocks: Vec<String> = self
            .state
            .favorites
            .iter()
            .filter(|f| ids.contains(&f.id))
            .map(FavoriteProperty::share_block)
            .collect();
        if blocks.is_empty() {
            return None;
        }
        Some(format!(
            "📋 Daftar Favorit Properti ({} properti)\n\n{}\n\n#Properti #MupinApp",
            blocks.len(),
            blocks.join("\n\n---\n\n")
        ))
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// write `next`, adopting it only once the store accepted it
    fn commit(&mut self, next: FavoritesState) -> Result<()> {
        save_state(&mut self.store, &self.key, &next)?;
        self.state = next;
        Ok(())
    }
}
