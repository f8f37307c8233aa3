use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogFilter, CatalogSort};
use super::entities::{Conversation, IsbnLookup, Listing, ListingDraft, Notification};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub listings: Vec<Listing>,
    pub categories: Vec<String>,
    pub conversations: Vec<Conversation>,
    pub notifications: Vec<Notification>,
    /// Lookup results keyed by normalized ISBN so repeated searches are free.
    pub lookups: HashMap<String, IsbnLookup>,
    pub draft: ListingDraft,
    pub filter: CatalogFilter,
    pub sort: CatalogSort,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.draft = persisted.draft;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            draft: self.draft.clone(),
        }
    }

    pub fn listing(&self, id: i64) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    /// Replaces a listing in place, or prepends it when it is new.
    pub fn upsert_listing(&mut self, listing: Listing) {
        match self.listings.iter_mut().find(|entry| entry.id == listing.id) {
            Some(slot) => *slot = listing,
            None => self.listings.insert(0, listing),
        }
    }

    pub fn unread_messages(&self) -> u32 {
        self.conversations
            .iter()
            .map(|conversation| conversation.unread)
            .sum()
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Catalog,
    Inbox,
    Lookup(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub draft: ListingDraft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ListingStatus;
    use pretty_assertions::assert_eq;

    fn listing(id: i64) -> Listing {
        Listing {
            id,
            title: format!("Book {id}"),
            authors: String::new(),
            category: "Fiction".to_string(),
            description: None,
            location: None,
            price: 500,
            market_price: None,
            condition_score: 88,
            status: ListingStatus::Active,
            cover_url: None,
            photos: Vec::new(),
            page_count: None,
            publication_date: None,
            isbn: None,
            seller: None,
            views: 0,
            created_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn upsert_replaces_by_id_and_prepends_new_entries() {
        let mut state = AppState::default();
        state.listings = vec![listing(1), listing(2)];

        let mut updated = listing(2);
        updated.views = 99;
        state.upsert_listing(updated);
        assert_eq!(state.listings.len(), 2);
        assert_eq!(state.listings[1].views, 99);

        state.upsert_listing(listing(3));
        assert_eq!(state.listings.len(), 3);
        assert_eq!(state.listings[0].id, 3);
    }

    #[test]
    fn unread_counters_sum_across_sources() {
        let mut state = AppState::default();
        state.conversations = vec![
            Conversation {
                id: 1,
                peer_name: "Lina".to_string(),
                listing_title: None,
                online: false,
                unread: 2,
                messages: Vec::new(),
            },
            Conversation {
                id: 2,
                peer_name: "Sami".to_string(),
                listing_title: None,
                online: true,
                unread: 1,
                messages: Vec::new(),
            },
        ];
        state.notifications = vec![
            Notification {
                id: 1,
                kind: crate::domain::NotificationKind::PriceDrop,
                title: "Price drop".to_string(),
                body: String::new(),
                read: false,
                created_at: SystemTime::UNIX_EPOCH,
            },
            Notification {
                id: 2,
                kind: crate::domain::NotificationKind::MessageReceived,
                title: "Message".to_string(),
                body: String::new(),
                read: true,
                created_at: SystemTime::UNIX_EPOCH,
            },
        ];

        assert_eq!(state.unread_messages(), 3);
        assert_eq!(state.unread_notifications(), 1);
    }

    #[test]
    fn staleness_tracks_ttl_and_unknown_resources() {
        let mut timestamps = CacheTimestamps::default();
        assert!(timestamps.is_stale(&CacheResource::Catalog, Duration::from_secs(60)));

        let ten_minutes_ago = SystemTime::now() - Duration::from_secs(600);
        timestamps.record_fetch(CacheResource::Catalog, ten_minutes_ago);
        assert!(timestamps.is_stale(&CacheResource::Catalog, Duration::from_secs(300)));
        assert!(!timestamps.is_stale(&CacheResource::Catalog, Duration::from_secs(1800)));

        timestamps.clear();
        assert!(timestamps.is_stale(&CacheResource::Catalog, Duration::from_secs(1800)));
    }

    #[test]
    fn only_the_draft_survives_persistence() {
        let mut state = AppState::default();
        state.draft.title = "Le Fils du pauvre".to_string();
        state.listings = vec![listing(1)];

        let persisted = state.to_persisted();
        let mut restored = AppState::default();
        restored.apply_persisted(persisted);

        assert_eq!(restored.draft.title, "Le Fils du pauvre");
        assert!(restored.listings.is_empty());
    }
}
