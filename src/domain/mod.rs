//! Domain logic for the book marketplace lives here.

pub mod app_state;
pub mod catalog;
pub mod condition;
pub mod entities;

#[allow(unused_imports)]
pub use app_state::{AppState, CacheResource, CacheTimestamps, PersistedState};
#[allow(unused_imports)]
pub use catalog::{filter_listings, sort_listings, CatalogFilter, CatalogSort};
#[allow(unused_imports)]
pub use condition::{
    condition_label, suggested_price, ConditionCategory, ConditionFlag, ConditionReport,
};
#[allow(unused_imports)]
pub use entities::{
    BookSummary, ChatMessage, Conversation, IsbnLookup, Listing, ListingDraft, ListingStatus,
    Notification, NotificationKind, SellStep, Seller,
};
