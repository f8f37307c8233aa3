#![allow(dead_code)]

//! Thin asynchronous client for the Kitab Market API.
//!
//! - Provides typed accessors for listings, ISBN lookups, and the inbox.
//! - Maintains a short-lived in-memory cache with stale fallbacks.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    BookSummary, ChatMessage, ConditionReport, Conversation, IsbnLookup, Listing, ListingStatus,
    Notification, NotificationKind, Seller,
};
use crate::infra::cache::{load_category_cache, save_category_cache, CategoryCache};

const DEFAULT_BASE_URL: &str = "https://api.kitabmarket.dz/";
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
const USER_AGENT: &str = "kitab-market/0.1.0";

#[derive(Debug, Error)]
pub enum KitabClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct KitabCache {
    listings: Option<Cached<Vec<Listing>>>,
    lookups: HashMap<String, Cached<IsbnLookup>>,
    categories: Option<CategoryCache>,
}

impl KitabCache {
    fn clear(&mut self) {
        self.listings = None;
        self.lookups.clear();
        // Note: categories are NOT cleared here - they persist across cache clears
    }
}

/// FastAPI error responses carry a `detail` field.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Clone)]
pub struct KitabClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<KitabCache>>,
    ttl: Duration,
}

impl KitabClient {
    pub fn new() -> Result<Self, KitabClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, KitabClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(KitabCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Load categories with a 7-day disk cache behind the in-memory one.
    pub async fn get_categories(&self) -> Result<CategoryCache, KitabClientError> {
        {
            let cache = self.cache.lock().await;
            if let Some(ref categories) = cache.categories {
                println!(
                    "[categories] Using in-memory cache ({} categories, age: {})",
                    categories.categories.len(),
                    categories.age_string()
                );
                return Ok(categories.clone());
            }
        }

        if let Some(disk_cache) = load_category_cache() {
            if disk_cache.is_expired() {
                println!(
                    "[categories] Cache expired (age: {}, TTL: 7d), refreshing...",
                    disk_cache.age_string()
                );
                return self.refresh_categories().await;
            }

            println!(
                "[categories] Disk cache valid (age: {})",
                disk_cache.age_string()
            );
            self.cache.lock().await.categories = Some(disk_cache.clone());
            return Ok(disk_cache);
        }

        self.refresh_categories().await
    }

    /// Force refresh categories from the API.
    pub async fn refresh_categories(&self) -> Result<CategoryCache, KitabClientError> {
        println!("[categories] Fetching category list from API...");

        let url = self.url("categories")?;
        let dtos: Vec<CategoryDto> = self.fetch_data(self.http.get(url)).await?;
        let names: Vec<String> = dtos.into_iter().map(|dto| dto.name).collect();

        println!("[categories] Loaded {} categories", names.len());

        let cache = CategoryCache::new(names);
        if let Err(e) = save_category_cache(&cache) {
            println!("[categories] Warning: failed to save cache: {e}");
        }
        self.cache.lock().await.categories = Some(cache.clone());

        Ok(cache)
    }

    pub async fn get_listings(&self) -> Result<CachedPayload<Vec<Listing>>, KitabClientError> {
        if let Some(payload) = self.cached_listings().await {
            return Ok(payload);
        }

        const PAGE_LIMIT: u32 = 100;
        let mut url = self.url("announcements")?;
        url.query_pairs_mut()
            .append_pair("skip", "0")
            .append_pair("limit", &PAGE_LIMIT.to_string());

        println!("Requesting listings from {url}");

        match self
            .fetch_data::<serde_json::Value>(self.http.get(url.clone()))
            .await
        {
            Ok(raw) => {
                let data = parse_listing_payload(raw);
                println!("[catalog] Parsed {} listings", data.len());
                let status = if data.is_empty() {
                    CacheStatus::Cached
                } else {
                    CacheStatus::Fresh
                };
                Ok(self.store_listings(data, status).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_listings_stale().await {
                    println!("[catalog] Serving stale listings after error: {error}");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Fetch one listing. The server counts this as a view.
    pub async fn get_listing(&self, id: i64) -> Result<Listing, KitabClientError> {
        let url = self.url(&format!("announcements/{id}"))?;
        let dto: AnnouncementDto = self.fetch_data(self.http.get(url)).await?;
        Ok(Listing::from(dto))
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, KitabClientError> {
        let url = self.url("announcements")?;
        let dto: AnnouncementDto = self.fetch_data(self.http.post(url).json(listing)).await?;
        let created = Listing::from(dto);
        println!("[publish] Created announcement {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn lookup_isbn(
        &self,
        raw_isbn: &str,
    ) -> Result<CachedPayload<IsbnLookup>, KitabClientError> {
        let isbn = normalize_isbn(raw_isbn);
        if isbn.is_empty() {
            return Err(KitabClientError::Api("empty ISBN".to_string()));
        }

        if let Some(payload) = self.cached_lookup(&isbn).await {
            return Ok(payload);
        }

        let url = self.url(&format!("isbn/{isbn}"))?;
        println!("[isbn] Looking up {isbn}");

        match self.fetch_data::<IsbnLookupDto>(self.http.get(url)).await {
            Ok(dto) => {
                let lookup = IsbnLookup::from(dto);
                if !lookup.found {
                    println!("[isbn] No match for {isbn}");
                }
                Ok(self.store_lookup(&isbn, lookup).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_lookup_stale(&isbn).await {
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn get_conversations(&self) -> Result<Vec<Conversation>, KitabClientError> {
        let url = self.url("api/messages/conversations")?;
        let dtos: Vec<ConversationDto> = self.fetch_data(self.http.get(url)).await?;
        Ok(dtos.into_iter().map(Conversation::from).collect())
    }

    pub async fn start_conversation(
        &self,
        participant_id: i64,
        announcement_id: i64,
        initial_message: &str,
    ) -> Result<Conversation, KitabClientError> {
        let url = self.url("api/messages/conversations")?;
        let body = NewConversation {
            participant_id,
            announcement_id,
            initial_message: initial_message.to_string(),
        };
        let dto: ConversationDto = self.fetch_data(self.http.post(url).json(&body)).await?;
        Ok(Conversation::from(dto))
    }

    pub async fn send_message(
        &self,
        conversation_id: i64,
        content: &str,
    ) -> Result<ChatMessage, KitabClientError> {
        let url = self.url(&format!("api/messages/conversations/{conversation_id}/messages"))?;
        let body = serde_json::json!({ "content": content });
        let dto: MessageDto = self.fetch_data(self.http.post(url).json(&body)).await?;
        let mut message = ChatMessage::from(dto);
        message.outgoing = true;
        Ok(message)
    }

    pub async fn get_notifications(&self) -> Result<Vec<Notification>, KitabClientError> {
        let url = self.url("api/notifications")?;
        let wrapper: NotificationListDto = self.fetch_data(self.http.get(url)).await?;
        Ok(wrapper
            .notifications
            .into_iter()
            .map(Notification::from)
            .collect())
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<(), KitabClientError> {
        let url = self.url(&format!("api/notifications/{id}/read"))?;
        self.fetch_ok(self.http.post(url)).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), KitabClientError> {
        let url = self.url("api/notifications/read-all")?;
        self.fetch_ok(self.http.post(url)).await
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn cached_listings(&self) -> Option<CachedPayload<Vec<Listing>>> {
        let cache = self.cache.lock().await;
        let result = cache
            .listings
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl));
        if result.is_some() {
            println!("Serving cached listings");
        }
        result
    }

    async fn cached_listings_stale(&self) -> Option<CachedPayload<Vec<Listing>>> {
        let cache = self.cache.lock().await;
        cache.listings.as_ref().map(Cached::stale)
    }

    async fn cached_lookup(&self, isbn: &str) -> Option<CachedPayload<IsbnLookup>> {
        let cache = self.cache.lock().await;
        cache
            .lookups
            .get(isbn)
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_lookup_stale(&self, isbn: &str) -> Option<CachedPayload<IsbnLookup>> {
        let cache = self.cache.lock().await;
        cache.lookups.get(isbn).map(Cached::stale)
    }

    async fn store_listings(
        &self,
        data: Vec<Listing>,
        status: CacheStatus,
    ) -> CachedPayload<Vec<Listing>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, status);
        let mut cache = self.cache.lock().await;
        cache.listings = Some(Cached::new(data, fetched_at));
        payload
    }

    async fn store_lookup(&self, isbn: &str, lookup: IsbnLookup) -> CachedPayload<IsbnLookup> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(lookup.clone(), fetched_at, CacheStatus::Fresh);
        let mut cache = self.cache.lock().await;
        cache
            .lookups
            .insert(isbn.to_string(), Cached::new(lookup, fetched_at));
        payload
    }

    async fn fetch_data<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, KitabClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            return Err(KitabClientError::Api(
                detail.unwrap_or_else(|| format!("request failed with HTTP {status}")),
            ));
        }
        Ok(response.json().await?)
    }

    async fn fetch_ok(&self, builder: reqwest::RequestBuilder) -> Result<(), KitabClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(KitabClientError::Api(
            detail.unwrap_or_else(|| format!("request failed with HTTP {status}")),
        ))
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

/// Payload for publishing a draft. Field names follow the announcements API.
#[derive(Clone, Debug, Serialize)]
pub struct NewListing {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub location: Option<String>,
    pub market_price: f64,
    pub price: u64,
    pub condition_score: u8,
    pub scoring_details: ConditionReport,
    pub custom_images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NewConversation {
    participant_id: i64,
    announcement_id: i64,
    initial_message: String,
}

#[derive(Debug, Deserialize)]
struct CategoryDto {
    #[serde(default)]
    id: Option<i64>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnnouncementListDto {
    #[serde(default)]
    announcements: Vec<AnnouncementDto>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementDto {
    id: i64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    market_price: Option<f64>,
    #[serde(default)]
    final_calculated_price: Option<f64>,
    #[serde(default)]
    condition_score: Option<u8>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    custom_images: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    page_count: Option<u32>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    views_count: Option<u32>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    book: Option<BookDto>,
    #[serde(default)]
    user: Option<UserDto>,
}

#[derive(Debug, Default, Deserialize)]
struct BookDto {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default, alias = "cover_image")]
    cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    username: Option<String>,
}

impl From<AnnouncementDto> for Listing {
    fn from(dto: AnnouncementDto) -> Self {
        let book = dto.book.unwrap_or_default();
        let price_raw = dto.final_calculated_price.or(dto.price).unwrap_or(0.0);
        let price = if price_raw.is_finite() && price_raw > 0.0 {
            price_raw.round() as u64
        } else {
            0
        };
        let condition_score = dto
            .condition_score
            .or_else(|| derive_score(price_raw, dto.market_price))
            .unwrap_or(100);

        Self {
            id: dto.id,
            title: book.title.unwrap_or_else(|| "Untitled".to_string()),
            authors: book.authors.unwrap_or_else(|| "Unknown author".to_string()),
            category: dto.category.unwrap_or_else(|| "Uncategorized".to_string()),
            description: dto.description,
            location: dto.location,
            price,
            market_price: dto
                .market_price
                .filter(|value| value.is_finite() && *value > 0.0),
            condition_score,
            status: ListingStatus::from_wire(dto.status.as_deref().unwrap_or("active")),
            cover_url: book.cover_image_url,
            photos: parse_photo_list(dto.custom_images.as_deref()),
            page_count: dto.page_count,
            publication_date: dto.publication_date,
            isbn: book.isbn,
            seller: dto.user.map(|user| Seller {
                id: user.id,
                username: user.username.unwrap_or_else(|| "Reader".to_string()),
            }),
            views: dto.views_count.unwrap_or(0),
            created_at: parse_timestamp_str(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IsbnLookupDto {
    #[serde(default)]
    found: bool,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    book_info: Option<BookInfoDto>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookInfoDto {
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default, alias = "publishedDate")]
    published_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "pageCount")]
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default, alias = "cover_image", alias = "thumbnail")]
    cover_image_url: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

impl From<IsbnLookupDto> for IsbnLookup {
    fn from(dto: IsbnLookupDto) -> Self {
        let fallback_isbn = dto.isbn.unwrap_or_default();
        let book = dto.book_info.map(|info| BookSummary {
            isbn: info.isbn.unwrap_or(fallback_isbn),
            title: info.title.unwrap_or_else(|| "Untitled".to_string()),
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            page_count: info.page_count,
            categories: info.categories,
            cover_url: info.cover_image_url,
            language: info.language,
        });
        Self {
            found: dto.found && book.is_some(),
            book,
            message: dto.message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConversationDto {
    id: i64,
    #[serde(default)]
    participant: Option<UserDto>,
    #[serde(default, alias = "participant_name")]
    peer_name: Option<String>,
    #[serde(default)]
    announcement_title: Option<String>,
    #[serde(default)]
    is_online: Option<bool>,
    #[serde(default)]
    unread_count: Option<u32>,
    #[serde(default)]
    messages: Vec<MessageDto>,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let peer_name = dto
            .peer_name
            .or_else(|| dto.participant.as_ref().and_then(|user| user.username.clone()))
            .unwrap_or_else(|| "Reader".to_string());
        Self {
            id: dto.id,
            peer_name,
            listing_title: dto.announcement_title,
            online: dto.is_online.unwrap_or(false),
            unread: dto.unread_count.unwrap_or(0),
            messages: dto.messages.into_iter().map(ChatMessage::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    content: String,
    #[serde(default, alias = "is_sender")]
    is_mine: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<MessageDto> for ChatMessage {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            body: dto.content,
            outgoing: dto.is_mine.unwrap_or(false),
            sent_at: parse_timestamp_str(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotificationListDto {
    #[serde(default)]
    notifications: Vec<NotificationDto>,
}

#[derive(Debug, Deserialize)]
struct NotificationDto {
    id: i64,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    is_read: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        let kind = dto
            .kind
            .as_deref()
            .map(NotificationKind::from_wire)
            .unwrap_or(NotificationKind::Other);
        Self {
            id: dto.id,
            kind,
            title: dto.title.unwrap_or_else(|| kind.label().to_string()),
            body: dto.message.unwrap_or_default(),
            read: dto.is_read.unwrap_or(false),
            created_at: parse_timestamp_str(dto.created_at.as_deref()),
        }
    }
}

fn parse_listing_payload(value: serde_json::Value) -> Vec<Listing> {
    if let Ok(wrapper) = serde_json::from_value::<AnnouncementListDto>(value.clone()) {
        if !wrapper.announcements.is_empty() {
            return wrapper.announcements.into_iter().map(Listing::from).collect();
        }
    }

    if let Ok(entries) = serde_json::from_value::<Vec<AnnouncementDto>>(value) {
        return entries.into_iter().map(Listing::from).collect();
    }

    Vec::new()
}

/// Recovers a score from the price ratio when the API omits the stored one.
fn derive_score(price: f64, market_price: Option<f64>) -> Option<u8> {
    let market = market_price.filter(|value| value.is_finite() && *value > 0.0)?;
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    Some(((price / market) * 100.0).round().clamp(0.0, 100.0) as u8)
}

// Backend timestamps are naive ISO 8601; treat them as UTC.
fn parse_timestamp_str(raw: Option<&str>) -> SystemTime {
    raw.and_then(|value| {
        OffsetDateTime::parse(value, &Rfc3339)
            .ok()
            .or_else(|| {
                PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
                    .ok()
                    .map(PrimitiveDateTime::assume_utc)
            })
            .and_then(|dt| {
                if dt.unix_timestamp() >= 0 {
                    let secs = dt.unix_timestamp() as u64;
                    let nanos = dt.nanosecond() as u64;
                    SystemTime::UNIX_EPOCH
                        .checked_add(Duration::from_secs(secs))
                        .and_then(|time| time.checked_add(Duration::from_nanos(nanos)))
                } else {
                    None
                }
            })
    })
    .unwrap_or_else(SystemTime::now)
}

fn parse_photo_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn announcements_map_to_listings() {
        let raw = json!({
            "id": 42,
            "category": "Fiction",
            "price": 900.0,
            "market_price": 1200.0,
            "final_calculated_price": 950.0,
            "condition_score": 79,
            "status": "reserved",
            "description": "Bon état général",
            "custom_images": "a.jpg, b.jpg,,c.jpg",
            "location": "Alger",
            "page_count": 250,
            "publication_date": "1994",
            "views_count": 17,
            "created_at": "2024-03-01T10:00:00",
            "book": {
                "title": "Le Quatuor algérien",
                "authors": "Assia Djebar",
                "isbn": "9782226061648",
                "cover_image_url": "https://covers.example/quatuor.jpg"
            },
            "user": { "id": 7, "username": "leila" }
        });
        let listing = Listing::from(serde_json::from_value::<AnnouncementDto>(raw).unwrap());

        assert_eq!(listing.id, 42);
        assert_eq!(listing.title, "Le Quatuor algérien");
        assert_eq!(listing.authors, "Assia Djebar");
        assert_eq!(listing.price, 950);
        assert_eq!(listing.condition_score, 79);
        assert_eq!(listing.status, ListingStatus::Reserved);
        assert_eq!(listing.photos, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(listing.views, 17);
        assert_eq!(listing.seller.as_ref().map(|s| s.id), Some(7));

        let expected = OffsetDateTime::parse("2024-03-01T10:00:00Z", &Rfc3339).unwrap();
        assert_eq!(listing.created_at, SystemTime::from(expected));
    }

    #[test]
    fn sparse_announcements_fall_back_to_safe_defaults() {
        let listing =
            Listing::from(serde_json::from_value::<AnnouncementDto>(json!({ "id": 1 })).unwrap());
        assert_eq!(listing.title, "Untitled");
        assert_eq!(listing.authors, "Unknown author");
        assert_eq!(listing.category, "Uncategorized");
        assert_eq!(listing.price, 0);
        assert_eq!(listing.condition_score, 100);
        assert_eq!(listing.status, ListingStatus::Active);
        assert!(listing.photos.is_empty());
        assert!(listing.seller.is_none());
    }

    #[test]
    fn missing_scores_are_recovered_from_the_price_ratio() {
        assert_eq!(derive_score(750.0, Some(1000.0)), Some(75));
        assert_eq!(derive_score(1500.0, Some(1000.0)), Some(100));
        assert_eq!(derive_score(750.0, None), None);
        assert_eq!(derive_score(750.0, Some(0.0)), None);
        assert_eq!(derive_score(0.0, Some(1000.0)), None);

        let raw = json!({ "id": 5, "price": 600.0, "market_price": 800.0 });
        let listing = Listing::from(serde_json::from_value::<AnnouncementDto>(raw).unwrap());
        assert_eq!(listing.condition_score, 75);
    }

    #[test]
    fn listing_payloads_accept_both_shapes() {
        let wrapped = json!({
            "total": 1,
            "announcements": [ { "id": 1 } ]
        });
        assert_eq!(parse_listing_payload(wrapped).len(), 1);

        let bare = json!([ { "id": 1 }, { "id": 2 } ]);
        assert_eq!(parse_listing_payload(bare).len(), 2);

        assert!(parse_listing_payload(json!({ "weird": true })).is_empty());
    }

    #[test]
    fn isbn_lookups_carry_book_metadata() {
        let raw = json!({
            "found": true,
            "isbn": "9782070360024",
            "book_info": {
                "title": "L'Étranger",
                "authors": ["Albert Camus"],
                "publisher": "Gallimard",
                "published_date": "1942-01-01",
                "page_count": 186,
                "categories": ["Fiction"],
                "cover_image_url": "https://covers.example/etranger.jpg",
                "language": "fr"
            }
        });
        let lookup = IsbnLookup::from(serde_json::from_value::<IsbnLookupDto>(raw).unwrap());
        assert!(lookup.found);
        let book = lookup.book.unwrap();
        assert_eq!(book.isbn, "9782070360024");
        assert_eq!(book.authors, vec!["Albert Camus"]);
        assert_eq!(book.page_count, Some(186));
    }

    #[test]
    fn unfound_isbn_lookups_keep_the_server_message() {
        let raw = json!({ "found": false, "message": "Book not found" });
        let lookup = IsbnLookup::from(serde_json::from_value::<IsbnLookupDto>(raw).unwrap());
        assert!(!lookup.found);
        assert!(lookup.book.is_none());
        assert_eq!(lookup.message.as_deref(), Some("Book not found"));

        // found without metadata is treated as not found
        let odd = json!({ "found": true });
        let lookup = IsbnLookup::from(serde_json::from_value::<IsbnLookupDto>(odd).unwrap());
        assert!(!lookup.found);
    }

    #[test]
    fn conversations_and_messages_fill_in_gaps() {
        let raw = json!({
            "id": 3,
            "participant": { "id": 9, "username": "sofiane" },
            "announcement_title": "Nedjma",
            "unread_count": 2,
            "messages": [
                { "id": 11, "content": "Toujours disponible ?", "is_mine": false,
                  "created_at": "2024-03-01T18:05:00" },
                { "content": "Oui !", "is_mine": true }
            ]
        });
        let conversation =
            Conversation::from(serde_json::from_value::<ConversationDto>(raw).unwrap());
        assert_eq!(conversation.peer_name, "sofiane");
        assert_eq!(conversation.unread, 2);
        assert!(!conversation.online);
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].id, "11");
        assert!(!conversation.messages[0].outgoing);
        assert!(conversation.messages[1].outgoing);
        // synthesized id for messages the server did not number
        assert!(!conversation.messages[1].id.is_empty());

        let bare = Conversation::from(
            serde_json::from_value::<ConversationDto>(json!({ "id": 4 })).unwrap(),
        );
        assert_eq!(bare.peer_name, "Reader");
        assert!(bare.messages.is_empty());
    }

    #[test]
    fn notifications_map_kind_and_read_state() {
        let raw = json!({
            "id": 8,
            "type": "announcement_sold",
            "title": "Votre livre est vendu",
            "message": "Nedjma a trouvé preneur.",
            "is_read": false,
            "created_at": "2024-03-02T09:00:00"
        });
        let notification =
            Notification::from(serde_json::from_value::<NotificationDto>(raw).unwrap());
        assert_eq!(notification.kind, NotificationKind::AnnouncementSold);
        assert!(!notification.read);

        let sparse =
            Notification::from(serde_json::from_value::<NotificationDto>(json!({ "id": 9 })).unwrap());
        assert_eq!(sparse.kind, NotificationKind::Other);
        assert_eq!(sparse.title, "Notice");
        assert!(!sparse.read);
    }

    #[test]
    fn isbn_normalization_strips_separators() {
        assert_eq!(normalize_isbn("978-2-07-036002-4"), "9782070360024");
        assert_eq!(normalize_isbn(" 2 253 00461 x "), "225300461X");
        assert_eq!(normalize_isbn("---"), "");
    }

    #[test]
    fn naive_and_offset_timestamps_both_parse() {
        let expected = OffsetDateTime::parse("2024-03-01T10:00:00Z", &Rfc3339).unwrap();
        let expected = SystemTime::from(expected);
        assert_eq!(parse_timestamp_str(Some("2024-03-01T10:00:00Z")), expected);
        assert_eq!(parse_timestamp_str(Some("2024-03-01T10:00:00")), expected);

        let before = SystemTime::now();
        let fallback = parse_timestamp_str(Some("not a date"));
        assert!(fallback >= before);
    }

    #[test]
    fn publish_payloads_use_api_field_names() {
        let listing = NewListing {
            isbn: "9782070360024".to_string(),
            title: "L'Étranger".to_string(),
            authors: "Albert Camus".to_string(),
            publisher: Some("Gallimard".to_string()),
            publication_date: None,
            description: None,
            page_count: Some(186),
            category: "Fiction".to_string(),
            cover_image_url: None,
            location: Some("Oran".to_string()),
            market_price: 1500.0,
            price: 1200,
            condition_score: 80,
            scoring_details: ConditionReport::default(),
            custom_images: vec!["a.jpg".to_string()],
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["condition_score"], json!(80));
        assert_eq!(value["scoring_details"]["page"]["page_no_missing"], json!(true));
        assert_eq!(value["market_price"], json!(1500.0));
        assert_eq!(value["custom_images"], json!(["a.jpg"]));
    }
}
