#![allow(dead_code)]

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::condition::{self, ConditionReport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seller {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "reserved" => ListingStatus::Reserved,
            "sold" => ListingStatus::Sold,
            _ => ListingStatus::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Available",
            ListingStatus::Reserved => "Reserved",
            ListingStatus::Sold => "Sold",
        }
    }
}

/// One second-hand book offered on the marketplace.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub category: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Asking price in DZD, already discounted by the seller's checklist.
    pub price: u64,
    pub market_price: Option<f64>,
    pub condition_score: u8,
    pub status: ListingStatus,
    pub cover_url: Option<String>,
    pub photos: Vec<String>,
    pub page_count: Option<u32>,
    pub publication_date: Option<String>,
    pub isbn: Option<String>,
    pub seller: Option<Seller>,
    pub views: u32,
    pub created_at: SystemTime,
}

impl Listing {
    pub fn condition_text(&self) -> &'static str {
        condition::condition_label(self.condition_score)
    }
}

/// Book metadata resolved from an ISBN lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct BookSummary {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Vec<String>,
    pub cover_url: Option<String>,
    pub language: Option<String>,
}

impl BookSummary {
    pub fn authors_display(&self) -> String {
        if self.authors.is_empty() {
            "Unknown author".to_string()
        } else {
            self.authors.join(", ")
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IsbnLookup {
    pub found: bool,
    pub book: Option<BookSummary>,
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellStep {
    #[default]
    Identify,
    Condition,
    Review,
}

impl SellStep {
    pub const ALL: [SellStep; 3] = [SellStep::Identify, SellStep::Condition, SellStep::Review];

    pub fn label(&self) -> &'static str {
        match self {
            SellStep::Identify => "Identify",
            SellStep::Condition => "Condition",
            SellStep::Review => "Photos & confirm",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SellStep::Identify => 0,
            SellStep::Condition => 1,
            SellStep::Review => 2,
        }
    }

    pub fn next(&self) -> Option<SellStep> {
        match self {
            SellStep::Identify => Some(SellStep::Condition),
            SellStep::Condition => Some(SellStep::Review),
            SellStep::Review => None,
        }
    }

    pub fn previous(&self) -> Option<SellStep> {
        match self {
            SellStep::Identify => None,
            SellStep::Condition => Some(SellStep::Identify),
            SellStep::Review => Some(SellStep::Condition),
        }
    }
}

/// Everything the sell wizard has gathered so far. Survives restarts via
/// the persisted state, so text inputs stay raw until publish.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDraft {
    pub step: SellStep,
    pub isbn: String,
    pub manual_entry: bool,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub published_date: String,
    pub description: String,
    pub category: String,
    pub page_count: String,
    pub cover_url: String,
    pub location: String,
    pub market_price: String,
    pub photos: Vec<String>,
    pub condition: ConditionReport,
}

impl ListingDraft {
    /// Copies lookup metadata into the draft without touching the checklist.
    pub fn apply_book(&mut self, book: &BookSummary) {
        self.isbn = book.isbn.clone();
        self.title = book.title.clone();
        self.authors = book.authors_display();
        self.publisher = book.publisher.clone().unwrap_or_default();
        self.published_date = book.published_date.clone().unwrap_or_default();
        self.description = book.description.clone().unwrap_or_default();
        self.page_count = book
            .page_count
            .map(|count| count.to_string())
            .unwrap_or_default();
        self.cover_url = book.cover_url.clone().unwrap_or_default();
        if self.category.is_empty() {
            if let Some(category) = book.categories.first() {
                self.category = category.clone();
            }
        }
    }

    pub fn market_price_value(&self) -> f64 {
        self.market_price.trim().parse().unwrap_or(0.0)
    }

    pub fn suggested_price(&self) -> u64 {
        condition::suggested_price(self.market_price_value(), self.condition.overall_score())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub body: String,
    pub outgoing: bool,
    pub sent_at: SystemTime,
}

impl ChatMessage {
    pub fn time_label(&self) -> String {
        let timestamp = time::OffsetDateTime::from(self.sent_at);
        format!("{:02}:{:02}", timestamp.hour(), timestamp.minute())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub peer_name: String,
    pub listing_title: Option<String>,
    pub online: bool,
    pub unread: u32,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn initials(&self) -> String {
        let letters: String = self
            .peer_name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(|letter| letter.to_uppercase())
            .collect();
        if letters.is_empty() {
            "?".to_string()
        } else {
            letters
        }
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.peer_name.to_lowercase().contains(&query)
            || self
                .listing_title
                .as_ref()
                .is_some_and(|title| title.to_lowercase().contains(&query))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    MessageReceived,
    AnnouncementSold,
    AnnouncementReserved,
    PriceDrop,
    NewRating,
    RatingReply,
    LowRatingAlert,
    AccountSuspended,
    AccountReactivated,
    Other,
}

impl NotificationKind {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "message_received" => NotificationKind::MessageReceived,
            "announcement_sold" => NotificationKind::AnnouncementSold,
            "announcement_reserved" => NotificationKind::AnnouncementReserved,
            "price_drop" => NotificationKind::PriceDrop,
            "new_rating" => NotificationKind::NewRating,
            "rating_reply" => NotificationKind::RatingReply,
            "low_rating_alert" => NotificationKind::LowRatingAlert,
            "account_suspended" => NotificationKind::AccountSuspended,
            "account_reactivated" => NotificationKind::AccountReactivated,
            _ => NotificationKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::MessageReceived => "Message",
            NotificationKind::AnnouncementSold => "Sold",
            NotificationKind::AnnouncementReserved => "Reserved",
            NotificationKind::PriceDrop => "Price drop",
            NotificationKind::NewRating => "Rating",
            NotificationKind::RatingReply => "Reply",
            NotificationKind::LowRatingAlert => "Rating alert",
            NotificationKind::AccountSuspended => "Account",
            NotificationKind::AccountReactivated => "Account",
            NotificationKind::Other => "Notice",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: SystemTime,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_book() -> BookSummary {
        BookSummary {
            isbn: "9782070360024".to_string(),
            title: "L'Étranger".to_string(),
            authors: vec!["Albert Camus".to_string()],
            publisher: Some("Gallimard".to_string()),
            published_date: Some("1942".to_string()),
            description: Some("Roman".to_string()),
            page_count: Some(186),
            categories: vec!["Fiction".to_string()],
            cover_url: Some("https://covers.example/etranger.jpg".to_string()),
            language: Some("fr".to_string()),
        }
    }

    #[test]
    fn sell_steps_walk_forward_and_back() {
        assert_eq!(SellStep::Identify.next(), Some(SellStep::Condition));
        assert_eq!(SellStep::Condition.next(), Some(SellStep::Review));
        assert_eq!(SellStep::Review.next(), None);
        assert_eq!(SellStep::Review.previous(), Some(SellStep::Condition));
        assert_eq!(SellStep::Identify.previous(), None);
        for (index, step) in SellStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), index);
        }
    }

    #[test]
    fn applying_a_book_fills_the_draft_but_keeps_the_checklist() {
        let mut draft = ListingDraft::default();
        draft.condition.toggle(crate::domain::ConditionFlag::PageClean);
        let checklist = draft.condition.clone();

        draft.apply_book(&sample_book());

        assert_eq!(draft.title, "L'Étranger");
        assert_eq!(draft.authors, "Albert Camus");
        assert_eq!(draft.publisher, "Gallimard");
        assert_eq!(draft.page_count, "186");
        assert_eq!(draft.category, "Fiction");
        assert_eq!(draft.condition, checklist);
    }

    #[test]
    fn applying_a_book_never_overwrites_a_chosen_category() {
        let mut draft = ListingDraft {
            category: "Philosophy".to_string(),
            ..ListingDraft::default()
        };
        draft.apply_book(&sample_book());
        assert_eq!(draft.category, "Philosophy");
    }

    #[test]
    fn market_price_parses_leniently() {
        let mut draft = ListingDraft::default();
        assert_eq!(draft.market_price_value(), 0.0);

        draft.market_price = " 1500 ".to_string();
        assert_eq!(draft.market_price_value(), 1500.0);

        draft.market_price = "abc".to_string();
        assert_eq!(draft.market_price_value(), 0.0);
        assert_eq!(draft.suggested_price(), 0);
    }

    #[test]
    fn old_drafts_load_with_defaults_for_missing_fields() {
        let parsed: ListingDraft =
            serde_json::from_value(serde_json::json!({ "title": "Vieux brouillon" })).unwrap();
        assert_eq!(parsed.title, "Vieux brouillon");
        assert_eq!(parsed.step, SellStep::Identify);
        assert_eq!(parsed.condition, ConditionReport::default());
    }

    #[test]
    fn conversation_initials_take_two_words() {
        let mut conversation = Conversation {
            id: 1,
            peer_name: "amine benali".to_string(),
            listing_title: None,
            online: false,
            unread: 0,
            messages: Vec::new(),
        };
        assert_eq!(conversation.initials(), "AB");

        conversation.peer_name = "karima".to_string();
        assert_eq!(conversation.initials(), "K");

        conversation.peer_name = "  ".to_string();
        assert_eq!(conversation.initials(), "?");
    }

    #[test]
    fn conversation_search_checks_name_and_listing() {
        let conversation = Conversation {
            id: 7,
            peer_name: "Yacine".to_string(),
            listing_title: Some("Les Misérables".to_string()),
            online: true,
            unread: 2,
            messages: Vec::new(),
        };
        assert!(conversation.matches(""));
        assert!(conversation.matches("yac"));
        assert!(conversation.matches("misérables"));
        assert!(!conversation.matches("camus"));
    }

    #[test]
    fn message_times_render_as_clock_labels() {
        let message = ChatMessage {
            id: "m-1".to_string(),
            body: "Salam".to_string(),
            outgoing: false,
            sent_at: SystemTime::UNIX_EPOCH + Duration::from_secs(14 * 3600 + 32 * 60),
        };
        assert_eq!(message.time_label(), "14:32");
    }

    #[test]
    fn wire_statuses_and_kinds_fall_back_gracefully() {
        assert_eq!(ListingStatus::from_wire("sold"), ListingStatus::Sold);
        assert_eq!(ListingStatus::from_wire("reserved"), ListingStatus::Reserved);
        assert_eq!(ListingStatus::from_wire("anything"), ListingStatus::Active);

        assert_eq!(
            NotificationKind::from_wire("price_drop"),
            NotificationKind::PriceDrop
        );
        assert_eq!(
            NotificationKind::from_wire("brand_new_kind"),
            NotificationKind::Other
        );
    }
}
