//! Browse-side filtering and ordering of marketplace listings.

use super::entities::{Listing, ListingStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogSort {
    #[default]
    Newest,
    PriceLowHigh,
    PriceHighLow,
    BestCondition,
    MostViewed,
}

impl CatalogSort {
    pub const ALL: [CatalogSort; 5] = [
        CatalogSort::Newest,
        CatalogSort::PriceLowHigh,
        CatalogSort::PriceHighLow,
        CatalogSort::BestCondition,
        CatalogSort::MostViewed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CatalogSort::Newest => "Newest",
            CatalogSort::PriceLowHigh => "Price: low to high",
            CatalogSort::PriceHighLow => "Price: high to low",
            CatalogSort::BestCondition => "Best condition",
            CatalogSort::MostViewed => "Most viewed",
        }
    }
}

/// Client-side filters for the market page. Everything is applied locally
/// so typing in the search box never triggers a refetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogFilter {
    pub query: String,
    pub category: Option<String>,
    pub status: Option<ListingStatus>,
    pub min_score: Option<u8>,
}

impl CatalogFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let isbn = listing.isbn.clone().unwrap_or_default();
            let haystack =
                format!("{} {} {isbn}", listing.title, listing.authors).to_lowercase();
            if !haystack.contains(&query) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &listing.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if listing.status != status {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if listing.condition_score < min {
                return false;
            }
        }
        true
    }
}

pub fn filter_listings(listings: &[Listing], filter: &CatalogFilter) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| filter.matches(listing))
        .cloned()
        .collect()
}

pub fn sort_listings(listings: &mut [Listing], sort: CatalogSort) {
    listings.sort_by(|a, b| match sort {
        CatalogSort::Newest => b.created_at.cmp(&a.created_at),
        CatalogSort::PriceLowHigh => a.price.cmp(&b.price),
        CatalogSort::PriceHighLow => b.price.cmp(&a.price),
        CatalogSort::BestCondition => b.condition_score.cmp(&a.condition_score),
        CatalogSort::MostViewed => b.views.cmp(&a.views),
    });
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use pretty_assertions::assert_eq;

    fn listing(id: i64, title: &str, price: u64, score: u8, days_old: u64) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            authors: "Kateb Yacine".to_string(),
            category: "Fiction".to_string(),
            description: None,
            location: None,
            price,
            market_price: None,
            condition_score: score,
            status: ListingStatus::Active,
            cover_url: None,
            photos: Vec::new(),
            page_count: None,
            publication_date: None,
            isbn: Some(format!("97820000000{id:02}")),
            seller: None,
            views: id as u32 * 10,
            created_at: SystemTime::UNIX_EPOCH
                + Duration::from_secs((1000 - days_old) * 86_400),
        }
    }

    fn shelf() -> Vec<Listing> {
        vec![
            listing(1, "Nedjma", 900, 95, 3),
            listing(2, "La Grande Maison", 450, 60, 1),
            listing(3, "L'Incendie", 1200, 80, 7),
        ]
    }

    #[test]
    fn search_matches_title_authors_and_isbn() {
        let listings = shelf();
        let mut filter = CatalogFilter {
            query: "nedjma".to_string(),
            ..CatalogFilter::default()
        };
        assert_eq!(filter_listings(&listings, &filter).len(), 1);

        filter.query = "kateb".to_string();
        assert_eq!(filter_listings(&listings, &filter).len(), 3);

        filter.query = "9782000000002".to_string();
        let hits = filter_listings(&listings, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        filter.query = "tintin".to_string();
        assert!(filter_listings(&listings, &filter).is_empty());
    }

    #[test]
    fn category_status_and_score_filters_stack() {
        let mut listings = shelf();
        listings[1].category = "Textbooks".to_string();
        listings[2].status = ListingStatus::Sold;

        let filter = CatalogFilter {
            category: Some("Fiction".to_string()),
            status: Some(ListingStatus::Active),
            min_score: Some(90),
            ..CatalogFilter::default()
        };
        let hits = filter_listings(&listings, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let listings = shelf();
        assert_eq!(
            filter_listings(&listings, &CatalogFilter::default()).len(),
            listings.len()
        );
    }

    #[test]
    fn sort_orders_match_their_labels() {
        let mut listings = shelf();

        sort_listings(&mut listings, CatalogSort::Newest);
        assert_eq!(ids(&listings), [2, 1, 3]);

        sort_listings(&mut listings, CatalogSort::PriceLowHigh);
        assert_eq!(ids(&listings), [2, 1, 3]);

        sort_listings(&mut listings, CatalogSort::PriceHighLow);
        assert_eq!(ids(&listings), [3, 1, 2]);

        sort_listings(&mut listings, CatalogSort::BestCondition);
        assert_eq!(ids(&listings), [1, 3, 2]);

        sort_listings(&mut listings, CatalogSort::MostViewed);
        assert_eq!(ids(&listings), [3, 2, 1]);
    }

    fn ids(listings: &[Listing]) -> Vec<i64> {
        listings.iter().map(|listing| listing.id).collect()
    }
}
