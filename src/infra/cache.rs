//! Persistent on-disk caching for the category list.

use std::{
    fs,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

const CACHE_FILENAME: &str = "category_cache.json";

/// Cache TTL: 7 days. Categories are curated server-side and rarely move.
pub const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCache {
    /// Unix timestamp (seconds) when this cache was created.
    pub cached_at: u64,
    pub categories: Vec<String>,
}

impl CategoryCache {
    pub fn new(categories: Vec<String>) -> Self {
        let cached_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            cached_at,
            categories,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > CATEGORY_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

/// Get the cache file path (in app data directory).
fn cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitab-market");

        // Ensure directory exists
        let _ = fs::create_dir_all(&base);

        base.join(CACHE_FILENAME)
    })
    .clone()
}

/// Load the category cache from disk, if it exists.
pub fn load_category_cache() -> Option<CategoryCache> {
    let path = cache_path();

    if !path.exists() {
        println!("[cache] No category cache found at {}", path.display());
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(cache) => {
                println!("[cache] Loaded category cache from {}", path.display());
                Some(cache)
            }
            Err(e) => {
                println!("[cache] Failed to parse category cache: {e}");
                None
            }
        },
        Err(e) => {
            println!("[cache] Failed to read category cache: {e}");
            None
        }
    }
}

/// Save the category cache to disk.
pub fn save_category_cache(cache: &CategoryCache) -> Result<(), std::io::Error> {
    let path = cache_path();
    let content = serde_json::to_string_pretty(cache)?;
    fs::write(&path, content)?;
    println!(
        "[cache] Saved category cache ({} categories) to {}",
        cache.categories.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_caches_are_not_expired() {
        let cache = CategoryCache::new(vec!["Fiction".to_string()]);
        assert!(!cache.is_expired());
        assert_eq!(cache.age_string(), "0s");
    }

    #[test]
    fn ancient_caches_expire() {
        let cache = CategoryCache {
            cached_at: 0,
            categories: Vec::new(),
        };
        assert!(cache.is_expired());
    }

    #[test]
    fn age_strings_pick_the_largest_unit() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let at = |secs_ago: u64| CategoryCache {
            cached_at: now - secs_ago,
            categories: Vec::new(),
        };
        assert_eq!(at(30).age_string(), "30s");
        assert_eq!(at(5 * 60).age_string(), "5m");
        assert_eq!(at(3 * 3600).age_string(), "3h");
        assert_eq!(at(2 * 86400).age_string(), "2d");
    }
}
