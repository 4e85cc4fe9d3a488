//! Paginated response envelope.

use serde::{Deserialize, Serialize};

/// Pagination metadata. Only `last_page` drives fetching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One page of a paginated listing: `{ "meta": {...}, "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub meta: Option<PageMeta>,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages to fetch in total. A missing `last_page` means one.
    pub fn last_page(&self) -> u64 {
        self.meta
            .as_ref()
            .and_then(|m| m.last_page)
            .unwrap_or(1)
    }
}

/// Every page of a listing, concatenated in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllPages<T> {
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_meta_is_single_page() {
        let page: Page<u32> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(page.last_page(), 1);

        let page: Page<u32> = serde_json::from_str(r#"{"meta":{"total":2},"data":[1,2]}"#).unwrap();
        assert_eq!(page.last_page(), 1);
    }

    #[test]
    fn test_last_page_read_from_meta() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"meta":{"current_page":1,"last_page":4,"per_page":2,"total":8},"data":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(page.last_page(), 4);
    }
}
