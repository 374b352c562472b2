use serde::{Deserialize, Serialize};

pub mod firm;
pub mod timecard;
pub mod token;

/// Paged list envelope shared by the TimeSolv list endpoints.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> Paged<T> {
    /// Whether another page remains after this one.
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_envelope_reports_remaining_pages() {
        let page: Paged<u32> = serde_json::from_str(
            r#"{"results":[1,2,3],"page":1,"pageSize":3,"totalCount":7}"#,
        )
        .expect("Failed to parse paged envelope");

        assert_eq!(page.results, vec![1, 2, 3]);
        assert!(page.has_more());

        let last: Paged<u32> = serde_json::from_str(
            r#"{"results":[7],"page":3,"pageSize":3,"totalCount":7}"#,
        )
        .expect("Failed to parse paged envelope");
        assert!(!last.has_more());
    }

    #[test]
    fn empty_first_page_is_valid() {
        let page: Paged<u32> =
            serde_json::from_str(r#"{"results":[],"page":1,"pageSize":100,"totalCount":0}"#)
                .expect("Failed to parse paged envelope");
        assert!(page.results.is_empty());
        assert!(!page.has_more());
    }
}
