use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single time entry recorded against a matter.
///
/// Dates travel as `YYYY-MM-DD` strings on the wire; use [`Timecard::date`]
/// for a parsed value.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Timecard {
    pub id: u64,
    pub firm_user_id: u64,
    pub matter_id: Option<u64>,
    pub date: String,
    pub hours: f64,
    pub narrative: Option<String>,
    #[serde(default)]
    pub billable: bool,
}

impl Timecard {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Inclusive date range for a timecard listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecardQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TimecardQuery {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Query-string parameters in the form the timecards endpoint expects.
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            ("fromDate", self.from.format("%Y-%m-%d").to_string()),
            ("toDate", self.to.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paged;

    #[test]
    fn parses_timecard_page() {
        let page: Paged<Timecard> = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "id": 9001,
                        "firmUserId": 101,
                        "matterId": 555,
                        "date": "2024-03-04",
                        "hours": 1.5,
                        "narrative": "Drafted motion",
                        "billable": true
                    },
                    {
                        "id": 9002,
                        "firmUserId": 101,
                        "matterId": null,
                        "date": "2024-03-05",
                        "hours": 0.25,
                        "narrative": null
                    }
                ],
                "page": 1,
                "pageSize": 100,
                "totalCount": 2
            }"#,
        )
        .expect("Failed to parse timecard page");

        assert_eq!(page.results.len(), 2);
        assert!(page.results[0].billable);
        assert!(!page.results[1].billable);
        assert_eq!(
            page.results[0].date(),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
    }

    #[test]
    fn malformed_date_parses_as_none() {
        let card = Timecard {
            id: 1,
            firm_user_id: 1,
            matter_id: None,
            date: "03/04/2024".to_string(),
            hours: 1.0,
            narrative: None,
            billable: false,
        };
        assert!(card.date().is_none());
    }

    #[test]
    fn query_params_use_wire_date_format() {
        let query = TimecardQuery::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
        );
        assert_eq!(
            query.to_params(),
            [
                ("fromDate", "2024-03-01".to_string()),
                ("toDate", "2024-03-15".to_string()),
            ]
        );
    }
}
