use serde::{Deserialize, Serialize};
use std::fmt;

/// A timekeeper belonging to the firm.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FirmUser {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl fmt::Display for FirmUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} (#{})", self.last_name, self.first_name, self.id)?;
        if let Some(email) = &self.email {
            write!(f, " <{}>", email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paged;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "id": 101,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example-firm.com",
                "role": "Attorney",
                "isActive": true
            },
            {
                "id": 102,
                "firstName": "Noah",
                "lastName": "Park",
                "email": null,
                "role": null
            }
        ],
        "page": 1,
        "pageSize": 100,
        "totalCount": 2
    }"#;

    #[test]
    fn parses_firm_user_page() {
        let page: Paged<FirmUser> =
            serde_json::from_str(SAMPLE).expect("Failed to parse firm user page");

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].first_name, "Ada");
        assert!(page.results[0].is_active);
        // isActive missing on the wire defaults to false
        assert!(!page.results[1].is_active);
        assert!(!page.has_more());
    }

    #[test]
    fn display_includes_name_and_email() {
        let page: Paged<FirmUser> =
            serde_json::from_str(SAMPLE).expect("Failed to parse firm user page");

        assert_eq!(
            page.results[0].to_string(),
            "Lovelace, Ada (#101) <ada@example-firm.com>"
        );
        assert_eq!(page.results[1].to_string(), "Park, Noah (#102)");
    }
}
