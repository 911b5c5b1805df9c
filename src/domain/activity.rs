use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry in the user activity audit trail.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: i32,
    pub username: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewActivityEntry {
    pub username: String,
    pub action: String,
    pub details: Option<String>,
}

impl NewActivityEntry {
    pub fn new(username: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            action: action.into(),
            details: None,
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        // Long SQL texts are clipped so the audit table stays readable.
        let clipped = if details.chars().count() > 120 {
            let mut s: String = details.chars().take(117).collect();
            s.push_str("...");
            s
        } else {
            details
        };
        self.details = Some(clipped);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_clipped() {
        let entry = NewActivityEntry::new("admin", "Query executed").details("x".repeat(300));
        let details = entry.details.unwrap();
        assert_eq!(details.chars().count(), 120);
        assert!(details.ends_with("..."));
    }

    #[test]
    fn short_details_pass_through() {
        let entry = NewActivityEntry::new("admin", "Login").details("ok");
        assert_eq!(entry.details.as_deref(), Some("ok"));
    }
}
