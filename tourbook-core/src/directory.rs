//! Admin user directory: tourist profiles, admin profiles and guides are
//! separate collections, so the listing is a union sorted and paged in memory.

use serde::{Deserialize, Serialize};
use tourbook_shared::Pagination;

use crate::models::ProfileRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring over `name` and `email`.
    pub search: Option<String>,
    /// Exact match on `role`.
    pub role: Option<String>,
}

impl DirectoryFilter {
    pub fn new(search: Option<String>, role: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            role: role.filter(|r| !r.is_empty()),
        }
    }

    pub fn matches(&self, record: &ProfileRecord) -> bool {
        if let Some(role) = &self.role {
            if record.role.as_deref() != Some(role.as_str()) {
                return false;
            }
        }
        match &self.search {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [record.name.as_deref(), record.email.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryPage {
    pub users: Vec<ProfileRecord>,
    pub total: usize,
}

pub fn merge_page(groups: Vec<Vec<ProfileRecord>>, pagination: Pagination) -> DirectoryPage {
    let mut users: Vec<ProfileRecord> = groups.into_iter().flatten().collect();
    let total = users.len();
    users.sort_by_cached_key(|u| u.sort_key().to_lowercase());
    DirectoryPage {
        users: pagination.apply(users),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Extra;

    fn record(id: &str, name: Option<&str>, email: Option<&str>, role: Option<&str>) -> ProfileRecord {
        ProfileRecord {
            id: id.to_string(),
            email: email.map(String::from),
            name: name.map(String::from),
            role: role.map(String::from),
            extra: Extra::new(),
        }
    }

    #[test]
    fn test_merge_sorts_by_name_then_email() {
        let tourists = vec![record("1", Some("zara"), None, Some("user"))];
        let admins = vec![record("2", None, Some("admin@example.com"), Some("admin"))];
        let guides = vec![record("3", Some("Bashir"), Some("b@example.com"), Some("tour guide"))];

        let page = merge_page(vec![tourists, admins, guides], Pagination::default());
        let ids: Vec<&str> = page.users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_total_counts_before_paging() {
        let group: Vec<ProfileRecord> = (0..15)
            .map(|i| record(&i.to_string(), Some(&format!("user{:02}", i)), None, None))
            .collect();
        let page = merge_page(vec![group], Pagination::new(2, 10));
        assert_eq!(page.total, 15);
        assert_eq!(page.users.len(), 5);
        assert_eq!(page.users[0].name.as_deref(), Some("user10"));
    }

    #[test]
    fn test_filter_search_and_role() {
        let filter = DirectoryFilter::new(Some("RAF".into()), Some("user".into()));
        assert!(filter.matches(&record("1", Some("Rafi"), None, Some("user"))));
        assert!(filter.matches(&record("2", None, Some("rafa@x.com"), Some("user"))));
        assert!(!filter.matches(&record("3", Some("Rafi"), None, Some("tour guide"))));
        assert!(!filter.matches(&record("4", Some("Mina"), None, Some("user"))));
    }

    #[test]
    fn test_empty_filter_values_are_ignored() {
        let filter = DirectoryFilter::new(Some(String::new()), Some(String::new()));
        assert_eq!(filter, DirectoryFilter::default());
        assert!(filter.matches(&record("1", None, None, None)));
    }
}
