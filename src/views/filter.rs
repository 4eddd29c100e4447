//! Search and filter predicate for the filtered view

use crate::item::ItemRecord;

/// The four filter inputs. Empty values never restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Case-insensitive substring of name, description or category
    pub search: String,
    /// Exact category
    pub category: Option<String>,
    /// Exact location
    pub location: Option<String>,
    /// Exact `purchase_date` string
    pub purchase_date: Option<String>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = term.to_string();
        self
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = normalize(category);
        self
    }

    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = normalize(location);
        self
    }

    pub fn with_purchase_date(mut self, date: Option<&str>) -> Self {
        self.purchase_date = normalize(date);
        self
    }

    /// True when nothing would be filtered out
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.category.is_none()
            && self.location.is_none()
            && self.purchase_date.is_none()
    }

    /// All four predicates must hold
    pub fn matches(&self, item: &ItemRecord) -> bool {
        self.matches_search(item)
            && exact(&self.category, &item.category)
            && exact(&self.location, &item.location)
            && exact(&self.purchase_date, &item.purchase_date)
    }

    fn matches_search(&self, item: &ItemRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        [&item.name, &item.description, &item.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Records passing `query`, in input order
pub fn filter_items<'a>(items: &'a [ItemRecord], query: &FilterQuery) -> Vec<&'a ItemRecord> {
    items.iter().filter(|item| query.matches(item)).collect()
}

pub(crate) fn normalize(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn exact(filter: &Option<String>, value: &str) -> bool {
    match filter {
        Some(wanted) if !wanted.is_empty() => wanted == value,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::sample_sheet_records;

    fn names(items: &[&ItemRecord]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn empty_query_passes_everything() {
        let items = sample_sheet_records();
        assert_eq!(filter_items(&items, &FilterQuery::new()).len(), items.len());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let items = sample_sheet_records();
        let by_name = filter_items(&items, &FilterQuery::new().with_search("CHAIR"));
        assert_eq!(names(&by_name), vec!["Gaming Chair", "Office Chair"]);

        let by_description = filter_items(&items, &FilterQuery::new().with_search("lumbar"));
        assert_eq!(by_description.len(), 2);

        let by_category = filter_items(&items, &FilterQuery::new().with_search("clothing"));
        assert_eq!(names(&by_category), vec!["Winter Jacket"]);
    }

    #[test]
    fn location_is_not_searched() {
        let items = sample_sheet_records();
        assert!(filter_items(&items, &FilterQuery::new().with_search("bedroom")).is_empty());
    }

    #[test]
    fn filters_combine() {
        let items = sample_sheet_records();
        let query = FilterQuery::new()
            .with_category(Some("Electronics"))
            .with_location(Some("Living Room"))
            .with_search("tv");
        assert_eq!(names(&filter_items(&items, &query)), vec!["Smart TV"]);
    }

    #[test]
    fn category_is_exact() {
        let items = sample_sheet_records();
        let query = FilterQuery::new().with_category(Some("electronics"));
        assert!(filter_items(&items, &query).is_empty());
    }

    #[test]
    fn date_is_string_equality() {
        let items = sample_sheet_records();
        let query = FilterQuery::new().with_purchase_date(Some("2023-01-15"));
        assert_eq!(names(&filter_items(&items, &query)), vec!["MacBook Pro"]);
        let query = FilterQuery::new().with_purchase_date(Some("2023-1-15"));
        assert!(filter_items(&items, &query).is_empty());
    }

    #[test]
    fn empty_filter_values_are_none() {
        let query = FilterQuery::new().with_category(Some("")).with_location(None);
        assert!(query.is_empty());
    }
}
