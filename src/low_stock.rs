//! Low-stock detection

use serde::{Deserialize, Serialize};

use crate::item::ItemRecord;

/// How quantity is compared to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowStockPolicy {
    /// `quantity <= threshold`
    AtOrBelow,

    /// `quantity < threshold`
    #[default]
    Below,
}

impl LowStockPolicy {
    pub fn is_low(&self, item: &ItemRecord) -> bool {
        match self {
            LowStockPolicy::AtOrBelow => item.quantity <= item.low_stock_threshold,
            LowStockPolicy::Below => item.quantity < item.low_stock_threshold,
        }
    }

    /// Highlight class for a quantity, consistent with the low-stock list
    pub fn badge(&self, item: &ItemRecord) -> QuantityBadge {
        if self.is_low(item) {
            QuantityBadge::Low
        } else {
            QuantityBadge::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityBadge {
    Low,
    Normal,
}

/// Records the policy flags as low, in collection order
pub fn low_stock_items<'a>(items: &'a [ItemRecord], policy: LowStockPolicy) -> Vec<&'a ItemRecord> {
    items.iter().filter(|item| policy.is_low(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{sample_items, sample_sheet_records};

    #[test]
    fn inclusive_policy_on_seed() {
        let items = sample_items();
        let low: Vec<&str> = low_stock_items(&items, LowStockPolicy::AtOrBelow)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        // quantity 1 with threshold 1 counts as low
        assert_eq!(low, vec!["MacBook Pro", "Gaming Chair", "Coffee Maker"]);
    }

    #[test]
    fn strict_policy_on_seed() {
        let items = sample_items();
        let low: Vec<&str> = low_stock_items(&items, LowStockPolicy::Below)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(low, vec!["Gaming Chair"]);
    }

    #[test]
    fn default_is_strict() {
        assert_eq!(LowStockPolicy::default(), LowStockPolicy::Below);
    }

    #[test]
    fn badge_matches_policy() {
        let items = sample_sheet_records();
        let jacket = items.iter().find(|i| i.name == "Winter Jacket").unwrap();
        assert_eq!(LowStockPolicy::AtOrBelow.badge(jacket), QuantityBadge::Normal);
        let chair = items.iter().find(|i| i.name == "Gaming Chair").unwrap();
        assert_eq!(LowStockPolicy::Below.badge(chair), QuantityBadge::Low);
    }
}
