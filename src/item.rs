//! Inventory records and the coercion rules applied to loosely-typed input
//!
//! Every value that enters from outside (a form submission or a spreadsheet
//! row) goes through the functions in this module. Nothing downstream
//! re-validates.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Column headers of the spreadsheet, in positional order
pub const SHEET_HEADER: [&str; 9] = [
    "Item Name",
    "Category",
    "Location",
    "Quantity",
    "Price",
    "Purchase Date",
    "Description",
    "Image URL",
    "Low Stock Threshold",
];

/// Threshold used when the input has none or it cannot be parsed
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 1;

/// Identifier of a record, unique within a store for its lifetime
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One inventory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub location: String,
    pub quantity: u32,
    /// `None` when the source had no parseable price
    pub price: Option<f64>,
    /// ISO date (`YYYY-MM-DD`) or empty
    pub purchase_date: String,
    pub description: String,
    /// URL or data URI; `None` renders a placeholder
    pub image: Option<String>,
    pub low_stock_threshold: u32,
}

impl ItemRecord {
    /// Map one spreadsheet row positionally onto a record.
    ///
    /// Returns `None` for rows whose name cell is missing or blank; such rows
    /// are dropped rather than loaded.
    pub fn from_row(row: &[String], id: ItemId) -> Option<Self> {
        let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

        let name = coerce_text(cell(0));
        if name.is_empty() {
            return None;
        }

        Some(Self {
            id,
            name,
            category: coerce_text(cell(1)),
            location: coerce_text(cell(2)),
            quantity: coerce_quantity(cell(3)),
            price: coerce_price(cell(4)),
            purchase_date: coerce_text(cell(5)),
            description: coerce_text(cell(6)),
            image: coerce_image(cell(7)),
            low_stock_threshold: coerce_threshold(cell(8)),
        })
    }

    /// The nine cells written for this record, in header order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.location.clone(),
            self.quantity.to_string(),
            self.price.map(|p| p.to_string()).unwrap_or_default(),
            self.purchase_date.clone(),
            self.description.clone(),
            self.image.clone().unwrap_or_default(),
            self.low_stock_threshold.to_string(),
        ]
    }

    /// Price as shown to the user
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }
}

/// Untyped field values as they arrive from an add or edit form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub location: String,
    pub quantity: String,
    pub price: String,
    pub purchase_date: String,
    pub description: String,
    pub image: Option<String>,
    pub low_stock_threshold: Option<String>,
}

impl ItemDraft {
    /// Coerce the draft into a record carrying `id`
    pub fn into_record(self, id: ItemId) -> Result<ItemRecord, StoreError> {
        let name = coerce_text(&self.name);
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        Ok(ItemRecord {
            id,
            name,
            category: coerce_text(&self.category),
            location: coerce_text(&self.location),
            quantity: coerce_quantity(&self.quantity),
            price: coerce_price(&self.price),
            purchase_date: coerce_text(&self.purchase_date),
            description: coerce_text(&self.description),
            image: self.image.as_deref().and_then(coerce_image),
            low_stock_threshold: self
                .low_stock_threshold
                .as_deref()
                .map(coerce_threshold)
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        })
    }
}

impl From<&ItemRecord> for ItemDraft {
    fn from(record: &ItemRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            location: record.location.clone(),
            quantity: record.quantity.to_string(),
            price: record.price.map(|p| p.to_string()).unwrap_or_default(),
            purchase_date: record.purchase_date.clone(),
            description: record.description.clone(),
            image: record.image.clone(),
            low_stock_threshold: Some(record.low_stock_threshold.to_string()),
        }
    }
}

pub fn coerce_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Leading integer of `raw`, clamped to zero and above; unparseable is 0
pub fn coerce_quantity(raw: &str) -> u32 {
    leading_integer(raw).map(clamp_non_negative).unwrap_or(0)
}

/// Leading integer of `raw`, clamped to zero and above; unparseable is 1
pub fn coerce_threshold(raw: &str) -> u32 {
    leading_integer(raw)
        .map(clamp_non_negative)
        .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
}

/// Leading decimal of `raw`.
///
/// A leading `$` and thousands separators are tolerated since formatted
/// spreadsheet cells carry them. Negative or unparseable input is `None`.
pub fn coerce_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    leading_decimal(&cleaned).filter(|p| p.is_finite() && *p >= 0.0)
}

fn coerce_image(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a quick-edit quantity.
///
/// Stricter than [`coerce_quantity`]: the whole input must be a number, and
/// negative values are refused instead of clamped. Decimals truncate.
pub fn parse_quantity_input(raw: &str) -> Result<u32, StoreError> {
    let trimmed = raw.trim();
    let invalid = || StoreError::InvalidQuantity(raw.to_string());

    if let Ok(n) = trimmed.parse::<i64>() {
        return u32::try_from(n).map_err(|_| invalid());
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n <= u32::MAX as f64 => Ok(n.trunc() as u32),
        _ => Err(invalid()),
    }
}

/// `"$12.50"` or `"N/A"`
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => "N/A".to_string(),
    }
}

/// Encode an uploaded image so it can be stored inline in the `image` field
pub fn image_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn clamp_non_negative(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}

fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate rather than fail on absurdly long digit runs
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn leading_decimal(raw: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in raw.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    raw[..end].parse::<f64>().ok()
}

/// The seed collection used when the spreadsheet cannot be read
pub fn sample_items() -> Vec<ItemRecord> {
    sample_sheet_records().into_iter().take(3).collect()
}

/// The ten-record sample sheet, ids 1 through 10
pub fn sample_sheet_records() -> Vec<ItemRecord> {
    const ROWS: [[&str; 9]; 10] = [
        ["MacBook Pro", "Electronics", "Living Room", "1", "2499.99", "2023-01-15", "13-inch MacBook Pro with M2 chip", "https://via.placeholder.com/300x200?text=MacBook+Pro", "1"],
        ["Gaming Chair", "Furniture", "Bedroom", "0", "299.99", "2023-03-10", "Ergonomic gaming chair with lumbar support", "https://via.placeholder.com/300x200?text=Gaming+Chair", "1"],
        ["Coffee Maker", "Appliances", "Kitchen", "1", "149.99", "2023-02-20", "Programmable drip coffee maker", "https://via.placeholder.com/300x200?text=Coffee+Maker", "1"],
        ["Wireless Headphones", "Electronics", "Living Room", "2", "199.99", "2023-04-05", "Noise-cancelling wireless headphones", "https://via.placeholder.com/300x200?text=Headphones", "1"],
        ["Dining Table", "Furniture", "Kitchen", "1", "899.99", "2022-12-10", "Solid wood dining table for 6 people", "https://via.placeholder.com/300x200?text=Dining+Table", "1"],
        ["Smart TV", "Electronics", "Living Room", "1", "1299.99", "2023-06-20", "55-inch 4K Smart TV with HDR", "https://via.placeholder.com/300x200?text=Smart+TV", "1"],
        ["Office Chair", "Furniture", "Bedroom", "1", "349.99", "2023-07-15", "Ergonomic office chair with lumbar support", "https://via.placeholder.com/300x200?text=Office+Chair", "1"],
        ["Robot Vacuum", "Appliances", "Living Room", "1", "399.99", "2023-08-01", "Smart robot vacuum with app control", "https://via.placeholder.com/300x200?text=Robot+Vacuum", "1"],
        ["Winter Jacket", "Clothing", "Bedroom", "3", "129.99", "2023-09-10", "Waterproof winter jacket", "https://via.placeholder.com/300x200?text=Winter+Jacket", "2"],
        ["Kitchen Knives Set", "Appliances", "Kitchen", "1", "89.99", "2023-05-25", "Professional chef knife set with block", "https://via.placeholder.com/300x200?text=Knife+Set", "1"],
    ];

    ROWS.iter()
        .zip(1i64..)
        .filter_map(|(row, id)| {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            ItemRecord::from_row(&cells, ItemId(id))
        })
        .collect()
}

/// Tab-separated header and sample rows, ready to paste into a sheet at A1
pub fn manual_setup_instructions(spreadsheet_url: &str) -> String {
    let mut text = format!(
        "MANUAL SETUP INSTRUCTIONS:\n\n\
         1. Open your spreadsheet:\n   {}\n\n\
         2. Paste the rows below into the sheet starting at cell A1\n\n\
         3. Reload to load the data\n\n",
        spreadsheet_url
    );
    text.push_str(&SHEET_HEADER.join("\t"));
    text.push('\n');
    for record in sample_sheet_records() {
        text.push_str(&record.to_row().join("\t"));
        text.push('\n');
    }
    text
}
