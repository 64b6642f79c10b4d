use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownCategory {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Healthcare,
    Education,
    Other,
}

impl KnownCategory {
    pub const ALL: [Self; 8] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Bills,
        Self::Entertainment,
        Self::Healthcare,
        Self::Education,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Numeric code used as the clustering feature.
    pub const fn code(self) -> u8 {
        match self {
            Self::Food => 1,
            Self::Transport => 2,
            Self::Shopping => 3,
            Self::Bills => 4,
            Self::Entertainment => 5,
            Self::Healthcare => 6,
            Self::Education => 7,
            Self::Other => 8,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Known(KnownCategory),
    Unknown(String),
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match KnownCategory::from_label(trimmed) {
            Some(known) => Self::Known(known),
            None => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Known(known) => known.as_str(),
            Self::Unknown(name) => name,
        }
    }

    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Known(known) => Some(known.code()),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
}

impl ExpenseRecord {
    pub fn new(date: NaiveDate, amount: f64, category: Category) -> Self {
        Self {
            date,
            amount,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Position in the caller's input.
    pub index: usize,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub month_index: i64,
}

impl NormalizedRecord {
    pub fn category_code(&self) -> Option<u8> {
        self.category.code()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<NormalizedRecord>,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.amount).collect()
    }

    pub fn total_amount(&self) -> f64 {
        self.records.iter().map(|record| record.amount).sum()
    }

    /// Whole days between the earliest and latest record.
    pub fn day_span(&self) -> i64 {
        (self.latest - self.earliest).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, KnownCategory};

    #[test]
    fn vocabulary_codes_run_one_through_eight() {
        let codes = KnownCategory::ALL
            .iter()
            .map(|category| category.code())
            .collect::<Vec<u8>>();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn unknown_labels_have_no_code() {
        let category = Category::from_label("Groceries");
        assert_eq!(category, Category::Unknown("Groceries".to_string()));
        assert_eq!(category.code(), None);
    }

    #[test]
    fn known_labels_match_exactly_after_trimming() {
        assert_eq!(
            Category::from_label("  Bills "),
            Category::Known(KnownCategory::Bills)
        );
        assert_eq!(
            Category::from_label("bills"),
            Category::Unknown("bills".to_string())
        );
    }
}
