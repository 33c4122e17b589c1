use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{OrchardError, Result};

/// Every variety the orchard can plant, in ledger column order.
pub const VARIETY_COLUMNS: [&str; 9] = [
    "Ambrosia",
    "Gala",
    "Honeycrisp",
    "Lapins",
    "Sweetheart",
    "Skeena",
    "Redhaven",
    "Elberta",
    "Cresthaven",
];

type SeasonTable = &'static [(&'static str, &'static [u32])];

const APPLE_SEASONS: SeasonTable = &[
    ("Ambrosia", &[9, 10]),
    ("Gala", &[8, 9, 10]),
    ("Honeycrisp", &[9, 10]),
];

const CHERRY_SEASONS: SeasonTable = &[
    ("Lapins", &[6, 7]),
    ("Sweetheart", &[6, 7]),
    ("Skeena", &[7, 8]),
];

const PEACH_SEASONS: SeasonTable = &[
    ("Redhaven", &[7, 8]),
    ("Elberta", &[8, 9]),
    ("Cresthaven", &[8, 9]),
];

/// Fruit type, persisted as its type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Category {
    Apple = 1,
    Cherry = 2,
    Peach = 3,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Apple, Category::Cherry, Category::Peach];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Category::Apple),
            2 => Ok(Category::Cherry),
            3 => Ok(Category::Peach),
            other => Err(OrchardError::CategoryNotFound(other)),
        }
    }

    /// Lowercase type name used in display strings, e.g. `apple`.
    pub fn name(self) -> &'static str {
        match self {
            Category::Apple => "apple",
            Category::Cherry => "cherry",
            Category::Peach => "peach",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Apple => "Apple",
            Category::Cherry => "Cherry",
            Category::Peach => "Peach",
        }
    }

    fn season_table(self) -> SeasonTable {
        match self {
            Category::Apple => APPLE_SEASONS,
            Category::Cherry => CHERRY_SEASONS,
            Category::Peach => PEACH_SEASONS,
        }
    }

    /// Varieties allowed for cultivation under this category.
    pub fn varieties(self) -> impl Iterator<Item = &'static str> {
        self.season_table().iter().map(|(name, _)| *name)
    }

    pub fn season_of(self, variety: &str) -> Option<&'static [u32]> {
        self.season_table()
            .iter()
            .find(|(name, _)| *name == variety)
            .map(|(_, months)| *months)
    }

    /// Resolves the category a variety belongs to from the season tables.
    pub fn of_variety(variety: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.season_of(variety).is_some())
    }
}

impl TryFrom<u8> for Category {
    type Error = OrchardError;

    fn try_from(value: u8) -> Result<Self> {
        Category::from_number(value)
    }
}

impl From<Category> for u8 {
    fn from(value: Category) -> Self {
        value.number()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a season check for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonStatus {
    Available,
    NotYetRipe,
    Ended,
}

impl SeasonStatus {
    pub fn for_month(window: &[u32], month: u32) -> Self {
        if window.contains(&month) {
            SeasonStatus::Available
        } else if window.iter().min().is_some_and(|start| month < *start) {
            SeasonStatus::NotYetRipe
        } else {
            SeasonStatus::Ended
        }
    }

    pub fn is_available(self) -> bool {
        self == SeasonStatus::Available
    }

    pub fn message(self, variety: &Variety) -> String {
        let label = variety.category.label();
        match self {
            SeasonStatus::Available => format!("{} {label} is available now", variety.name),
            SeasonStatus::NotYetRipe => format!("Sorry, {} {label} is not ripe now.", variety.name),
            SeasonStatus::Ended => format!("Sorry, {} {label} season has ended.", variety.name),
        }
    }
}

/// A cultivar record as stored in the fruit catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    #[serde(rename = "type_num")]
    pub category: Category,
    #[serde(rename = "variety")]
    pub name: String,
    pub size: String,
    pub sweet: String,
    pub sour: String,
    pub taste: String,
    pub price: f64,
    #[serde(rename = "use")]
    pub usage: String,
}

impl Variety {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        category: Category,
        name: impl Into<String>,
        size: impl Into<String>,
        sweet: impl Into<String>,
        sour: impl Into<String>,
        taste: impl Into<String>,
        price: f64,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            size: size.into(),
            sweet: sweet.into(),
            sour: sour.into(),
            taste: taste.into(),
            price,
            usage: usage.into(),
        }
    }

    /// Harvest months from the category's season table.
    pub fn season(&self) -> Option<&'static [u32]> {
        self.category.season_of(&self.name)
    }

    pub fn in_season(&self, month: u32) -> SeasonStatus {
        SeasonStatus::for_month(self.season().unwrap_or(&[]), month)
    }

    pub fn describe(&self) -> String {
        format!(
            "{}, {}, {}, {}. It is good for {}",
            self.size, self.sour, self.sweet, self.taste, self.usage
        )
    }

    /// `"Ambrosia apple"` style name used by region reports.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.category.name())
    }
}
