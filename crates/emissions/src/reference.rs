use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Emissions category of an ingredient.
///
/// Declaration order matters: the classifier walks categories in this order
/// and the first matching item wins.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Meat,
    Dairy,
    Grains,
    Vegetables,
    Fruits,
    Oils,
    Spices,
}

/// Factor used when an ingredient has no category, in kg CO2e per kg.
pub const DEFAULT_FACTOR: f64 = 3.0;

/// One category with its items, kept in declaration order.
#[derive(Debug)]
pub struct CategoryTable {
    pub category: Category,
    pub items: &'static [(&'static str, f64)],
}

impl CategoryTable {
    /// Exact factor for a lowercase item key.
    pub fn factor(&self, item: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|(name, _)| *name == item)
            .map(|(_, factor)| *factor)
    }

    /// Arithmetic mean of every factor in the category.
    pub fn average(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }

        let sum: f64 = self.items.iter().map(|(_, factor)| factor).sum();
        let avg = sum / self.items.len() as f64;

        avg.is_finite().then_some(avg)
    }
}

static STANDARD: &[CategoryTable] = &[
    CategoryTable {
        category: Category::Meat,
        items: &[
            ("beef", 60.0),
            ("chicken", 5.7),
            ("pork", 6.0),
            ("lamb", 39.2),
            ("turkey", 10.9),
        ],
    },
    CategoryTable {
        category: Category::Dairy,
        items: &[
            ("milk", 1.9),
            ("cheese", 21.0),
            ("yogurt", 2.5),
            ("eggs", 4.2),
        ],
    },
    CategoryTable {
        category: Category::Grains,
        items: &[
            ("rice", 2.7),
            ("wheat", 1.4),
            ("corn", 1.1),
            ("oats", 1.6),
        ],
    },
    CategoryTable {
        category: Category::Vegetables,
        items: &[
            ("tomatoes", 1.1),
            ("potatoes", 0.3),
            ("onions", 0.3),
            ("carrots", 0.3),
            ("lettuce", 0.4),
        ],
    },
    CategoryTable {
        category: Category::Fruits,
        items: &[
            ("apples", 0.3),
            ("bananas", 0.7),
            ("oranges", 0.4),
            ("mangoes", 0.8),
        ],
    },
    CategoryTable {
        category: Category::Oils,
        items: &[
            ("olive oil", 5.4),
            ("vegetable oil", 3.1),
            ("butter", 9.0),
        ],
    },
    CategoryTable {
        category: Category::Spices,
        items: &[("default", 0.1)],
    },
];

/// Read-only table of emissions factors (kg CO2e per kg of food).
///
/// Cheap to copy; every instance points at process-wide static data.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTable {
    categories: &'static [CategoryTable],
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReferenceTable {
    pub fn standard() -> Self {
        Self {
            categories: STANDARD,
        }
    }

    /// Build a table over custom static data, mostly useful for tests.
    pub fn from_static(categories: &'static [CategoryTable]) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static CategoryTable> {
        self.categories.iter()
    }

    pub fn category(&self, category: Category) -> Option<&'static CategoryTable> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Factor for an ingredient in `category`.
    ///
    /// Exact item match first, then the category average, then
    /// [`DEFAULT_FACTOR`] for unknown or empty categories.
    pub fn factor(&self, category: Option<Category>, normalized_name: &str) -> f64 {
        let Some(table) = category.and_then(|c| self.category(c)) else {
            return DEFAULT_FACTOR;
        };

        table
            .factor(normalized_name)
            .or_else(|| table.average())
            .unwrap_or(DEFAULT_FACTOR)
    }
}
