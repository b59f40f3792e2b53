use crate::reference::{Category, ReferenceTable};

/// Classifier Service
///
/// Stateless service that maps an ingredient to an emissions category by
/// bidirectional substring matching against the reference table.
///
/// The ingredient name is lowercased and otherwise left untouched. A pair
/// `(category, item)` matches when the name contains `item` or `item`
/// contains the name. Categories and items are walked in table order and
/// the first match wins, so overlapping keywords resolve to whichever
/// category is declared first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierService {
    table: ReferenceTable,
}

impl ClassifierService {
    pub fn new(table: ReferenceTable) -> Self {
        Self { table }
    }

    /// Returns `None` when no reference item matches ("unknown"), including
    /// for an empty or whitespace-only name.
    pub fn classify(&self, ingredient_name: &str) -> Option<Category> {
        if ingredient_name.trim().is_empty() {
            return None;
        }

        let normalized = normalize(ingredient_name);

        self.table
            .categories()
            .find(|table| {
                table
                    .items
                    .iter()
                    .any(|(item, _)| normalized.contains(item) || item.contains(normalized.as_str()))
            })
            .map(|table| table.category)
    }
}

pub(crate) fn normalize(ingredient_name: &str) -> String {
    ingredient_name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::CategoryTable;

    fn classify(name: &str) -> Option<Category> {
        ClassifierService::default().classify(name)
    }

    #[test]
    fn test_classify_contains_item() {
        assert_eq!(classify("beef stew"), Some(Category::Meat));
        assert_eq!(classify("grilled chicken"), Some(Category::Meat));
        assert_eq!(classify("brown rice"), Some(Category::Grains));
        assert_eq!(classify("extra virgin olive oil"), Some(Category::Oils));
    }

    #[test]
    fn test_classify_item_contains_name() {
        assert_eq!(classify("chick"), Some(Category::Meat));
        assert_eq!(classify("potato"), Some(Category::Vegetables));
        assert_eq!(classify("mango"), Some(Category::Fruits));
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("CHEESE"), Some(Category::Dairy));
        assert_eq!(classify("Lettuce"), Some(Category::Vegetables));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("xyz123"), None);
        assert_eq!(classify("unobtainium"), None);
    }

    #[test]
    fn test_classify_blank_name() {
        // "" is a substring of every item, so it must not reach the table walk.
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_first_declared_category_wins() {
        // "butter" (oils) appears after "milk" (dairy); "buttermilk" hits dairy first.
        assert_eq!(classify("buttermilk"), Some(Category::Dairy));
        // "corn" (grains) precedes "oils".
        assert_eq!(classify("corn oil"), Some(Category::Grains));
    }

    #[test]
    fn test_table_order_drives_resolution() {
        static BROTH_FIRST: &[CategoryTable] = &[
            CategoryTable {
                category: Category::Spices,
                items: &[("broth", 0.1)],
            },
            CategoryTable {
                category: Category::Meat,
                items: &[("chicken", 5.7)],
            },
        ];
        let classifier = ClassifierService::new(ReferenceTable::from_static(BROTH_FIRST));

        assert_eq!(classifier.classify("chicken broth"), Some(Category::Spices));
        assert_eq!(classify("chicken broth"), Some(Category::Meat));
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        // A padded name still contains the item.
        assert_eq!(classify("  milk  "), Some(Category::Dairy));
    }
}
