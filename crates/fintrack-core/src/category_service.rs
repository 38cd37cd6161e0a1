//! Lookup and auto-creation of category records.

use fintrack_domain::{Category, EntryKind};

/// Colors assigned to automatically created categories.
pub const CATEGORY_PALETTE: [&str; 7] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6",
];

pub struct CategoryService;

impl CategoryService {
    pub fn find<'a>(
        categories: &'a [Category],
        name: &str,
        kind: EntryKind,
    ) -> Option<&'a Category> {
        categories.iter().find(|category| category.matches(name, kind))
    }

    /// Returns a new category when none with this name and kind exists yet.
    pub fn ensure(
        categories: &[Category],
        user_id: &str,
        name: &str,
        kind: EntryKind,
    ) -> Option<Category> {
        if Self::find(categories, name, kind).is_some() {
            return None;
        }
        Some(Category::new(user_id, name.trim(), kind, Self::palette_color(name)))
    }

    /// Stable palette pick derived from the category name.
    pub fn palette_color(name: &str) -> &'static str {
        let seed = name
            .to_lowercase()
            .bytes()
            .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as usize));
        CATEGORY_PALETTE[seed % CATEGORY_PALETTE.len()]
    }
}
