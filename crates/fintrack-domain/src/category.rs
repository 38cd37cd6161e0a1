//! Display and taxonomy records for transaction categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Named category with presentation hints.
///
/// Transactions carry their category as free text, so a `Category` record is
/// optional metadata and may diverge from what entries actually use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: EntryKind,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        kind: EntryKind,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            kind,
            color: color.into(),
            icon: None,
        }
    }

    /// Case-insensitive name match restricted to the same kind.
    pub fn matches(&self, name: &str, kind: EntryKind) -> bool {
        self.kind == kind && self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserOwned for Category {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}
