//! Category taxonomy: top-level categories with embedded subcategories.
//!
//! Categories are soft-deleted only (`is_active` flips to false); products
//! reference them by name, so a category name is a unique key. Subcategories
//! have no existence outside their parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{CategoryId, DomainError, DomainResult, SubcategoryId, UserId};

/// Presentation metadata for a subcategory. Not validated against the
/// products filed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategorySpecs {
    #[serde(default)]
    pub common_sizes: Vec<String>,
    #[serde(default)]
    pub common_materials: Vec<String>,
    #[serde(default)]
    pub pressure_ratings: Vec<String>,
    #[serde(default)]
    pub temperature_range: Option<String>,
}

/// A subcategory embedded in its parent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: SubcategorySpecs,
}

/// Incoming payload for adding a subcategory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: SubcategorySpecs,
}

/// Partial update for an embedded subcategory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<SubcategorySpecs>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub sub_categories: Vec<Subcategory>,
    #[serde(default)]
    pub image: String,
    #[serde(default = "Category::default_is_active")]
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming payload for category creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sub_categories: Vec<SubcategoryDraft>,
    #[serde(default)]
    pub image: String,
}

/// Partial update for an existing category.
///
/// Renaming here does **not** migrate products that reference the old name;
/// they become invisible to the name-based aggregation until reassigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Category {
    fn default_is_active() -> bool {
        true
    }

    /// Validate a draft and mint a new record, stamped with its creator.
    pub fn create(draft: CategoryDraft, created_by: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = required_trimmed("name", &draft.name)?;
        required_trimmed("description", &draft.description)?;

        let sub_categories = draft
            .sub_categories
            .into_iter()
            .map(Subcategory::from_draft)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            id: CategoryId::new(),
            name,
            description: draft.description,
            sub_categories,
            image: draft.image,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: CategoryPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = patch.name {
            self.name = required_trimmed("name", &name)?;
        }
        if let Some(description) = patch.description {
            required_trimmed("description", &description)?;
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Append a subcategory.
    pub fn add_subcategory(&mut self, draft: SubcategoryDraft, now: DateTime<Utc>) -> DomainResult<SubcategoryId> {
        let sub = Subcategory::from_draft(draft)?;
        let id = sub.id;
        self.sub_categories.push(sub);
        self.updated_at = now;
        Ok(id)
    }

    /// Update an embedded subcategory by its local id.
    pub fn update_subcategory(
        &mut self,
        id: SubcategoryId,
        patch: SubcategoryPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let sub = self
            .sub_categories
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DomainError::NotFound)?;

        if let Some(name) = patch.name {
            sub.name = required_trimmed("name", &name)?;
        }
        if let Some(description) = patch.description {
            sub.description = Some(description);
        }
        if let Some(specifications) = patch.specifications {
            sub.specifications = specifications;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Remove an embedded subcategory; removing an absent id is a no-op.
    pub fn remove_subcategory(&mut self, id: SubcategoryId, now: DateTime<Utc>) {
        self.sub_categories.retain(|s| s.id != id);
        self.updated_at = now;
    }

    /// Flip the soft-delete flag. The "no active products reference this
    /// name" precondition is the caller's to check against the product store.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

impl Subcategory {
    fn from_draft(draft: SubcategoryDraft) -> DomainResult<Self> {
        let name = required_trimmed("name", &draft.name)?;
        Ok(Self {
            id: SubcategoryId::new(),
            name,
            description: draft.description,
            specifications: draft.specifications,
        })
    }
}

fn required_trimmed(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CategoryDraft {
        CategoryDraft {
            name: "Valves".to_string(),
            description: "Industrial valves".to_string(),
            ..CategoryDraft::default()
        }
    }

    #[test]
    fn create_starts_active_with_trimmed_name() {
        let mut d = draft();
        d.name = "  Valves ".to_string();
        let c = Category::create(d, UserId::new(), Utc::now()).unwrap();
        assert_eq!(c.name, "Valves");
        assert!(c.is_active);
        assert!(c.sub_categories.is_empty());
    }

    #[test]
    fn create_rejects_missing_name_or_description() {
        let mut d = draft();
        d.name = String::new();
        assert!(Category::create(d, UserId::new(), Utc::now()).is_err());

        let mut d = draft();
        d.description = "  ".to_string();
        assert!(Category::create(d, UserId::new(), Utc::now()).is_err());
    }

    #[test]
    fn subcategory_lifecycle_is_local_to_parent() {
        let mut c = Category::create(draft(), UserId::new(), Utc::now()).unwrap();

        let id = c
            .add_subcategory(
                SubcategoryDraft {
                    name: "Gate Valves".to_string(),
                    ..SubcategoryDraft::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(c.sub_categories.len(), 1);

        c.update_subcategory(
            id,
            SubcategoryPatch {
                name: Some("Gate & Globe Valves".to_string()),
                ..SubcategoryPatch::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(c.sub_categories[0].name, "Gate & Globe Valves");

        c.remove_subcategory(id, Utc::now());
        assert!(c.sub_categories.is_empty());
    }

    #[test]
    fn updating_unknown_subcategory_is_not_found() {
        let mut c = Category::create(draft(), UserId::new(), Utc::now()).unwrap();
        let err = c
            .update_subcategory(SubcategoryId::new(), SubcategoryPatch::default(), Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn deactivate_flips_soft_delete_flag_only() {
        let mut c = Category::create(draft(), UserId::new(), Utc::now()).unwrap();
        c.deactivate(Utc::now());
        assert!(!c.is_active);
        assert_eq!(c.name, "Valves");
    }

    #[test]
    fn rename_is_a_plain_field_write() {
        let mut c = Category::create(draft(), UserId::new(), Utc::now()).unwrap();
        c.apply_patch(
            CategoryPatch {
                name: Some("Industrial Valves".to_string()),
                ..CategoryPatch::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(c.name, "Industrial Valves");
    }
}
