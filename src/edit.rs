//! Snapshot-in, snapshot-out editing commands.
//!
//! Every command borrows the current model and returns a fresh one; the
//! input is never touched, so a rejected edit leaves the caller's model as
//! it was.

use thiserror::Error;

use crate::ir::{Category, DataModel, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("name must not be blank")]
    BlankName,
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
    #[error("item \"{item}\" already exists in {category} / {tier}")]
    DuplicateItem {
        category: String,
        tier: &'static str,
        item: String,
    },
    #[error("category index {index} out of range ({len} categories)")]
    CategoryOutOfRange { index: usize, len: usize },
    #[error("item index {index} out of range ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },
}

pub type EditResult = Result<DataModel, EditError>;

fn normalize_name(raw: &str) -> Result<String, EditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EditError::BlankName);
    }
    Ok(trimmed.to_string())
}

fn check_category(model: &DataModel, index: usize) -> Result<(), EditError> {
    if index >= model.categories.len() {
        return Err(EditError::CategoryOutOfRange {
            index,
            len: model.categories.len(),
        });
    }
    Ok(())
}

pub fn add_category(model: &DataModel, name: &str) -> EditResult {
    let name = normalize_name(name)?;
    if model.categories.iter().any(|cat| cat.name == name) {
        return Err(EditError::DuplicateCategory(name));
    }
    let mut next = model.clone();
    next.categories.push(Category::new(name));
    Ok(next)
}

pub fn rename_category(model: &DataModel, index: usize, name: &str) -> EditResult {
    check_category(model, index)?;
    let name = normalize_name(name)?;
    if model
        .categories
        .iter()
        .enumerate()
        .any(|(idx, cat)| idx != index && cat.name == name)
    {
        return Err(EditError::DuplicateCategory(name));
    }
    let mut next = model.clone();
    next.categories[index].name = name;
    Ok(next)
}

pub fn remove_category(model: &DataModel, index: usize) -> EditResult {
    check_category(model, index)?;
    let mut next = model.clone();
    next.categories.remove(index);
    Ok(next)
}

pub fn add_item(model: &DataModel, index: usize, tier: Tier, label: &str) -> EditResult {
    check_category(model, index)?;
    let label = normalize_name(label)?;
    let category = &model.categories[index];
    if category.skills.get(tier).iter().any(|item| *item == label) {
        return Err(EditError::DuplicateItem {
            category: category.name.clone(),
            tier: tier.key(),
            item: label,
        });
    }
    let mut next = model.clone();
    next.categories[index].skills.get_mut(tier).push(label);
    Ok(next)
}

pub fn remove_item(model: &DataModel, index: usize, tier: Tier, item: usize) -> EditResult {
    check_category(model, index)?;
    let len = model.categories[index].skills.count(tier);
    if item >= len {
        return Err(EditError::ItemOutOfRange { index: item, len });
    }
    let mut next = model.clone();
    next.categories[index].skills.get_mut(tier).remove(item);
    Ok(next)
}

/// Moves an item within one tier. `to` is clamped into range after removal,
/// so dropping past the end appends.
pub fn move_item(model: &DataModel, index: usize, tier: Tier, from: usize, to: usize) -> EditResult {
    check_category(model, index)?;
    let len = model.categories[index].skills.count(tier);
    if from >= len {
        return Err(EditError::ItemOutOfRange { index: from, len });
    }
    let mut next = model.clone();
    if from == to {
        return Ok(next);
    }
    let items = next.categories[index].skills.get_mut(tier);
    let item = items.remove(from);
    let target = to.min(items.len());
    items.insert(target, item);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataModel {
        DataModel {
            categories: vec![
                Category::new("Frontend").with_items(Tier::Comfortable, &["React", "CSS", "HTML"]),
                Category::new("Backend").with_items(Tier::Far, &["Kernels"]),
            ],
        }
    }

    #[test]
    fn add_category_trims_and_appends() {
        let model = sample();
        let next = add_category(&model, "  Design ").unwrap();
        assert_eq!(next.categories.len(), 3);
        assert_eq!(next.categories[2].name, "Design");
        assert_eq!(model.categories.len(), 2);
    }

    #[test]
    fn add_category_rejects_duplicates_and_blanks() {
        let model = sample();
        assert_eq!(
            add_category(&model, "Backend"),
            Err(EditError::DuplicateCategory("Backend".to_string()))
        );
        assert_eq!(add_category(&model, "   "), Err(EditError::BlankName));
    }

    #[test]
    fn rename_keeps_position() {
        let next = rename_category(&sample(), 1, "Systems").unwrap();
        assert_eq!(next.categories[1].name, "Systems");
        assert_eq!(next.categories[1].skills.far, vec!["Kernels".to_string()]);
        assert!(rename_category(&sample(), 0, "Backend").is_err());
        assert!(rename_category(&sample(), 0, "Frontend").is_ok());
        assert!(matches!(
            rename_category(&sample(), 5, "X"),
            Err(EditError::CategoryOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn remove_category_drops_entry() {
        let next = remove_category(&sample(), 0).unwrap();
        assert_eq!(next.categories.len(), 1);
        assert_eq!(next.categories[0].name, "Backend");
    }

    #[test]
    fn add_and_remove_items() {
        let model = sample();
        let next = add_item(&model, 1, Tier::Near, "Databases").unwrap();
        assert_eq!(next.categories[1].skills.near, vec!["Databases".to_string()]);
        assert!(matches!(
            add_item(&next, 1, Tier::Near, "Databases"),
            Err(EditError::DuplicateItem { .. })
        ));
        // Same label in another tier is fine.
        assert!(add_item(&next, 1, Tier::Far, "Databases").is_ok());

        let removed = remove_item(&next, 1, Tier::Near, 0).unwrap();
        assert!(removed.categories[1].skills.near.is_empty());
        assert!(remove_item(&next, 1, Tier::Near, 3).is_err());
    }

    #[test]
    fn move_item_reorders_within_tier() {
        let model = sample();
        let next = move_item(&model, 0, Tier::Comfortable, 0, 2).unwrap();
        assert_eq!(next.categories[0].skills.comfortable, vec!["CSS", "HTML", "React"]);
        let next = move_item(&model, 0, Tier::Comfortable, 2, 0).unwrap();
        assert_eq!(next.categories[0].skills.comfortable, vec!["HTML", "React", "CSS"]);
        let next = move_item(&model, 0, Tier::Comfortable, 0, 99).unwrap();
        assert_eq!(next.categories[0].skills.comfortable, vec!["CSS", "HTML", "React"]);
        assert_eq!(move_item(&model, 0, Tier::Comfortable, 1, 1).unwrap(), model);
    }
}
