use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::types::{CATEGORY_SEPARATOR, NO_CATEGORY, split_category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// A group that appears as a category of its own.
    Header,
    /// A group known only as the prefix of its sub-categories.
    VirtualHeader,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub kind: RowKind,
    /// The exclusion-list key for headers and items; the group name for
    /// virtual headers, which are never listed themselves.
    pub label: String,
    pub name: String,
    pub group: String,
    pub excluded: bool,
    /// Excluded through its parent and cannot be toggled on its own.
    pub locked: bool,
}

#[derive(Debug, Default)]
struct GroupOptions {
    standalone: bool,
    items: Vec<(String, String)>,
}

/// Orders and classifies every category label. `<none>` always sorts last.
fn group_options<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<(String, GroupOptions)> {
    let mut groups: BTreeMap<String, GroupOptions> = BTreeMap::new();
    let distinct: BTreeSet<&str> = labels.into_iter().collect();

    for label in distinct {
        let (group, sub) = split_category(label);
        let options = groups.entry(group.clone()).or_default();
        if label.contains(CATEGORY_SEPARATOR) && sub != group {
            options.items.push((sub, label.to_string()));
        } else {
            options.standalone = true;
        }
    }

    let mut ordered: Vec<(String, GroupOptions)> = groups.into_iter().collect();
    ordered.sort_by_key(|(group, _)| group == NO_CATEGORY);
    for (_, options) in &mut ordered {
        options.items.sort();
    }
    ordered
}

/// Resolves every displayable row against the explicit exclusion list.
pub fn resolve_rows<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    excluded: &BTreeSet<String>,
) -> Vec<CategoryRow> {
    let mut rows = Vec::new();

    for (group, options) in group_options(labels) {
        let group_excluded = excluded.contains(&group);
        if options.standalone {
            rows.push(CategoryRow {
                kind: RowKind::Header,
                label: group.clone(),
                name: group.clone(),
                group: group.clone(),
                excluded: group_excluded,
                locked: false,
            });
        } else {
            let all_children = options
                .items
                .iter()
                .all(|(_, label)| excluded.contains(label));
            rows.push(CategoryRow {
                kind: RowKind::VirtualHeader,
                label: group.clone(),
                name: group.clone(),
                group: group.clone(),
                excluded: group_excluded || (!options.items.is_empty() && all_children),
                locked: false,
            });
        }

        for (sub, label) in options.items {
            rows.push(CategoryRow {
                kind: RowKind::Item,
                excluded: group_excluded || excluded.contains(&label),
                locked: group_excluded,
                label,
                name: sub,
                group: group.clone(),
            });
        }
    }

    rows
}

/// Returns the exclusion list after toggling `row`.
pub fn toggle(row: &CategoryRow, rows: &[CategoryRow], excluded: &BTreeSet<String>) -> BTreeSet<String> {
    let mut next = excluded.clone();
    match row.kind {
        RowKind::Item if row.locked => {}
        RowKind::Header | RowKind::Item => {
            if !next.remove(&row.label) {
                next.insert(row.label.clone());
            }
        }
        RowKind::VirtualHeader => {
            let children = rows
                .iter()
                .filter(|candidate| candidate.kind == RowKind::Item && candidate.group == row.group);
            if row.excluded {
                next.remove(&row.group);
                for child in children {
                    next.remove(&child.label);
                }
            } else {
                for child in children {
                    next.insert(child.label.clone());
                }
            }
        }
    }
    next
}

/// Toggles the row whose label is `label`; unknown labels change nothing.
pub fn toggle_label<'a>(
    label: &str,
    labels: impl IntoIterator<Item = &'a str>,
    excluded: &BTreeSet<String>,
) -> BTreeSet<String> {
    let rows = resolve_rows(labels, excluded);
    match rows.iter().find(|row| row.label == label) {
        Some(row) => toggle(row, &rows, excluded),
        None => excluded.clone(),
    }
}

pub fn clear_all() -> BTreeSet<String> {
    BTreeSet::new()
}
