use std::collections::BTreeMap;

use tracing::debug;

use super::palette::{Hsl, ROOT_COLOR, child_shades, group_color};
use super::types::{Transaction, leaf_id};

pub const ROOT_ID: &str = "Total";
pub const GENERAL_NAME: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    /// Chart weight. Only leaves carry one; parents are sized by children.
    pub value: Option<f64>,
    pub total: f64,
    pub color: Hsl,
    pub transactions: Vec<Transaction>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, id: &str) -> Option<&CategoryNode> {
        self.children.iter().find(|child| child.id == id)
    }

    /// Effective chart size: own weight for leaves, sum of children otherwise.
    pub fn weight(&self) -> f64 {
        match self.value {
            Some(value) => value,
            None => self.children.iter().map(CategoryNode::weight).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    pub root: CategoryNode,
    pub colors: BTreeMap<String, Hsl>,
}

impl CategoryTree {
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn group(&self, id: &str) -> Option<&CategoryNode> {
        self.root.child(id)
    }

    /// Resolves any node id: groups first, then the root, then the children
    /// of every group. A group literally named `Total` shadows the root.
    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        if let Some(group) = self.group(id) {
            return Some(group);
        }
        if id == self.root.id {
            return Some(&self.root);
        }
        self.root
            .children
            .iter()
            .find_map(|group| group.child(id))
    }

    /// Root-to-node chain for `id`, empty when the id is unknown.
    pub fn path_to(&self, id: &str) -> Vec<&CategoryNode> {
        if let Some(group) = self.group(id) {
            return vec![&self.root, group];
        }
        if id == self.root.id {
            return vec![&self.root];
        }
        self.root
            .children
            .iter()
            .find_map(|group| group.child(id).map(|leaf| vec![&self.root, group, leaf]))
            .unwrap_or_default()
    }

    pub fn color_of(&self, id: &str) -> Option<Hsl> {
        self.colors.get(id).copied()
    }
}

/// Percentage of `part` in `whole`; zero when there is nothing to divide by.
pub fn share_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

struct SubBucket {
    id: String,
    name: String,
    total: f64,
    transactions: Vec<Transaction>,
}

struct GroupBucket {
    name: String,
    total: f64,
    direct: f64,
    transactions: Vec<Transaction>,
    direct_transactions: Vec<Transaction>,
    subs: Vec<SubBucket>,
    sub_index: BTreeMap<String, usize>,
}

impl GroupBucket {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total: 0.0,
            direct: 0.0,
            transactions: Vec::new(),
            direct_transactions: Vec::new(),
            subs: Vec::new(),
            sub_index: BTreeMap::new(),
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        let amount = transaction.magnitude();
        self.total += amount;
        self.transactions.push(transaction.clone());

        if transaction.is_direct() {
            self.direct += amount;
            self.direct_transactions.push(transaction.clone());
            return;
        }

        let id = leaf_id(&self.name, &transaction.category_sub);
        let slot = match self.sub_index.get(&id) {
            Some(slot) => *slot,
            None => {
                self.subs.push(SubBucket {
                    id: id.clone(),
                    name: transaction.category_sub.clone(),
                    total: 0.0,
                    transactions: Vec::new(),
                });
                self.sub_index.insert(id, self.subs.len() - 1);
                self.subs.len() - 1
            }
        };
        let sub = &mut self.subs[slot];
        sub.total += amount;
        sub.transactions.push(transaction.clone());
    }

    /// Moves direct amounts into a `General` child when real children exist,
    /// then sorts and colors the children.
    fn finalize(self, color: Hsl) -> CategoryNode {
        let GroupBucket {
            name,
            total,
            direct,
            transactions,
            direct_transactions,
            mut subs,
            sub_index,
        } = self;

        if subs.is_empty() {
            return CategoryNode {
                id: name.clone(),
                name,
                value: Some(total),
                total,
                color,
                transactions,
                children: Vec::new(),
            };
        }

        if direct > 0.0 {
            let general_id = leaf_id(&name, GENERAL_NAME);
            match sub_index.get(&general_id) {
                Some(slot) => {
                    let existing = &mut subs[*slot];
                    existing.total += direct;
                    existing.transactions.extend(direct_transactions);
                }
                None => subs.push(SubBucket {
                    id: general_id,
                    name: GENERAL_NAME.to_string(),
                    total: direct,
                    transactions: direct_transactions,
                }),
            }
        }

        subs.sort_by(|a, b| b.total.total_cmp(&a.total));
        let shades = child_shades(color, subs.len());
        let children = subs
            .into_iter()
            .zip(shades)
            .map(|(sub, shade)| CategoryNode {
                id: sub.id,
                name: sub.name,
                value: Some(sub.total),
                total: sub.total,
                color: shade,
                transactions: sub.transactions,
                children: Vec::new(),
            })
            .collect();

        CategoryNode {
            id: name.clone(),
            name,
            value: None,
            total,
            color,
            transactions,
            children,
        }
    }
}

/// Builds the two-level group/sub-category tree. Zero amounts are skipped;
/// groups and children are ordered by total, ties by first appearance.
pub fn build_tree(transactions: &[Transaction]) -> CategoryTree {
    let mut groups: Vec<GroupBucket> = Vec::new();
    let mut group_index: BTreeMap<String, usize> = BTreeMap::new();
    let mut included: Vec<Transaction> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.magnitude() != 0.0) {
        let slot = match group_index.get(&transaction.category_group) {
            Some(slot) => *slot,
            None => {
                groups.push(GroupBucket::new(&transaction.category_group));
                group_index.insert(transaction.category_group.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].add(transaction);
        included.push(transaction.clone());
    }

    groups.sort_by(|a, b| b.total.total_cmp(&a.total));

    let children: Vec<CategoryNode> = groups
        .into_iter()
        .enumerate()
        .map(|(position, group)| group.finalize(group_color(position)))
        .collect();
    let total = children.iter().map(|group| group.total).sum();

    let root = CategoryNode {
        id: ROOT_ID.to_string(),
        name: ROOT_ID.to_string(),
        value: None,
        total,
        color: ROOT_COLOR,
        transactions: included,
        children,
    };

    let mut colors = BTreeMap::new();
    colors.insert(root.id.clone(), root.color);
    for group in &root.children {
        colors.insert(group.id.clone(), group.color);
        for leaf in &group.children {
            colors.insert(leaf.id.clone(), leaf.color);
        }
    }

    debug!(groups = root.children.len(), total, "rebuilt category tree");
    CategoryTree { root, colors }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ROOT_ID, build_tree, share_of};
    use crate::analysis::palette::{GROUP_PALETTE, ROOT_COLOR};
    use crate::analysis::types::Transaction;

    fn txn(id: &str, category: &str, amount: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or_default();
        Transaction::new(id, date, id, category, amount)
    }

    fn child_names(node: &super::CategoryNode) -> Vec<&str> {
        node.children.iter().map(|child| child.name.as_str()).collect()
    }

    #[test]
    fn direct_amount_becomes_general_child() {
        let tree = build_tree(&[txn("a", "Food", -20.0), txn("b", "Food - Groceries", -30.0)]);
        assert_eq!(tree.root.total, 50.0);
        let food = tree.group("Food");
        assert!(food.is_some());
        if let Some(food) = food {
            assert_eq!(food.total, 50.0);
            assert_eq!(food.value, None);
            assert_eq!(child_names(food), vec!["Groceries", "General"]);
            assert_eq!(food.children[1].id, "Food.General");
            assert_eq!(food.children[1].total, 20.0);
            assert_eq!(food.children[1].transactions.len(), 1);
            assert_eq!(food.transactions.len(), 2);
        }
    }

    #[test]
    fn childless_group_is_its_own_leaf() {
        let tree = build_tree(&[txn("a", "Rent", -900.0)]);
        let rent = tree.group("Rent");
        assert!(rent.is_some());
        if let Some(rent) = rent {
            assert!(rent.is_leaf());
            assert_eq!(rent.value, Some(900.0));
            assert_eq!(rent.color, GROUP_PALETTE[0]);
        }
    }

    #[test]
    fn group_with_only_subs_gets_no_general() {
        let tree = build_tree(&[txn("a", "Travel - Air", -300.0), txn("b", "Travel - Hotel", -200.0)]);
        let travel = tree.group("Travel");
        assert!(travel.is_some());
        if let Some(travel) = travel {
            assert_eq!(child_names(travel), vec!["Air", "Hotel"]);
        }
    }

    #[test]
    fn real_general_sub_category_absorbs_direct_amounts() {
        let tree = build_tree(&[
            txn("a", "Food - General", -5.0),
            txn("b", "Food", -7.0),
            txn("c", "Food - Groceries", -1.0),
        ]);
        let food = tree.group("Food");
        assert!(food.is_some());
        if let Some(food) = food {
            assert_eq!(food.children.len(), 2);
            assert_eq!(food.children[0].id, "Food.General");
            assert_eq!(food.children[0].total, 12.0);
            assert_eq!(food.children[0].transactions.len(), 2);
        }
    }

    #[test]
    fn groups_sort_by_total_with_stable_ties() {
        let tree = build_tree(&[
            txn("a", "Fun", -10.0),
            txn("b", "Bills", -40.0),
            txn("c", "Gifts", -10.0),
            txn("d", "Salary", 40.0),
        ]);
        assert_eq!(child_names(&tree.root), vec!["Bills", "Salary", "Fun", "Gifts"]);
        assert_eq!(tree.root.children[1].color, GROUP_PALETTE[1]);
    }

    #[test]
    fn zero_amounts_are_skipped() {
        let tree = build_tree(&[txn("a", "Misc", 0.0), txn("b", "Food", -2.5)]);
        assert_eq!(child_names(&tree.root), vec!["Food"]);
        assert_eq!(tree.root.transactions.len(), 1);
        assert_eq!(tree.root.total, 2.5);
    }

    #[test]
    fn empty_input_builds_bare_root() {
        let tree = build_tree(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.root.id, ROOT_ID);
        assert_eq!(tree.root.total, 0.0);
        assert_eq!(tree.root.weight(), 0.0);
        assert_eq!(tree.color_of(ROOT_ID), Some(ROOT_COLOR));
    }

    #[test]
    fn find_resolves_root_groups_and_leaves() {
        let tree = build_tree(&[txn("a", "Food - Groceries", -3.0), txn("b", "Rent", -9.0)]);
        assert_eq!(tree.find(ROOT_ID).map(|n| n.id.as_str()), Some(ROOT_ID));
        assert_eq!(tree.find("Rent").map(|n| n.total), Some(9.0));
        assert_eq!(tree.find("Food.Groceries").map(|n| n.total), Some(3.0));
        assert!(tree.find("Food.Takeout").is_none());
        assert_eq!(tree.path_to("Food.Groceries").len(), 3);
        assert!(tree.path_to("Nope").is_empty());
    }

    #[test]
    fn group_named_total_shadows_root_in_lookups() {
        let tree = build_tree(&[txn("a", "Total", -10.0), txn("b", "Food - Groceries", -5.0)]);
        assert_eq!(tree.find(ROOT_ID).map(|n| n.total), Some(10.0));
        assert_eq!(tree.path_to(ROOT_ID).len(), 2);
        assert_eq!(tree.root.total, 15.0);
    }

    #[test]
    fn colors_are_indexed_by_node_id() {
        let tree = build_tree(&[
            txn("a", "Food - Other", -3.0),
            txn("b", "Home - Other", -2.0),
        ]);
        assert_eq!(tree.colors.len(), 5);
        assert_ne!(tree.color_of("Food.Other"), tree.color_of("Home.Other"));
    }

    #[test]
    fn share_of_empty_total_is_zero() {
        assert_eq!(share_of(5.0, 0.0), 0.0);
        assert_eq!(share_of(5.0, 20.0), 25.0);
    }
}
