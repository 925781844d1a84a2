use super::filter::{FilterConfig, filter_transactions};
use super::navigation::{
    DrillEvent, DrillNotice, DrillState, breadcrumb, display_node, reconcile, selected_node,
    transition, view_depth,
};
use super::tree::{CategoryNode, CategoryTree, build_tree};
use super::types::Transaction;

/// The single owner of drill-down state for one loaded file. The filtered
/// set and tree are rebuilt only when the transactions or the filter change;
/// every rebuild re-validates the navigation state.
#[derive(Debug, Clone)]
pub struct DrillSession {
    transactions: Vec<Transaction>,
    config: FilterConfig,
    filtered: Vec<Transaction>,
    tree: CategoryTree,
    state: DrillState,
    rebuilds: usize,
}

impl DrillSession {
    pub fn new(transactions: Vec<Transaction>, config: FilterConfig) -> Self {
        let filtered = filter_transactions(&transactions, &config);
        let tree = build_tree(&filtered);
        Self {
            transactions,
            config,
            filtered,
            tree,
            state: DrillState::Root,
            rebuilds: 1,
        }
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn state(&self) -> &DrillState {
        &self.state
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Replaces the filter. Returns a notice when the zoomed group vanished.
    pub fn set_filter(&mut self, config: FilterConfig) -> Option<DrillNotice> {
        if config == self.config {
            return None;
        }
        self.config = config;
        self.rebuild()
    }

    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) -> Option<DrillNotice> {
        if transactions == self.transactions {
            return None;
        }
        self.transactions = transactions;
        self.rebuild()
    }

    /// Jumps to `state`, validating it against the current tree first.
    pub fn restore(&mut self, state: DrillState) -> Option<DrillNotice> {
        let reconciled = reconcile(&state, &self.tree);
        self.state = reconciled.state;
        reconciled.notice
    }

    pub fn dispatch(&mut self, event: &DrillEvent) {
        self.state = transition(&self.state, &self.tree, event);
    }

    /// Clicks `node_id` at its depth in the current view. Returns false when
    /// the node is not visible there.
    pub fn click(&mut self, node_id: &str) -> bool {
        let Some(depth) = view_depth(&self.state, &self.tree, node_id) else {
            return false;
        };
        self.dispatch(&DrillEvent::Click {
            node_id: node_id.to_string(),
            depth,
        });
        true
    }

    pub fn back(&mut self) {
        self.dispatch(&DrillEvent::Back);
    }

    pub fn display_node(&self) -> &CategoryNode {
        display_node(&self.state, &self.tree)
    }

    pub fn selected_node(&self) -> Option<&CategoryNode> {
        selected_node(&self.state, &self.tree)
    }

    pub fn breadcrumb(&self) -> Vec<&CategoryNode> {
        breadcrumb(&self.state, &self.tree)
    }

    /// Transactions of the selected node, newest first.
    pub fn selected_transactions(&self) -> Vec<&Transaction> {
        let mut rows: Vec<&Transaction> = self
            .selected_node()
            .map(|node| node.transactions.iter().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    fn rebuild(&mut self) -> Option<DrillNotice> {
        self.filtered = filter_transactions(&self.transactions, &self.config);
        self.tree = build_tree(&self.filtered);
        self.rebuilds += 1;
        let state = std::mem::take(&mut self.state);
        self.restore(state)
    }
}
