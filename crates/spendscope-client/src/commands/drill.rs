use std::path::Path;

use crate::ClientResult;
use crate::analysis::navigation::DrillState;
use crate::analysis::session::DrillSession;
use crate::analysis::tree::{CategoryNode, share_of};
use crate::commands::common::{EMPTY_PERIOD_MESSAGE, FilterOptions, load_record, resolve_filter};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CrumbData, DrillData, NodeData, SelectionData, StateData, TransactionRow,
};

#[derive(Debug, Default)]
pub struct DrillOptions<'a> {
    pub file_id: String,
    pub filter: FilterOptions,
    /// Group to start zoomed into.
    pub zoom: Option<String>,
    /// Node to start with selected.
    pub select: Option<String>,
    /// Node ids clicked in order, each resolved against the view it lands on.
    pub clicks: Vec<String>,
    pub back: bool,
    pub home_override: Option<&'a Path>,
}

pub fn run(options: DrillOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let filter = resolve_filter(&options.filter, "drill")?;
    let record = load_record(options.home_override, &options.file_id)?;

    let mut session = DrillSession::new(record.transactions, filter.config.clone());
    let mut notices = Vec::new();
    if let Some(notice) = session.restore(initial_state(options.zoom, options.select)) {
        notices.push(notice);
    }

    let mut warnings = Vec::new();
    for node_id in &options.clicks {
        if !session.click(node_id) {
            warnings.push(format!(
                "Node `{node_id}` is not visible in the current view; click ignored."
            ));
        }
    }
    if options.back {
        session.back();
    }

    let root_total = session.tree().root.total;
    let selection = session.selected_node().map(|node| SelectionData {
        node_id: node.id.clone(),
        name: node.name.clone(),
        total: node.total,
        share: share_of(node.total, root_total),
        color: node.color,
        transactions: session
            .selected_transactions()
            .into_iter()
            .map(TransactionRow::from)
            .collect(),
    });

    let state = session.state();
    let data = DrillData {
        file_id: record.id,
        file_name: record.file_name,
        range: filter.range.clone(),
        filters: filter.filter_data(),
        transaction_count: session.filtered().len(),
        empty: session.is_empty(),
        message: session.is_empty().then(|| EMPTY_PERIOD_MESSAGE.to_string()),
        state: StateData {
            phase: state.phase().as_str().to_string(),
            zoomed_group: state.zoomed_group().map(str::to_string),
            selected_node: state.selected_id().map(str::to_string),
        },
        breadcrumb: session
            .breadcrumb()
            .into_iter()
            .map(|node| CrumbData {
                id: node.id.clone(),
                name: node.name.clone(),
            })
            .collect(),
        view: node_data(session.display_node(), root_total),
        selection,
        notices,
        warnings,
    };

    success("drill", data)
}

fn initial_state(zoom: Option<String>, select: Option<String>) -> DrillState {
    match (zoom, select) {
        (Some(group), Some(leaf)) => DrillState::ZoomedWithSelection { group, leaf },
        (Some(group), None) => DrillState::Zoomed { group },
        (None, Some(leaf)) => DrillState::SelectedLeafAtRoot { leaf },
        (None, None) => DrillState::Root,
    }
}

fn node_data(node: &CategoryNode, root_total: f64) -> NodeData {
    NodeData {
        id: node.id.clone(),
        name: node.name.clone(),
        value: node.value,
        total: node.total,
        share: share_of(node.total, root_total),
        color: node.color,
        transaction_count: node.transactions.len(),
        children: node
            .children
            .iter()
            .map(|child| node_data(child, root_total))
            .collect(),
    }
}
