use std::collections::BTreeSet;
use std::path::Path;

use crate::ClientResult;
use crate::analysis::exclusion::{clear_all, resolve_rows, toggle_label};
use crate::commands::common::{exclusion_labels, load_record};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::CategoriesData;

#[derive(Debug, Default)]
pub struct CategoriesOptions<'a> {
    pub file_id: String,
    /// Current exclusion list.
    pub exclude: Vec<String>,
    /// Labels toggled in order after `clear`.
    pub toggles: Vec<String>,
    pub clear: bool,
    pub home_override: Option<&'a Path>,
}

pub fn run(options: CategoriesOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let record = load_record(options.home_override, &options.file_id)?;
    let labels: BTreeSet<&str> = record
        .transactions
        .iter()
        .map(|transaction| transaction.category.as_str())
        .collect();

    let mut excluded: BTreeSet<String> = if options.clear {
        clear_all()
    } else {
        exclusion_labels(&options.exclude)
    };
    for label in &options.toggles {
        excluded = toggle_label(label.trim(), labels.iter().copied(), &excluded);
    }

    let rows = resolve_rows(labels.iter().copied(), &excluded);
    success(
        "categories",
        CategoriesData {
            file_id: record.id.clone(),
            rows,
            excluded: excluded.into_iter().collect(),
        },
    )
}
