use std::path::Path;

use chrono::NaiveDate;

use crate::analysis::filter::filter_transactions;
use crate::analysis::palette::trend_color;
use crate::analysis::trend::{TrendGrouping, bucket, slice, trend_groups};
use crate::commands::common::{
    EMPTY_PERIOD_MESSAGE, FilterOptions, load_record, parse_iso_date_strict, resolve_filter,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    TransactionRow, TrendBucketData, TrendData, TrendSeries, TrendSliceData,
};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct TrendOptions<'a> {
    pub file_id: String,
    pub filter: FilterOptions,
    pub group_by: Option<String>,
    /// Any date inside the period whose transactions should be listed.
    pub slice: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(options: TrendOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let grouping = match options.group_by.as_deref() {
        Some(value) => value.parse::<TrendGrouping>().map_err(|()| {
            ClientError::invalid_argument_for_command(
                "`group-by` must be `day`, `week` or `month`.",
                Some("trend"),
            )
        })?,
        None => TrendGrouping::default(),
    };
    let slice_key: Option<NaiveDate> = match options.slice.as_deref() {
        Some(value) => Some(parse_iso_date_strict(value, "slice", "trend")?),
        None => None,
    };
    let filter = resolve_filter(&options.filter, "trend")?;
    let record = load_record(options.home_override, &options.file_id)?;

    // Hidden series stay in the legend; only their amounts drop out.
    let mut visible_config = filter.config.clone();
    visible_config.excluded.clear();
    let in_range = filter_transactions(&record.transactions, &visible_config);
    let shown = filter_transactions(&in_range, &filter.config);
    let shown: Vec<_> = shown
        .into_iter()
        .filter(|transaction| transaction.amount != 0.0)
        .collect();

    let series = trend_groups(&in_range)
        .into_iter()
        .map(|name| TrendSeries {
            color: trend_color(&name).to_string(),
            hidden: filter.config.excluded.contains(&name),
            name,
        })
        .collect();

    let buckets = bucket(&shown, grouping, filter.week_start)
        .into_iter()
        .map(|period| TrendBucketData {
            key: period.key,
            label: period.label,
            total: period.total,
            by_group: period.by_group,
        })
        .collect();

    let slice_data = slice_key.map(|key| {
        let selected = slice(&shown, key, grouping, filter.week_start);
        TrendSliceData {
            key: selected.key,
            label: selected.label,
            start: selected.start,
            end: selected.end,
            total: selected.total,
            transactions: selected.transactions.iter().map(TransactionRow::from).collect(),
        }
    });

    success(
        "trend",
        TrendData {
            file_id: record.id.clone(),
            file_name: record.file_name.clone(),
            range: filter.range.clone(),
            filters: filter.filter_data(),
            group_by: grouping.as_str().to_string(),
            transaction_count: shown.len(),
            empty: shown.is_empty(),
            message: shown.is_empty().then(|| EMPTY_PERIOD_MESSAGE.to_string()),
            series,
            buckets,
            slice: slice_data,
        },
    )
}
