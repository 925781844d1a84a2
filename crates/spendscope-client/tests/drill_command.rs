mod support;

use serde_json::Value;
use spendscope_client::commands::common::FilterOptions;
use spendscope_client::commands::drill::{DrillOptions, run};

use support::testkit::{MARCH_EXPORT, import_fixture, march_filter, names, noon, payload, temp_home_in_tmp};

fn drill(home: &std::path::Path, file_id: &str, options: DrillOptions<'_>) -> Value {
    payload(run(DrillOptions {
        file_id: file_id.to_string(),
        home_override: Some(home),
        ..options
    }))
}

fn child<'a>(view: &'a Value, name: &str) -> &'a Value {
    view["children"]
        .as_array()
        .and_then(|children| children.iter().find(|node| node["name"] == name))
        .unwrap_or(&Value::Null)
}

#[test]
fn root_view_ranks_groups_by_magnitude() {
    let temp = temp_home_in_tmp("spendscope-drill-root");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            ..DrillOptions::default()
        });
        let data = &value["data"];

        assert_eq!(value["command"], "drill");
        assert_eq!(data["state"]["phase"], "root");
        assert_eq!(data["range"]["time_frame"], "custom");
        assert_eq!(data["transaction_count"], 9);
        assert_eq!(data["empty"], false);
        assert_eq!(data["view"]["id"], "Total");
        assert_eq!(data["view"]["total"], 3970.0);
        assert_eq!(
            names(&data["view"]["children"]),
            vec!["Income", "Rent", "Travel", "Food", "<none>"]
        );

        let food = child(&data["view"], "Food");
        assert_eq!(food["total"], 65.0);
        assert_eq!(food["transaction_count"], 3);
        assert_eq!(names(&food["children"]), vec!["Groceries", "General", "Takeout"]);
        assert!(data["selection"].is_null());
        assert_eq!(names(&data["breadcrumb"]), vec!["Total"]);
    }
}

#[test]
fn zooming_into_group_shows_its_leaves_and_selection() {
    let temp = temp_home_in_tmp("spendscope-drill-zoom");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            clicks: vec!["Travel".to_string()],
            ..DrillOptions::default()
        });
        let data = &value["data"];

        assert_eq!(data["state"]["phase"], "group_selected");
        assert_eq!(data["state"]["zoomed_group"], "Travel");
        assert_eq!(data["view"]["id"], "Travel");
        assert_eq!(names(&data["view"]["children"]), vec!["Air", "Hotel"]);
        assert_eq!(data["selection"]["node_id"], "Travel");
        assert_eq!(data["selection"]["total"], 500.0);
        assert_eq!(names(&data["breadcrumb"]), vec!["Total", "Travel"]);

        let rows = data["selection"]["transactions"].as_array().cloned().unwrap_or_default();
        let dates: Vec<&str> = rows.iter().filter_map(|row| row["date"].as_str()).collect();
        assert_eq!(dates, vec!["2026-03-07", "2026-03-06"]);
    }
}

#[test]
fn leaf_click_after_zoom_selects_leaf_and_back_resets() {
    let temp = temp_home_in_tmp("spendscope-drill-leaf");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            clicks: vec!["Food".to_string(), "Food.General".to_string()],
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["state"]["phase"], "leaf_selected");
        assert_eq!(data["state"]["selected_node"], "Food.General");
        assert_eq!(data["selection"]["total"], 20.0);
        assert_eq!(names(&data["breadcrumb"]), vec!["Total", "Food", "General"]);

        let reset = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            clicks: vec!["Food".to_string(), "Food.General".to_string()],
            back: true,
            ..DrillOptions::default()
        });
        assert_eq!(reset["data"]["state"]["phase"], "root");
        assert!(reset["data"]["selection"].is_null());
    }
}

#[test]
fn childless_group_is_selected_without_zooming() {
    let temp = temp_home_in_tmp("spendscope-drill-childless");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            clicks: vec!["Rent".to_string()],
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["state"]["phase"], "leaf_selected");
        assert!(data["state"]["zoomed_group"].is_null());
        assert_eq!(data["view"]["id"], "Total");
        assert_eq!(data["selection"]["node_id"], "Rent");
        assert_eq!(data["selection"]["total"], 900.0);
    }
}

#[test]
fn invisible_click_is_reported_and_ignored() {
    let temp = temp_home_in_tmp("spendscope-drill-invisible");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: march_filter(),
            clicks: vec!["Food".to_string(), "Travel.Air".to_string()],
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["state"]["zoomed_group"], "Food");
        assert_eq!(data["state"]["phase"], "group_selected");
        assert_eq!(data["warnings"].as_array().map(Vec::len), Some(1));
    }
}

#[test]
fn excluding_group_removes_it_from_every_ring() {
    let temp = temp_home_in_tmp("spendscope-drill-exclude");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: FilterOptions {
                exclude: vec!["Food".to_string(), "Salary".to_string()],
                ..march_filter()
            },
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(names(&data["view"]["children"]), vec!["Rent", "Travel", "<none>"]);
        assert_eq!(data["view"]["total"], 1405.0);
        assert_eq!(data["filters"]["excluded"], serde_json::json!(["Food", "Salary"]));
    }
}

#[test]
fn zoom_on_vanished_group_falls_back_to_root_with_notice() {
    let temp = temp_home_in_tmp("spendscope-drill-vanished");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: FilterOptions {
                from: Some("2026-03-10".to_string()),
                to: Some("2026-03-31".to_string()),
                now_override: Some(noon(2026, 4, 20)),
                ..FilterOptions::default()
            },
            zoom: Some("Travel".to_string()),
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["state"]["phase"], "root");
        assert_eq!(data["notices"][0]["code"], "zoom_target_missing");
        assert_eq!(
            data["notices"][0]["message"],
            "No transactions for \"Travel\" in the selected time frame."
        );
        assert_eq!(names(&data["view"]["children"]), vec!["Income", "Rent", "<none>"]);
    }
}

#[test]
fn hiding_income_and_expense_yields_empty_period() {
    let temp = temp_home_in_tmp("spendscope-drill-empty");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: FilterOptions {
                hide_income: true,
                hide_expense: true,
                ..march_filter()
            },
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["empty"], true);
        assert_eq!(data["message"], "No data for this period.");
        assert_eq!(data["view"]["total"], 0.0);
        assert_eq!(data["view"]["children"].as_array().map(Vec::len), Some(0));
    }
}

#[test]
fn named_time_frame_is_resolved_against_now() {
    let temp = temp_home_in_tmp("spendscope-drill-frame");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let file_id = import_fixture(&home, "march.csv", MARCH_EXPORT);
        let value = drill(&home, &file_id, DrillOptions {
            filter: FilterOptions {
                time_frame: Some("last_month".to_string()),
                now_override: Some(noon(2026, 4, 20)),
                ..FilterOptions::default()
            },
            ..DrillOptions::default()
        });
        let data = &value["data"];
        assert_eq!(data["range"]["time_frame"], "last_month");
        assert_eq!(data["range"]["start"], "2026-03-01T00:00:00");
        assert_eq!(data["view"]["total"], 3970.0);

        let this_month = drill(&home, &file_id, DrillOptions {
            filter: FilterOptions {
                now_override: Some(noon(2026, 4, 20)),
                ..FilterOptions::default()
            },
            ..DrillOptions::default()
        });
        assert_eq!(this_month["data"]["range"]["time_frame"], "this_month");
        assert_eq!(this_month["data"]["view"]["total"], 40.0);
    }
}

#[test]
fn malformed_flags_and_unknown_files_fail() {
    let temp = temp_home_in_tmp("spendscope-drill-errors");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let bad_date = run(DrillOptions {
            file_id: "file_missing".to_string(),
            filter: FilterOptions {
                from: Some("03/01/2026".to_string()),
                ..FilterOptions::default()
            },
            home_override: Some(&home),
            ..DrillOptions::default()
        });
        assert!(bad_date.is_err());
        if let Err(error) = bad_date {
            assert_eq!(error.code, "invalid_argument");
        }

        let missing = run(DrillOptions {
            file_id: "file_missing".to_string(),
            filter: march_filter(),
            home_override: Some(&home),
            ..DrillOptions::default()
        });
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.code, "file_not_found");
        }
    }
}
