use missing_data_cleaner::export::serialize_table;
use missing_data_cleaner::ingestion::{load_from_path, parse_table};
use missing_data_cleaner::processing::{analyze, clean, CleaningOptions, Strategy};
use missing_data_cleaner::types::{DataSet, Value};

fn people() -> DataSet {
    load_from_path("tests/fixtures/people.csv").unwrap()
}

fn cleaned(strategy: Strategy) -> DataSet {
    clean(&people(), &CleaningOptions::new(strategy))
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn analyze_reports_per_column_percentages() {
    let summary = analyze(&people());
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.total_columns, 4);
    assert_eq!(summary.total_missing(), 3);

    let pct: Vec<(&str, usize, f64)> = summary
        .per_column
        .iter()
        .map(|c| (c.name.as_str(), c.missing_count, c.missing_percentage))
        .collect();
    assert_eq!(
        pct,
        vec![
            ("id", 0, 0.0),
            ("name", 1, 25.0),
            ("age", 1, 25.0),
            ("city", 1, 25.0)
        ]
    );
}

#[test]
fn analyze_header_only_yields_nan_percentages() {
    let ds = parse_table("a,b\n").unwrap();
    let summary = analyze(&ds);
    assert_eq!(summary.total_rows, 0);
    assert!(summary.per_column.iter().all(|c| c.missing_percentage.is_nan()));
}

#[test]
fn mean_fills_numeric_columns_only() {
    let out = cleaned(Strategy::Mean);
    assert_eq!(out.rows[2][2], Value::Number(54.0));
    assert!(out.rows[1][1].is_missing());
    assert!(out.rows[1][3].is_missing());

    let after = analyze(&out);
    assert_eq!(after.total_missing(), 2);
    assert_eq!(out.stats.missing_values.get("age"), Some(&0));
}

#[test]
fn median_uses_middle_value() {
    let out = cleaned(Strategy::Median);
    assert_eq!(out.rows[2][2], Value::Number(41.0));
}

#[test]
fn mode_fills_text_with_first_seen_on_ties() {
    let out = cleaned(Strategy::Mode);
    assert_eq!(out.rows[1][1], text("Ada"));
    assert_eq!(out.rows[1][3], text("London"));
    assert_eq!(out.rows[2][2], Value::Number(36.0));
    assert_eq!(out.stats.missing_values.values().sum::<usize>(), 0);
}

#[test]
fn knn_matches_mode() {
    let mode = cleaned(Strategy::Mode);
    let knn = clean(
        &people(),
        &CleaningOptions {
            strategy: Strategy::Knn,
            knn_neighbors: 3,
            columns: None,
        },
    );
    assert_eq!(knn, mode);
}

#[test]
fn drop_keeps_only_complete_rows() {
    let out = cleaned(Strategy::Drop);
    let ids: Vec<String> = out.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(out.stats.total_rows, 2);
}

#[test]
fn drop_with_column_subset_only_checks_those_columns() {
    let opts = CleaningOptions {
        strategy: Strategy::Drop,
        columns: Some(vec!["age".to_string()]),
        ..Default::default()
    };
    let out = clean(&people(), &opts);
    let ids: Vec<String> = out.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(ids, vec!["1", "2", "4"]);
}

#[test]
fn forward_and_backward_fill_carry_neighbors() {
    let ffill = cleaned(Strategy::ForwardFill);
    assert_eq!(ffill.rows[1][1], text("Ada"));
    assert_eq!(ffill.rows[1][3], text("London"));
    assert_eq!(ffill.rows[2][2], text("41"));

    let bfill = cleaned(Strategy::BackwardFill);
    assert_eq!(bfill.rows[1][1], text("Linus"));
    assert_eq!(bfill.rows[1][3], text("Helsinki"));
    assert_eq!(bfill.rows[2][2], text("85"));
}

#[test]
fn column_subset_leaves_other_columns_untouched() {
    let opts = CleaningOptions {
        strategy: Strategy::Mode,
        columns: Some(vec!["city".to_string(), "unknown".to_string()]),
        ..Default::default()
    };
    let out = clean(&people(), &opts);
    assert_eq!(out.rows[1][3], text("London"));
    assert!(out.rows[1][1].is_missing());
    assert!(out.rows[2][2].is_missing());
}

#[test]
fn large_means_stay_finite_and_export_as_numbers() {
    let ds = parse_table("x,y\n1e305,a\n,b\n").unwrap();
    let out = clean(&ds, &CleaningOptions::new(Strategy::Mean));
    assert_eq!(out.rows[1][0], Value::Number(1e305));

    let csv = serialize_table(&out).unwrap();
    let reparsed = parse_table(&csv).unwrap();
    assert_eq!(reparsed.rows[1][0].as_number(), Some(1e305));
}

#[test]
fn clean_does_not_mutate_input() {
    let ds = people();
    let before = ds.clone();
    let _ = clean(&ds, &CleaningOptions::new(Strategy::Mode));
    assert_eq!(ds, before);
}

#[test]
fn cleaned_dataset_exports_as_csv() {
    let out = cleaned(Strategy::Mean);
    assert_eq!(
        serialize_table(&out).unwrap(),
        "id,name,age,city\n1,Ada,36,London\n2,,41,\n3,Linus,54,Helsinki\n4,Grace,85,\"Arlington, VA\"\n"
    );
}

#[test]
fn name_age_walkthrough() {
    let ds = parse_table("name,age\nAnn,30\nBob,\n,25\n").unwrap();
    assert_eq!(ds.stats.total_rows, 3);
    assert_eq!(ds.missing_count("age"), 1);
    assert_eq!(ds.missing_count("name"), 1);

    let mean = clean(&ds, &CleaningOptions::new(Strategy::Mean));
    assert_eq!(serialize_table(&mean).unwrap(), "name,age\nAnn,30\nBob,27.5\n,25\n");

    let mode = clean(&ds, &CleaningOptions::new(Strategy::Mode));
    assert_eq!(mode.rows[2][0], text("Ann"));
    assert_eq!(mode.rows[1][1], Value::Number(30.0));

    let dropped = clean(&ds, &CleaningOptions::new(Strategy::Drop));
    assert_eq!(serialize_table(&dropped).unwrap(), "name,age\nAnn,30\n");
}
