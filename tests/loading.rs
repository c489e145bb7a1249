use std::collections::BTreeMap;

use missing_data_cleaner::ingestion::{load_from_path, load_from_reader, parse_table};
use missing_data_cleaner::types::Value;
use missing_data_cleaner::CleanerError;

#[test]
fn load_csv_from_path_happy_path() {
    let ds = load_from_path("tests/fixtures/people.csv").unwrap();

    assert_eq!(ds.headers, vec!["id", "name", "age", "city"]);
    assert_eq!(ds.row_count(), 4);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Text("1".to_string()),
            Value::Text("Ada".to_string()),
            Value::Text("36".to_string()),
            Value::Text("London".to_string()),
        ]
    );
    assert_eq!(ds.rows[3][3], Value::Text("Arlington, VA".to_string()));
}

#[test]
fn load_computes_missing_stats() {
    let ds = load_from_path("tests/fixtures/people.csv").unwrap();

    let expected: BTreeMap<String, usize> = [("id", 0), ("name", 1), ("age", 1), ("city", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(ds.stats.total_rows, 4);
    assert_eq!(ds.stats.missing_values, expected);
}

#[test]
fn load_txt_skips_blank_lines_and_trims_fields() {
    let ds = load_from_path("tests/fixtures/survey.txt").unwrap();

    assert_eq!(ds.headers, vec!["respondent", "score", "comment"]);
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.rows[0][1], Value::Text("4.5".to_string()));
    assert_eq!(ds.rows[0][2], Value::Text("good, overall".to_string()));
    assert_eq!(ds.missing_count("score"), 1);
    assert_eq!(ds.missing_count("comment"), 1);
}

#[test]
fn load_strips_utf8_byte_order_mark() {
    let ds = load_from_path("tests/fixtures/bom.csv").unwrap();
    assert_eq!(ds.headers, vec!["id", "age"]);
    assert_eq!(ds.missing_count("age"), 1);

    let ds = load_from_reader(&b"\xEF\xBB\xBFid,age\n1,\n2,4\n"[..]).unwrap();
    assert_eq!(ds.headers, vec!["id", "age"]);
}

#[test]
fn header_only_file_has_zero_rows() {
    let ds = load_from_path("tests/fixtures/header_only.csv").unwrap();
    assert_eq!(ds.row_count(), 0);
    assert_eq!(ds.missing_count("a"), 0);
}

#[test]
fn load_missing_file_is_io_error() {
    let err = load_from_path("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, CleanerError::Io(_)));
}

#[test]
fn load_rejects_unsupported_extension_before_reading() {
    let err = load_from_path("tests/fixtures/does_not_exist.xlsx").unwrap_err();
    match err {
        CleanerError::UserInput { message } => assert!(message.contains(".csv or .txt")),
        other => panic!("expected user input error, got {other:?}"),
    }
}

#[test]
fn load_from_reader_parses_in_memory_content() {
    let input = "a,b\r\n1,2\r\n\r\n3,\r\n";
    let ds = load_from_reader(input.as_bytes()).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[1][1], Value::missing());
}

#[test]
fn empty_content_is_parse_error() {
    let err = parse_table("  \n\t\n").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse dataset"));
    assert!(msg.contains("no header"));
}

#[test]
fn ragged_rows_are_kept_and_counted_by_position() {
    let ds = parse_table("a,b,c\n1,,3,4\n,2\n").unwrap();
    assert_eq!(ds.rows[0].len(), 4);
    assert_eq!(ds.rows[1].len(), 2);
    assert_eq!(ds.missing_count("a"), 1);
    assert_eq!(ds.missing_count("b"), 1);
    assert_eq!(ds.missing_count("c"), 0);
}

#[test]
fn quotes_toggle_and_are_dropped() {
    let ds = parse_table("q\n\"\"\"x\"\"\"\n").unwrap();
    assert_eq!(ds.rows[0][0], Value::Text("x".to_string()));
}
