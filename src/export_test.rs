use super::*;
use time::macros::date;

fn rows(csv: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_owned).collect())
        .collect()
}

#[test]
fn header_row_first() {
    let csv = results_to_csv(&ResultData::empty()).unwrap();
    assert_eq!(csv.lines().next(), Some("Month,Value,Growth (%),Target"));
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn full_rows_round_trip() {
    let data = ResultData {
        labels: vec!["Jan".into(), "Feb".into()],
        values: vec![100.0, 200.0],
        growth: Some(vec![5.0, 10.0]),
        target: Some(vec![90.0, 210.0]),
    };
    let csv = results_to_csv(&data).unwrap();
    assert_eq!(rows(&csv), vec![vec!["Jan", "100", "5.0", "90"], vec!["Feb", "200", "10.0", "210"]]);
}

#[test]
fn missing_optional_columns_leave_empty_cells() {
    let data = ResultData { labels: vec!["Q1".into()], values: vec![12.5], growth: None, target: None };
    let csv = results_to_csv(&data).unwrap();
    assert_eq!(rows(&csv), vec![vec!["Q1", "12.5", "", ""]]);
}

#[test]
fn growth_rounds_to_one_decimal() {
    let data = ResultData {
        labels: vec!["Mar".into()],
        values: vec![1.0],
        growth: Some(vec![4.26]),
        target: Some(vec![]),
    };
    assert_eq!(rows(&results_to_csv(&data).unwrap()), vec![vec!["Mar", "1", "4.3", ""]]);
}

#[test]
fn large_values_have_no_thousands_separator() {
    let data = ResultData { labels: vec!["Apr".into()], values: vec![1_234_567.0], growth: None, target: None };
    let csv = results_to_csv(&data).unwrap();
    assert!(csv.contains("Apr,1234567,,"));
}

#[test]
fn labels_with_commas_are_quoted() {
    let data = ResultData { labels: vec!["North, East".into()], values: vec![1.0], growth: None, target: None };
    let csv = results_to_csv(&data).unwrap();
    assert!(csv.contains("\"North, East\",1"));
    assert_eq!(rows(&csv)[0][0], "North, East");
}

#[test]
fn export_file_name_uses_iso_date() {
    assert_eq!(export_file_name(date!(2024 - 03 - 01)), "analytics_data_2024-03-01.csv");
}
