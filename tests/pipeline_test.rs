use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use genre_explorer::data::loader::load_file;
use genre_explorer::{pivot, run_pipeline, unpivot, ColumnMapping, Record, Selection};

const SAMPLE: &str = "data/movies_genres_summary.csv";

#[test]
fn test_concrete_scenario_from_csv() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(
        file,
        "genre,year,gross\nAction,2000,100\nAction,2000,50\nDrama,2001,30\n"
    )
    .unwrap();
    file.flush().unwrap();

    let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();
    let sel = Selection::new(["Action", "Drama"], (2000, 2001));
    let (table, series) = run_pipeline(&ds.records, &sel);

    assert_eq!(table.years, vec![2001, 2000]);
    assert_eq!(table.value(2001, "Action"), Some(0.0));
    assert_eq!(table.value(2001, "Drama"), Some(30.0));
    assert_eq!(table.value(2000, "Action"), Some(150.0));
    assert_eq!(table.value(2000, "Drama"), Some(0.0));
    assert_eq!(series.len(), 4);
    assert_eq!(series.iter().map(|p| p.value).sum::<f64>(), 180.0);
}

#[test]
fn test_sample_dataset_default_view() {
    let ds = load_file(Path::new(SAMPLE), &ColumnMapping::default()).unwrap();
    assert!(ds.categories.contains("Action"));
    assert!(ds.categories.contains("Adventure"));
    assert_eq!(ds.year_bounds, Some((1986, 2016)));

    let defaults = vec!["Action".to_string(), "Adventure".to_string()];
    let sel = Selection::initial(&ds, &defaults, (2000, 2016));
    let (table, series) = run_pipeline(&ds.records, &sel);

    assert_eq!(table.years.first(), Some(&2016));
    assert_eq!(table.years.last(), Some(&2000));
    assert_eq!(table.categories, defaults);
    assert_eq!(series.len(), table.row_count() * table.column_count());

    let expected: f64 = ds
        .records
        .iter()
        .filter(|r| sel.matches(r))
        .map(|r| r.value)
        .sum();
    assert_eq!(table.total(), expected);
}

#[test]
fn test_densify_across_all_categories() {
    // Horror only appears in 1999; every other year must still get a Horror cell.
    let records = vec![
        Record::new("Action", 1998, 1.0),
        Record::new("Horror", 1999, 2.0),
        Record::new("Action", 2000, 3.0),
        Record::new("Comedy", 2000, 4.0),
    ];
    let table = pivot(&records);

    let columns: BTreeSet<&str> = table.categories.iter().map(String::as_str).collect();
    assert_eq!(columns, BTreeSet::from(["Action", "Comedy", "Horror"]));
    for row in &table.cells {
        assert_eq!(row.len(), 3);
    }
    assert_eq!(table.value(1998, "Horror"), Some(0.0));
    assert_eq!(table.value(2000, "Horror"), Some(0.0));
    assert_eq!(unpivot(&table).len(), 9);
}
