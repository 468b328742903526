mod common;

use common::RegistryFixture;
use compound_search::{
    search_compounds, CompoundSearch, Error, QueryShape, SearchConfig, SqliteConnector, Value,
};
use std::collections::HashSet;

#[test]
fn test_round_trip_single_identifier() {
    let fixture = RegistryFixture::new();
    fixture.add_molecule("X1", 180.16);
    let config = fixture.molecule_config();

    let records = search_compounds(&config, &["X1"], "1=1").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("MOL_REGID"), Some("X1"));
    assert_eq!(records[0].get("MOL_WEIGHT"), Some(&Value::Real(180.16)));

    let records = search_compounds(&config, &["X1"], "1=0").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_only_requested_identifiers_are_returned() {
    let fixture = RegistryFixture::new();
    for (regid, weight) in [("X1", 100.0), ("X2", 250.0), ("X3", 420.0), ("X4", 90.0)] {
        fixture.add_molecule(regid, weight);
    }
    let config = fixture.molecule_config();

    let records = search_compounds(&config, &["X2", "X4", "NOPE"], "").unwrap();
    let found: HashSet<&str> = records.iter().filter_map(|r| r.get_str("MOL_REGID")).collect();
    assert_eq!(found, HashSet::from(["X2", "X4"]));
}

#[test]
fn test_filter_is_combined_with_identifiers() {
    let fixture = RegistryFixture::new();
    for (regid, weight) in [("X1", 100.0), ("X2", 250.0), ("X3", 420.0)] {
        fixture.add_molecule(regid, weight);
    }
    let config = fixture.molecule_config();

    let records = search_compounds(
        &config,
        &["X1", "X2"],
        "MOL_WEIGHT > 200 OR MOL_REGID = 'X3'",
    )
    .unwrap();
    let found: Vec<&str> = records.iter().filter_map(|r| r.get_str("MOL_REGID")).collect();
    // X3 satisfies the filter but was not requested
    assert_eq!(found, vec!["X2"]);
}

#[test]
fn test_identifiers_are_bound_not_interpolated() {
    let fixture = RegistryFixture::new();
    fixture.add_molecule("X1", 100.0);
    let config = fixture.molecule_config();

    let hostile = "X1') OR 1=1 --";
    let records = search_compounds(&config, &[hostile], "").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_duplicate_identifiers_are_harmless() {
    let fixture = RegistryFixture::new();
    fixture.add_molecule("X1", 100.0);
    let config = fixture.molecule_config();

    let records = search_compounds(&config, &["X1", "X1", "X1"], "1=1").unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_batches_concatenate_in_batch_order() {
    let fixture = RegistryFixture::new();
    let regids: Vec<String> = (0..25).map(|i| format!("CPD-{:04}", i)).collect();
    for (i, regid) in regids.iter().enumerate() {
        fixture.add_molecule(regid, i as f64);
    }
    let config = fixture.molecule_config().with_max_batch_size(10);

    // Request in reverse so batch 1 holds the highest ids
    let requested: Vec<String> = regids.iter().rev().cloned().collect();
    let records = search_compounds(&config, &requested, "1=1").unwrap();
    assert_eq!(records.len(), 25);

    let batch_of = |regid: &str| requested.iter().position(|r| r == regid).unwrap() / 10;
    let batches: Vec<usize> = records
        .iter()
        .map(|r| batch_of(r.get_str("MOL_REGID").unwrap()))
        .collect();
    let mut sorted = batches.clone();
    sorted.sort();
    assert_eq!(batches, sorted, "batches were interleaved");
}

#[test]
fn test_join_source_with_qualified_columns() {
    let fixture = RegistryFixture::new();
    let aspirin = fixture.add_molecule("MOL-1", 180.16);
    let caffeine = fixture.add_molecule("MOL-2", 194.19);
    fixture.add_batch("B-100", aspirin);
    fixture.add_batch("B-101", aspirin);
    fixture.add_batch("B-200", caffeine);

    let shape = QueryShape::new(
        "BATCH JOIN MOLECULE ON BATCH.MOL_COMP_ID = MOLECULE.MOL_COMP_ID",
        "BATCH.BATCH_REGID",
    )
    .with_projection(["BATCH.BATCH_REGID", "MOLECULE.MOL_REGID", "MOLECULE.MOL_CTFILE"]);
    let config = SearchConfig::new(fixture.credentials(), shape);

    let records =
        search_compounds(&config, &["B-101", "B-200"], "MOLECULE.MOL_WEIGHT < 190").unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.columns(), &["BATCH_REGID", "MOL_REGID", "MOL_CTFILE"]);
    assert_eq!(record.get_str("BATCH_REGID"), Some("B-101"));
    assert_eq!(record.get_str("MOL_REGID"), Some("MOL-1"));

    let molfile = record.get("MOL_CTFILE").and_then(|v| v.as_text()).unwrap();
    assert!(molfile.starts_with("MOL-1\n"));
    assert!(molfile.contains("M  END"));
}

#[test]
fn test_malformed_filter_is_query_error() {
    let fixture = RegistryFixture::new();
    fixture.add_molecule("X1", 100.0);
    let config = fixture.molecule_config();

    let err = search_compounds(&config, &["X1"], "MOL_WEIGHT >").unwrap_err();
    assert!(matches!(err, Error::Query(_)), "{:?}", err);

    let err = search_compounds(&config, &["X1"], "NO_SUCH_COLUMN = 1").unwrap_err();
    match err {
        Error::Query(msg) => assert!(msg.contains("NO_SUCH_COLUMN"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unsafe_filter_is_rejected() {
    let fixture = RegistryFixture::new();
    fixture.add_molecule("X1", 100.0);
    let config = fixture.molecule_config();

    for filter in ["1=1; DROP TABLE MOLECULE", "1=1) OR (1=1", "1=1 --"] {
        let err = search_compounds(&config, &["X1"], filter).unwrap_err();
        assert!(matches!(err, Error::Query(_)), "{}: {:?}", filter, err);
    }
}

#[test]
fn test_quoted_identifiers_cannot_widen_the_search() {
    let fixture = RegistryFixture::new();
    for (regid, weight) in [("X1", 100.0), ("X2", 250.0), ("X3", 420.0)] {
        fixture.add_molecule(regid, weight);
    }
    let config = fixture.molecule_config();

    for filter in [
        "1 = CAST(1 AS [(])) OR (1 = CAST(1 AS [)])",
        "1 = CAST(1 AS `(`)) OR (1 = CAST(1 AS `)`)",
    ] {
        let err = search_compounds(&config, &["X1"], filter).unwrap_err();
        assert!(matches!(err, Error::Query(_)), "{}: {:?}", filter, err);
    }

    let records = search_compounds(&config, &["X1", "X2"], "[MOL_WEIGHT] > 200").unwrap();
    let found: Vec<&str> = records.iter().filter_map(|r| r.get_str("MOL_REGID")).collect();
    assert_eq!(found, vec!["X2"]);

    let records = search_compounds(&config, &["X1", "X2"], "`MOL_WEIGHT` < 200").unwrap();
    let found: Vec<&str> = records.iter().filter_map(|r| r.get_str("MOL_REGID")).collect();
    assert_eq!(found, vec!["X1"]);
}

#[test]
fn test_non_database_file_is_connection_error() {
    let fixture = RegistryFixture::new();
    let path = fixture.temp_dir.path().join("registry.txt");
    std::fs::write(&path, "MOL_REGID,MOL_WEIGHT\nX1,100.0\n".repeat(100)).unwrap();
    let credentials =
        compound_search::Credentials::new(path.to_string_lossy(), "reader", "unused").unwrap();
    let config = SearchConfig::new(credentials, QueryShape::new("MOLECULE", "MOL_REGID"));

    let err = search_compounds(&config, &["X1"], "1=1").unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "{:?}", err);
}

#[test]
fn test_unreachable_database_is_connection_error() {
    let fixture = RegistryFixture::new();
    let credentials = compound_search::Credentials::new(
        fixture.temp_dir.path().join("missing.db").to_string_lossy(),
        "reader",
        "unused",
    )
    .unwrap();
    let config = SearchConfig::new(credentials, QueryShape::new("MOLECULE", "MOL_REGID"));

    let err = search_compounds(&config, &["X1"], "1=1").unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "{:?}", err);
}

#[test]
fn test_batch_size_above_engine_limit_is_rejected() {
    let fixture = RegistryFixture::new();
    let config = fixture.molecule_config().with_max_batch_size(40_000);
    let err = CompoundSearch::new(&config, SqliteConnector::new()).err().unwrap();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_concurrent_searches_share_one_service() {
    let fixture = RegistryFixture::new();
    for i in 0..8 {
        fixture.add_molecule(&format!("X{}", i), 100.0 + i as f64);
    }
    let config = fixture.molecule_config();
    let search = CompoundSearch::new(&config, SqliteConnector::new()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let search = &search;
                scope.spawn(move || search.search(&[format!("X{}", i)], "1=1"))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let records = handle.join().unwrap().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].get_str("MOL_REGID"), Some(format!("X{}", i).as_str()));
        }
    });
}
