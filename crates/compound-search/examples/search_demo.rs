//! Compound search demo
//!
//! Builds a throwaway SQLite registry, then looks compounds up by batch
//! registration id with a weight filter.
//!
//! Run with: cargo run --example search_demo
//! Set RUST_LOG=compound_search=debug to see one event per batch.

use compound_search::logging::LogConfig;
use compound_search::{search_compounds, Credentials, QueryShape, SearchConfig};
use rusqlite::{params, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::info().init()?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("registry.db");
    seed(&path)?;

    // In production these come from DB_URL / USERNAME / DB_KEY
    let credentials = Credentials::new(path.to_string_lossy(), "demo", "demo")?;
    let shape = QueryShape::new(
        "BATCH JOIN MOLECULE ON BATCH.MOL_COMP_ID = MOLECULE.MOL_COMP_ID",
        "BATCH.BATCH_REGID",
    )
    .with_projection(["BATCH.BATCH_REGID", "MOLECULE.MOL_REGID", "MOLECULE.MOL_WEIGHT"]);
    let config = SearchConfig::new(credentials, shape).with_max_batch_size(2);

    let wanted = ["B-001", "B-002", "B-003", "B-004", "B-999"];
    println!("=== All requested batches ===");
    for record in search_compounds(&config, &wanted, "")? {
        let row: Vec<String> = record.iter().map(|(c, v)| format!("{}={}", c, v)).collect();
        println!("  {}", row.join("  "));
    }

    println!("\n=== Only light molecules ===");
    for record in search_compounds(&config, &wanted, "MOLECULE.MOL_WEIGHT < 190")? {
        println!(
            "  {} -> {}",
            record.get_str("BATCH_REGID").unwrap_or("?"),
            record.get_str("MOL_REGID").unwrap_or("?")
        );
    }

    println!("\n=== Rejected filter ===");
    match search_compounds(&config, &wanted, "1=1; DROP TABLE BATCH") {
        Ok(_) => println!("  unexpectedly accepted"),
        Err(err) => println!("  {}", err),
    }

    Ok(())
}

fn seed(path: &std::path::Path) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE MOLECULE (MOL_COMP_ID INTEGER PRIMARY KEY, MOL_REGID TEXT, MOL_WEIGHT REAL);
         CREATE TABLE BATCH (BATCH_ID INTEGER PRIMARY KEY, BATCH_REGID TEXT, MOL_COMP_ID INTEGER);",
    )?;
    let molecules = [("CPD-ASPIRIN", 180.16), ("CPD-CAFFEINE", 194.19), ("CPD-IBUPROFEN", 206.28)];
    for (regid, weight) in molecules {
        conn.execute(
            "INSERT INTO MOLECULE (MOL_REGID, MOL_WEIGHT) VALUES (?1, ?2)",
            params![regid, weight],
        )?;
    }
    for (i, molecule) in [1, 1, 2, 3].iter().enumerate() {
        conn.execute(
            "INSERT INTO BATCH (BATCH_REGID, MOL_COMP_ID) VALUES (?1, ?2)",
            params![format!("B-{:03}", i + 1), molecule],
        )?;
    }
    Ok(())
}
