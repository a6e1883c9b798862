use super::*;

fn count(db: &SchemaDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn test_in_memory() {
    let db = SchemaDb::new(":memory:").unwrap();
    assert!(!db.relation_exists("anything").unwrap());
}

#[test]
fn test_open_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    assert!(!path.exists());
    let _db = SchemaDb::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_execute_sql_through_trait() {
    let mut db = SchemaDb::open_memory().unwrap();
    db.execute_sql("CREATE TABLE t (id INTEGER)").unwrap();
    db.execute_sql("INSERT INTO t VALUES (1), (2)").unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 2);
    assert!(db.relation_exists("t").unwrap());
    assert!(db.relation_exists("main.t").unwrap());
}

#[test]
fn test_execute_sql_error_is_reported() {
    let mut db = SchemaDb::open_memory().unwrap();
    let err = db.execute_sql("INSERT INTO missing VALUES (1)").unwrap_err();
    assert!(err.to_string().contains("D002"));
}

#[test]
fn test_relation_exists_in_schema() {
    let db = SchemaDb::open_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.t (id INTEGER);")
        .unwrap();
    assert!(db.relation_exists("staging.t").unwrap());
    assert!(!db.relation_exists("t").unwrap());
}

#[test]
fn test_rollback_discards_changes() {
    let db = SchemaDb::open_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    db.begin().unwrap();
    db.execute_batch("INSERT INTO t VALUES (1)").unwrap();
    db.rollback().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 0);

    db.begin().unwrap();
    db.execute_batch("INSERT INTO t VALUES (1)").unwrap();
    db.commit().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn test_commit_without_transaction_fails() {
    let db = SchemaDb::open_memory().unwrap();
    assert!(matches!(
        db.commit().unwrap_err(),
        DbError::TransactionError(_)
    ));
}
