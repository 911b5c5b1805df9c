mod common;

#[test]
fn creates_and_migrates_the_metadata_store() {
    let test_db = common::TestDb::new("test_connection.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}
