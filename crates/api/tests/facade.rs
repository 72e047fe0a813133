//! End-to-end façade scenarios, mirroring the spec's testable properties.

use jsondb_api::{JsonDb, JsonDbConfig};
use jsondb_core::Error;

fn open_db() -> (tempfile::TempDir, JsonDb) {
    let dir = tempfile::tempdir().unwrap();
    let db = JsonDb::open(JsonDbConfig::new(dir.path().join("db.redb"))).unwrap();
    (dir, db)
}

#[test]
fn deep_creation() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_int(&mut tx, "$.a.b.c.d", 7, true).unwrap();
    assert_eq!(db.get_int(&mut tx, "$.a.b.c.d").unwrap(), 7);
    assert!(db.exists(&mut tx, "$.a.b").unwrap());
    assert!(!db.exists(&mut tx, "$.a.x").unwrap());
    assert!(db.validate(&mut tx).unwrap());

    tx.commit().unwrap();
}

#[test]
fn array_in_object() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_array(&mut tx, "$.xs", 3, true).unwrap();
    for i in 0..3 {
        db.set_int(&mut tx, &format!("$.xs[{i}]"), i as i32 * 10, true)
            .unwrap();
    }
    assert_eq!(db.get_int(&mut tx, "$.xs[2]").unwrap(), 20);
    let err = db.get_int(&mut tx, "$.xs[3]").unwrap_err();
    assert!(matches!(err, Error::IndexOutOfBounds(_)));

    tx.commit().unwrap();
}

#[test]
fn json_graft() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_json(
        &mut tx,
        "$.o",
        "{ 'n': 'Alice', 'k': 42, 'a': [true, null, 1.5] }",
        true,
    )
    .unwrap();

    assert_eq!(db.get_string(&mut tx, "$.o.n").unwrap(), "Alice");
    assert_eq!(db.get_int(&mut tx, "$.o.k").unwrap(), 42);
    assert!(db.get_bool(&mut tx, "$.o.a[0]").unwrap());
    assert_eq!(db.get_real(&mut tx, "$.o.a[2]").unwrap(), 1.5);

    tx.commit().unwrap();
}

#[test]
fn append_heterogeneous() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_array(&mut tx, "$.q", 0, true).unwrap();
    db.append_array_int(&mut tx, "$.q", 100).unwrap();
    db.append_array_bool(&mut tx, "$.q", false).unwrap();
    db.append_array_string(&mut tx, "$.q", "s").unwrap();
    db.append_array_json(&mut tx, "$.q", "{ 'k': 1 }").unwrap();

    assert_eq!(db.get_int(&mut tx, "$.q[0]").unwrap(), 100);
    assert!(!db.get_bool(&mut tx, "$.q[1]").unwrap());
    assert_eq!(db.get_string(&mut tx, "$.q[2]").unwrap(), "s");
    assert_eq!(db.get_int(&mut tx, "$.q[3].k").unwrap(), 1);

    tx.commit().unwrap();
}

#[test]
fn delete_mid_array() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_json(&mut tx, "$.a", "[10, 20, 30]", true).unwrap();
    db.delete(&mut tx, "$.a[1]").unwrap();

    assert_eq!(db.get_int(&mut tx, "$.a[0]").unwrap(), 10);
    assert_eq!(db.get_int(&mut tx, "$.a[1]").unwrap(), 30);
    assert!(matches!(
        db.get_int(&mut tx, "$.a[2]").unwrap_err(),
        Error::IndexOutOfBounds(_)
    ));

    tx.commit().unwrap();
}

#[test]
fn bracket_and_quote_forms_are_equivalent() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_int(&mut tx, "$.x.y", 5, true).unwrap();

    assert_eq!(db.get_int(&mut tx, "$['x'].y").unwrap(), 5);
    assert_eq!(db.get_int(&mut tx, "$.x['y']").unwrap(), 5);
    assert_eq!(db.get_int(&mut tx, "$[\"x\"][\"y\"]").unwrap(), 5);

    tx.commit().unwrap();
}

#[test]
fn identity_is_preserved_across_set() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_int(&mut tx, "$.a", 1, true).unwrap();
    let (_, key_before) = jsondb_engine::resolve_path(
        &mut tx,
        jsondb_core::ROOT_KEY,
        "$.a",
        jsondb_engine::Policy::Throw,
    )
    .unwrap();

    db.set_int(&mut tx, "$.a", 2, true).unwrap();
    let (_, key_after) = jsondb_engine::resolve_path(
        &mut tx,
        jsondb_core::ROOT_KEY,
        "$.a",
        jsondb_engine::Policy::Throw,
    )
    .unwrap();

    assert_eq!(key_before, key_after);
    assert_eq!(db.get_int(&mut tx, "$.a").unwrap(), 2);

    tx.commit().unwrap();
}

#[test]
fn type_mismatch_on_wrong_accessor() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_string(&mut tx, "$.s", "hello", true).unwrap();
    assert!(matches!(
        db.get_int(&mut tx, "$.s").unwrap_err(),
        Error::TypeMismatch(_)
    ));
    assert!(matches!(
        db.get_int(&mut tx, "$.s[0]").unwrap_err(),
        Error::TypeMismatch(_)
    ));

    tx.commit().unwrap();
}

#[test]
fn delete_removes_existence() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_int(&mut tx, "$.a", 1, true).unwrap();
    assert!(db.exists(&mut tx, "$.a").unwrap());
    db.delete(&mut tx, "$.a").unwrap();
    assert!(!db.exists(&mut tx, "$.a").unwrap());

    tx.commit().unwrap();
}

#[test]
fn deleting_root_is_rejected() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    let err = db.delete(&mut tx, "$").unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn set_json_fails_before_parsing_when_path_missing_and_not_creating() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    // Invalid JSON *and* a missing path with create_if_missing = false:
    // resolution must fail first, so this is PathNotFound, not JsonSyntax.
    let err = db
        .set_json(&mut tx, "$.missing", "not json at all {", false)
        .unwrap_err();
    assert!(matches!(err, Error::PathNotFound(_)));
}

#[test]
fn persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.redb");

    {
        let db = JsonDb::open(JsonDbConfig::new(&db_path)).unwrap();
        let mut tx = db.start_transaction().unwrap();
        db.set_int(&mut tx, "$.a.b.c.d", 7, true).unwrap();
        tx.commit().unwrap();
    }

    let db = JsonDb::open(JsonDbConfig::new(&db_path)).unwrap();
    let mut tx = db.start_transaction().unwrap();
    assert_eq!(db.get_int(&mut tx, "$.a.b.c.d").unwrap(), 7);
    assert!(db.validate(&mut tx).unwrap());
}

#[test]
fn print_renders_nested_structure() {
    let (_dir, db) = open_db();
    let mut tx = db.start_transaction().unwrap();

    db.set_json(&mut tx, "$.o", "{ 'a': 1, 'b': [1, 2] }", true)
        .unwrap();
    let rendered = db.print_to_string(&mut tx, Some("$.o")).unwrap();
    assert!(rendered.contains("\"a\""));
    assert!(rendered.contains('1'));
}

#[test]
fn rollback_on_abort_is_invisible_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.redb");

    {
        let db = JsonDb::open(JsonDbConfig::new(&db_path)).unwrap();
        let mut tx = db.start_transaction().unwrap();
        db.set_int(&mut tx, "$.a", 1, true).unwrap();
        tx.abort().unwrap();
    }

    let db = JsonDb::open(JsonDbConfig::new(&db_path)).unwrap();
    let mut tx = db.start_transaction().unwrap();
    assert!(!db.exists(&mut tx, "$.a").unwrap());
}
