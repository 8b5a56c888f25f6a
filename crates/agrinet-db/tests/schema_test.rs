//! Schema and migration runner tests.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use surrealdb_types::SurrealValue;

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

async fn fresh_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

async fn migration_count(db: &Surreal<Db>) -> u64 {
    let mut result = db
        .query("SELECT count() AS total FROM _migration GROUP ALL")
        .await
        .unwrap();
    let counts: Vec<CountRow> = result.take(0).unwrap();
    counts.first().map(|c| c.total).unwrap_or(0)
}

#[tokio::test]
async fn migrations_apply_on_fresh_database() {
    let db = fresh_db().await;
    agrinet_db::run_migrations(&db).await.unwrap();

    assert_eq!(migration_count(&db).await, 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = fresh_db().await;
    agrinet_db::run_migrations(&db).await.unwrap();
    agrinet_db::run_migrations(&db).await.unwrap();

    assert_eq!(migration_count(&db).await, 1);
}

#[tokio::test]
async fn role_assert_rejects_unknown_values() {
    let db = fresh_db().await;
    agrinet_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE user SET email = 'x@example.com', name = 'X', \
             role = 'astronaut', password_hash = 'h'",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err());
}

#[tokio::test]
async fn email_index_is_unique() {
    let db = fresh_db().await;
    agrinet_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE user SET email = 'dup@example.com', name = 'A', \
         role = 'farmer', password_hash = 'h'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let result = db
        .query(
            "CREATE user SET email = 'dup@example.com', name = 'B', \
             role = 'farmer', password_hash = 'h'",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err());
}
