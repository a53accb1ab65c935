//! Typed access to the `user` and `review` tables.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

pub(crate) mod review;
pub(crate) mod user;

pub(crate) use review::ReviewRepository;
pub(crate) use user::UserRepository;

/// Create any missing tables. Users first, since reviews reference them.
pub(crate) async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, entity::user::Entity).await?;
    create_table(db, entity::review::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
