//! Seed the reserved roles

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20240101_000001_create_user_roles::UserRoles;
use super::Audit;

const RESERVED: [(i32, &str); 5] = [
    (1, "superadmin"),
    (2, "reselleradmin"),
    (3, "clientadmin"),
    (4, "associationadmin"),
    (5, "user"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(UserRoles::Table).columns([
            Alias::new("role_id"),
            Alias::new("role_name"),
            Alias::new("created_by"),
            Alias::new("created_at"),
            Alias::new("status"),
        ]);
        for (id, name) in RESERVED {
            insert
                .values([
                    id.into(),
                    name.into(),
                    "system".into(),
                    Expr::current_timestamp().into(),
                    true.into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        insert.on_conflict(OnConflict::column(UserRoles::RoleId).do_nothing().to_owned());

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&insert)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(UserRoles::Table)
            .and_where(Expr::col(UserRoles::RoleId).lte(5))
            .and_where(Expr::col(Audit::CreatedBy).eq("system"))
            .to_owned();

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&delete)).await?;
        Ok(())
    }
}
