use sea_orm::entity::prelude::*;

/// One parsed JSON response, keyed by the URL it was fetched from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cached_response")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub url: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// Milliseconds since the Unix epoch.
    pub fetched_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
