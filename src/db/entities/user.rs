//! User entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub nickname: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::drama::Entity")]
    Dramas,
}

impl Related<super::drama::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dramas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
