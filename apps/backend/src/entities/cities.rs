use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    /// Short upper-case code, e.g. `BER`
    #[sea_orm(unique)]
    pub code: String,
    pub country: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_roles::Entity")]
    UserRoles,
    #[sea_orm(has_many = "super::shift_leads::Entity")]
    ShiftLeads,
}

impl Related<super::user_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::shift_leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShiftLeads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
