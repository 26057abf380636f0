use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub material: Option<String>,
    pub color: Option<String>,
    pub origin: Option<String>,
    pub manufacturer: String,
    pub brand: String,
    pub explanation: Option<String>,
    pub ships_from: Option<String>,
    pub extra_detail: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
