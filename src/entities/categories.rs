use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// UUIDv4 string key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    /// URL-safe slug derived from the name
    #[sea_orm(unique)]
    pub slug: String,

    pub description: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::video_categories::Entity")]
    VideoCategories,
}

impl Related<super::video_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoCategories.def()
    }
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        super::video_categories::Relation::Videos.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::video_categories::Relation::Categories.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
