use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub video_link: String,

    pub description: Option<String>,

    /// RFC 3339 UTC timestamp; lexicographic order matches creation order
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

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::video_categories::Relation::Categories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::video_categories::Relation::Videos.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
