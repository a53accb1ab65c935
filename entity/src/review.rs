use oso::PolarClass;
use sea_orm::entity::prelude::*;

/// A product review. `date_posted` and `user_id` never change after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, PolarClass)]
#[sea_orm(table_name = "review")]
#[polar(class_name = "Review")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[polar(attribute)]
    pub id: i32,
    pub title: String,
    pub product_name: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub date_posted: DateTimeUtc,
    #[polar(attribute)]
    pub user_id: i32,
    pub upvotes: i32,
    pub downvotes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
