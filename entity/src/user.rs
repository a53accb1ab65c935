use oso::PolarClass;
use sea_orm::entity::prelude::*;

/// A registered user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, PolarClass)]
#[sea_orm(table_name = "user")]
#[polar(class_name = "User")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[polar(attribute)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// The password in hashed PHC form, as represented in the database
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
