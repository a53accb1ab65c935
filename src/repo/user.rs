use entity::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

/// Queries against the `user` table.
#[derive(Debug, Clone)]
pub(crate) struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub(crate) fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(&self.db).await
    }

    pub(crate) async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub(crate) async fn username_taken(&self, username: &str) -> Result<bool, DbErr> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .is_some())
    }

    pub(crate) async fn email_taken(&self, email: &str) -> Result<bool, DbErr> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Insert a user whose password is already hashed.
    pub(crate) async fn insert(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username),
            email: Set(email),
            password: Set(password_hash),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub(crate) async fn update_password(
        &self,
        user: user::Model,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        let mut user: user::ActiveModel = user.into();
        user.password = Set(password_hash);
        user.update(&self.db).await
    }

    #[cfg(test)]
    pub(crate) async fn count(&self) -> Result<usize, DbErr> {
        Ok(user::Entity::find().all(&self.db).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::test_db;

    #[tokio::test]
    async fn finds_users_by_email_and_reports_taken_names() {
        let users = UserRepository::new(test_db().await);
        let alice = users
            .insert("alice".into(), "a@x.com".into(), "$hash".into())
            .await
            .unwrap();

        assert_eq!(users.find_by_email("a@x.com").await.unwrap(), Some(alice.clone()));
        assert_eq!(users.find_by_id(alice.id).await.unwrap(), Some(alice));
        assert!(users.username_taken("alice").await.unwrap());
        assert!(!users.username_taken("bob").await.unwrap());
        assert!(users.email_taken("a@x.com").await.unwrap());
        assert!(!users.email_taken("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn unique_columns_reject_duplicates() {
        let users = UserRepository::new(test_db().await);
        users
            .insert("alice".into(), "a@x.com".into(), "$hash".into())
            .await
            .unwrap();
        assert!(users
            .insert("alice".into(), "other@x.com".into(), "$hash".into())
            .await
            .is_err());
        assert_eq!(users.count().await.unwrap(), 1);
    }
}
