use chrono::Utc;
use entity::{review, user};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};

/// Which counter a vote bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vote {
    Up,
    Down,
}

impl Vote {
    fn column(self) -> review::Column {
        match self {
            Vote::Up => review::Column::Upvotes,
            Vote::Down => review::Column::Downvotes,
        }
    }
}

/// Queries against the `review` table.
#[derive(Debug, Clone)]
pub(crate) struct ReviewRepository {
    db: DatabaseConnection,
}

impl ReviewRepository {
    pub(crate) fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) async fn find_by_id(&self, id: i32) -> Result<Option<review::Model>, DbErr> {
        review::Entity::find_by_id(id).one(&self.db).await
    }

    /// Insert a review posted now by `author`, with both counters at zero.
    pub(crate) async fn insert(
        &self,
        author: &user::Model,
        title: String,
        product_name: String,
        content: String,
    ) -> Result<review::Model, DbErr> {
        review::ActiveModel {
            title: Set(title),
            product_name: Set(product_name),
            content: Set(content),
            date_posted: Set(Utc::now()),
            user_id: Set(author.id),
            upvotes: Set(0),
            downvotes: Set(0),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Overwrite the mutable text fields. Author, date and votes are left alone.
    pub(crate) async fn update_text(
        &self,
        review: review::Model,
        title: String,
        product_name: String,
        content: String,
    ) -> Result<review::Model, DbErr> {
        let mut review: review::ActiveModel = review.into();
        review.title = Set(title);
        review.product_name = Set(product_name);
        review.content = Set(content);
        review.update(&self.db).await
    }

    /// Returns whether a row was removed.
    pub(crate) async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let res = review::Entity::delete_many()
            .filter(review::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Bump a counter by one in a single `UPDATE`, so concurrent votes are never lost.
    /// Returns whether the review exists.
    pub(crate) async fn increment(&self, id: i32, vote: Vote) -> Result<bool, DbErr> {
        let col = vote.column();
        let res = review::Entity::update_many()
            .col_expr(col, Expr::col(col).add(1))
            .filter(review::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Reviews owned by `author`, oldest first.
    pub(crate) async fn list_by_author(
        &self,
        author: &user::Model,
    ) -> Result<Vec<review::Model>, DbErr> {
        author
            .find_related(review::Entity)
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await
    }

    /// Every review with its author, most upvoted first. Ties keep insertion order.
    pub(crate) async fn list_all_by_votes_desc(
        &self,
    ) -> Result<Vec<(review::Model, Option<user::Model>)>, DbErr> {
        review::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(review::Column::Upvotes)
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::UserRepository;
    use crate::server::testing::test_db;

    async fn setup() -> (ReviewRepository, user::Model) {
        let db = test_db().await;
        let author = UserRepository::new(db.clone())
            .insert("alice".into(), "a@x.com".into(), "$hash".into())
            .await
            .unwrap();
        (ReviewRepository::new(db), author)
    }

    #[tokio::test]
    async fn increments_one_counter_at_a_time() {
        let (reviews, author) = setup().await;
        let review = reviews
            .insert(&author, "T".into(), "P".into(), "C".into())
            .await
            .unwrap();

        for _ in 0..3 {
            assert!(reviews.increment(review.id, Vote::Up).await.unwrap());
        }
        assert!(reviews.increment(review.id, Vote::Down).await.unwrap());

        let review = reviews.find_by_id(review.id).await.unwrap().unwrap();
        assert_eq!((review.upvotes, review.downvotes), (3, 1));
    }

    #[tokio::test]
    async fn missing_rows_are_reported() {
        let (reviews, _) = setup().await;
        assert!(!reviews.increment(42, Vote::Up).await.unwrap());
        assert!(!reviews.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let (reviews, author) = setup().await;
        let first = reviews
            .insert(&author, "one".into(), "p".into(), "c".into())
            .await
            .unwrap();
        let second = reviews
            .insert(&author, "two".into(), "p".into(), "c".into())
            .await
            .unwrap();
        let third = reviews
            .insert(&author, "three".into(), "p".into(), "c".into())
            .await
            .unwrap();
        reviews.increment(third.id, Vote::Up).await.unwrap();

        let ids: Vec<i32> = reviews
            .list_all_by_votes_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|(review, _)| review.id)
            .collect();
        assert_eq!(ids, vec![third.id, first.id, second.id]);
    }
}
