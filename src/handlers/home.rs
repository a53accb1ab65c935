use axum::{
    extract::Extension,
    response::Response,
};
use std::sync::Arc;

use crate::{
    auth::Auth,
    constants::HOME_PATH,
    error::ReviewlyError,
    handlers::{redirect, ReviewId},
    repo::review::Vote,
    server::State,
    services::reviews,
    views::{Page, ReviewList, ReviewView},
};

/// Handler for `GET /`
pub(crate) async fn index(
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Page<ReviewList>, ReviewlyError> {
    let reviews = reviews::list_all_by_votes_desc(&state)
        .await?
        .into_iter()
        .map(|(review, author)| ReviewView::new(review, author.as_ref()))
        .collect();

    Ok(Page::new("index", &auth, ReviewList { reviews }))
}

/// Handler for `GET|POST /home/upvotes/:id`
pub(crate) async fn upvote(
    ReviewId(id): ReviewId,
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Response, ReviewlyError> {
    reviews::vote(&state, &auth, id, Vote::Up).await?;
    Ok(redirect(HOME_PATH))
}

/// Handler for `GET|POST /home/downvotes/:id`
pub(crate) async fn downvote(
    ReviewId(id): ReviewId,
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Response, ReviewlyError> {
    reviews::vote(&state, &auth, id, Vote::Down).await?;
    Ok(redirect(HOME_PATH))
}
