//! Posting, editing, deleting and voting on reviews.

use entity::{review, user};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    actions::{authorize, Delete, UpdateReview},
    auth::Auth,
    config::VotePolicy,
    constants::VOTE_KEY_PREFIX,
    error::ReviewlyError,
    forms::ReviewForm,
    repo::review::Vote,
    server::State,
};

/// Post a new review by `author`.
pub(crate) async fn create(
    state: &State,
    author: &user::Model,
    form: ReviewForm,
) -> Result<review::Model, ReviewlyError> {
    form.validate()?;

    let review = state
        .reviews
        .insert(author, form.title, form.product_name, form.content)
        .await?;

    info!(review = review.id, user = author.id, "Review posted");
    Ok(review)
}

pub(crate) async fn list_by_author(
    state: &State,
    author: &user::Model,
) -> Result<Vec<review::Model>, ReviewlyError> {
    Ok(state.reviews.list_by_author(author).await?)
}

pub(crate) async fn list_all_by_votes_desc(
    state: &State,
) -> Result<Vec<(review::Model, Option<user::Model>)>, ReviewlyError> {
    Ok(state.reviews.list_all_by_votes_desc().await?)
}

/// Look up a review the requester is about to edit, for pre-filling the form.
pub(crate) async fn get_for_edit(
    state: &State,
    auth: &Auth,
    id: i32,
) -> Result<review::Model, ReviewlyError> {
    let review = find(state, id).await?;
    authorize(state, auth, UpdateReview::from(&review), &review).await?;
    Ok(review)
}

/// Replace a review's title, product name and content.
pub(crate) async fn edit(
    state: &State,
    auth: &Auth,
    id: i32,
    changes: UpdateReview,
) -> Result<review::Model, ReviewlyError> {
    let review = find(state, id).await?;
    authorize(state, auth, changes.clone(), &review).await?;
    changes.validate()?;

    let review = state
        .reviews
        .update_text(review, changes.title, changes.product_name, changes.content)
        .await?;

    info!(review = review.id, "Review edited");
    Ok(review)
}

/// Permanently remove a review.
pub(crate) async fn delete(state: &State, auth: &Auth, id: i32) -> Result<(), ReviewlyError> {
    let review = find(state, id).await?;
    authorize(state, auth, Delete, &review).await?;

    if !state.reviews.delete(review.id).await? {
        return Err(ReviewlyError::NotFound);
    }
    state
        .store
        .del(&format!("{}{}", VOTE_KEY_PREFIX, review.id))
        .await?;

    info!(review = id, "Review deleted");
    Ok(())
}

/// Count one vote, subject to the configured vote policy.
///
/// Under the once-per-user policy a repeated vote is ignored and the review is returned unchanged.
pub(crate) async fn vote(
    state: &State,
    auth: &Auth,
    id: i32,
    vote: Vote,
) -> Result<review::Model, ReviewlyError> {
    if state.config.vote_policy == VotePolicy::OncePerUser {
        let voter = auth.user().ok_or(ReviewlyError::Unauthenticated)?;
        let review = find(state, id).await?;

        let key = format!("{}{}", VOTE_KEY_PREFIX, review.id);
        if !state.store.add_member(&key, voter.id).await? {
            debug!(review = id, user = voter.id, "Repeated vote ignored");
            return Ok(review);
        }
    }

    if !state.reviews.increment(id, vote).await? {
        return Err(ReviewlyError::NotFound);
    }
    find(state, id).await
}

async fn find(state: &State, id: i32) -> Result<review::Model, ReviewlyError> {
    state
        .reviews
        .find_by_id(id)
        .await?
        .ok_or(ReviewlyError::NotFound)
}
