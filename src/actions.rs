//! CRUD action-like resources and the policy that governs them
use entity::review;
use oso::{Oso, PolarClass, ToPolar};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::Auth, config::ReviewAccess, error::ReviewlyError, forms::not_blank, server::State,
};

const REVIEWS_POLICY: &str = include_str!("../polar/reviews.polar");

/// The "DELETE" action. Because there is no data pertinent to this action it is a unit struct.
#[derive(Debug, Clone, Copy, PolarClass)]
pub(crate) struct Delete;

/// The action by which a review is edited. Can be understood as a sort of changeset.
///
/// This struct in particular doubles up for multiple use cases. It's used for `POST /user_posts/edit/:id`
/// form input, in authorization rules, and also for the update itself.
#[derive(Debug, Clone, Default, Validate, Deserialize, Serialize, PolarClass)]
#[serde(default)]
pub(crate) struct UpdateReview {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Must be between 3 and 200 characters long."
    ), custom = "not_blank")]
    #[polar(attribute)]
    pub(crate) title: String,
    #[validate(length(
        min = 3,
        max = 200,
        message = "Must be between 3 and 200 characters long."
    ), custom = "not_blank")]
    #[polar(attribute)]
    pub(crate) product_name: String,
    #[validate(
        length(min = 3, message = "Must be at least 3 characters long."),
        custom = "not_blank"
    )]
    #[polar(attribute)]
    pub(crate) content: String,
}

impl From<&review::Model> for UpdateReview {
    fn from(review: &review::Model) -> Self {
        UpdateReview {
            title: review.title.clone(),
            product_name: review.product_name.clone(),
            content: review.content.clone(),
        }
    }
}

/// Attempt to create a new oso instance for managing authorization schemes.
pub(crate) fn try_register_oso() -> Result<Oso, oso::OsoError> {
    let mut oso = Oso::new();

    // NOTE: load classes here
    oso.register_class(entity::user::Model::get_polar_class())?;
    oso.register_class(review::Model::get_polar_class())?;

    // action classes in this module should be loaded here too
    oso.register_class(Delete::get_polar_class())?;
    oso.register_class(UpdateReview::get_polar_class())?;

    oso.load_str(REVIEWS_POLICY)?;

    Ok(oso)
}

/// Decide whether the requester may perform `action` on `review`.
///
/// With open access everyone may. Under owner-only access anonymous requesters are sent to log in
/// and everybody else is judged by the policy.
pub(crate) async fn authorize<A>(
    state: &State,
    auth: &Auth,
    action: A,
    review: &review::Model,
) -> Result<(), ReviewlyError>
where
    A: ToPolar + Send,
{
    if state.config.review_access == ReviewAccess::Open {
        return Ok(());
    }

    let user = auth.user().ok_or(ReviewlyError::Unauthenticated)?;
    let allowed = state
        .oso
        .lock()
        .await
        .is_allowed(user.clone(), action, review.clone())?;

    if allowed {
        Ok(())
    } else {
        tracing::debug!(user = user.id, review = review.id, "Review access denied");
        Err(ReviewlyError::Forbidden)
    }
}
