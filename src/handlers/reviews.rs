use axum::{
    extract::{Extension, Form},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{
    actions::UpdateReview,
    auth::Auth,
    constants::USER_POSTS_PATH,
    error::ReviewlyError,
    forms::ReviewForm,
    handlers::{redirect, ReviewId},
    server::State,
    services::reviews,
    views::{EditBody, FormBody, Page, ReviewList, ReviewView},
};

/// Handler for `GET /new_post`
pub(crate) async fn new_post_form(auth: Auth) -> Page<FormBody<ReviewForm>> {
    Page::new("new_post", &auth, FormBody::blank(ReviewForm::default()))
}

/// Handler for `POST /new_post`
pub(crate) async fn new_post(
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
    Form(input): Form<ReviewForm>,
) -> Result<Response, ReviewlyError> {
    let author = auth.user().ok_or(ReviewlyError::Unauthenticated)?;

    match reviews::create(&state, author, input.clone()).await {
        Ok(_) => Ok(redirect(USER_POSTS_PATH)),
        Err(err) => {
            let (status, errors) = err.into_form_errors()?;
            Ok(Page::new("new_post", &auth, FormBody::with_errors(input, errors)).render(status))
        }
    }
}

/// Handler for `GET|POST /user_post`
pub(crate) async fn user_posts(
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Page<ReviewList>, ReviewlyError> {
    let author = auth.user().ok_or(ReviewlyError::Unauthenticated)?;

    let reviews = reviews::list_by_author(&state, author)
        .await?
        .into_iter()
        .map(|review| ReviewView::new(review, Some(author)))
        .collect();

    Ok(Page::new("user_posts", &auth, ReviewList { reviews }))
}

/// Handler for `GET /user_posts/delete/:id`
pub(crate) async fn delete_post(
    ReviewId(id): ReviewId,
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Response, ReviewlyError> {
    reviews::delete(&state, &auth, id).await?;
    Ok(redirect(USER_POSTS_PATH))
}

/// Handler for `GET /user_posts/edit/:id`
pub(crate) async fn edit_post_form(
    ReviewId(id): ReviewId,
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
) -> Result<Response, ReviewlyError> {
    let review = reviews::get_for_edit(&state, &auth, id).await?;
    let body = EditBody {
        review_id: review.id,
        form: FormBody::blank(UpdateReview::from(&review)),
    };
    Ok(Page::new("edit", &auth, body).into_response())
}

/// Handler for `POST /user_posts/edit/:id`
pub(crate) async fn edit_post(
    ReviewId(id): ReviewId,
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
    Form(input): Form<UpdateReview>,
) -> Result<Response, ReviewlyError> {
    match reviews::edit(&state, &auth, id, input.clone()).await {
        Ok(_) => Ok(redirect(USER_POSTS_PATH)),
        Err(err) => {
            let (status, errors) = err.into_form_errors()?;
            let body = EditBody {
                review_id: id,
                form: FormBody::with_errors(input, errors),
            };
            Ok(Page::new("edit", &auth, body).render(status))
        }
    }
}
