//! Browser form endpoints.
//!
//! - `GET /` — empty form pre-filled with defaults
//! - `POST /predict` — urlencoded submission, re-renders the page with
//!   either the result section or the per-field errors

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::api::endpoints::predict::{run_assessment, validate};
use crate::api::error::ApiError;
use crate::api::pages::{render_page, PageBody};
use crate::api::types::ApiContext;
use crate::models::PatientInput;
use crate::presenter;

/// `GET /`
pub async fn index() -> Html<String> {
    Html(render_page(&PatientInput::default(), PageBody::Welcome))
}

/// `POST /predict`
pub async fn submit(
    State(ctx): State<ApiContext>,
    form: Result<Form<PatientInput>, FormRejection>,
) -> Response {
    let Form(input) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::warn!(status = %rejection.status(), "Form submission could not be parsed");
            let body = rejection.body_text();
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page(
                    &PatientInput::default(),
                    PageBody::Malformed(&body),
                )),
            )
                .into_response();
        }
    };

    let record = match validate(&input) {
        Ok(record) => record,
        Err(ApiError::Validation(errors)) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&input, PageBody::Rejected(&errors))),
            )
                .into_response();
        }
        Err(other) => return other.into_response(),
    };

    match run_assessment(&ctx, record).await {
        Ok((_, assessment)) => {
            let section = presenter::render_html(&assessment);
            Html(render_page(&input, PageBody::Result(&section))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
