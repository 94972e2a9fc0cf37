//! Router for the commission-rate endpoints.
//!
//! - `GET /` - list all rates
//! - `POST /` - create a rate (409 on active-category conflict)
//! - `GET /{id}` - fetch one rate
//! - `PUT /{id}` - update a rate (409 on category conflict)
//! - `DELETE /{id}` - delete a rate (409 when transactions reference it)
//! - `POST /{id}/deactivate` - soft-retire a rate

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{
    create_rate, deactivate_rate, delete_rate, get_rate, list_rates, update_rate,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rates).post(create_rate))
        .route("/:id", get(get_rate).put(update_rate).delete(delete_rate))
        .route("/:id/deactivate", post(deactivate_rate))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::http::test_support::test_app;
    use crate::adapters::http::app_router;
    use crate::domain::foundation::CategoryId;

    fn rate_body(category_id: CategoryId) -> String {
        format!(
            r#"{{"category_id":"{}","commission_type":"percentage","commission_value":"0.10","min_amount":"5","max_amount":"500"}}"#,
            category_id
        )
    }

    async fn post_rate(app: &axum::Router, body: String) -> StatusCode {
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/commission-rates")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn create_then_duplicate_category_conflicts() {
        let app = app_router(test_app().state);
        let category_id = CategoryId::new();

        assert_eq!(post_rate(&app, rate_body(category_id)).await, StatusCode::CREATED);
        assert_eq!(post_rate(&app, rate_body(category_id)).await, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_bounds_are_bad_request() {
        let app = app_router(test_app().state);
        let body = format!(
            r#"{{"category_id":"{}","commission_type":"percentage","commission_value":"0.10","min_amount":"500","max_amount":"5"}}"#,
            CategoryId::new()
        );
        assert_eq!(post_rate(&app, body).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_rate_is_not_found() {
        let app = app_router(test_app().state);
        let response = app
            .oneshot(
                Request::get(format!(
                    "/api/commission-rates/{}",
                    crate::domain::foundation::RateId::new()
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
