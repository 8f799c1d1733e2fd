/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /auth は認証なし、/posts は access middleware (route_layer) 配下
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::{login, signup},
    posts::{create_post, delete_post, get_post, list_posts, update_post},
};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/", get(list_posts))
        .route("/posts/post", post(create_post))
        .route(
            "/posts/post/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        );

    public.merge(access::apply(protected, state))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::test_support;

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        send(app, bare_request(method, uri, token)).await
    }

    async fn signup(app: &Router, email: &str, password: &str) -> StatusCode {
        let body = json!({"email": email, "password": password});
        send(app, json_request("POST", "/api/v1/auth/signup", None, &body))
            .await
            .0
    }

    async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
        let form = format!("username={email}&password={password}");
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        send(app, req).await
    }

    async fn token_for(app: &Router, email: &str) -> String {
        assert_eq!(signup(app, email, "pw12").await, StatusCode::CREATED);
        let (status, body) = login(app, email, "pw12").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    fn hello() -> Value {
        json!({
            "title": "Hello World",
            "description": "A description text.",
            "tag": "misc"
        })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_support::app().await;
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn signup_then_duplicate_is_rejected() {
        let app = test_support::app().await;

        assert_eq!(signup(&app, "a@x.com", "pw12").await, StatusCode::CREATED);
        assert_eq!(signup(&app, "a@x.com", "pw12").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_enforces_password_policy() {
        let app = test_support::app().await;

        assert_eq!(
            signup(&app, "a@x.com", "pw1").await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            signup(&app, "a@x.com", "01234567890").await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn login_returns_bearer_token() {
        let app = test_support::app().await;
        signup(&app, "a@x.com", "pw12").await;

        let (status, body) = login(&app, "a@x.com", "pw12").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 300);
        assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn login_failures_look_identical() {
        let app = test_support::app().await;
        signup(&app, "a@x.com", "pw12").await;

        let wrong_password = login(&app, "a@x.com", "nope").await;
        let unknown_user = login(&app, "nobody@x.com", "pw12").await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn posts_require_a_valid_token() {
        let app = test_support::app().await;

        let (status, body) = call(&app, "GET", "/api/v1/posts", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

        let (status, _) = call(&app, "GET", "/api/v1/posts", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let expired = test_support::expired_token(1, "a@x.com");
        let (status, _) = call(&app, "GET", "/api/v1/posts", Some(&expired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn end_to_end_example() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;
        let bob = token_for(&app, "b@x.com").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = call(&app, "GET", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Hello World");
        assert_eq!(body["description"], "A description text.");
        assert_eq!(body["tag"], "misc");

        let (status, body) = call(&app, "GET", "/api/v1/posts/post/1", Some(&bob)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;
        let bob = token_for(&app, "b@x.com").await;
        send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;

        let changed = json!({
            "title": "Hijacked title",
            "description": "Not yours to change.",
            "tag": "evil"
        });
        let (status, _) = send(
            &app,
            json_request("PUT", "/api/v1/posts/post/1", Some(&bob), &changed),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "DELETE", "/api/v1/posts/post/1", Some(&bob)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = call(&app, "GET", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(body["title"], "Hello World");
    }

    #[tokio::test]
    async fn update_and_delete_by_owner() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;
        send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;

        let changed = json!({
            "title": "Changed title",
            "description": "Changed description.",
            "tag": "news"
        });
        let (status, body) = send(
            &app,
            json_request("PUT", "/api/v1/posts/post/1", Some(&alice), &changed),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (_, body) = call(&app, "GET", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(body["title"], "Changed title");
        assert_eq!(body["tag"], "news");

        let (status, _) = call(&app, "DELETE", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "GET", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listing_is_cached_across_writes() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;
        send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;

        let (status, first) = call(&app, "GET", "/api/v1/posts/", Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first.as_array().unwrap().len(), 1);

        send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;

        let (_, second) = call(&app, "GET", "/api/v1/posts", Some(&alice)).await;
        assert_eq!(first, second);
    }

    fn oversized_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
        let mut req = json_request(method, uri, Some(token), body);
        req.headers_mut().insert(header::CONTENT_LENGTH, "1048577".parse().unwrap());
        req
    }

    #[tokio::test]
    async fn oversized_declared_payload_is_rejected_before_validation() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;

        // Body itself is invalid; the declared length must win.
        let req = oversized_request("POST", "/api/v1/posts/post", &alice, &json!({}));
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");

        let (_, listing) = call(&app, "GET", "/api/v1/posts", Some(&alice)).await;
        assert_eq!(listing, json!([]));
    }

    #[tokio::test]
    async fn oversized_update_leaves_post_untouched() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;
        send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &hello()),
        )
        .await;

        let changed = json!({
            "title": "Changed title",
            "description": "Changed description.",
            "tag": "news"
        });
        let req = oversized_request("PUT", "/api/v1/posts/post/1", &alice, &changed);
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");

        let (_, post) = call(&app, "GET", "/api/v1/posts/post/1", Some(&alice)).await;
        assert_eq!(post["title"], "Hello World");
        assert_eq!(post["tag"], "misc");
    }

    #[tokio::test]
    async fn invalid_fields_are_unprocessable() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;

        let short = json!({"title": "Hi", "description": "A description text.", "tag": "misc"});
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &short),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");

        let missing = json!({"title": "Hello World"});
        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/posts/post", Some(&alice), &missing),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn non_positive_post_id_is_unprocessable() {
        let app = test_support::app().await;
        let alice = token_for(&app, "a@x.com").await;

        let (status, _) = call(&app, "GET", "/api/v1/posts/post/0", Some(&alice)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found_even_without_token() {
        let app = test_support::app().await;
        let (status, _) = call(&app, "GET", "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let app = test_support::app().await;
        let response = app
            .clone()
            .oneshot(bare_request("GET", "/health", None))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
