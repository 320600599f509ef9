pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::creations::handlers as creations;
use crate::generation::handlers as generation;
use crate::state::AppState;

/// Upper bound for any request body. Upload routes turn an overflow into their
/// own size-limit message; the resume endpoint also checks a smaller 5 MB cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/ai/generate-article",
            post(generation::handle_generate_article),
        )
        .route(
            "/api/ai/generate-blog-title",
            post(generation::handle_generate_blog_title),
        )
        .route(
            "/api/ai/generate-cover-letter",
            post(generation::handle_generate_cover_letter),
        )
        .route(
            "/api/ai/generate-image",
            post(generation::handle_generate_image),
        )
        .route(
            "/api/ai/remove-image-background",
            post(generation::handle_remove_background),
        )
        .route(
            "/api/ai/remove-image-object",
            post(generation::handle_remove_object),
        )
        .route(
            "/api/ai/resume-review",
            post(generation::handle_resume_review),
        )
        .route(
            "/api/user/get-user-creations",
            get(creations::handle_user_creations),
        )
        .route(
            "/api/user/get-published-creations",
            get(creations::handle_published_creations),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_support::{TestHarness, USER};

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send(
        app: Router,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json_body) => request
                .header("content-type", "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        call(app, request).await
    }

    const BOUNDARY: &str = "pencraft-test-boundary";

    enum Part {
        File(&'static str, &'static str, Vec<u8>),
        Text(&'static str, &'static str),
    }

    async fn send_multipart(app: Router, path: &str, token: &str, parts: Vec<Part>) -> Value {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, file_name, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        call(app, request).await.1
    }

    #[tokio::test]
    async fn test_health_needs_no_auth() {
        let harness = TestHarness::new();
        let (status, body) = send(build_router(harness.state()), "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_in_body() {
        let harness = TestHarness::new();
        let (status, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-article",
            None,
            Some(json!({"prompt": "x", "length": 800})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not authenticated");
        assert!(harness.llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_article_end_to_end_for_free_user() {
        let harness = TestHarness::new()
            .with_usage(Some(2))
            .with_llm_reply("# Remote work\n\nBody.", "stop");

        let (status, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-article",
            Some(&TestHarness::free_token()),
            Some(json!({"prompt": "Remote work", "length": 1500})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "content": "# Remote work\n\nBody."}));
        assert_eq!(harness.llm.calls()[0].max_tokens, 2520);
        let rows = harness.creations.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].creation_type, "article");
        assert_eq!(rows[0].user_id, USER);
        assert_eq!(harness.identity.writes(), vec![(USER.to_string(), 3)]);
    }

    #[tokio::test]
    async fn test_quota_exhausted_user_gets_limit_message() {
        let harness = TestHarness::new()
            .with_usage(Some(10))
            .with_llm_reply("unused", "stop");

        let (_, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-blog-title",
            Some(&TestHarness::free_token()),
            Some(json!({"keyword": "Rust", "category": "Programming"})),
        )
        .await;

        assert_eq!(
            body,
            json!({"success": false, "message": "Limit Reached. Upgrade to continue"})
        );
        assert!(harness.llm.calls().is_empty());
        assert!(harness.creations.rows().is_empty());
    }

    #[tokio::test]
    async fn test_image_generation_requires_premium() {
        let harness = TestHarness::new().with_usage(Some(0));

        let (_, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-image",
            Some(&TestHarness::free_token()),
            Some(json!({"prompt": "a cat", "publish": true})),
        )
        .await;

        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "This feature is only available for premium subscribers"
        );
        assert!(harness.host.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_image_generation_for_premium_user() {
        let harness = TestHarness::new();

        let (_, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-image",
            Some(&TestHarness::premium_token()),
            Some(json!({"prompt": "a cat", "publish": true})),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["content"], "https://images.test/upload/1");
        let rows = harness.creations.rows();
        assert_eq!(rows[0].creation_type, "image");
        assert!(rows[0].publish);
        assert!(harness.identity.writes().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported_in_body() {
        let harness = TestHarness::new().with_usage(Some(0));

        let (status, body) = send(
            build_router(harness.state()),
            "POST",
            "/api/ai/generate-cover-letter",
            Some(&TestHarness::free_token()),
            Some(json!({"jobDescription": 42})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(harness.llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_user_creations_listing() {
        let harness = TestHarness::new()
            .with_usage(Some(0))
            .with_llm_reply("Dear team, ...", "stop");
        let app = build_router(harness.state());

        send(
            app.clone(),
            "POST",
            "/api/ai/generate-cover-letter",
            Some(&TestHarness::free_token()),
            Some(json!({"jobDescription": "JD", "userSkills": "Rust", "tone": "concise"})),
        )
        .await;

        let (_, body) = send(
            app,
            "GET",
            "/api/user/get-user-creations",
            Some(&TestHarness::free_token()),
            None,
        )
        .await;

        assert_eq!(body["success"], true);
        let creations = body["creations"].as_array().unwrap();
        assert_eq!(creations.len(), 1);
        assert_eq!(creations[0]["type"], "cover-letter");
        assert_eq!(creations[0]["prompt"], "JD");
    }

    #[tokio::test]
    async fn test_background_removal_upload() {
        let harness = TestHarness::new();

        let body = send_multipart(
            build_router(harness.state()),
            "/api/ai/remove-image-background",
            &TestHarness::premium_token(),
            vec![Part::File("image", "room.jpg", b"jpeg-bytes".to_vec())],
        )
        .await;

        assert_eq!(body, json!({"success": true, "content": "https://images.test/upload/1"}));
        let uploads = harness.host.uploads();
        assert_eq!(uploads[0].file_name, "room.jpg");
        assert_eq!(uploads[0].bytes.as_ref(), b"jpeg-bytes");
        assert_eq!(uploads[0].transformation.as_deref(), Some("e_background_removal"));
        let rows = harness.creations.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].creation_type, "image");
        assert_eq!(rows[0].prompt, "Remove background from the image");
    }

    #[tokio::test]
    async fn test_object_removal_reads_object_field() {
        let harness = TestHarness::new();

        let body = send_multipart(
            build_router(harness.state()),
            "/api/ai/remove-image-object",
            &TestHarness::premium_token(),
            vec![
                Part::File("image", "desk.png", b"png-bytes".to_vec()),
                Part::Text("object", "coffee mug"),
            ],
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(
            body["content"],
            "https://images.test/e_gen_remove:coffee%20mug/public-1"
        );
        let rows = harness.creations.rows();
        assert_eq!(rows[0].creation_type, "image");
        assert_eq!(rows[0].prompt, "Removed coffee mug from image");
    }

    #[tokio::test]
    async fn test_free_caller_rejected_on_upload_route() {
        let harness = TestHarness::new().with_usage(Some(0));

        let body = send_multipart(
            build_router(harness.state()),
            "/api/ai/remove-image-background",
            &TestHarness::free_token(),
            vec![Part::File("image", "room.jpg", b"jpeg-bytes".to_vec())],
        )
        .await;

        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "This feature is only available for premium subscribers"
            })
        );
        assert!(harness.host.uploads().is_empty());
        assert!(harness.creations.rows().is_empty());
    }

    #[tokio::test]
    async fn test_resume_over_size_limit() {
        let harness = TestHarness::new().with_llm_reply("review", "stop");

        let body = send_multipart(
            build_router(harness.state()),
            "/api/ai/resume-review",
            &TestHarness::premium_token(),
            vec![Part::File("resume", "resume.pdf", vec![b'a'; 6 * 1024 * 1024])],
        )
        .await;

        assert_eq!(
            body,
            json!({"success": false, "message": "Resume file size exceeds allowed size (5MB)."})
        );
        assert!(harness.llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resume_over_body_limit_gets_size_message() {
        let harness = TestHarness::new().with_llm_reply("review", "stop");

        let body = send_multipart(
            build_router(harness.state()),
            "/api/ai/resume-review",
            &TestHarness::premium_token(),
            vec![Part::File("resume", "resume.pdf", vec![b'a'; 11 * 1024 * 1024])],
        )
        .await;

        assert_eq!(
            body,
            json!({"success": false, "message": "Resume file size exceeds allowed size (5MB)."})
        );
        assert!(harness.llm.calls().is_empty());
        assert!(harness.creations.rows().is_empty());
    }

    #[tokio::test]
    async fn test_published_listing_only_returns_published_rows() {
        let harness = TestHarness::new()
            .with_usage(Some(0))
            .with_llm_reply("# Draft\n\nBody.", "stop");
        let app = build_router(harness.state());

        send(
            app.clone(),
            "POST",
            "/api/ai/generate-article",
            Some(&TestHarness::free_token()),
            Some(json!({"prompt": "Draft", "length": 800})),
        )
        .await;
        send(
            app.clone(),
            "POST",
            "/api/ai/generate-image",
            Some(&TestHarness::premium_token()),
            Some(json!({"prompt": "a cat", "publish": true})),
        )
        .await;
        assert_eq!(harness.creations.rows().len(), 2);

        let (_, body) = send(
            app,
            "GET",
            "/api/user/get-published-creations",
            Some(&TestHarness::free_token()),
            None,
        )
        .await;

        assert_eq!(body["success"], true);
        let creations = body["creations"].as_array().unwrap();
        assert_eq!(creations.len(), 1);
        assert_eq!(creations[0]["type"], "image");
        assert_eq!(creations[0]["publish"], true);
        assert_eq!(creations[0]["content"], "https://images.test/upload/1");
    }
}
