mod common;

use axum::http::StatusCode;
use common::{TEAM_POLICY, empty_request, json_request, read_json, read_text, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn root_and_health() {
    let app = test_app(TEAM_POLICY);
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/"))
        .await
        .expect("root");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "Hello, World!");

    let response = app
        .router
        .clone()
        .oneshot(json_request("GET", "/health", json!({"status": "up"})))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"message": {"status": "up"}}));

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .expect("probe");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/health")
                .body(axum::body::Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("bad health");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "validation_error");
}

#[tokio::test]
async fn enforce_allows_with_rule_and_forbids_otherwise() {
    let app = test_app(TEAM_POLICY);
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/enforce",
            json!({"subject": "alice", "domain": "teamX", "object": "repo1", "action": "write"}),
        ))
        .await
        .expect("enforce");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        json!(["owner", "teamX", "repo1", "write", "allow"])
    );
    assert_eq!(body["reason"], "allowed");

    for (subject, action) in [("alice", "delete"), ("mallory", "read")] {
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/enforce",
                json!({"subject": subject, "domain": "teamX", "object": "repo1", "action": action}),
            ))
            .await
            .expect("enforce");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(response).await, json!({"message": "forbidden"}));
    }

    let response = app
        .router
        .oneshot(json_request("POST", "/enforce", json!({"subject": "alice"})))
        .await
        .expect("enforce");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_render_tuples() {
    let app = test_app(TEAM_POLICY);
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/domain"))
        .await
        .expect("domain");
    assert_eq!(read_json(response).await, json!({"domains": ["teamX"]}));

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/roles"))
        .await
        .expect("roles");
    assert_eq!(read_json(response).await, json!({"roles": ["moderator", "owner"]}));

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/members/teamX"))
        .await
        .expect("members");
    assert_eq!(
        read_json(response).await,
        json!({"members": [["alice", "owner", "teamX"], ["mallory", "moderator", "teamX"]]})
    );

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/policies"))
        .await
        .expect("policies");
    let body = read_json(response).await;
    assert_eq!(body["policies"].as_array().expect("array").len(), 4);
    assert_eq!(body["policies"][3], json!(["mallory", "teamX", "repo1", "read", "deny"]));

    let response = app
        .router
        .oneshot(empty_request("GET", "/groups"))
        .await
        .expect("groups");
    let body = read_json(response).await;
    assert_eq!(body["groups"].as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn member_lifecycle_persists_to_file() {
    let app = test_app(TEAM_POLICY);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/members/teamX",
            json!({"subject": "carol", "role": "moderator"}),
        ))
        .await
        .expect("add");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"message": "role added"}));
    assert!(app.policy_text().contains("g,carol,moderator,teamX"));

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/members/teamX",
            json!({"subject": "carol", "role": "moderator"}),
        ))
        .await
        .expect("add again");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "not_applied");

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/members/teamX",
            json!({"subject": "carol", "role": "owner"}),
        ))
        .await
        .expect("replace");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"message": "role updated"}));
    let text = app.policy_text();
    assert!(text.contains("g,carol,owner,teamX"));
    assert!(!text.contains("g,carol,moderator,teamX"));

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/members/teamX",
            json!({"subject": "carol"}),
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"message": "role deleted"}));
    assert!(!app.policy_text().contains("carol"));
}

#[tokio::test]
async fn member_errors_follow_contract() {
    let app = test_app(TEAM_POLICY);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/members/teamX",
            json!({"subject": "carol", "role": "admin"}),
        ))
        .await
        .expect("bad role");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["message"], "role must be one of owner, moderator");

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/members/teamX",
            json!({"subject": "bob", "role": "moderator"}),
        ))
        .await
        .expect("unknown user");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "user does not exist");

    let response = app
        .router
        .clone()
        .oneshot(json_request("DELETE", "/members/teamY", json!({"subject": "alice"})))
        .await
        .expect("other domain");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "not_found");

    let response = app
        .router
        .oneshot(json_request(
            "PUT",
            "/members/teamX",
            json!({"subject": "alice", "role": "owner"}),
        ))
        .await
        .expect("same role");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "not_applied");
}

#[tokio::test]
async fn unreadable_policy_is_internal_error() {
    let app = test_app(TEAM_POLICY);
    std::fs::write(app.policy_path(), "x, not, a, rule\n").expect("corrupt");
    let response = app
        .router
        .oneshot(empty_request("GET", "/roles"))
        .await
        .expect("roles");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["code"], "internal");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = test_app(TEAM_POLICY);
    let response = app
        .router
        .oneshot(empty_request("GET", "/v1/openapi.json"))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["paths"].get("/enforce").is_some());
    assert!(body["paths"].get("/members/{domain}").is_some());
}
