#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use policyd::app::{AppState, build_router};
use std::sync::Arc;
use tempfile::TempDir;
use warden_policy::{FileAdapter, PolicyService, RoleWhitelist};

pub const TEAM_POLICY: &str = "\
p, owner, teamX, repo1, write, allow
p, owner, teamX, repo1, read, allow
p, moderator, teamX, repo1, read, allow
p, mallory, teamX, repo1, read, deny
g, alice, owner, teamX
g, mallory, moderator, teamX
";

pub struct TestApp {
    pub router: axum::Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn policy_path(&self) -> std::path::PathBuf {
        self.dir.path().join("policy.csv")
    }

    pub fn policy_text(&self) -> String {
        std::fs::read_to_string(self.policy_path()).expect("read policy")
    }
}

pub fn test_app(contents: &str) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("policy.csv");
    std::fs::write(&path, contents).expect("write policy");
    let state = AppState {
        service: PolicyService::new(Arc::new(FileAdapter::new(path))),
        whitelist: RoleWhitelist::default(),
    };
    TestApp {
        router: build_router(state),
        dir,
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}
