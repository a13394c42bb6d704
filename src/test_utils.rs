// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Clone)]
enum MockResponse {
    Fixed { status: u16, body: String },
    /// Answer 201 with the request body, as the API server does on create
    Echo,
}

/// One request the mock service has served, kept for assertions
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on exact
/// method and path, recording every request it serves.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("GET", path, MockResponse::Fixed {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("POST", path, MockResponse::Fixed {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Make POST requests to the exact path answer 201 with the request
    /// body, the way the API server echoes a created resource
    pub fn on_post_echo(self, path: &str) -> Self {
        self.insert("POST", path, MockResponse::Echo);
        self
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("DELETE", path, MockResponse::Fixed {
            status,
            body: body.to_string(),
        });
        self
    }

    fn insert(&self, method: &str, path: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), response);
    }

    /// Build a kube Client from this mock service
    pub fn into_client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Snapshot of every request served so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests served for the given method and path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<MockResponse> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(|q| q.to_string());

        let response = self.find_response(&method, &path);
        let requests = Arc::clone(&self.requests);

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes().to_vec();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body: body.clone(),
            });

            match response {
                Some(MockResponse::Fixed { status, body }) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                Some(MockResponse::Echo) => Ok(Response::builder()
                    .status(201)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

/// Create a mock branch namespace JSON response
pub fn namespace_json(name: &str, created: Option<&str>) -> String {
    let mut metadata = serde_json::json!({
        "name": name,
        "uid": "test-uid",
        "labels": { "deployedBy": "emmie" }
    });
    if let Some(created) = created {
        metadata["creationTimestamp"] = serde_json::json!(created);
    }
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": metadata
    })
    .to_string()
}

/// Create a mock pod JSON response
pub fn pod_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": "feature-login"
        }
    })
    .to_string()
}

/// Create a mock list response from pre-rendered item JSON
pub fn list_json(kind: &str, items: Vec<String>) -> String {
    format!(
        r#"{{"kind":"{}","apiVersion":"v1","metadata":{{}},"items":[{}]}}"#,
        kind,
        items.join(",")
    )
}

/// Create a success Status response, as returned by delete calls
pub fn status_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Success"
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response, as returned when a resource already exists
pub fn conflict_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("{} \"{}\" already exists", resource, name),
        "reason": "AlreadyExists",
        "code": 409
    })
    .to_string()
}
