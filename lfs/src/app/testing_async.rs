use hyper::{body, Body, Request, Response};
use std::collections::HashMap;

use crate::app::App;

pub async fn request(app: &App, request: Request<Body>) -> TestResponse {
    let response = app.resolve(request).await;

    TestResponse::new(response).await
}

pub async fn get(app: &App, route: &str) -> TestResponse {
    let request = Request::get(route).body(Body::empty()).unwrap();

    self::request(app, request).await
}

pub async fn post(app: &App, route: &str, content: &[u8]) -> TestResponse {
    let request = Request::post(route)
        .header("Content-Length", content.len())
        .body(Body::from(content.to_vec()))
        .unwrap();

    self::request(app, request).await
}

pub async fn delete(app: &App, route: &str) -> TestResponse {
    let request = Request::delete(route).body(Body::empty()).unwrap();

    self::request(app, request).await
}

#[derive(Debug)]
pub struct TestResponse {
    pub body: Vec<u8>,
    pub headers: HashMap<String, String>,
    pub status: u16,
}

impl TestResponse {
    async fn new(response: Response<Body>) -> TestResponse {
        let mut headers = HashMap::new();

        for (key, value) in response.headers().iter() {
            headers.insert(key.as_str().to_owned(), value.to_str().unwrap().to_owned());
        }

        let status = response.status().as_u16();
        let body = match body::to_bytes(response.into_body()).await {
            Ok(res) => res,
            Err(_) => panic!("Could not correctly read response"),
        }
        .to_vec();

        TestResponse {
            body,
            headers,
            status,
        }
    }

    pub fn body_string(&self) -> String {
        std::str::from_utf8(&self.body).unwrap().to_string()
    }
}
