use bytes::Bytes;
use http::request::Parts;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Body, HeaderMap, Method, Response, StatusCode};
use std::io::Cursor;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

///
/// A readable stream of content, either file bytes or a request body.
///
pub type Content = Box<dyn AsyncRead + Send + Unpin>;

///
/// The state threaded through a filter chain for a single request. A new
/// context is made for every incoming request and dropped once its response
/// has been handed back to the transport.
///
pub struct FilterContext {
    pub request: Parts,
    /// Request-relative path of the file, filters are free to rewrite it.
    pub file_path: String,
    pub file_content: Option<Content>,
    /// `0` until something decides on a status.
    pub response_code: u16,
    pub response_headers: HeaderMap,
    /// Replaces `file_content` as the response body when set.
    pub response_content: Option<Content>,
}

impl FilterContext {
    pub fn new(request: Parts, file_path: String, file_content: Option<Content>) -> FilterContext {
        FilterContext {
            request,
            file_path,
            file_content,
            response_code: 0,
            response_headers: HeaderMap::new(),
            response_content: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn route(&self) -> &str {
        match self.request.uri.path_and_query() {
            Some(val) => val.as_str(),
            None => self.request.uri.path(),
        }
    }

    ///
    /// Set the response status code. Anything other than `200` ends up as a
    /// bodyless response.
    ///
    pub fn status(&mut self, code: u16) {
        self.response_code = code;
    }

    ///
    /// Set a response header. Invalid header names or values are dropped with a
    /// warning.
    ///
    pub fn set(&mut self, key: &str, value: &str) {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.response_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid response header '{}: {}'", key, value),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.response_headers.remove(key);
    }

    ///
    /// Set the body as a string, taking precedence over any file content.
    ///
    pub fn body(&mut self, body_string: &str) {
        self.set_body_bytes(Bytes::from(body_string.to_owned()));
    }

    pub fn set_body_bytes(&mut self, bytes: Bytes) {
        self.response_content = Some(Box::new(Cursor::new(bytes)));
    }

    ///
    /// Fall back to the file content when no filter supplied a response body.
    ///
    pub(crate) fn fallback_to_file_content(&mut self) {
        if self.response_content.is_none() {
            self.response_content = self.file_content.take();
        }
    }

    ///
    /// Turn the context into the response written back to the client.
    ///
    /// A decided status other than `200` is sent on its own, without a body.
    /// Otherwise the response content is streamed out, and dropped (closing
    /// any file behind it) once fully written.
    ///
    pub fn get_response(self) -> Response<Body> {
        let mut response = Response::new(Body::empty());
        *response.headers_mut() = self.response_headers;

        if self.response_code != 0 && self.response_code != StatusCode::OK.as_u16() {
            *response.status_mut() = StatusCode::from_u16(self.response_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return response;
        }

        if let Some(content) = self.response_content {
            *response.body_mut() = Body::wrap_stream(ReaderStream::new(content));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body;
    use hyper::Request;

    fn context() -> FilterContext {
        let (parts, _) = Request::get("/a.txt?x=1").body(()).unwrap().into_parts();
        FilterContext::new(parts, "/a.txt".to_string(), None)
    }

    #[tokio::test]
    async fn it_should_write_only_the_status_on_failure() {
        let mut ctx = context();
        ctx.body("ignored");
        ctx.set("X-Reason", "denied");
        ctx.status(403);

        let response = ctx.get_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers().get("X-Reason").unwrap(), "denied");
        let bytes = body::to_bytes(response.into_body()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn it_should_prefer_the_response_content_over_the_file_content() {
        let mut ctx = context();
        ctx.file_content = Some(Box::new(Cursor::new(b"file".to_vec())));
        ctx.body("override");
        ctx.fallback_to_file_content();

        let response = ctx.get_response();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"override");
    }

    #[tokio::test]
    async fn it_should_fall_back_to_the_file_content() {
        let mut ctx = context();
        ctx.file_content = Some(Box::new(Cursor::new(b"file".to_vec())));
        ctx.status(200);
        ctx.fallback_to_file_content();

        let response = ctx.get_response();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"file");
    }

    #[test]
    fn it_should_expose_the_route_and_drop_invalid_headers() {
        let mut ctx = context();
        ctx.set("Bad Header", "x");
        ctx.set("X-Ok", "1");
        ctx.remove("X-Ok");

        assert_eq!(ctx.route(), "/a.txt?x=1");
        assert_eq!(*ctx.method(), Method::GET);
        assert!(ctx.response_headers.is_empty());
    }
}
