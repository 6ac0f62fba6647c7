use futures::TryStreamExt;
use hyper::{Body, Method, Request, Response, StatusCode};
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use crate::config::Configuration;
use crate::core::context::{Content, FilterContext};
use crate::core::errors::FsResult;
use crate::core::middleware::FilterChain;
use crate::core::workspace::Workspace;
use crate::middleware::file::{FileFilter, FileHandler, FileOperation};

///
/// App, the dispatcher of the file server. It owns one filter chain per file
/// operation, each ending in the built-in operation, and routes every request
/// to the chain matching its method:
///
/// - `GET` fetches the file at the request path,
/// - `POST` uploads the request body to it,
/// - `DELETE` removes it and prunes the directories left empty.
///
/// Any other method is answered with `405` without running a chain.
///
/// The chains are built once in `App::create` and only read afterwards, so a
/// single `App` can serve any number of concurrent requests.
///
/// ```rust, ignore
/// let mut config = Configuration::new("/srv/lfs");
/// config.upload_filters = filters![authorize];
///
/// let app = App::create(config)?;
/// let response = app.resolve(request).await;
/// ```
///
pub struct App {
    workspace: Arc<Workspace>,
    bind_addr: String,
    serve_port: u16,
    fetch_chain: FilterChain,
    upload_chain: FilterChain,
    delete_chain: FilterChain,
}

impl App {
    ///
    /// Apply the configuration defaults, prepare the workspace directory and
    /// build the three chains.
    ///
    pub fn create(mut config: Configuration) -> FsResult<App> {
        config.set_defaults()?;

        let workspace = Arc::new(Workspace::new(&config.path));
        let handler = FileHandler::new(workspace.clone());

        let fetch_chain = FilterChain::build(
            config.fetch_filters,
            FileFilter::new(handler.clone(), FileOperation::Load),
        );
        let upload_chain = FilterChain::build(
            config.upload_filters,
            FileFilter::new(handler.clone(), FileOperation::Create),
        );
        let delete_chain = FilterChain::build(
            config.delete_filters,
            FileFilter::new(handler, FileOperation::Delete),
        );

        Ok(App {
            workspace,
            bind_addr: config.bind_addr,
            serve_port: config.serve_port,
            fetch_chain,
            upload_chain,
            delete_chain,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn serve_port(&self) -> u16 {
        self.serve_port
    }

    ///
    /// Run a request through the chain for its method and build the response.
    ///
    pub async fn resolve(&self, request: Request<Body>) -> Response<Body> {
        debug!("Receive request {} {}", request.method(), request.uri().path());

        let (parts, body) = request.into_parts();

        let (chain, is_upload) = match parts.method {
            Method::GET => (&self.fetch_chain, false),
            Method::POST => (&self.upload_chain, true),
            Method::DELETE => (&self.delete_chain, false),
            _ => return status_response(StatusCode::METHOD_NOT_ALLOWED),
        };

        let file_path = match urlencoding::decode(parts.uri.path()) {
            Ok(path) => path.into_owned(),
            Err(_) => return status_response(StatusCode::BAD_REQUEST),
        };

        let file_content = if is_upload {
            Some(body_content(body))
        } else {
            None
        };

        let is_fetch = parts.method == Method::GET;
        let mut context = FilterContext::new(parts, file_path, file_content);

        chain.run(&mut context).await;

        if is_fetch {
            context.fallback_to_file_content();
        }

        context.get_response()
    }
}

fn body_content(body: Body) -> Content {
    Box::new(StreamReader::new(
        body.map_err(|err| io::Error::new(io::ErrorKind::Other, err)),
    ))
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;

    response
}
