use async_trait::async_trait;
use hyper::server::conn::Http;
use hyper::service::make_service_fn;
use hyper::service::Service;
use hyper::{Body, Request, Response};
use socket2::{Domain, Socket, Type};
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::wrappers::TcpListenerStream;

use crate::app::App;
use crate::core::stater::Stater;
use crate::server::FileServer;

pub struct HyperServer {
    app: App,
}

impl HyperServer {
    fn bind(addr: &SocketAddr) -> io::Result<tokio::net::TcpListener> {
        let socket = Socket::new(Domain::for_address(*addr), Type::STREAM, None)?;

        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
        socket.bind(&(*addr).into())?;
        socket.listen(1024)?;
        socket.set_nonblocking(true)?;
        let _ = socket.set_nodelay(true);

        let listener: std::net::TcpListener = socket.into();
        tokio::net::TcpListener::from_std(listener)
    }

    async fn process(app: Arc<App>, addr: &SocketAddr) -> io::Result<()> {
        let listener = TcpListenerStream::new(Self::bind(addr)?);

        let service = make_service_fn(|stream: &tokio::net::TcpStream| {
            let ip = stream.peer_addr().ok().map(|addr| addr.ip());
            let app = app.clone();

            async move { Ok::<_, hyper::Error>(FileService { ip, app }) }
        });

        let mut http = Http::new();
        http.http1_only(true);

        let server =
            hyper::server::Builder::new(hyper::server::accept::from_stream(listener), http)
                .serve(service);

        server
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }
}

#[async_trait]
impl FileServer for HyperServer {
    fn new(app: App) -> Self {
        HyperServer { app }
    }

    async fn build(self, host: &str, port: u16) -> io::Result<()> {
        let root = self.app.workspace().root().to_path_buf();
        if let Err(err) = Stater::new().expect_dir().stat(&root).await {
            error!("Workspace {} is invalid: {}", root.display(), err);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, err));
        }

        let addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address for {}:{}", host, port),
            )
        })?;

        info!("Starting file server for {} on {}", root.display(), addr);

        let result = Self::process(Arc::new(self.app), &addr).await;
        if let Err(err) = &result {
            error!("Failed to listen on {}: {}", addr, err);
        }

        result
    }
}

#[derive(Clone)]
struct FileService {
    app: Arc<App>,
    ip: Option<IpAddr>,
}

impl Service<Request<Body>> for FileService {
    type Response = Response<Body>;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let app = self.app.clone();

        if let Some(ip) = self.ip {
            trace!("{} {} from {}", req.method(), req.uri().path(), ip);
        }

        Box::pin(async move { Ok(app.resolve(req).await) })
    }
}
