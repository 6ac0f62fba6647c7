use async_trait::async_trait;
use std::io;

use crate::app::App;

#[async_trait]
pub trait FileServer {
    fn new(_: App) -> Self;
    async fn build(self, host: &str, port: u16) -> io::Result<()>;
    fn start(self, host: &str, port: u16) -> io::Result<()>
    where
        Self: Sized,
    {
        tokio::runtime::Runtime::new()?.block_on(self.build(host, port))
    }
}
