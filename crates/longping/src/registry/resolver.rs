use std::io;
use std::net::IpAddr;

/// Hostname to address lookup
#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system (getaddrinfo)
///
/// IP literals resolve to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait::async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        let addresses = tokio::net::lookup_host((hostname, 0)).await?;
        Ok(addresses.map(|socket| socket.ip()).collect())
    }
}
