//! Network helpers for transport-failure tests.

use std::net::TcpListener;

use url::Url;

/// Base URL on loopback where nothing is listening.
///
/// Binds an ephemeral port and releases it, so connections are refused rather
/// than timing out.
#[must_use]
pub fn unreachable_base_url() -> Url {
    let port = TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .map_or(9, |addr| addr.port());
    Url::parse(&format!("http://127.0.0.1:{port}/api")).expect("loopback URL is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpStream;

    #[test]
    fn unreachable_url_refuses_connections() {
        let url = unreachable_base_url();
        assert_eq!(url.path(), "/api");
        let port = url.port().expect("explicit port");
        assert!(TcpStream::connect(("127.0.0.1", port)).is_err());
    }
}
