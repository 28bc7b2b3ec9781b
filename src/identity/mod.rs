//! Instance identity: version, instance number, hostname, and IPs.
//!
//! Everything here is best-effort I/O glue. Lookup failures degrade to
//! empty strings and never surface to the client as HTTP errors.

use chrono::Local;
use hyper::HeaderMap;
use rand::Rng;
use std::net::{SocketAddr, UdpSocket};
use tracing::warn;

/// Version string reported by `/version` and the frontpage banner.
pub const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Identity discovered once at startup.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Random instance number in `0..1000`.
    pub instance: u32,
    /// Version string.
    pub version: &'static str,
    /// Local non-loopback IP, or empty if discovery failed.
    pub local_ip: String,
}

impl Identity {
    /// Discover the identity of this process.
    pub fn discover() -> Self {
        Self {
            instance: rand::thread_rng().gen_range(0..1000),
            version: APP_VERSION,
            local_ip: local_ip(),
        }
    }

    /// Format the frontpage banner for one request.
    pub fn banner(&self, client_ip: &str) -> String {
        let now = Local::now();
        format!(
            "Hello! I'm instance {} running version {} at {}\n\n\
             HostName: {}\nServerIP: {}\nClientIP: {}\n",
            self.instance,
            self.version,
            now.format("%Y-%m-%d %H:%M:%S"),
            hostname(),
            self.local_ip,
            client_ip,
        )
    }
}

/// Look up the machine hostname, or empty string on failure.
pub fn hostname() -> String {
    ::hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Discover the local non-loopback IPv4 address.
///
/// Connects a UDP socket toward a public address to learn which source
/// address the kernel would pick. No packet is sent.
pub fn local_ip() -> String {
    fn probe() -> std::io::Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip().to_string())
    }

    match probe() {
        Ok(ip) => ip,
        Err(e) => {
            warn!(error = %e, "local IP discovery failed");
            String::new()
        }
    }
}

/// Resolve the caller's IP for one request.
///
/// Prefers the reverse-proxy header, then the forwarded-for header, then
/// the raw peer address.
pub fn client_ip(headers: &HeaderMap, remote: SocketAddr) -> String {
    for header in ["x-real-ip", "x-forwarded-for"] {
        if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    remote.to_string()
}
