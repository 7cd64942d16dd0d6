// ── Console session configuration ──
//
// These types describe *how* to reach the roster service and how to
// rewrite its image references. The embedding shell constructs a
// `ConsoleConfig` and hands it in -- core never reads config files.

use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-hosted consoles with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one roster console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Roster service root (e.g. `https://roster.example.org`).
    pub base_url: Url,
    /// Image CDN root used by the avatar rewrite.
    pub cdn_base: Url,
    /// Whether the rendering shell can decode WebP. Detection happens
    /// out there; the flag is injected here.
    pub webp_capable: bool,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Capacity of the settled-signal broadcast channel.
    pub signal_capacity: usize,
    /// Capacity of the notice broadcast channel.
    pub notice_capacity: usize,
}

impl ConsoleConfig {
    /// Config with defaults for everything but the two required roots.
    pub fn new(base_url: Url, cdn_base: Url) -> Self {
        Self {
            base_url,
            cdn_base,
            webp_capable: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            signal_capacity: 64,
            notice_capacity: 64,
        }
    }
}
