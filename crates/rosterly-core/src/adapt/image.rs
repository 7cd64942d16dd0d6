// ── Avatar URL rewriting ──

use url::Url;

use crate::config::ConsoleConfig;

/// Image rewrite rules derived from console config.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    cdn_base: Url,
    webp_capable: bool,
}

impl ImagePolicy {
    pub fn new(cdn_base: Url, webp_capable: bool) -> Self {
        Self {
            cdn_base,
            webp_capable,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.cdn_base.clone(), config.webp_capable)
    }

    /// Rewrite a raw avatar reference into a display URL.
    ///
    /// Absolute URLs (anything containing `//`) pass through unchanged.
    /// Relative paths are joined onto the CDN root; `.jpg`/`.png`
    /// avatars get the `@600` size variant and switch to `.webp` when
    /// the shell reported WebP support. `.gif` keeps its name so
    /// animation survives; so does anything without a known extension.
    pub fn adapt(&self, raw: &str) -> String {
        if raw.contains("//") {
            return raw.to_owned();
        }

        let base = self.cdn_base.as_str().trim_end_matches('/');
        let path = raw.trim_start_matches('/');

        if let Some((stem, ext)) = path.rsplit_once('.') {
            if matches!(ext, "jpg" | "png") {
                let ext = if self.webp_capable { "webp" } else { ext };
                return format!("{base}/{stem}@600.{ext}");
            }
        }

        format!("{base}/{path}")
    }
}
