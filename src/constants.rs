/// Built-in landing page, served when no `landing_page_path` is configured.
pub const LANDING_HTML: &str = include_str!("../static/landing.html");

pub const MAX_CONTACT_BODY_BYTES: usize = 64 * 1024;

/// Path prefixes served from the assets directory.
pub const ASSET_PREFIXES: [&str; 2] = ["/logo", "/photo"];
