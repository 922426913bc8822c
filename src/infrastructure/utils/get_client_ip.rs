use actix_web::HttpRequest;

/// Identifier used to rate limit a client.
///
/// With `trust_x_forwarded_for` the first non-empty entry of `X-Forwarded-For`
/// wins (the server is expected to sit behind a reverse proxy); otherwise the
/// peer address is used.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> String {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
