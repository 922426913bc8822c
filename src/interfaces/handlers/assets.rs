use std::{io, path::Path};

use actix_web::{http::header::ContentType, HttpResponse};
use tokio::fs;

use crate::{constants::ASSET_PREFIXES, utils::content_type::content_type_for};

pub fn is_asset_path(path: &str) -> bool {
    ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Serves `assets_dir/<last path segment>`.
///
/// Only the final segment of the request path is used, so requests cannot
/// reach files outside the assets directory.
pub async fn serve_asset(assets_dir: &Path, request_path: &str) -> HttpResponse {
    let Some(file_name) = Path::new(request_path).file_name() else {
        return not_found();
    };
    let file_path = assets_dir.join(file_name);

    match fs::read(&file_path).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(content_type_for(&file_path, &bytes))
            .body(bytes),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::IsADirectory) => {
            not_found()
        }
        Err(e) => {
            tracing::error!(path = %file_path.display(), "Failed to read asset: {}", e);
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Internal server error")
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body("Not found")
}
