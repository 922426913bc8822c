use std::{io, path::Path};

use actix_web::{
    http::{header::ContentType, Method},
    web, HttpRequest, HttpResponse,
};

use crate::{constants::LANDING_HTML, handlers::assets, AppState};

/// The landing HTML document, held in memory for the process lifetime.
#[derive(Clone)]
pub struct LandingPage {
    html: web::Bytes,
}

impl LandingPage {
    pub fn inline() -> Self {
        LandingPage {
            html: web::Bytes::from_static(LANDING_HTML.as_bytes()),
        }
    }

    /// Reads the page from `path`, or uses the built-in page when unset.
    pub fn load(path: Option<&Path>) -> io::Result<Self> {
        match path {
            Some(path) => {
                let html = std::fs::read(path)?;
                Ok(LandingPage { html: web::Bytes::from(html) })
            }
            None => Ok(Self::inline()),
        }
    }

    pub fn html(&self) -> &[u8] {
        &self.html
    }

    fn response(&self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(self.html.clone())
    }
}

/// Everything that is not `POST /contact`: assets for `GET /logo*` and
/// `GET /photo*`, the landing page for any other request.
pub async fn site_fallback(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if req.method() == Method::GET && assets::is_asset_path(req.path()) {
        return assets::serve_asset(&state.assets_dir, req.path()).await;
    }
    state.landing_page.response()
}
