
use reqwest::StatusCode;
use test_utils::*;

const LOGO: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="4"/></svg>"#;

#[actix_rt::test]
async fn logo_is_served_with_svg_content_type() {
    let app = TestApp::spawn().await;
    app.write_asset("logo.svg", LOGO);

    let response = app.get("/logo.svg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");
    assert_eq!(response.bytes().await.unwrap().as_ref(), LOGO);
}

#[actix_rt::test]
async fn photo_is_served_with_exact_bytes() {
    let app = TestApp::spawn().await;
    let photo: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    app.write_asset("photo.jpg", &photo);

    let response = app.get("/photo.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(response.bytes().await.unwrap().as_ref(), photo.as_slice());
}

#[actix_rt::test]
async fn missing_asset_returns_plain_404() {
    let app = TestApp::spawn().await;

    let response = app.get("/photo.png").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Not found");
}

#[actix_rt::test]
async fn unknown_path_returns_landing_page() {
    let app = TestApp::spawn().await;

    let response = app.get("/unknown/path").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.contains("Under Construction"));
}

#[actix_rt::test]
async fn root_and_get_contact_return_landing_page() {
    let app = TestApp::spawn().await;

    for path in ["/", "/contact"] {
        let response = app.get(path).await;

        assert_eq!(response.status(), StatusCode::OK, "path: {path}");
        assert!(response.text().await.unwrap().contains("<!DOCTYPE html>"));
    }
}

#[actix_rt::test]
async fn landing_page_can_be_loaded_from_disk() {
    let page_dir = std::env::temp_dir().join(format!("landing-page-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&page_dir).unwrap();
    let page = page_dir.join("index.html");
    std::fs::write(&page, "<!DOCTYPE html><title>custom</title>").unwrap();

    let page_path = page.clone();
    let app = TestApp::spawn_with(move |c| c.landing_page_path = Some(page_path), None).await;

    let html = app.get("/anything").await.text().await.unwrap();

    assert_eq!(html, "<!DOCTYPE html><title>custom</title>");
    let _ = std::fs::remove_dir_all(page_dir);
}
