use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use common::types::Ad;
use tracing::error;

pub const LOGIN_ERROR: &str = "No such student";
pub const CREATE_ERROR: &str = "Could not create the ad";
pub const LIST_ERROR: &str = "Ads are unavailable right now";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "ads.html")]
pub struct AdsTemplate<'a> {
    pub ads: &'a [Ad],
    pub student_id: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "create_ad.html")]
pub struct CreateAdTemplate<'a> {
    pub student_id: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "my_ads.html")]
pub struct MyAdsTemplate<'a> {
    pub ads: &'a [Ad],
    pub student_id: &'a str,
    pub error: Option<&'a str>,
}

pub fn render<T: Template>(page: &T) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ad(title: &str, student_id: &str, hidden: bool) -> Ad {
        Ad {
            id: "65a1b2c3d4e5f60718293a4b".into(),
            apartment: 101,
            author: String::new(),
            title: title.into(),
            content: "<b>desc</b>".into(),
            student_id: student_id.into(),
            created_at: Utc::now(),
            hidden,
        }
    }

    #[test]
    fn login_shows_error_only_when_set() {
        let plain = LoginTemplate { error: None }.render().unwrap();
        assert!(plain.contains("name=\"student_id\""));
        assert!(!plain.contains(LOGIN_ERROR));
        let failed = LoginTemplate { error: Some(LOGIN_ERROR) }.render().unwrap();
        assert!(failed.contains(LOGIN_ERROR));
    }

    #[test]
    fn ads_page_escapes_content_and_encodes_links() {
        let ads = vec![ad("Room", "S 1", false)];
        let html = AdsTemplate { ads: &ads, student_id: "S 1&x", error: None }.render().unwrap();
        assert!(html.contains("Room"));
        assert!(html.contains("&lt;b&gt;desc&lt;/b&gt;"));
        assert!(html.contains("/ads/create?student_id=S%201%26x"));
    }

    #[test]
    fn my_ads_page_offers_owner_actions() {
        let ads = vec![ad("Desk", "S1", false)];
        let html = MyAdsTemplate { ads: &ads, student_id: "S1", error: None }.render().unwrap();
        assert!(html.contains("/ads/65a1b2c3d4e5f60718293a4b/delete"));
        assert!(html.contains("/ads/65a1b2c3d4e5f60718293a4b/toggle_hide"));
        let empty = MyAdsTemplate { ads: &[], student_id: "S1", error: Some(LIST_ERROR) }.render().unwrap();
        assert!(empty.contains(LIST_ERROR));
    }
}
