use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// The play page: the year clue of the current round, a button for the next
/// one and an optional failure notice.
#[derive(Template)]
#[template(path = "play.html")]
pub struct PlayTemplate {
    pub year: String,
    pub notice: Option<String>,
}

impl PlayTemplate {
    pub fn clue(year: &str) -> Self {
        Self {
            year: year.to_string(),
            notice: None,
        }
    }

    /// Page without a clue, showing `notice` instead.
    pub fn notice(notice: impl Into<String>) -> Self {
        Self {
            year: String::new(),
            notice: Some(notice.into()),
        }
    }
}

/// Makes PlayTemplate returnable as an axum response
impl IntoResponse for PlayTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response(),
        }
    }
}
