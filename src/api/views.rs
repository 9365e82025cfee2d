use minijinja::{context, default_auto_escape_callback, Environment, Value};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::content::RawHtml;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::errors::Error;
use crate::db::bookmark::Bookmark;
use crate::db::quick_view::QuickView;
use crate::db::user::User;
use crate::db::Storage;
use crate::tags::Tagged;
use crate::utils::date::relative_date;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

/// Embedded page templates.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        env.add_filter("segment", |s: String| encode_segment(&s));
        Self { env }
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let source = match name {
        "base.html" => Some(include_str!("../../templates/base.html")),
        "error.html" => Some(include_str!("../../templates/error.html")),

        // auth
        "login.html" => Some(include_str!("../../templates/login.html")),
        "signup.html" => Some(include_str!("../../templates/signup.html")),

        // bookmarks
        "index.html" => Some(include_str!("../../templates/index.html")),
        "bookmarks.html" => Some(include_str!("../../templates/bookmarks.html")),
        "tags.html" => Some(include_str!("../../templates/tags.html")),
        "add.html" => Some(include_str!("../../templates/add.html")),
        "edit.html" => Some(include_str!("../../templates/edit.html")),
        "delete.html" => Some(include_str!("../../templates/delete.html")),

        // quick views
        "add_quick_view.html" => Some(include_str!("../../templates/add_quick_view.html")),
        "edit_quick_view.html" => Some(include_str!("../../templates/edit_quick_view.html")),
        "delete_quick_view.html" => Some(include_str!("../../templates/delete_quick_view.html")),
        "settings.html" => Some(include_str!("../../templates/settings.html")),

        _ => None,
    };

    Ok(source.map(|s| s.to_string()))
}

#[derive(Serialize, Debug)]
pub struct BookmarkView {
    pub id: String,
    pub url: String,
    pub description: String,
    pub raw_tags: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub age: String,
}

impl BookmarkView {
    pub fn new(b: &Bookmark, now: OffsetDateTime) -> Self {
        Self {
            id: b.id.to_string(),
            url: b.url.clone(),
            description: b.description.clone(),
            raw_tags: b.tags.clone(),
            tags: b.tags().into_iter().map(String::from).collect(),
            created_at: b.created_at.format(&Rfc3339).unwrap_or_default(),
            age: relative_date(b.created_at, now),
        }
    }

    pub fn list<'a>(bookmarks: impl IntoIterator<Item = &'a Bookmark>) -> Vec<Self> {
        let now = OffsetDateTime::now_utc();
        bookmarks.into_iter().map(|b| Self::new(b, now)).collect()
    }
}

#[derive(Serialize, Debug)]
pub struct QuickViewView {
    pub id: String,
    pub name: String,
    pub raw_tags: String,
    pub tags: Vec<String>,
}

impl From<&QuickView> for QuickViewView {
    fn from(v: &QuickView) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.name.clone(),
            raw_tags: v.tags.clone(),
            tags: v.tags().into_iter().map(String::from).collect(),
        }
    }
}

/// Everything a handler needs to turn data into a page.
///
/// Every page gets the signed-in user's name and quick views for the
/// navigation bar on top of its own context.
pub struct View<'r> {
    pub templates: &'r Templates,
    pub store: &'r Storage,
}

impl View<'_> {
    pub async fn render(
        &self,
        user: Option<&User>,
        name: &str,
        ctx: Value,
    ) -> Result<RawHtml<String>, Error> {
        let quick_views: Vec<QuickViewView> = match user {
            Some(user) => self
                .store
                .list_quick_views(user.id)
                .await?
                .iter()
                .map(QuickViewView::from)
                .collect(),
            None => vec![],
        };
        let ctx = context! {
            user => user.map(|u| u.name.as_str()),
            quick_views => quick_views,
            ..ctx
        };
        self.templates
            .render(name, ctx)
            .map(RawHtml)
            .map_err(|e| Error::InternalServer(format!("failed to render {}: {:#}", name, e)))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for View<'r> {
    type Error = Error;

    async fn from_request(request: &'r rocket::Request<'_>) -> Outcome<Self, Self::Error> {
        match (
            request.rocket().state::<Templates>(),
            request.rocket().state::<Storage>(),
        ) {
            (Some(templates), Some(store)) => Outcome::Success(View { templates, store }),
            _ => Outcome::Error((
                Status::InternalServerError,
                Error::InternalServer("Missing templates or storage state".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("rust"), "rust");
        assert_eq!(encode_segment("a b"), "a%20b");
        assert_eq!(encode_segment("c++"), "c%2B%2B");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn test_error_page_escapes_message() {
        let templates = Templates::new();
        let html = templates
            .render(
                "error.html",
                context! { status => 400, reason => "Bad Request", message => "<script>" },
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_all_templates_compile() {
        let templates = Templates::new();
        for name in [
            "base.html",
            "error.html",
            "login.html",
            "signup.html",
            "index.html",
            "bookmarks.html",
            "tags.html",
            "add.html",
            "edit.html",
            "delete.html",
            "add_quick_view.html",
            "edit_quick_view.html",
            "delete_quick_view.html",
            "settings.html",
        ] {
            assert!(
                templates.env.get_template(name).is_ok(),
                "template {} failed to load",
                name
            );
        }
    }

    #[test]
    fn test_bookmark_view() {
        let created_at = OffsetDateTime::now_utc() - time::Duration::days(3);
        let b = Bookmark {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            url: "https://www.rust-lang.org".to_string(),
            description: "Rust".to_string(),
            tags: " rust  lang ".to_string(),
            created_at,
        };
        let v = BookmarkView::new(&b, OffsetDateTime::now_utc());
        assert_eq!(v.id, b.id.to_string());
        assert_eq!(v.tags, vec!["rust", "lang"]);
        assert_eq!(v.age, "3 days ago");
    }
}
