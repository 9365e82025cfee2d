use itertools::Itertools;
use minijinja::context;
use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::uuid::Uuid;
use time::OffsetDateTime;
use tracing::info;

use super::errors::Error;
use super::guards::Auth;
use super::views::{BookmarkView, View};
use crate::db::bookmark::{ModifyBookmark, NewBookmark};
use crate::tags::group_by_tag;

#[derive(FromForm, Debug)]
pub struct BookmarkForm<'r> {
    url: Option<&'r str>,
    description: Option<&'r str>,
    tags: Option<&'r str>,
}

impl BookmarkForm<'_> {
    /// Url is required; description and tags fall back to empty strings.
    fn into_fields(self) -> Result<ModifyBookmark, Error> {
        let url = self.url.map(str::trim).unwrap_or_default();
        if url.is_empty() {
            return Err(Error::BadRequest("missing url".to_string()));
        }
        Ok(ModifyBookmark {
            url: url.to_string(),
            description: self.description.unwrap_or_default().to_string(),
            tags: self.tags.unwrap_or_default().to_string(),
        })
    }
}

fn not_found() -> Error {
    Error::NotFound("Bookmark not found".to_string())
}

#[get("/")]
pub async fn index(auth: Auth, view: View<'_>) -> Result<RawHtml<String>, Error> {
    let bookmarks = view.store.list_bookmarks(auth.0.id).await?;
    view.render(
        Some(&auth.0),
        "index.html",
        context! { bookmarks => BookmarkView::list(&bookmarks) },
    )
    .await
}

#[get("/b/add?<url>&<description>")]
pub async fn add_page(
    auth: Auth,
    view: View<'_>,
    url: Option<&str>,
    description: Option<&str>,
) -> Result<RawHtml<String>, Error> {
    let bookmarks = view.store.list_bookmarks(auth.0.id).await?;
    let known_tags = group_by_tag(&bookmarks).iter().map(|g| g.name).collect_vec();
    view.render(
        Some(&auth.0),
        "add.html",
        context! {
            url => url.unwrap_or_default(),
            description => description.unwrap_or_default(),
            known_tags => known_tags,
        },
    )
    .await
}

#[post("/b/add", data = "<form>")]
pub async fn add(
    auth: Auth,
    view: View<'_>,
    form: Form<BookmarkForm<'_>>,
) -> Result<Redirect, Error> {
    let fields = form.into_inner().into_fields()?;
    let bookmark = view
        .store
        .create_bookmark(NewBookmark {
            user_id: auth.0.id,
            url: fields.url,
            description: fields.description,
            tags: fields.tags,
        })
        .await?;
    info!(bookmark_id = %bookmark.id, "bookmark created");
    Ok(Redirect::to(uri!("/")))
}

#[get("/b/<id>/edit")]
pub async fn edit_page(auth: Auth, view: View<'_>, id: Uuid) -> Result<RawHtml<String>, Error> {
    let bookmark = view
        .store
        .get_bookmark(auth.0.id, id)
        .await?
        .ok_or_else(not_found)?;
    view.render(
        Some(&auth.0),
        "edit.html",
        context! { bookmark => BookmarkView::new(&bookmark, OffsetDateTime::now_utc()) },
    )
    .await
}

#[post("/b/<id>/edit", data = "<form>")]
pub async fn edit(
    auth: Auth,
    view: View<'_>,
    id: Uuid,
    form: Form<BookmarkForm<'_>>,
) -> Result<Redirect, Error> {
    let fields = form.into_inner().into_fields()?;
    view.store
        .update_bookmark(auth.0.id, id, fields)
        .await?
        .ok_or_else(not_found)?;
    info!(bookmark_id = %id, "bookmark updated");
    Ok(Redirect::to(uri!("/")))
}

#[get("/b/<id>/delete")]
pub async fn delete_page(auth: Auth, view: View<'_>, id: Uuid) -> Result<RawHtml<String>, Error> {
    let bookmark = view
        .store
        .get_bookmark(auth.0.id, id)
        .await?
        .ok_or_else(not_found)?;
    view.render(
        Some(&auth.0),
        "delete.html",
        context! { bookmark => BookmarkView::new(&bookmark, OffsetDateTime::now_utc()) },
    )
    .await
}

#[post("/b/<id>/delete")]
pub async fn delete(auth: Auth, view: View<'_>, id: Uuid) -> Result<Redirect, Error> {
    if !view.store.delete_bookmark(auth.0.id, id).await? {
        return Err(not_found());
    }
    info!(bookmark_id = %id, "bookmark deleted");
    Ok(Redirect::to(uri!("/")))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, add_page, add, edit_page, edit, delete_page, delete]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::testing::{add_bookmark, client, logged_in_client, signup_and_login};

    use rocket::http::{ContentType, Status};

    fn bookmark_ids(html: &str) -> Vec<String> {
        html.match_indices("/b/")
            .filter_map(|(i, _)| html[i + 3..].split('/').next())
            .filter(|id| id.len() == 36)
            .unique()
            .map(String::from)
            .collect()
    }

    #[test]
    fn requires_login() {
        let client = client();
        for path in ["/", "/b/add"] {
            let response = client.get(path).dispatch();
            assert_eq!(response.status(), Status::SeeOther);
            assert_eq!(response.headers().get_one("Location"), Some("/login"));
        }
        let response = client
            .post("/b/add")
            .header(ContentType::Form)
            .body("url=https://example.com")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/login"));
    }

    #[test]
    fn add_and_list_newest_first() {
        let client = logged_in_client("alice");
        let response = add_bookmark(&client, "https://a.example", "first", "x y");
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/"));
        add_bookmark(&client, "https://b.example", "second", "y");

        let html = client.get("/").dispatch().into_string().unwrap();
        // urls come out html-escaped, descriptions do not
        let first = html.find(">first<").unwrap();
        let second = html.find(">second<").unwrap();
        assert!(second < first);
        assert!(html.contains("a few seconds ago"));
    }

    #[test]
    fn add_requires_url() {
        let client = logged_in_client("alice");
        let response = add_bookmark(&client, "", "no url", "x");
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .post("/b/add")
            .header(ContentType::Form)
            .body("description=nothing")
            .dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn add_page_is_prefilled() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://a.example", "a", "rust web");

        let html = client
            .get("/b/add?url=https%3A%2F%2Fnew.example&description=New%20page")
            .dispatch()
            .into_string()
            .unwrap();
        assert!(html.contains("new.example"));
        assert!(html.contains("value=\"New page\""));
        assert!(html.contains("rust"));
        assert!(html.contains("web"));
    }

    #[test]
    fn edit_and_delete() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://a.example", "before", "x");
        let html = client.get("/").dispatch().into_string().unwrap();
        let id = bookmark_ids(&html).pop().unwrap();

        let response = client.get(format!("/b/{}/edit", id)).dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert!(response.into_string().unwrap().contains("before"));

        let response = client
            .post(format!("/b/{}/edit", id))
            .header(ContentType::Form)
            .body("url=https://a.example&description=after&tags=x+z")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        let html = client.get("/").dispatch().into_string().unwrap();
        assert!(html.contains("after"));
        assert!(!html.contains("before"));

        let response = client.get(format!("/b/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::Ok);
        let response = client.post(format!("/b/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/"));

        let html = client.get("/").dispatch().into_string().unwrap();
        assert!(bookmark_ids(&html).is_empty());
        let response = client.post(format!("/b/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }

    #[test]
    fn other_users_bookmarks_are_not_found() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://alice.example", "mine", "x");
        let html = client.get("/").dispatch().into_string().unwrap();
        let id = bookmark_ids(&html).pop().unwrap();

        client.get("/logout").dispatch();
        signup_and_login(&client, "bob");

        let html = client.get("/").dispatch().into_string().unwrap();
        assert!(!html.contains("alice.example"));

        let response = client.get(format!("/b/{}/edit", id)).dispatch();
        assert_eq!(response.status(), Status::NotFound);
        let response = client
            .post(format!("/b/{}/edit", id))
            .header(ContentType::Form)
            .body("url=https://bob.example")
            .dispatch();
        assert_eq!(response.status(), Status::NotFound);
        let response = client.get(format!("/b/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::NotFound);
        let response = client.post(format!("/b/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }
}
