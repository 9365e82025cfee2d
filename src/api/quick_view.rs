use minijinja::context;
use rocket::form::Form;
use rocket::http::uri::Host;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::uuid::Uuid;
use tracing::info;

use super::errors::Error;
use super::guards::Auth;
use super::views::{BookmarkView, QuickViewView, View};
use crate::db::quick_view::{ModifyQuickView, NewQuickView};
use crate::tags::filter_for_quick_view;

#[derive(FromForm, Debug)]
pub struct QuickViewForm<'r> {
    name: Option<&'r str>,
    tags: Option<&'r str>,
}

impl QuickViewForm<'_> {
    fn into_fields(self) -> Result<ModifyQuickView, Error> {
        let name = self.name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(Error::BadRequest("missing name".to_string()));
        }
        Ok(ModifyQuickView {
            name: name.to_string(),
            tags: self.tags.unwrap_or_default().to_string(),
        })
    }
}

fn not_found() -> Error {
    Error::NotFound("Quick view not found".to_string())
}

#[get("/v/add")]
pub async fn add_page(auth: Auth, view: View<'_>) -> Result<RawHtml<String>, Error> {
    view.render(Some(&auth.0), "add_quick_view.html", context! {})
        .await
}

#[post("/v/add", data = "<form>")]
pub async fn add(
    auth: Auth,
    view: View<'_>,
    form: Form<QuickViewForm<'_>>,
) -> Result<Redirect, Error> {
    let fields = form.into_inner().into_fields()?;
    let quick_view = view
        .store
        .create_quick_view(NewQuickView {
            user_id: auth.0.id,
            name: fields.name,
            tags: fields.tags,
        })
        .await?;
    info!(quick_view_id = %quick_view.id, "quick view created");
    Ok(Redirect::to(uri!("/")))
}

/// Bookmarks tagged with exactly the quick view's tags.
#[get("/v/<id>")]
pub async fn show(auth: Auth, view: View<'_>, id: Uuid) -> Result<RawHtml<String>, Error> {
    let quick_view = view
        .store
        .get_quick_view(auth.0.id, id)
        .await?
        .ok_or_else(not_found)?;
    let bookmarks = view.store.list_bookmarks(auth.0.id).await?;
    let bookmarks = filter_for_quick_view(&quick_view, bookmarks);
    view.render(
        Some(&auth.0),
        "index.html",
        context! {
            quick_view => QuickViewView::from(&quick_view),
            bookmarks => BookmarkView::list(&bookmarks),
        },
    )
    .await
}

#[get("/v/<id>/edit")]
pub async fn edit_page(auth: Auth, view: View<'_>, id: Uuid) -> Result<RawHtml<String>, Error> {
    let quick_view = view
        .store
        .get_quick_view(auth.0.id, id)
        .await?
        .ok_or_else(not_found)?;
    view.render(
        Some(&auth.0),
        "edit_quick_view.html",
        context! { quick_view => QuickViewView::from(&quick_view) },
    )
    .await
}

#[post("/v/<id>/edit", data = "<form>")]
pub async fn edit(
    auth: Auth,
    view: View<'_>,
    id: Uuid,
    form: Form<QuickViewForm<'_>>,
) -> Result<Redirect, Error> {
    let fields = form.into_inner().into_fields()?;
    view.store
        .update_quick_view(auth.0.id, id, fields)
        .await?
        .ok_or_else(not_found)?;
    info!(quick_view_id = %id, "quick view updated");
    Ok(Redirect::to(uri!("/settings")))
}

#[get("/v/<id>/delete")]
pub async fn delete_page(auth: Auth, view: View<'_>, id: Uuid) -> Result<RawHtml<String>, Error> {
    let quick_view = view
        .store
        .get_quick_view(auth.0.id, id)
        .await?
        .ok_or_else(not_found)?;
    view.render(
        Some(&auth.0),
        "delete_quick_view.html",
        context! { quick_view => QuickViewView::from(&quick_view) },
    )
    .await
}

#[post("/v/<id>/delete")]
pub async fn delete(auth: Auth, view: View<'_>, id: Uuid) -> Result<Redirect, Error> {
    if !view.store.delete_quick_view(auth.0.id, id).await? {
        return Err(not_found());
    }
    info!(quick_view_id = %id, "quick view deleted");
    Ok(Redirect::to(uri!("/settings")))
}

/// Quick view management plus the add-bookmark bookmarklet.
#[get("/settings")]
pub async fn settings(
    auth: Auth,
    view: View<'_>,
    host: Option<&Host<'_>>,
) -> Result<RawHtml<String>, Error> {
    view.render(
        Some(&auth.0),
        "settings.html",
        context! { host => host.map(|h| h.to_string()).unwrap_or_default() },
    )
    .await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![add_page, add, show, edit_page, edit, delete_page, delete, settings]
}

#[cfg(test)]
mod test {
    use crate::api::testing::{
        add_bookmark, add_quick_view, client, logged_in_client, signup_and_login,
    };

    use itertools::Itertools;
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;

    fn quick_view_ids(client: &Client) -> Vec<String> {
        let html = client.get("/settings").dispatch().into_string().unwrap();
        html.match_indices("/v/")
            .filter_map(|(i, _)| html[i + 3..].split('/').next())
            .filter(|id| id.len() == 36)
            .unique()
            .map(String::from)
            .collect()
    }

    #[test]
    fn requires_login() {
        let client = client();
        for path in ["/v/add", "/settings"] {
            let response = client.get(path).dispatch();
            assert_eq!(response.status(), Status::SeeOther);
            assert_eq!(response.headers().get_one("Location"), Some("/login"));
        }
    }

    #[test]
    fn matches_exact_tag_set_sorted_by_description() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://1.example", "zeta", "a b");
        add_bookmark(&client, "https://2.example", "alpha", "b a");
        add_bookmark(&client, "https://3.example", "extra", "a b c");
        add_bookmark(&client, "https://4.example", "short", "a");

        let response = add_quick_view(&client, "ab", "a b");
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/"));

        let ids = quick_view_ids(&client);
        assert_eq!(ids.len(), 1);
        let html = client
            .get(format!("/v/{}", ids[0]))
            .dispatch()
            .into_string()
            .unwrap();
        let alpha = html.find(">alpha<").unwrap();
        let zeta = html.find(">zeta<").unwrap();
        assert!(alpha < zeta);
        assert!(!html.contains(">extra<"));
        assert!(!html.contains(">short<"));
    }

    #[test]
    fn listed_in_navigation_by_name() {
        let client = logged_in_client("alice");
        add_quick_view(&client, "work", "job");
        add_quick_view(&client, "fun", "games");

        let html = client.get("/").dispatch().into_string().unwrap();
        let fun = html.find(">fun<").unwrap();
        let work = html.find(">work<").unwrap();
        assert!(fun < work);
    }

    #[test]
    fn add_requires_name() {
        let client = logged_in_client("alice");
        let response = add_quick_view(&client, "", "a");
        assert_eq!(response.status(), Status::BadRequest);
        assert!(quick_view_ids(&client).is_empty());
    }

    #[test]
    fn edit_and_delete_return_to_settings() {
        let client = logged_in_client("alice");
        add_quick_view(&client, "before", "a");
        let id = quick_view_ids(&client).pop().unwrap();

        let response = client.get(format!("/v/{}/edit", id)).dispatch();
        assert_eq!(response.status(), Status::Ok);
        let response = client
            .post(format!("/v/{}/edit", id))
            .header(ContentType::Form)
            .body("name=after&tags=b")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/settings"));
        let html = client.get("/settings").dispatch().into_string().unwrap();
        assert!(html.contains(">after<"));

        let response = client.get(format!("/v/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::Ok);
        let response = client.post(format!("/v/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/settings"));
        assert!(quick_view_ids(&client).is_empty());
    }

    #[test]
    fn other_users_quick_views_are_not_found() {
        let client = logged_in_client("alice");
        add_quick_view(&client, "private", "a");
        let id = quick_view_ids(&client).pop().unwrap();

        client.get("/logout").dispatch();
        signup_and_login(&client, "bob");

        assert!(quick_view_ids(&client).is_empty());
        for path in [format!("/v/{}", id), format!("/v/{}/edit", id)] {
            let response = client.get(path).dispatch();
            assert_eq!(response.status(), Status::NotFound);
        }
        let response = client.post(format!("/v/{}/delete", id)).dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }
}
