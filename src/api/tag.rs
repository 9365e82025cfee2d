use itertools::Itertools;
use minijinja::context;
use rocket::response::content::RawHtml;
use time::OffsetDateTime;

use super::errors::Error;
use super::guards::Auth;
use super::views::{BookmarkView, View};
use crate::tags::{filter_by_tags, group_by_tag, parse_filter};

#[get("/t")]
pub async fn tags(auth: Auth, view: View<'_>) -> Result<RawHtml<String>, Error> {
    let bookmarks = view.store.list_bookmarks(auth.0.id).await?;
    let now = OffsetDateTime::now_utc();
    let groups = group_by_tag(&bookmarks)
        .into_iter()
        .map(|g| {
            context! {
                name => g.name,
                bookmarks => g.items.iter().map(|b| BookmarkView::new(b, now)).collect_vec(),
            }
        })
        .collect_vec();
    view.render(Some(&auth.0), "tags.html", context! { tags => groups })
        .await
}

/// Bookmarks carrying every tag of a `+`-joined list.
#[get("/t/<filter>")]
pub async fn tagged(auth: Auth, view: View<'_>, filter: &str) -> Result<RawHtml<String>, Error> {
    let required = parse_filter(filter);
    let bookmarks = filter_by_tags(view.store.list_bookmarks(auth.0.id).await?, &required);
    view.render(
        Some(&auth.0),
        "index.html",
        context! {
            filter_tags => required,
            bookmarks => BookmarkView::list(&bookmarks),
        },
    )
    .await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![tags, tagged]
}

#[cfg(test)]
mod test {
    use crate::api::testing::{add_bookmark, client, logged_in_client};

    use rocket::http::Status;

    #[test]
    fn requires_login() {
        let client = client();
        for path in ["/t", "/t/rust"] {
            let response = client.get(path).dispatch();
            assert_eq!(response.status(), Status::SeeOther);
            assert_eq!(response.headers().get_one("Location"), Some("/login"));
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://1.example", "one", "x y");
        add_bookmark(&client, "https://2.example", "two", "y z");

        let response = client.get("/t").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let html = response.into_string().unwrap();
        // newest bookmark is listed first, so its tags are seen first
        let y = html.find("id=\"tag-y\"").unwrap();
        let z = html.find("id=\"tag-z\"").unwrap();
        let x = html.find("id=\"tag-x\"").unwrap();
        assert!(y < z && z < x);
    }

    #[test]
    fn filter_requires_all_tags() {
        let client = logged_in_client("alice");
        add_bookmark(&client, "https://1.example", "one", "x y");
        add_bookmark(&client, "https://2.example", "two", "y");
        add_bookmark(&client, "https://3.example", "three", "x");

        let html = client.get("/t/x+y").dispatch().into_string().unwrap();
        assert!(html.contains(">one<"));
        assert!(!html.contains(">two<"));
        assert!(!html.contains(">three<"));

        let html = client.get("/t/y").dispatch().into_string().unwrap();
        assert!(html.contains(">one<"));
        assert!(html.contains(">two<"));
        assert!(!html.contains(">three<"));

        let html = client.get("/t/nothing").dispatch().into_string().unwrap();
        assert!(!html.contains(">one<"));
    }
}
