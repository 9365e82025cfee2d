use minijinja::context;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;
use tracing::info;

use super::configs::Config;
use super::errors::Error;
use super::guards::Auth;
use super::views::View;
use crate::auth;
use crate::session::{Sessions, SESSION_COOKIE};

#[derive(FromForm, Debug)]
pub struct Credentials<'r> {
    username: Option<&'r str>,
    password: Option<&'r str>,
}

impl Credentials<'_> {
    fn username(&self) -> &str {
        self.username.unwrap_or_default()
    }

    fn password(&self) -> &str {
        self.password.unwrap_or_default()
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[get("/login")]
pub async fn login_page(view: View<'_>, user: Option<Auth>) -> Result<RawHtml<String>, Error> {
    view.render(user.as_ref().map(|a| &a.0), "login.html", context! {})
        .await
}

#[post("/login", data = "<form>")]
pub async fn login(
    view: View<'_>,
    sessions: &State<Sessions>,
    cookies: &CookieJar<'_>,
    form: Form<Credentials<'_>>,
) -> Result<Redirect, Error> {
    let user = auth::verify(&**view.store, form.username(), form.password()).await?;
    let token = sessions.login(user.id).await;
    cookies.add(session_cookie(token));
    info!(user_id = %user.id, "logged in");
    Ok(Redirect::to(uri!("/")))
}

#[get("/logout")]
pub async fn logout(sessions: &State<Sessions>, cookies: &CookieJar<'_>) -> Redirect {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        sessions.logout(cookie.value()).await;
    }
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Redirect::to(uri!("/"))
}

#[get("/signup")]
pub async fn signup_page(view: View<'_>, user: Option<Auth>) -> Result<RawHtml<String>, Error> {
    view.render(user.as_ref().map(|a| &a.0), "signup.html", context! {})
        .await
}

/// Creates the account; the visitor still has to log in afterwards.
#[post("/signup", data = "<form>")]
pub async fn signup(
    view: View<'_>,
    config: &State<Config>,
    form: Form<Credentials<'_>>,
) -> Result<Redirect, Error> {
    auth::register(
        &**view.store,
        form.username(),
        form.password(),
        config.bcrypt_cost,
    )
    .await?;
    Ok(Redirect::to(uri!("/")))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_page, login, logout, signup_page, signup]
}
