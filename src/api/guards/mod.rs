use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use tracing::error;

use crate::api::errors::Error;
use crate::db::user::User;
use crate::db::Storage;
use crate::session::{Sessions, SESSION_COOKIE};

/// The signed-in user of the current request.
///
/// Fails with 401 when there is no live session; the 401 catcher turns that
/// into a redirect to the login page.
pub struct Auth(pub User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Auth {
    type Error = Error;

    async fn from_request(request: &'r rocket::Request<'_>) -> Outcome<Self, Self::Error> {
        let (Some(sessions), Some(store)) = (
            request.rocket().state::<Sessions>(),
            request.rocket().state::<Storage>(),
        ) else {
            return Outcome::Error((
                Status::InternalServerError,
                Error::InternalServer("Missing session or storage state".to_string()),
            ));
        };

        let Some(token) = request.cookies().get(SESSION_COOKIE).map(|c| c.value()) else {
            return Outcome::Error((
                Status::Unauthorized,
                Error::MissingSession("Not logged in".to_string()),
            ));
        };
        let Some(user_id) = sessions.resolve(token).await else {
            return Outcome::Error((
                Status::Unauthorized,
                Error::MissingSession("Session expired".to_string()),
            ));
        };

        match store.get_user(user_id).await {
            Ok(Some(user)) => Outcome::Success(Auth(user)),
            Ok(None) => {
                sessions.logout(token).await;
                Outcome::Error((
                    Status::Unauthorized,
                    Error::MissingSession("User not found".to_string()),
                ))
            }
            Err(e) => {
                error!(?e, "failed to load session user");
                Outcome::Error((Status::InternalServerError, e.into()))
            }
        }
    }
}
