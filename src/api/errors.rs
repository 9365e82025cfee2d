use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, content::RawHtml, Redirect, Responder, Response};
use thiserror::Error;
use tracing::{debug, error};

use super::views::Templates;
use crate::utils::{AuthError, DatabaseError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    MissingSession(String),
    #[error("{0}")]
    InternalServer(String),
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Error::NotFound(_) => Status::NotFound,
            Error::BadRequest(_) => Status::BadRequest,
            Error::InvalidCredentials(_) | Error::MissingSession(_) => Status::Unauthorized,
            Error::InternalServer(_) => Status::InternalServerError,
        }
    }

    /// What the visitor gets to read; internals stay in the log.
    fn public_message(&self) -> String {
        match self {
            Error::InternalServer(_) => "Something went wrong.".to_string(),
            e => e.to_string(),
        }
    }
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::DuplicationError { .. } => Error::BadRequest(e.to_string()),
            DatabaseError::ViolationError() => Error::BadRequest(e.to_string()),
            e => Error::InternalServer(e.to_string()),
        }
    }
}

impl From<AuthError> for Error {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Error::InvalidCredentials(e.to_string()),
            AuthError::MissingField(_) | AuthError::UserExists => Error::BadRequest(e.to_string()),
            AuthError::Hashing(_) => Error::InternalServer(e.to_string()),
            AuthError::Database(e) => e.into(),
        }
    }
}

pub(crate) fn render_error_page(req: &Request<'_>, status: Status, message: &str) -> String {
    use minijinja::context;

    req.rocket()
        .state::<Templates>()
        .and_then(|t| {
            t.render(
                "error.html",
                context! {
                    status => status.code,
                    reason => status.reason_lossy(),
                    message => message,
                },
            )
            .map_err(|e| error!(?e, "failed to render error page"))
            .ok()
        })
        .unwrap_or_else(|| format!("{}: {}", status, message))
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        match &self {
            Error::InternalServer(msg) => error!(%status, %msg, "request failed"),
            e => debug!(%status, ?e, "request rejected"),
        }
        let body = render_error_page(req, status, &self.public_message());
        Response::build_from(RawHtml(body).respond_to(req)?)
            .status(status)
            .ok()
    }
}

#[catch(401)]
pub fn unauthorized() -> Redirect {
    Redirect::to("/login")
}

#[catch(default)]
pub fn default_catcher(status: Status, req: &Request<'_>) -> RawHtml<String> {
    let message = match status.code {
        404 => "Nothing here.",
        422 => "The request could not be understood.",
        s if s >= 500 => "Something went wrong.",
        _ => status.reason_lossy(),
    };
    RawHtml(render_error_page(req, status, message))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![unauthorized, default_catcher]
}
