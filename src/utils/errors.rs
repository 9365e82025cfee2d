use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("duplicate key value violates unique constraint of {table:?}")]
    DuplicationError { table: String },
    #[error("foreign key constraint violation")]
    ViolationError(),
    #[error("failed to get a database connection: {0}")]
    PoolError(String),
    #[error("query failed: {0}")]
    QueryError(String),
}

impl From<diesel::result::Error> for DatabaseError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match e {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DatabaseError::DuplicationError {
                    table: info.table_name().unwrap_or("unknown").to_string(),
                }
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                DatabaseError::ViolationError()
            }
            e => DatabaseError::QueryError(e.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("incorrect credentials")]
    InvalidCredentials,
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("user already exists")]
    UserExists,
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
