pub mod date;
pub mod logging;
pub mod password;
pub mod rand;

mod errors;
pub use errors::{AuthError, DatabaseError, FetchError};
