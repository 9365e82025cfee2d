use tracing::{info, warn};

use crate::db::user::{NewUser, User};
use crate::db::Store;
use crate::utils::password::PasswordService;
use crate::utils::{AuthError, DatabaseError};

pub async fn register(
    store: &dyn Store,
    name: &str,
    password: &str,
    cost: u32,
) -> Result<User, AuthError> {
    if name.is_empty() {
        return Err(AuthError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if store.get_user_by_name(name).await?.is_some() {
        return Err(AuthError::UserExists);
    }

    let password_hash = PasswordService::hash_password(password, cost).await?;
    let user = store
        .create_user(NewUser {
            name: name.to_string(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::DuplicationError { .. } => AuthError::UserExists,
            e => AuthError::Database(e),
        })?;
    info!(user_id = %user.id, user = name, "user registered");
    Ok(user)
}

pub async fn verify(store: &dyn Store, name: &str, password: &str) -> Result<User, AuthError> {
    let Some(user) = store.get_user_by_name(name).await? else {
        warn!(user = name, "login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };
    if !PasswordService::verify_password(password, &user.password_hash).await? {
        warn!(user = name, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}
