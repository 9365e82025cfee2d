use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::AsyncPgConnection;
use uuid::Uuid;

use super::bookmark::{self, Bookmark, ModifyBookmark, NewBookmark};
use super::quick_view::{self, ModifyQuickView, NewQuickView, QuickView};
use super::store::Store;
use super::user::{self, NewUser, User};
use crate::utils::DatabaseError;

/// PostgreSQL store over a deadpool of diesel-async connections.
pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Object<AsyncPgConnection>, DatabaseError> {
        self.pool
            .get()
            .await
            .map_err(|e| DatabaseError::PoolError(e.to_string()))
    }
}

#[rocket::async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        Ok(user::create_user(&mut *self.conn().await?, &new).await?)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(user::get_user(&mut *self.conn().await?, id).await?)
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        Ok(user::get_user_by_name(&mut *self.conn().await?, name).await?)
    }

    async fn list_bookmarks(&self, owner: Uuid) -> Result<Vec<Bookmark>, DatabaseError> {
        Ok(bookmark::list_bookmarks(&mut *self.conn().await?, owner).await?)
    }

    async fn get_bookmark(&self, owner: Uuid, id: Uuid) -> Result<Option<Bookmark>, DatabaseError> {
        Ok(bookmark::get_bookmark(&mut *self.conn().await?, owner, id).await?)
    }

    async fn create_bookmark(&self, new: NewBookmark) -> Result<Bookmark, DatabaseError> {
        Ok(bookmark::create_bookmark(&mut *self.conn().await?, &new).await?)
    }

    async fn update_bookmark(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyBookmark,
    ) -> Result<Option<Bookmark>, DatabaseError> {
        Ok(bookmark::update_bookmark(&mut *self.conn().await?, owner, id, &modified).await?)
    }

    async fn delete_bookmark(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(bookmark::delete_bookmark(&mut *self.conn().await?, owner, id).await?)
    }

    async fn list_quick_views(&self, owner: Uuid) -> Result<Vec<QuickView>, DatabaseError> {
        Ok(quick_view::list_quick_views(&mut *self.conn().await?, owner).await?)
    }

    async fn get_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<QuickView>, DatabaseError> {
        Ok(quick_view::get_quick_view(&mut *self.conn().await?, owner, id).await?)
    }

    async fn create_quick_view(&self, new: NewQuickView) -> Result<QuickView, DatabaseError> {
        Ok(quick_view::create_quick_view(&mut *self.conn().await?, &new).await?)
    }

    async fn update_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyQuickView,
    ) -> Result<Option<QuickView>, DatabaseError> {
        Ok(quick_view::update_quick_view(&mut *self.conn().await?, owner, id, &modified).await?)
    }

    async fn delete_quick_view(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(quick_view::delete_quick_view(&mut *self.conn().await?, owner, id).await?)
    }
}
