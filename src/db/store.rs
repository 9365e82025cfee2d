use uuid::Uuid;

use super::bookmark::{Bookmark, ModifyBookmark, NewBookmark};
use super::quick_view::{ModifyQuickView, NewQuickView, QuickView};
use super::user::{NewUser, User};
use crate::utils::DatabaseError;

/// Persistence capability for users, bookmarks and quick views.
///
/// Every bookmark and quick view lookup takes the owner's id; a row belonging
/// to somebody else behaves exactly like a missing row.
#[rocket::async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError>;

    /// Newest first.
    async fn list_bookmarks(&self, owner: Uuid) -> Result<Vec<Bookmark>, DatabaseError>;
    async fn get_bookmark(&self, owner: Uuid, id: Uuid) -> Result<Option<Bookmark>, DatabaseError>;
    async fn create_bookmark(&self, new: NewBookmark) -> Result<Bookmark, DatabaseError>;
    async fn update_bookmark(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyBookmark,
    ) -> Result<Option<Bookmark>, DatabaseError>;
    async fn delete_bookmark(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    /// Ordered by name.
    async fn list_quick_views(&self, owner: Uuid) -> Result<Vec<QuickView>, DatabaseError>;
    async fn get_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<QuickView>, DatabaseError>;
    async fn create_quick_view(&self, new: NewQuickView) -> Result<QuickView, DatabaseError>;
    async fn update_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyQuickView,
    ) -> Result<Option<QuickView>, DatabaseError>;
    async fn delete_quick_view(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

/// The store shared through Rocket's managed state.
pub struct Storage(Box<dyn Store>);

impl Storage {
    pub fn new(store: impl Store + 'static) -> Self {
        Self(Box::new(store))
    }
}

impl std::ops::Deref for Storage {
    type Target = dyn Store;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
