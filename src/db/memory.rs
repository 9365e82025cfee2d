use tokio::sync::RwLock;
use uuid::Uuid;

use super::bookmark::{Bookmark, ModifyBookmark, NewBookmark};
use super::quick_view::{ModifyQuickView, NewQuickView, QuickView};
use super::store::Store;
use super::user::{NewUser, User};
use crate::utils::DatabaseError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    bookmarks: Vec<Bookmark>,
    quick_views: Vec<QuickView>,
}

/// Process-memory store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> time::OffsetDateTime {
    time::OffsetDateTime::now_utc()
}

#[rocket::async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.name == new.name) {
            return Err(DatabaseError::DuplicationError {
                table: "users".to_string(),
            });
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            password_hash: new.password_hash,
            created_at: now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.name == name).cloned())
    }

    async fn list_bookmarks(&self, owner: Uuid) -> Result<Vec<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        // later insertions first, so equal timestamps still come out newest first
        let mut rv = tables
            .bookmarks
            .iter()
            .rev()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect::<Vec<_>>();
        rv.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rv)
    }

    async fn get_bookmark(&self, owner: Uuid, id: Uuid) -> Result<Option<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookmarks
            .iter()
            .find(|b| b.id == id && b.user_id == owner)
            .cloned())
    }

    async fn create_bookmark(&self, new: NewBookmark) -> Result<Bookmark, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == new.user_id) {
            return Err(DatabaseError::ViolationError());
        }
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            url: new.url,
            description: new.description,
            tags: new.tags,
            created_at: now(),
        };
        tables.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn update_bookmark(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyBookmark,
    ) -> Result<Option<Bookmark>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bookmarks
            .iter_mut()
            .find(|b| b.id == id && b.user_id == owner)
            .map(|b| {
                b.url = modified.url;
                b.description = modified.description;
                b.tags = modified.tags;
                b.clone()
            }))
    }

    async fn delete_bookmark(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.bookmarks.len();
        tables
            .bookmarks
            .retain(|b| !(b.id == id && b.user_id == owner));
        Ok(tables.bookmarks.len() != before)
    }

    async fn list_quick_views(&self, owner: Uuid) -> Result<Vec<QuickView>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rv = tables
            .quick_views
            .iter()
            .filter(|v| v.user_id == owner)
            .cloned()
            .collect::<Vec<_>>();
        rv.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rv)
    }

    async fn get_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<QuickView>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .quick_views
            .iter()
            .find(|v| v.id == id && v.user_id == owner)
            .cloned())
    }

    async fn create_quick_view(&self, new: NewQuickView) -> Result<QuickView, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == new.user_id) {
            return Err(DatabaseError::ViolationError());
        }
        let quick_view = QuickView {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name,
            tags: new.tags,
        };
        tables.quick_views.push(quick_view.clone());
        Ok(quick_view)
    }

    async fn update_quick_view(
        &self,
        owner: Uuid,
        id: Uuid,
        modified: ModifyQuickView,
    ) -> Result<Option<QuickView>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .quick_views
            .iter_mut()
            .find(|v| v.id == id && v.user_id == owner)
            .map(|v| {
                v.name = modified.name;
                v.tags = modified.tags;
                v.clone()
            }))
    }

    async fn delete_quick_view(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.quick_views.len();
        tables
            .quick_views
            .retain(|v| !(v.id == id && v.user_id == owner));
        Ok(tables.quick_views.len() != before)
    }
}
