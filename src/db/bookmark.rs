use diesel::prelude::*;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use uuid::Uuid;

use super::schema::bookmarks;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub description: String,
    pub tags: String,
    pub created_at: time::OffsetDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark {
    pub user_id: Uuid,
    pub url: String,
    pub description: String,
    pub tags: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = bookmarks)]
pub struct ModifyBookmark {
    pub url: String,
    pub description: String,
    pub tags: String,
}

/// Newest first.
pub async fn list_bookmarks(conn: &mut Connection, owner: Uuid) -> QueryResult<Vec<Bookmark>> {
    bookmarks::table
        .filter(bookmarks::user_id.eq(owner))
        .select(Bookmark::as_select())
        .order_by(bookmarks::created_at.desc())
        .load(conn)
        .await
}

pub async fn get_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    id: Uuid,
) -> QueryResult<Option<Bookmark>> {
    bookmarks::table
        .filter(bookmarks::id.eq(id).and(bookmarks::user_id.eq(owner)))
        .select(Bookmark::as_select())
        .first(conn)
        .await
        .optional()
}

pub async fn create_bookmark(conn: &mut Connection, new: &NewBookmark) -> QueryResult<Bookmark> {
    diesel::insert_into(bookmarks::table)
        .values(new)
        .returning(Bookmark::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    id: Uuid,
    modified: &ModifyBookmark,
) -> QueryResult<Option<Bookmark>> {
    diesel::update(bookmarks::table)
        .filter(bookmarks::id.eq(id).and(bookmarks::user_id.eq(owner)))
        .set(modified)
        .returning(Bookmark::as_returning())
        .get_result(conn)
        .await
        .optional()
}

pub async fn delete_bookmark(conn: &mut Connection, owner: Uuid, id: Uuid) -> QueryResult<bool> {
    let effected = diesel::delete(bookmarks::table)
        .filter(bookmarks::id.eq(id).and(bookmarks::user_id.eq(owner)))
        .execute(conn)
        .await?;
    Ok(effected == 1)
}
