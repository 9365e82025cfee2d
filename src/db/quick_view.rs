use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use uuid::Uuid;

use super::schema::quick_views;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = quick_views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuickView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub tags: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = quick_views)]
pub struct NewQuickView {
    pub user_id: Uuid,
    pub name: String,
    pub tags: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = quick_views)]
pub struct ModifyQuickView {
    pub name: String,
    pub tags: String,
}

/// Sorted by name in byte order, whatever the database collation is.
pub async fn list_quick_views(conn: &mut Connection, owner: Uuid) -> QueryResult<Vec<QuickView>> {
    quick_views::table
        .filter(quick_views::user_id.eq(owner))
        .select(QuickView::as_select())
        .order_by((
            sql::<Text>(r#"quick_views.name COLLATE "C""#).asc(),
            quick_views::id.asc(),
        ))
        .load(conn)
        .await
}

pub async fn get_quick_view(
    conn: &mut Connection,
    owner: Uuid,
    id: Uuid,
) -> QueryResult<Option<QuickView>> {
    quick_views::table
        .filter(quick_views::id.eq(id).and(quick_views::user_id.eq(owner)))
        .select(QuickView::as_select())
        .first(conn)
        .await
        .optional()
}

pub async fn create_quick_view(
    conn: &mut Connection,
    new: &NewQuickView,
) -> QueryResult<QuickView> {
    diesel::insert_into(quick_views::table)
        .values(new)
        .returning(QuickView::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_quick_view(
    conn: &mut Connection,
    owner: Uuid,
    id: Uuid,
    modified: &ModifyQuickView,
) -> QueryResult<Option<QuickView>> {
    diesel::update(quick_views::table)
        .filter(quick_views::id.eq(id).and(quick_views::user_id.eq(owner)))
        .set(modified)
        .returning(QuickView::as_returning())
        .get_result(conn)
        .await
        .optional()
}

pub async fn delete_quick_view(conn: &mut Connection, owner: Uuid, id: Uuid) -> QueryResult<bool> {
    let effected = diesel::delete(quick_views::table)
        .filter(quick_views::id.eq(id).and(quick_views::user_id.eq(owner)))
        .execute(conn)
        .await?;
    Ok(effected == 1)
}
