//! Tag parsing, filtering and grouping over already owner-scoped collections.
//!
//! Tags are stored as one raw whitespace-separated string per row. Everything
//! here is pure and works on whatever the store handed back.

use crate::db::bookmark::Bookmark;
use crate::db::quick_view::QuickView;

use std::borrow::Borrow;

/// Anything carrying a raw tag string.
pub trait Tagged {
    fn raw_tags(&self) -> &str;

    fn tags(&self) -> Vec<&str> {
        tags_of(self.raw_tags())
    }
}

impl Tagged for Bookmark {
    fn raw_tags(&self) -> &str {
        &self.tags
    }
}

impl Tagged for QuickView {
    fn raw_tags(&self) -> &str {
        &self.tags
    }
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn raw_tags(&self) -> &str {
        (**self).raw_tags()
    }
}

/// Split on whitespace, empty tokens dropped, duplicates kept.
pub fn tags_of(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Required tags of a `/t/a+b` style filter.
pub fn parse_filter(raw: &str) -> Vec<&str> {
    raw.split('+').filter(|t| !t.is_empty()).collect()
}

pub fn has_all_tags<S: AsRef<str>>(item: &impl Tagged, required: &[S]) -> bool {
    let tags = item.tags();
    required.iter().all(|t| tags.contains(&t.as_ref()))
}

pub fn filter_by_tags<T: Tagged, S: AsRef<str>>(items: Vec<T>, required: &[S]) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| has_all_tags(item, required))
        .collect()
}

/// Bookmarks carrying exactly the quick view's tags, sorted by description.
///
/// "Exactly" is checked as: every quick view tag present and the same number of
/// tags on both sides. With duplicated tags this is not set equality: a quick
/// view tagged `"a a"` matches a bookmark tagged `"a b"`.
pub fn filter_for_quick_view<T>(quick_view: &QuickView, bookmarks: Vec<T>) -> Vec<T>
where
    T: Borrow<Bookmark>,
{
    let required = quick_view.tags();
    let mut rv = bookmarks
        .into_iter()
        .filter(|b| {
            let b: &Bookmark = b.borrow();
            has_all_tags(b, &required) && b.tags().len() == required.len()
        })
        .collect::<Vec<_>>();
    rv.sort_by(|a, b| {
        let (a, b): (&Bookmark, &Bookmark) = (a.borrow(), b.borrow());
        a.description.cmp(&b.description)
    });
    rv
}

#[derive(Debug, PartialEq, Eq)]
pub struct TagGroup<'a, T> {
    pub name: &'a str,
    pub items: Vec<&'a T>,
}

/// One group per distinct tag, in first-seen order.
pub fn group_by_tag<T: Tagged>(items: &[T]) -> Vec<TagGroup<'_, T>> {
    let mut groups: Vec<TagGroup<'_, T>> = Vec::new();
    for item in items {
        for name in item.tags() {
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => group.items.push(item),
                None => groups.push(TagGroup {
                    name,
                    items: vec![item],
                }),
            }
        }
    }
    groups
}
