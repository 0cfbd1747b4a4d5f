//! The sample's entity shapes and their hand-written metadata impls.
//!
//! Relations live entirely in the schema: `Post` carries a plain `blog_id`
//! foreign-key column, and the post/tag many-to-many goes through the
//! explicit [`PostTag`] join record keyed by `(post_id, tag_id)`.

use crate::{Fetchable, Identifiable, Insertable, ParamValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub blog_id: i32,
    pub url: String,
    pub rating: i32,
}

impl Fetchable for Blog {
    const TABLE: &'static str = "blogs";
    const SELECT_COLUMNS: &'static [&'static str] = &["blog_id", "url", "rating"];
}

impl Identifiable for Blog {
    type Key = i32;
    const ID_COLUMN: &'static str = "blog_id";
    fn id(&self) -> Self::Key {
        self.blog_id
    }
}

impl Insertable for Blog {
    const INSERT_COLUMNS: &'static [&'static str] = &["blog_id", "url", "rating"];
    fn insert_values(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::I32(self.blog_id),
            ParamValue::String(self.url.clone()),
            ParamValue::I32(self.rating),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub post_id: i32,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub blog_id: i32,
}

impl Fetchable for Post {
    const TABLE: &'static str = "posts";
    const SELECT_COLUMNS: &'static [&'static str] =
        &["post_id", "title", "content", "rating", "blog_id"];
}

impl Identifiable for Post {
    type Key = i32;
    const ID_COLUMN: &'static str = "post_id";
    fn id(&self) -> Self::Key {
        self.post_id
    }
}

impl Insertable for Post {
    const INSERT_COLUMNS: &'static [&'static str] =
        &["post_id", "title", "content", "rating", "blog_id"];
    fn insert_values(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::I32(self.post_id),
            ParamValue::String(self.title.clone()),
            ParamValue::String(self.content.clone()),
            ParamValue::I32(self.rating),
            ParamValue::I32(self.blog_id),
        ]
    }
}

/// Tags use their string id as a natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub tag_id: String,
}

impl Fetchable for Tag {
    const TABLE: &'static str = "tags";
    const SELECT_COLUMNS: &'static [&'static str] = &["tag_id"];
}

impl Identifiable for Tag {
    type Key = String;
    const ID_COLUMN: &'static str = "tag_id";
    fn id(&self) -> Self::Key {
        self.tag_id.clone()
    }
}

impl Insertable for Tag {
    const INSERT_COLUMNS: &'static [&'static str] = &["tag_id"];
    fn insert_values(&self) -> Vec<ParamValue> {
        vec![ParamValue::String(self.tag_id.clone())]
    }
}

/// Join record for the post/tag many-to-many. The composite primary key
/// `(post_id, tag_id)` keeps each pair unique; there is no single key column,
/// so it is not `Identifiable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTag {
    pub post_id: i32,
    pub tag_id: String,
}

impl Fetchable for PostTag {
    const TABLE: &'static str = "post_tags";
    const SELECT_COLUMNS: &'static [&'static str] = &["post_id", "tag_id"];
}

impl Insertable for PostTag {
    const INSERT_COLUMNS: &'static [&'static str] = &["post_id", "tag_id"];
    fn insert_values(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::I32(self.post_id),
            ParamValue::String(self.tag_id.clone()),
        ]
    }
}

/// Keyless projection shape. Never persisted or mutated; rows come only from
/// the `blogs_with_multiple_posts()` routine, which is why `TABLE` names a
/// routine rather than a table. `post_count` is `i64` because SQL `COUNT`
/// yields a bigint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogWithMultiplePosts {
    pub rating: i32,
    pub url: String,
    pub post_count: i64,
}

impl Fetchable for BlogWithMultiplePosts {
    const TABLE: &'static str = "blogs_with_multiple_posts";
    const SELECT_COLUMNS: &'static [&'static str] = &["rating", "url", "post_count"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_constants() {
        assert_eq!(Blog::TABLE, "blogs");
        assert_eq!(Blog::SELECT_COLUMNS, &["blog_id", "url", "rating"]);
        assert_eq!(Blog::ID_COLUMN, "blog_id");

        assert_eq!(Post::TABLE, "posts");
        assert_eq!(
            Post::SELECT_COLUMNS,
            &["post_id", "title", "content", "rating", "blog_id"]
        );

        assert_eq!(Tag::TABLE, "tags");
        assert_eq!(Tag::ID_COLUMN, "tag_id");

        assert_eq!(PostTag::TABLE, "post_tags");
        assert_eq!(PostTag::INSERT_COLUMNS, &["post_id", "tag_id"]);

        assert_eq!(BlogWithMultiplePosts::TABLE, "blogs_with_multiple_posts");
        assert_eq!(
            BlogWithMultiplePosts::SELECT_COLUMNS,
            &["rating", "url", "post_count"]
        );
    }

    #[test]
    fn insert_values_line_up_with_columns() {
        let blog = Blog {
            blog_id: 1,
            url: "https://example.org".into(),
            rating: 5,
        };
        assert_eq!(blog.insert_values().len(), Blog::INSERT_COLUMNS.len());

        let link = PostTag {
            post_id: 1,
            tag_id: "general".into(),
        };
        assert_eq!(link.insert_values().len(), PostTag::INSERT_COLUMNS.len());
        assert!(matches!(link.insert_values()[0], ParamValue::I32(1)));
    }

    #[test]
    fn tag_id_doubles_as_key() {
        let tag = Tag {
            tag_id: "opinion".into(),
        };
        assert_eq!(tag.id(), "opinion");
    }
}
