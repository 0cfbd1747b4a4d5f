#![forbid(unsafe_code)]
//! Core types for the fnmap sample: entity shapes, seed fixtures, the
//! function-binding table, and the traits backends implement.
//! This crate is database-agnostic and should not contain any backend-specific logic.

// Re-export for downstream trait impls.
pub use async_trait::async_trait;

pub mod entities;
pub mod fixtures;
pub mod functions;

use entities::{Blog, BlogWithMultiplePosts, Post};

/// Compile-time metadata for types that can be fetched from the store.
/// Implemented by hand for each of the sample's shapes.
pub trait Fetchable {
    /// Name of the backing relation. For keyless projection shapes this is
    /// the table-valued routine that produces the rows, not a table.
    const TABLE: &'static str;
    const SELECT_COLUMNS: &'static [&'static str];
}

/// A backend-agnostic representation of a database parameter value.
/// This is used to pass entity field values to backend adapters without
/// making `fnmap_core` dependent on a specific database driver.
#[derive(Debug, Clone)]
pub enum ParamValue {
    String(String),
    I32(i32),
    I64(i64),
    Null,
}

/// Trait for entities that have an identifiable key. The join record and the
/// keyless projection shape do not implement it.
pub trait Identifiable {
    /// The type of the primary key (e.g., `i32`, `String`).
    type Key;

    /// The name of the primary key column in the database.
    const ID_COLUMN: &'static str;

    /// Returns a copy of the entity's key.
    fn id(&self) -> Self::Key;
}

/// Trait for types whose fields can be extracted for an INSERT statement.
/// Seed rows carry explicit keys, so key columns are included.
pub trait Insertable {
    const INSERT_COLUMNS: &'static [&'static str];

    /// The values of the fields corresponding to `INSERT_COLUMNS`.
    fn insert_values(&self) -> Vec<ParamValue>;
}

/// Lightweight, backend-agnostic error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A mapped function handle was invoked directly instead of inside a
    /// translated query. The routine only exists in the database.
    #[error("function `{method}` can only be used inside a translated query")]
    DirectCall { method: &'static str },
    /// Error while mapping a backend row into an entity.
    #[error("mapping error")]
    Mapping {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Opaque backend error from the underlying driver.
    #[error("backend error")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a backend/driver error.
    pub fn backend<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend {
            source: Box::new(e),
        }
    }
    /// Wrap a row-mapping error.
    pub fn mapping<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Mapping {
            source: Box::new(e),
        }
    }
}

/// Convenience alias for results returned by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A tiny adapter for mapping a backend-specific row type into an entity `T`.
/// Backends implement this for their row representations.
#[allow(clippy::wrong_self_convention)]
pub trait RowAdapter<T> {
    type Row;
    fn from_row(&self, row: &Self::Row) -> StoreResult<T>;
}

/// The four demo queries, each exercising one mapped function. Concrete
/// backends translate them through the binding table; `tests_common` also
/// evaluates them in memory straight from the fixtures.
#[async_trait]
pub trait FunctionQueries {
    /// Blogs whose posts carry more than `min_distinct_tags` distinct tags,
    /// computed by the scalar routine bound to
    /// [`functions::unique_tags_count_for_blog_posts`].
    async fn blogs_with_tag_count_above(&self, min_distinct_tags: i32) -> StoreResult<Vec<Blog>>;

    /// Posts whose id is below `ABS(blog_id - anchor)`, rendered from the
    /// translation bound to [`functions::difference`].
    async fn posts_with_id_below_difference(&self, anchor: i32) -> StoreResult<Vec<Post>>;

    /// Rows of the keyless projection produced by the table-valued routine,
    /// filtered to ratings above `min_rating`.
    async fn blogs_with_multiple_posts(
        &self,
        min_rating: i32,
    ) -> StoreResult<Vec<BlogWithMultiplePosts>>;

    /// Posts carrying `tag`, produced by the parameterized table-valued
    /// routine bound to [`functions::posts_tagged_with`].
    async fn posts_tagged_with(&self, tag: &str) -> StoreResult<Vec<Post>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_messages() {
        let e1 = StoreError::DirectCall {
            method: "difference",
        };
        assert_eq!(
            format!("{}", e1),
            "function `difference` can only be used inside a translated query"
        );

        let e2 = StoreError::mapping(std::io::Error::new(std::io::ErrorKind::Other, "bad row"));
        assert_eq!(format!("{}", e2), "mapping error");

        let e3 = StoreError::backend(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(format!("{}", e3), "backend error");
    }

    #[test]
    fn param_value_variants_roundtrip() {
        let values = vec![
            ParamValue::String("s".to_string()),
            ParamValue::I32(32),
            ParamValue::I64(64),
            ParamValue::Null,
        ];

        for v in values {
            match v.clone() {
                ParamValue::String(s) => assert_eq!(s, "s"),
                ParamValue::I32(i) => assert_eq!(i, 32),
                ParamValue::I64(i) => assert_eq!(i, 64),
                ParamValue::Null => assert!(matches!(v, ParamValue::Null)),
            }
        }
    }

    // A tiny shape and RowAdapter to exercise trait wiring without a driver.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct MiniRow {
        id: i32,
    }

    impl Identifiable for MiniRow {
        type Key = i32;
        const ID_COLUMN: &'static str = "id";
        fn id(&self) -> Self::Key {
            self.id
        }
    }

    struct MiniAdapter;
    impl RowAdapter<MiniRow> for MiniAdapter {
        type Row = i32; // pretend a row is just an i32 id
        fn from_row(&self, row: &Self::Row) -> StoreResult<MiniRow> {
            Ok(MiniRow { id: *row })
        }
    }

    #[test]
    fn row_adapter_from_row_works() {
        let a = MiniAdapter;
        let ent = a.from_row(&7).unwrap();
        assert_eq!(ent, MiniRow { id: 7 });
        assert_eq!(ent.id(), 7);
    }
}
