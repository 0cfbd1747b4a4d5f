#![forbid(unsafe_code)]
//! Facade crate for the fnmap sample.
//!
//! Re-exports the core types so an application only needs this single crate:
//! the entity shapes and seed fixtures, the function-binding table with its
//! direct-call stubs, and the [`FunctionQueries`] trait. Backend types are
//! exposed under [`backends`] behind the `postgres-backend` feature.
//!
//! The runnable end-to-end demo lives in `examples/custom_functions_pg.rs`:
//! it destroys and recreates the backing store, installs the three routine
//! bodies verbatim, loads the seed rows, and issues the four mapped queries.

// Re-export all core traits and types.
pub use fnmap_core::{
    async_trait, Fetchable, FunctionQueries, Identifiable, Insertable, ParamValue, RowAdapter,
    StoreError, StoreResult,
};

// Entity shapes, seed fixtures, and the function-binding table.
pub use fnmap_core::{entities, fixtures, functions};

// Optional re-export of the SQL builder helpers.
#[cfg(feature = "sql-builder")]
pub use fnmap_sql_builder as sql_builder;

// Backend types re-exported under a neutral namespace, so end-users don't
// have to depend on backend crates directly. Feature-gated.
pub mod backends {
    #[cfg(feature = "postgres-backend")]
    pub use fnmap_tokio_postgres::{
        BlogRowAdapter, BlogWithMultiplePostsRowAdapter, BloggingStore, PostRowAdapter,
        TagRowAdapter, BLOGS_WITH_MULTIPLE_POSTS, DIFFERENCE, FUNCTIONS, POSTS_TAGGED_WITH,
        UNIQUE_TAGS_COUNT,
    };
}
