#![forbid(unsafe_code)]
#![cfg_attr(
    not(feature = "postgres-backend"),
    doc = "Enable feature `postgres-backend` to use this adapter."
)]

#[cfg(feature = "postgres-backend")]
mod backend {
    use std::sync::Arc;
    use std::time::Instant;

    use fnmap_core::async_trait;
    use fnmap_core::entities::{Blog, BlogWithMultiplePosts, Post, Tag};
    use fnmap_core::functions::{DbFunction, FunctionBody};
    use fnmap_core::{
        fixtures, Fetchable, FunctionQueries, Insertable, ParamValue, RowAdapter, StoreError,
        StoreResult,
    };
    use tokio_postgres::{types::ToSql, Client, NoTls, Row};

    #[cfg(feature = "tracing")]
    use tracing::info;

    #[inline]
    #[allow(unused_variables)]
    fn obs_record(op: &str, relation: &str, start: Instant, rows: usize, success: bool) {
        let elapsed = start.elapsed().as_millis() as u64;
        #[cfg(feature = "tracing")]
        {
            info!(
                sql_kind = "sql",
                relation = relation,
                op = op,
                rows = rows,
                elapsed_ms = elapsed,
                success = success,
                "store op"
            );
        }
        #[cfg(feature = "metrics")]
        {
            metrics::counter!("store_ops_total", 1, "op" => op.to_string(), "relation" => relation.to_string(), "success" => success.to_string());
            metrics::histogram!("store_op_duration_ms", elapsed as f64, "op" => op.to_string(), "relation" => relation.to_string());
            if !success {
                metrics::counter!("store_op_errors_total", 1, "op" => op.to_string(), "relation" => relation.to_string());
            }
        }
    }

    /// SQL submitted verbatim against the store. The routine bodies double as
    /// the `Routine` entries of the binding registry below.
    mod sql {
        pub const SCHEMA: &str = include_str!("sql/schema.sql");
        pub const DROP_SCHEMA: &str = include_str!("sql/drop_schema.sql");
        pub const DISTINCT_TAGS_COUNT: &str =
            include_str!("sql/distinct_tags_count_for_blog_posts.sql");
        pub const BLOGS_WITH_MULTIPLE_POSTS: &str =
            include_str!("sql/blogs_with_multiple_posts.sql");
        pub const POSTS_TAGGED_WITH: &str = include_str!("sql/posts_tagged_with.sql");
    }

    /// Scalar routine: distinct tag count across one blog's posts.
    pub const UNIQUE_TAGS_COUNT: DbFunction = DbFunction {
        method: "unique_tags_count_for_blog_posts",
        routine: "distinct_tags_count_for_blog_posts",
        body: FunctionBody::Routine(sql::DISTINCT_TAGS_COUNT),
    };

    /// Translated expression; no server routine is installed for it.
    pub const DIFFERENCE: DbFunction = DbFunction {
        method: "difference",
        routine: "abs",
        body: FunctionBody::Translation("ABS({0} - {1})"),
    };

    /// Table-valued routine backing the keyless projection shape.
    pub const BLOGS_WITH_MULTIPLE_POSTS: DbFunction = DbFunction {
        method: "blogs_with_multiple_posts",
        routine: "blogs_with_multiple_posts",
        body: FunctionBody::Routine(sql::BLOGS_WITH_MULTIPLE_POSTS),
    };

    /// Parameterized table-valued routine: posts carrying a tag.
    pub const POSTS_TAGGED_WITH: DbFunction = DbFunction {
        method: "posts_tagged_with",
        routine: "posts_tagged_with",
        body: FunctionBody::Routine(sql::POSTS_TAGGED_WITH),
    };

    /// The binding table for this store: application method name, server-side
    /// routine name, and the body realizing it.
    pub const FUNCTIONS: &[DbFunction] = &[
        UNIQUE_TAGS_COUNT,
        DIFFERENCE,
        BLOGS_WITH_MULTIPLE_POSTS,
        POSTS_TAGGED_WITH,
    ];

    /// A helper to convert `ParamValue`s into a `Vec` of owned, boxed `ToSql`
    /// trait objects. This is necessary to manage the lifetimes of the
    /// parameters correctly.
    fn to_postgres_params(values: &[ParamValue]) -> Vec<Box<dyn ToSql + Sync + Send>> {
        values
            .iter()
            .map(|v| -> Box<dyn ToSql + Sync + Send> {
                match v {
                    ParamValue::String(s) => Box::new(s.clone()),
                    ParamValue::I32(i) => Box::new(*i),
                    ParamValue::I64(i) => Box::new(*i),
                    ParamValue::Null => Box::new(Option::<i32>::None),
                }
            })
            .collect()
    }

    /// Prebuilt SQL for the demo queries and listings, computed once per store.
    struct DemoSql {
        blogs_by_tag_count: String,
        posts_by_difference: String,
        multiple_posts: String,
        tagged_posts: String,
        all_blogs: String,
        all_posts: String,
        all_tags: String,
    }

    impl DemoSql {
        fn new() -> Self {
            let ph1 = fnmap_sql_builder::param(1);

            let tag_count_call = UNIQUE_TAGS_COUNT.call(&["blog_id"]);
            let blogs_by_tag_count =
                fnmap_sql_builder::select_where::<Blog>(&format!("{} > {}", tag_count_call, ph1));

            let difference_expr = DIFFERENCE.call(&["blog_id", &ph1]);
            let posts_by_difference =
                fnmap_sql_builder::select_where::<Post>(&format!("post_id < {}", difference_expr));

            let multiple_posts = fnmap_sql_builder::select_from_function_where::<
                BlogWithMultiplePosts,
            >(
                BLOGS_WITH_MULTIPLE_POSTS.routine, 0, &format!("rating > {}", ph1)
            );

            let tagged_posts =
                fnmap_sql_builder::select_from_function::<Post>(POSTS_TAGGED_WITH.routine, 1);

            Self {
                blogs_by_tag_count,
                posts_by_difference,
                multiple_posts,
                tagged_posts,
                all_blogs: fnmap_sql_builder::select_all::<Blog>(),
                all_posts: fnmap_sql_builder::select_all::<Post>(),
                all_tags: fnmap_sql_builder::select_all::<Tag>(),
            }
        }
    }

    /// Maps `tokio_postgres` rows into [`Blog`]s.
    pub struct BlogRowAdapter;
    impl RowAdapter<Blog> for BlogRowAdapter {
        type Row = Row;
        fn from_row(&self, row: &Self::Row) -> StoreResult<Blog> {
            Ok(Blog {
                blog_id: row.try_get("blog_id").map_err(StoreError::mapping)?,
                url: row.try_get("url").map_err(StoreError::mapping)?,
                rating: row.try_get("rating").map_err(StoreError::mapping)?,
            })
        }
    }

    /// Maps `tokio_postgres` rows into [`Post`]s; also fits the rows produced
    /// by the `posts_tagged_with` routine, which mirror the posts table.
    pub struct PostRowAdapter;
    impl RowAdapter<Post> for PostRowAdapter {
        type Row = Row;
        fn from_row(&self, row: &Self::Row) -> StoreResult<Post> {
            Ok(Post {
                post_id: row.try_get("post_id").map_err(StoreError::mapping)?,
                title: row.try_get("title").map_err(StoreError::mapping)?,
                content: row.try_get("content").map_err(StoreError::mapping)?,
                rating: row.try_get("rating").map_err(StoreError::mapping)?,
                blog_id: row.try_get("blog_id").map_err(StoreError::mapping)?,
            })
        }
    }

    /// Maps `tokio_postgres` rows into [`Tag`]s.
    pub struct TagRowAdapter;
    impl RowAdapter<Tag> for TagRowAdapter {
        type Row = Row;
        fn from_row(&self, row: &Self::Row) -> StoreResult<Tag> {
            Ok(Tag {
                tag_id: row.try_get("tag_id").map_err(StoreError::mapping)?,
            })
        }
    }

    /// Maps rows of the `blogs_with_multiple_posts()` routine into the
    /// keyless projection shape.
    pub struct BlogWithMultiplePostsRowAdapter;
    impl RowAdapter<BlogWithMultiplePosts> for BlogWithMultiplePostsRowAdapter {
        type Row = Row;
        fn from_row(&self, row: &Self::Row) -> StoreResult<BlogWithMultiplePosts> {
            Ok(BlogWithMultiplePosts {
                rating: row.try_get("rating").map_err(StoreError::mapping)?,
                url: row.try_get("url").map_err(StoreError::mapping)?,
                post_count: row.try_get("post_count").map_err(StoreError::mapping)?,
            })
        }
    }

    /// The sample's store: a scoped `tokio_postgres` connection plus the
    /// schema, routine, and seed lifecycle around it.
    pub struct BloggingStore {
        client: Arc<Client>,
        sql: DemoSql,
    }

    impl BloggingStore {
        /// Connects and spawns the connection driver task.
        pub async fn connect(conn_str: &str) -> StoreResult<Self> {
            let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
                .await
                .map_err(StoreError::backend)?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    eprintln!("Postgres connection error: {}", e);
                }
            });
            Ok(Self {
                client: Arc::new(client),
                sql: DemoSql::new(),
            })
        }

        /// Drops every object the sample owns, if present. A rerun always
        /// starts from a destroyed store.
        pub async fn ensure_dropped(&self) -> StoreResult<()> {
            self.client
                .batch_execute(sql::DROP_SCHEMA)
                .await
                .map_err(StoreError::backend)
        }

        /// Creates the schema, installs every `Routine` body from the binding
        /// table verbatim, and loads the seed fixtures. Fails if the store
        /// already holds these objects; call [`ensure_dropped`] first.
        ///
        /// [`ensure_dropped`]: BloggingStore::ensure_dropped
        pub async fn ensure_created(&self) -> StoreResult<()> {
            self.client
                .batch_execute(sql::SCHEMA)
                .await
                .map_err(StoreError::backend)?;
            for function in FUNCTIONS {
                if let Some(src) = function.routine_source() {
                    self.client
                        .batch_execute(src)
                        .await
                        .map_err(StoreError::backend)?;
                }
            }
            self.seed().await
        }

        async fn seed(&self) -> StoreResult<()> {
            // Insert order satisfies the FK dependencies.
            self.insert_rows(&fixtures::blogs()).await?;
            self.insert_rows(&fixtures::posts()).await?;
            self.insert_rows(&fixtures::tags()).await?;
            self.insert_rows(&fixtures::post_tags()).await
        }

        async fn insert_rows<E>(&self, rows: &[E]) -> StoreResult<()>
        where
            E: Fetchable + Insertable + Sync,
        {
            let statement = fnmap_sql_builder::insert::<E>();
            for row in rows {
                let owned = to_postgres_params(&row.insert_values());
                let params: Vec<&(dyn ToSql + Sync)> = owned
                    .iter()
                    .map(|p| p.as_ref() as &(dyn ToSql + Sync))
                    .collect();
                self.client
                    .execute(&statement, &params[..])
                    .await
                    .map_err(StoreError::backend)?;
            }
            Ok(())
        }

        async fn fetch<T, A>(
            &self,
            op: &str,
            relation: &str,
            statement: &str,
            params: &[&(dyn ToSql + Sync)],
            adapter: &A,
        ) -> StoreResult<Vec<T>>
        where
            A: RowAdapter<T, Row = Row>,
        {
            let start = Instant::now();
            let result = self
                .client
                .query(statement, params)
                .await
                .map_err(StoreError::backend)
                .and_then(|rows| {
                    rows.iter()
                        .map(|row| adapter.from_row(row))
                        .collect::<StoreResult<Vec<T>>>()
                });
            obs_record(
                op,
                relation,
                start,
                result.as_ref().map(|r| r.len()).unwrap_or(0),
                result.is_ok(),
            );
            result
        }

        /// All seeded blogs.
        pub async fn blogs(&self) -> StoreResult<Vec<Blog>> {
            self.fetch("blogs", Blog::TABLE, &self.sql.all_blogs, &[], &BlogRowAdapter)
                .await
        }

        /// All seeded posts.
        pub async fn posts(&self) -> StoreResult<Vec<Post>> {
            self.fetch("posts", Post::TABLE, &self.sql.all_posts, &[], &PostRowAdapter)
                .await
        }

        /// All seeded tags.
        pub async fn tags(&self) -> StoreResult<Vec<Tag>> {
            self.fetch("tags", Tag::TABLE, &self.sql.all_tags, &[], &TagRowAdapter)
                .await
        }
    }

    #[async_trait]
    impl FunctionQueries for BloggingStore {
        async fn blogs_with_tag_count_above(
            &self,
            min_distinct_tags: i32,
        ) -> StoreResult<Vec<Blog>> {
            self.fetch(
                "blogs_with_tag_count_above",
                UNIQUE_TAGS_COUNT.routine,
                &self.sql.blogs_by_tag_count,
                &[&min_distinct_tags],
                &BlogRowAdapter,
            )
            .await
        }

        async fn posts_with_id_below_difference(&self, anchor: i32) -> StoreResult<Vec<Post>> {
            self.fetch(
                "posts_with_id_below_difference",
                DIFFERENCE.routine,
                &self.sql.posts_by_difference,
                &[&anchor],
                &PostRowAdapter,
            )
            .await
        }

        async fn blogs_with_multiple_posts(
            &self,
            min_rating: i32,
        ) -> StoreResult<Vec<BlogWithMultiplePosts>> {
            self.fetch(
                "blogs_with_multiple_posts",
                BLOGS_WITH_MULTIPLE_POSTS.routine,
                &self.sql.multiple_posts,
                &[&min_rating],
                &BlogWithMultiplePostsRowAdapter,
            )
            .await
        }

        async fn posts_tagged_with(&self, tag: &str) -> StoreResult<Vec<Post>> {
            self.fetch(
                "posts_tagged_with",
                POSTS_TAGGED_WITH.routine,
                &self.sql.tagged_posts,
                &[&tag],
                &PostRowAdapter,
            )
            .await
        }
    }

}

#[cfg(feature = "postgres-backend")]
pub use backend::{
    BlogRowAdapter, BlogWithMultiplePostsRowAdapter, BloggingStore, PostRowAdapter, TagRowAdapter,
    BLOGS_WITH_MULTIPLE_POSTS, DIFFERENCE, FUNCTIONS, POSTS_TAGGED_WITH, UNIQUE_TAGS_COUNT,
};
