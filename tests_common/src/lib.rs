//! Shared test support: an in-memory evaluator for the four mapped queries
//! and generic checks reusable against any `FunctionQueries` implementation.
//! The expected values are fixed by the seed fixtures.

use std::collections::HashSet;

use async_trait::async_trait;
use fnmap_core::entities::{Blog, BlogWithMultiplePosts, Post};
use fnmap_core::{fixtures, FunctionQueries, Identifiable, StoreResult};

/// Evaluates the mapped queries directly over the seed fixtures, with the
/// same semantics the server-side routines implement. Keeps the generic
/// checks runnable without a database.
#[derive(Default)]
pub struct InMemoryStore;

impl InMemoryStore {
    fn distinct_tag_count(blog_id: i32) -> i32 {
        let post_ids: HashSet<i32> = fixtures::posts()
            .into_iter()
            .filter(|p| p.blog_id == blog_id)
            .map(|p| p.post_id)
            .collect();
        let tags: HashSet<String> = fixtures::post_tags()
            .into_iter()
            .filter(|link| post_ids.contains(&link.post_id))
            .map(|link| link.tag_id)
            .collect();
        tags.len() as i32
    }
}

#[async_trait]
impl FunctionQueries for InMemoryStore {
    async fn blogs_with_tag_count_above(&self, min_distinct_tags: i32) -> StoreResult<Vec<Blog>> {
        Ok(fixtures::blogs()
            .into_iter()
            .filter(|b| Self::distinct_tag_count(b.blog_id) > min_distinct_tags)
            .collect())
    }

    async fn posts_with_id_below_difference(&self, anchor: i32) -> StoreResult<Vec<Post>> {
        Ok(fixtures::posts()
            .into_iter()
            .filter(|p| p.post_id < (p.blog_id - anchor).abs())
            .collect())
    }

    async fn blogs_with_multiple_posts(
        &self,
        min_rating: i32,
    ) -> StoreResult<Vec<BlogWithMultiplePosts>> {
        let posts = fixtures::posts();
        Ok(fixtures::blogs()
            .into_iter()
            .filter_map(|b| {
                let post_count = posts.iter().filter(|p| p.blog_id == b.blog_id).count() as i64;
                (post_count > 1).then_some(BlogWithMultiplePosts {
                    rating: b.rating,
                    url: b.url,
                    post_count,
                })
            })
            .filter(|row| row.rating > min_rating)
            .collect())
    }

    async fn posts_tagged_with(&self, tag: &str) -> StoreResult<Vec<Post>> {
        let tagged: HashSet<i32> = fixtures::post_tags()
            .into_iter()
            .filter(|link| link.tag_id == tag)
            .map(|link| link.post_id)
            .collect();
        Ok(fixtures::posts()
            .into_iter()
            .filter(|p| tagged.contains(&p.post_id))
            .collect())
    }
}

fn sorted_post_ids(posts: &[Post]) -> Vec<i32> {
    let mut ids: Vec<i32> = posts.iter().map(|p| p.id()).collect();
    ids.sort_unstable();
    ids
}

/// Blog 2's posts carry {classic, opinion, informative}; blog 1's only two
/// distinct tags. A threshold of 2 selects exactly blog 2.
pub async fn check_tag_count_threshold<Q: FunctionQueries + Sync>(q: &Q) -> StoreResult<()> {
    let blogs = q.blogs_with_tag_count_above(2).await?;
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].blog_id, 2);

    // Every seeded blog clears a threshold of 1.
    let blogs = q.blogs_with_tag_count_above(1).await?;
    let mut ids: Vec<i32> = blogs.iter().map(|b| b.blog_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    Ok(())
}

/// Only post 1 satisfies `post_id < ABS(blog_id - 3)` (1 < |1-3| = 2).
pub async fn check_translated_difference<Q: FunctionQueries + Sync>(q: &Q) -> StoreResult<()> {
    let posts = q.posts_with_id_below_difference(3).await?;
    assert_eq!(sorted_post_ids(&posts), vec![1]);
    Ok(())
}

/// Blog 2 has 3 posts and rating 4; blog 1 is excluded by the routine itself.
pub async fn check_multiple_posts_projection<Q: FunctionQueries + Sync>(q: &Q) -> StoreResult<()> {
    let rows = q.blogs_with_multiple_posts(3).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, "https://mytravelblog.com/");
    assert_eq!(rows[0].rating, 4);
    assert_eq!(rows[0].post_count, 3);

    // Raising the rating bar past blog 2 empties the result.
    let rows = q.blogs_with_multiple_posts(4).await?;
    assert!(rows.is_empty());
    Ok(())
}

/// Every seeded tag maps back to exactly the posts its join rows reference.
pub async fn check_tagged_posts_lookup<Q: FunctionQueries + Sync>(q: &Q) -> StoreResult<()> {
    let expectations: &[(&str, &[i32])] = &[
        ("general", &[1]),
        ("classic", &[2]),
        ("opinion", &[3, 4]),
        ("informative", &[1, 4]),
    ];
    for (tag, expected) in expectations {
        let posts = q.posts_tagged_with(tag).await?;
        assert_eq!(sorted_post_ids(&posts), *expected, "tag {tag}");
    }

    let posts = q.posts_tagged_with("no-such-tag").await?;
    assert!(posts.is_empty());
    Ok(())
}
