//! Fixed seed rows, loaded once when the backing store is created. The demo
//! queries and the tests both read their expectations from this data.

use crate::entities::{Blog, Post, PostTag, Tag};

pub fn blogs() -> Vec<Blog> {
    vec![
        Blog {
            blog_id: 1,
            url: "https://devblogs.microsoft.com/dotnet".into(),
            rating: 5,
        },
        Blog {
            blog_id: 2,
            url: "https://mytravelblog.com/".into(),
            rating: 4,
        },
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post {
            post_id: 1,
            title: "What's new".into(),
            content: "Lorem ipsum dolor sit amet".into(),
            rating: 5,
            blog_id: 1,
        },
        Post {
            post_id: 2,
            title: "Around the World in Eighty Days".into(),
            content: "consectetur adipiscing elit".into(),
            rating: 5,
            blog_id: 2,
        },
        Post {
            post_id: 3,
            title: "Glamping *is* the way".into(),
            content: "sed do eiusmod tempor incididunt".into(),
            rating: 4,
            blog_id: 2,
        },
        Post {
            post_id: 4,
            title: "Travel in the time of pandemic".into(),
            content: "ut labore et dolore magna aliqua".into(),
            rating: 3,
            blog_id: 2,
        },
    ]
}

pub fn tags() -> Vec<Tag> {
    ["general", "classic", "opinion", "informative"]
        .into_iter()
        .map(|t| Tag { tag_id: t.into() })
        .collect()
}

pub fn post_tags() -> Vec<PostTag> {
    [
        (1, "general"),
        (1, "informative"),
        (2, "classic"),
        (3, "opinion"),
        (4, "opinion"),
        (4, "informative"),
    ]
    .into_iter()
    .map(|(post_id, tag_id)| PostTag {
        post_id,
        tag_id: tag_id.into(),
    })
    .collect()
}
