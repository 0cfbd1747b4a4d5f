//! The function-binding table: each application-level method maps to either a
//! server-side routine (installed verbatim at store creation) or an inline
//! SQL translation. Backends own the concrete registry; this module defines
//! the row type, the call renderer, and the application-side handles.

use crate::entities::Post;
use crate::{StoreError, StoreResult};

/// How a bound method materializes in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionBody {
    /// Complete `CREATE FUNCTION` source, submitted verbatim when the store
    /// is created. The routine is then invoked by name inside queries.
    Routine(&'static str),
    /// Inline SQL expression template with `{0}`, `{1}` argument slots.
    /// Rendered directly into the query; no routine is installed.
    Translation(&'static str),
}

/// One row of the binding table: application method name, server-side routine
/// name, and the body that realizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbFunction {
    pub method: &'static str,
    pub routine: &'static str,
    pub body: FunctionBody,
}

impl DbFunction {
    /// Render an invocation of this binding for use inside a query.
    ///
    /// `args` are column references or bind placeholders chosen by query
    /// code, never user data. Routines render as `routine(a, b)`;
    /// translations substitute `{n}` slots in the template.
    pub fn call(&self, args: &[&str]) -> String {
        match self.body {
            FunctionBody::Routine(_) => format!("{}({})", self.routine, args.join(", ")),
            FunctionBody::Translation(template) => render_template(template, args),
        }
    }

    /// The routine source to install at store creation, if any.
    pub fn routine_source(&self) -> Option<&'static str> {
        match self.body {
            FunctionBody::Routine(src) => Some(src),
            FunctionBody::Translation(_) => None,
        }
    }
}

/// Look a binding up by its application method name.
pub fn lookup<'a>(bindings: &'a [DbFunction], method: &str) -> Option<&'a DbFunction> {
    bindings.iter().find(|f| f.method == method)
}

fn render_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        match tail.find('}') {
            Some(close) => {
                let index: usize = tail[..close].parse().unwrap_or(usize::MAX);
                out.push_str(args.get(index).copied().unwrap_or(""));
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// Application-side handles for the mapped methods. They exist as typed names
// for the binding table; the routines they stand for live only in the
// database, so calling one directly is always an error.

/// Distinct tag count across a blog's posts. Usable only through
/// [`crate::FunctionQueries::blogs_with_tag_count_above`].
pub fn unique_tags_count_for_blog_posts(_blog_id: i32) -> StoreResult<i32> {
    Err(StoreError::DirectCall {
        method: "unique_tags_count_for_blog_posts",
    })
}

/// Absolute difference of two values. Usable only through
/// [`crate::FunctionQueries::posts_with_id_below_difference`].
pub fn difference(_first: i32, _second: i32) -> StoreResult<i32> {
    Err(StoreError::DirectCall {
        method: "difference",
    })
}

/// Posts carrying a tag. Usable only through
/// [`crate::FunctionQueries::posts_tagged_with`].
pub fn posts_tagged_with(_tag: &str) -> StoreResult<Vec<Post>> {
    Err(StoreError::DirectCall {
        method: "posts_tagged_with",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTINE: DbFunction = DbFunction {
        method: "unique_tags_count_for_blog_posts",
        routine: "distinct_tags_count_for_blog_posts",
        body: FunctionBody::Routine("CREATE FUNCTION distinct_tags_count_for_blog_posts ..."),
    };

    const TRANSLATED: DbFunction = DbFunction {
        method: "difference",
        routine: "abs",
        body: FunctionBody::Translation("ABS({0} - {1})"),
    };

    #[test]
    fn routine_call_renders_named_invocation() {
        assert_eq!(
            ROUTINE.call(&["blog_id"]),
            "distinct_tags_count_for_blog_posts(blog_id)"
        );
        assert!(ROUTINE.routine_source().is_some());
    }

    #[test]
    fn translation_call_substitutes_slots() {
        assert_eq!(TRANSLATED.call(&["blog_id", "$1"]), "ABS(blog_id - $1)");
        assert_eq!(TRANSLATED.routine_source(), None);
    }

    #[test]
    fn lookup_finds_by_method_name() {
        let bindings = [ROUTINE, TRANSLATED];
        assert_eq!(lookup(&bindings, "difference").unwrap().routine, "abs");
        assert!(lookup(&bindings, "no_such_method").is_none());
    }

    #[test]
    fn template_slots_may_repeat_and_exceed_args() {
        assert_eq!(render_template("{0} + {0}", &["x"]), "x + x");
        // Out-of-range slots render empty rather than panicking.
        assert_eq!(render_template("{0}{9}", &["x"]), "x");
    }

    #[test]
    fn direct_calls_are_refused() {
        assert!(matches!(
            unique_tags_count_for_blog_posts(1),
            Err(StoreError::DirectCall {
                method: "unique_tags_count_for_blog_posts"
            })
        ));
        assert!(matches!(
            difference(1, 2),
            Err(StoreError::DirectCall {
                method: "difference"
            })
        ));
        assert!(matches!(
            posts_tagged_with("general"),
            Err(StoreError::DirectCall {
                method: "posts_tagged_with"
            })
        ));
    }
}
