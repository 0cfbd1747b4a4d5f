#![forbid(unsafe_code)]
//! Minimal SQL builder helpers driven by entity metadata from `fnmap_core`.
//!
//! Feature flags select placeholder style:
//! - `tokio_postgres`: $1, $2, ...
//!
//! Default (no feature): ?

/// Placeholder representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Dollar,   // $1, $2, ...
    Question, // ?
}

fn placeholder_style() -> Placeholder {
    #[cfg(feature = "tokio_postgres")]
    return Placeholder::Dollar;

    #[cfg(not(feature = "tokio_postgres"))]
    return Placeholder::Question;
}

/// Render the n-th bind placeholder in the active style (1-based). Public so
/// backends can embed placeholders inside hand-built predicates.
pub fn param(n: usize) -> String {
    match placeholder_style() {
        Placeholder::Dollar => format!("${}", n),
        Placeholder::Question => "?".to_string(),
    }
}

/// Build SELECT <cols> FROM <table>
pub fn select_all<E>() -> String
where
    E: fnmap_core::Fetchable,
{
    let cols = E::SELECT_COLUMNS.join(", ");
    let table = E::TABLE;
    format!("SELECT {cols} FROM {table}", cols = cols, table = table)
}

/// Build SELECT <cols> FROM <table> WHERE <predicate>.
/// The predicate is composed by the caller from column references, rendered
/// function calls, and [`param`] placeholders.
pub fn select_where<E>(predicate: &str) -> String
where
    E: fnmap_core::Fetchable,
{
    format!(
        "SELECT {cols} FROM {table} WHERE {predicate}",
        cols = E::SELECT_COLUMNS.join(", "),
        table = E::TABLE,
        predicate = predicate
    )
}

/// Build SELECT <cols> FROM <routine>(<ph1>, ...) for a table-valued routine
/// whose output columns match `E::SELECT_COLUMNS`.
pub fn select_from_function<E>(routine: &str, arg_count: usize) -> String
where
    E: fnmap_core::Fetchable,
{
    let mut phs: Vec<String> = Vec::with_capacity(arg_count);
    for i in 1..=arg_count {
        phs.push(param(i));
    }
    format!(
        "SELECT {cols} FROM {routine}({args})",
        cols = E::SELECT_COLUMNS.join(", "),
        routine = routine,
        args = phs.join(", ")
    )
}

/// Like [`select_from_function`], with a WHERE clause over the routine's
/// output columns. Placeholders inside the predicate must continue the
/// numbering after the routine's own `arg_count` arguments.
pub fn select_from_function_where<E>(routine: &str, arg_count: usize, predicate: &str) -> String
where
    E: fnmap_core::Fetchable,
{
    format!(
        "{select} WHERE {predicate}",
        select = select_from_function::<E>(routine, arg_count),
        predicate = predicate
    )
}

/// Build INSERT INTO <table> (<cols>) VALUES (<placeholders>).
/// Seed rows carry explicit keys, so there is no RETURNING clause.
pub fn insert<E>() -> String
where
    E: fnmap_core::Fetchable + fnmap_core::Insertable,
{
    let cols = E::INSERT_COLUMNS;
    let table = E::TABLE;
    let mut phs: Vec<String> = Vec::with_capacity(cols.len());
    for i in 1..=cols.len() {
        phs.push(param(i));
    }
    format!(
        "INSERT INTO {table} ({cols}) VALUES ({vals})",
        table = table,
        cols = cols.join(", "),
        vals = phs.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;
    impl fnmap_core::Fetchable for Dummy {
        const TABLE: &'static str = "dummy";
        const SELECT_COLUMNS: &'static [&'static str] = &["id", "name"];
    }
    impl fnmap_core::Insertable for Dummy {
        const INSERT_COLUMNS: &'static [&'static str] = &["id", "name"];
        fn insert_values(&self) -> Vec<fnmap_core::ParamValue> {
            vec![
                fnmap_core::ParamValue::I32(1),
                fnmap_core::ParamValue::String("x".into()),
            ]
        }
    }

    #[test]
    fn select_all_lists_columns_and_table() {
        assert_eq!(select_all::<Dummy>(), "SELECT id, name FROM dummy");
    }

    #[test]
    fn select_where_appends_predicate() {
        let sql = select_where::<Dummy>(&format!("id < {}", param(1)));
        assert!(sql.starts_with("SELECT id, name FROM dummy WHERE id < "));
    }

    #[test]
    fn select_from_function_renders_call() {
        let sql = select_from_function::<Dummy>("some_routine", 1);
        match placeholder_style() {
            Placeholder::Dollar => {
                assert_eq!(sql, "SELECT id, name FROM some_routine($1)")
            }
            Placeholder::Question => {
                assert_eq!(sql, "SELECT id, name FROM some_routine(?)")
            }
        }
    }

    #[test]
    fn select_from_function_without_args_has_empty_parens() {
        let sql = select_from_function::<Dummy>("no_args", 0);
        assert!(sql.ends_with("FROM no_args()"));
    }

    #[test]
    fn insert_places_one_placeholder_per_column() {
        let sql = insert::<Dummy>();
        assert!(sql.starts_with("INSERT INTO dummy (id, name) VALUES ("));
        match placeholder_style() {
            Placeholder::Dollar => assert!(sql.contains("$1") && sql.contains("$2")),
            Placeholder::Question => assert_eq!(sql.matches('?').count(), 2),
        }
    }
}
