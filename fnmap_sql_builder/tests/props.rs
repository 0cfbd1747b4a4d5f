use proptest::prelude::*;

#[test]
fn cover_placeholder_variants() {
    // Ensure both variants are referenced so the enum variants are considered constructed
    let _d = fnmap_sql_builder::Placeholder::Dollar;
    let _q = fnmap_sql_builder::Placeholder::Question;
}

struct Probe;
impl fnmap_core::Fetchable for Probe {
    const TABLE: &'static str = "probes";
    const SELECT_COLUMNS: &'static [&'static str] = &["probe_id", "label", "weight"];
}
impl fnmap_core::Insertable for Probe {
    const INSERT_COLUMNS: &'static [&'static str] = &["probe_id", "label", "weight"];
    fn insert_values(&self) -> Vec<fnmap_core::ParamValue> {
        vec![
            fnmap_core::ParamValue::I32(1),
            fnmap_core::ParamValue::String("p".into()),
            fnmap_core::ParamValue::I64(2),
        ]
    }
}

fn count_placeholders(sql: &str, expected: usize) -> bool {
    // Style-agnostic: either every $1..$n appears, or there are n question marks.
    let dollars = (1..=expected).all(|i| sql.contains(&format!("${}", i)));
    let questions = sql.matches('?').count() == expected;
    dollars || questions
}

proptest! {
    // Property: select_from_function renders exactly arg_count placeholders,
    // numbered continuously in the Postgres style.
    #[test]
    fn function_select_placeholder_count(arg_count in 0usize..8) {
        let sql = fnmap_sql_builder::select_from_function::<Probe>("probe_fn", arg_count);
        prop_assert!(sql.starts_with("SELECT probe_id, label, weight FROM probe_fn("));
        if arg_count == 0 {
            prop_assert!(sql.ends_with("probe_fn()"));
        } else {
            prop_assert!(count_placeholders(&sql, arg_count));
        }
    }
}

proptest! {
    // Property: a predicate passed through select_where survives verbatim.
    #[test]
    fn where_predicate_survives(threshold in 0i32..100) {
        let predicate = format!("weight > {}", threshold);
        let sql = fnmap_sql_builder::select_where::<Probe>(&predicate);
        prop_assert!(sql.contains("WHERE "));
        prop_assert!(sql.ends_with(&predicate));
    }
}

#[test]
fn insert_placeholder_count_matches_columns() {
    let sql = fnmap_sql_builder::insert::<Probe>();
    let cols = <Probe as fnmap_core::Insertable>::INSERT_COLUMNS.len();
    assert!(count_placeholders(&sql, cols));
}

#[test]
fn param_is_one_based_and_stable() {
    let p1 = fnmap_sql_builder::param(1);
    let p2 = fnmap_sql_builder::param(2);
    assert!(p1 == "$1" || p1 == "?");
    if p1 == "$1" {
        assert_eq!(p2, "$2");
    }
    assert_eq!(fnmap_sql_builder::param(1), p1);
}
