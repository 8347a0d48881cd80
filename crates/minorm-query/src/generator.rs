//! Per-kind SQL fragment generators.
//!
//! Every generator emits exactly one `?` per bind value it returns, in the
//! order the values are returned.

use minorm_core::Value;

use crate::clause::{ClauseArgs, ClauseKind};

/// A clause generator: arguments in, SQL fragment and bind values out.
pub type Generator = fn(ClauseArgs) -> (String, Vec<Value>);

/// The generator registered for `kind`.
///
/// The returned generator panics when handed the argument shape of another
/// kind: callers inside this workspace are the only users, so a mismatch is a
/// programming error rather than a runtime condition.
pub fn generator(kind: ClauseKind) -> Generator {
    match kind {
        ClauseKind::Insert => insert_clause,
        ClauseKind::Values => values_clause,
        ClauseKind::Select => select_clause,
        ClauseKind::Limit => limit_clause,
        ClauseKind::Where => where_clause,
        ClauseKind::OrderBy => order_by_clause,
        ClauseKind::Update => update_clause,
        ClauseKind::Delete => delete_clause,
        ClauseKind::Count => count_clause,
    }
}

fn malformed(expected: ClauseKind, args: &ClauseArgs) -> ! {
    panic!(
        "malformed clause arguments: {:?} generator received {:?} arguments",
        expected,
        args.kind()
    )
}

fn bind_vars(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn insert_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let (table, fields) = match args {
        ClauseArgs::Insert { table, fields } => (table, fields),
        other => malformed(ClauseKind::Insert, &other),
    };
    (
        format!("INSERT INTO {} ({})", table, fields.join(", ")),
        Vec::new(),
    )
}

fn values_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let rows = match args {
        ClauseArgs::Values(rows) => rows,
        other => malformed(ClauseKind::Values, &other),
    };
    let width = rows
        .first()
        .map(Vec::len)
        .expect("VALUES requires at least one row");
    assert!(
        rows.iter().all(|row| row.len() == width),
        "VALUES rows must all have {} values",
        width
    );

    let group = format!("({})", bind_vars(width));
    let sql = format!("VALUES {}", vec![group.as_str(); rows.len()].join(", "));
    (sql, rows.into_iter().flatten().collect())
}

fn select_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let (table, fields) = match args {
        ClauseArgs::Select { table, fields } => (table, fields),
        other => malformed(ClauseKind::Select, &other),
    };
    (
        format!("SELECT {} FROM {}", fields.join(", "), table),
        Vec::new(),
    )
}

fn limit_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let n = match args {
        ClauseArgs::Limit(n) => n,
        other => malformed(ClauseKind::Limit, &other),
    };
    ("LIMIT ?".to_string(), vec![Value::BigInt(n)])
}

fn where_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let (expr, args) = match args {
        ClauseArgs::Where { expr, args } => (expr, args),
        other => malformed(ClauseKind::Where, &other),
    };
    (format!("WHERE {}", expr), args)
}

fn order_by_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let expr = match args {
        ClauseArgs::OrderBy(expr) => expr,
        other => malformed(ClauseKind::OrderBy, &other),
    };
    (format!("ORDER BY {}", expr), Vec::new())
}

fn update_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let (table, assignments) = match args {
        ClauseArgs::Update { table, assignments } => (table, assignments),
        other => malformed(ClauseKind::Update, &other),
    };
    let mut sets = Vec::with_capacity(assignments.len());
    let mut vars = Vec::with_capacity(assignments.len());
    for (column, value) in assignments {
        sets.push(format!("{} = ?", column));
        vars.push(value);
    }
    (format!("UPDATE {} SET {}", table, sets.join(", ")), vars)
}

fn delete_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let table = match args {
        ClauseArgs::Delete { table } => table,
        other => malformed(ClauseKind::Delete, &other),
    };
    (format!("DELETE FROM {}", table), Vec::new())
}

fn count_clause(args: ClauseArgs) -> (String, Vec<Value>) {
    let table = match args {
        ClauseArgs::Count { table } => table,
        other => malformed(ClauseKind::Count, &other),
    };
    select_clause(ClauseArgs::select(table, ["count(*)"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_single_row() {
        let (sql, vars) = generator(ClauseKind::Values)(ClauseArgs::Values(vec![vec![
            Value::from("Tom"),
            Value::Int(18),
            Value::Null,
        ]]));
        assert_eq!(sql, "VALUES (?, ?, ?)");
        assert_eq!(vars.len(), 3);
    }

    #[test]
    #[should_panic(expected = "at least one row")]
    fn test_values_without_rows_panics() {
        generator(ClauseKind::Values)(ClauseArgs::Values(Vec::new()));
    }

    #[test]
    #[should_panic(expected = "must all have")]
    fn test_ragged_values_panic() {
        generator(ClauseKind::Values)(ClauseArgs::Values(vec![
            vec![Value::Int(1), Value::Int(2)],
            vec![Value::Int(3)],
        ]));
    }

    #[test]
    fn test_where_passes_args_verbatim() {
        let (sql, vars) = generator(ClauseKind::Where)(ClauseArgs::filter(
            "age BETWEEN ? AND ?",
            [Value::Int(10), Value::Int(20)],
        ));
        assert_eq!(sql, "WHERE age BETWEEN ? AND ?");
        assert_eq!(vars, vec![Value::Int(10), Value::Int(20)]);
    }

    #[test]
    #[should_panic(expected = "Count generator received Delete")]
    fn test_count_rejects_other_shapes() {
        generator(ClauseKind::Count)(ClauseArgs::Delete {
            table: "users".into(),
        });
    }
}
