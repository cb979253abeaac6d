use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    combinator::{map, rest},
    sequence::preceded,
    IResult,
};

/// What a statement asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `USE <keyspace>`: handled client-side, never sent to the cluster.
    /// The name is empty when the statement did not carry one.
    UseKeyspace(String),
    /// `SELECT ...`: executed as a query, rows expected back.
    Query,
    /// Everything else (DML, DDL, ...): executed for its side effect.
    Command,
}

fn keyspace_name(remainder: &str) -> String {
    remainder.trim().trim_matches(';').trim().to_lowercase()
}

fn use_keyspace(input: &str) -> IResult<&str, StatementKind> {
    map(preceded(tag_no_case("use"), rest), |remainder: &str| {
        StatementKind::UseKeyspace(keyspace_name(remainder))
    })(input)
}

fn query(input: &str) -> IResult<&str, StatementKind> {
    map(tag_no_case("select"), |_| StatementKind::Query)(input)
}

/// Classifies a statement by its leading keyword, case-insensitively.
pub fn classify(statement: &str) -> StatementKind {
    match alt((use_keyspace, query))(statement.trim()) {
        Ok((_, kind)) => kind,
        Err(_) => StatementKind::Command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_use() {
        let analytics = StatementKind::UseKeyspace("analytics".to_string());
        assert_eq!(classify("USE analytics;"), analytics);
        assert_eq!(classify("  use Analytics ;"), analytics);
        assert_eq!(classify("Use\n\tks"), StatementKind::UseKeyspace("ks".to_string()));
    }

    #[test]
    fn test_classify_use_without_name() {
        assert_eq!(classify("USE;"), StatementKind::UseKeyspace(String::new()));
        assert_eq!(classify("use  ; "), StatementKind::UseKeyspace(String::new()));
    }

    #[test]
    fn test_classify_select() {
        assert_eq!(classify("SELECT * FROM t;"), StatementKind::Query);
        assert_eq!(classify("\n select now() from system.local;"), StatementKind::Query);
    }

    #[test]
    fn test_classify_everything_else_is_a_command() {
        for stmt in [
            "INSERT INTO t (id) VALUES (1);",
            "CREATE TABLE t (id int PRIMARY KEY);",
            "UPDATE t SET a = 1 WHERE id = 1;",
            "DROP KEYSPACE ks;",
            "BAD STATEMENT;",
            "",
        ] {
            assert_eq!(classify(stmt), StatementKind::Command, "statement: {stmt:?}");
        }
    }
}
