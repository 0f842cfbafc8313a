pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
pub const SCHEMA_VERSION: &str = "1";

/// Split a script on `;`, ignoring separators inside quotes. Line comments
/// are dropped from every statement.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut prev = '\0';

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote && prev != '\\' => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ';' if !in_single_quote && !in_double_quote => {
                push_statement(&mut statements, &current);
                current.clear();
                prev = ch;
                continue;
            }
            _ => {}
        }

        current.push(ch);
        prev = ch;
    }

    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let stmt = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    let stmt = stmt.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_quotes() {
        let sql = "INSERT INTO \"t\" VALUES ('a;b');\n-- comment only;\nSELECT 1";
        let statements = split_sql_statements(sql);
        assert_eq!(
            statements,
            vec!["INSERT INTO \"t\" VALUES ('a;b')", "SELECT 1"]
        );
    }

    #[test]
    fn test_schema_has_all_tables() {
        let statements = split_sql_statements(SCHEMA_SQL);
        for table in ["users", "progress", "completed_items", "speech_history", "quiz_attempts"] {
            let needle = format!("CREATE TABLE IF NOT EXISTS \"{table}\"");
            assert!(
                statements.iter().any(|s| s.starts_with(&needle)),
                "missing {table}"
            );
        }
        assert!(statements.iter().all(|s| !s.starts_with("--")));
    }
}
