//! SQL text rendering for the dump file
//!
//! Values are escaped the way MySQL's `mysql_real_escape_string` does, so
//! the dump can be replayed with the stock `mysql` client.

use crate::output::ResultRow;

/// Column list shared by the dump file and the direct-write table
pub const COLUMNS: [&str; 6] = [
    "title",
    "link",
    "num_of_players",
    "rating",
    "cover_image",
    "published_at_unix",
];

/// Escapes a string for use inside a single- or double-quoted SQL literal
///
/// `\`, NUL, `\n`, `\r`, `'` and `"` gain a leading backslash; the Ctrl-Z
/// byte (0x1A) becomes `\Z`. Everything else is copied through, so the
/// output is never shorter than the input.
pub fn mysql_real_escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\0' | '\n' | '\r' | '\'' | '"' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\u{1a}' => escaped.push_str("\\Z"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `INSERT INTO ... VALUES ` prefix for a table, with a trailing space
pub fn insert_header(table: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO `{}` ({}) VALUES ", table, columns)
}

/// Single-row INSERT with one positional placeholder per column
pub fn prepared_insert(table: &str) -> String {
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");
    format!("{}({})", insert_header(table), placeholders)
}

impl ResultRow {
    /// Renders the row as a parenthesised SQL value tuple
    ///
    /// The rating is emitted as a bare integer; every other field is an
    /// escaped single-quoted string.
    pub fn to_sql_values(&self) -> String {
        format!(
            "('{}', '{}', '{}', {}, '{}', '{}')",
            mysql_real_escape_string(&self.title),
            mysql_real_escape_string(&self.link),
            mysql_real_escape_string(&self.players),
            self.rating,
            mysql_real_escape_string(&self.cover_image),
            mysql_real_escape_string(&self.published_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reverses MySQL backslash escapes
    fn unescape(value: &str) -> String {
        let mut out = String::new();
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('0') => out.push('\0'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('Z') => out.push('\u{1a}'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        }
        out
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(mysql_real_escape_string("\\"), "\\\\");
        assert_eq!(mysql_real_escape_string("\0"), "\\\0");
        assert_eq!(mysql_real_escape_string("\n"), "\\\n");
        assert_eq!(mysql_real_escape_string("\r"), "\\\r");
        assert_eq!(mysql_real_escape_string("'"), "\\'");
        assert_eq!(mysql_real_escape_string("\""), "\\\"");
        assert_eq!(mysql_real_escape_string("\u{1a}"), "\\Z");
    }

    #[test]
    fn test_escape_leaves_other_text_alone() {
        assert_eq!(mysql_real_escape_string(""), "");
        assert_eq!(mysql_real_escape_string("Escape Room 2"), "Escape Room 2");
        assert_eq!(mysql_real_escape_string("Ünïcødé 脱出"), "Ünïcødé 脱出");
        assert_eq!(mysql_real_escape_string("tab\tstays"), "tab\tstays");
    }

    #[test]
    fn test_escape_never_shortens() {
        for input in ["", "plain", "it's", "a\\b\nc\rd\"e\0f\u{1a}", "ß"] {
            assert!(mysql_real_escape_string(input).len() >= input.len());
        }
    }

    #[test]
    fn test_escape_single_quote_round_trip() {
        let original = "Jack's \"Lab\"\n\\final\u{1a}";
        let escaped = mysql_real_escape_string(original);
        assert_eq!(escaped, "Jack\\'s \\\"Lab\\\"\\\n\\\\final\\Z");
        assert_eq!(unescape(&escaped), original);
    }

    #[test]
    fn test_insert_header() {
        assert_eq!(
            insert_header("escape_simulator_room"),
            "INSERT INTO `escape_simulator_room` (`title`, `link`, `num_of_players`, \
             `rating`, `cover_image`, `published_at_unix`) VALUES "
        );
    }

    #[test]
    fn test_prepared_insert_has_six_placeholders() {
        let sql = prepared_insert("rooms");
        assert!(sql.ends_with("VALUES (?, ?, ?, ?, ?, ?)"));
        assert_eq!(sql.matches('?').count(), 6);
    }

    #[test]
    fn test_row_to_sql_values() {
        let row = ResultRow {
            title: "Bob's Bunker".to_string(),
            link: "https://example.com/item?id=1".to_string(),
            players: "1-4".to_string(),
            rating: 4,
            cover_image: "https://img.example.com/c.jpg".to_string(),
            published_id: "2741234567".to_string(),
        };
        assert_eq!(
            row.to_sql_values(),
            "('Bob\\'s Bunker', 'https://example.com/item?id=1', '1-4', 4, \
             'https://img.example.com/c.jpg', '2741234567')"
        );
    }
}
