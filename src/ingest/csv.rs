//! CSV tokenizer.
//!
//! Turns raw text into a grid of string cells. Quoted fields may contain
//! commas, newlines and doubled quotes. Malformed quoting never fails: an
//! unterminated quoted field simply runs to the end of the input.

/// Rows of cells, exactly as they appeared in the file.
pub type Grid = Vec<Vec<String>>;

/// Tokenize comma-separated text.
///
/// CR, LF and CRLF outside quotes all end a row. A trailing newline does not
/// produce an extra empty row; empty input yields an empty grid.
pub fn tokenize(text: &str) -> Grid {
    let mut grid = Grid::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                grid.push(std::mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() || in_quotes {
        row.push(cell);
        grid.push(row);
    }

    grid
}

/// Whether every cell in a row is blank.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize("a,b,c\n1,2,3"),
            grid(&[&["a", "b", "c"], &["1", "2", "3"]])
        );
    }

    #[test]
    fn test_tokenize_round_trip() {
        let original = grid(&[
            &["Season", "Opponent", "Date"],
            &["24-25", "Trento", "06/10/2024"],
            &["24-25", "Olimpia Milano", "13/10/2024"],
        ]);
        let text = original
            .iter()
            .map(|r| r.join(","))
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(tokenize(&text), original);
    }

    #[test]
    fn test_tokenize_escaped_quote() {
        assert_eq!(tokenize("\"a\"\"b\""), grid(&[&["a\"b"]]));
    }

    #[test]
    fn test_tokenize_quoted_comma_and_newline() {
        assert_eq!(
            tokenize("\"Curva, Nord\",\"line1\nline2\",x\n"),
            grid(&[&["Curva, Nord", "line1\nline2", "x"]])
        );
    }

    #[test]
    fn test_tokenize_line_endings() {
        let expected = grid(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        assert_eq!(tokenize("a,b\r\nc,d\re,f"), expected);
        assert_eq!(tokenize("a,b\nc,d\ne,f\r\n"), expected);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_empty_cells() {
        assert_eq!(tokenize("a,,c\n,,"), grid(&[&["a", "", "c"], &["", "", ""]]));
    }

    #[test]
    fn test_tokenize_blank_line_kept() {
        assert_eq!(tokenize("a\n\nb"), grid(&[&["a"], &[""], &["b"]]));
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        assert_eq!(
            tokenize("a,\"never closed,\nstill going"),
            grid(&[&["a", "never closed,\nstill going"]])
        );
    }

    #[test]
    fn test_tokenize_quote_mid_cell() {
        // Quotes toggle quoting even mid-cell; the quote characters are dropped
        assert_eq!(tokenize("ab\"c,d\"e,f"), grid(&[&["abc,de", "f"]]));
    }

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(&["".to_string(), "  ".to_string()]));
        assert!(!is_blank_row(&["".to_string(), "x".to_string()]));
        assert!(is_blank_row(&[]));
    }
}
