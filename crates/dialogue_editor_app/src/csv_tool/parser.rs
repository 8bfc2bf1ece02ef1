// SPDX-License-Identifier: MIT OR Apache-2.0
//! Quoted CSV reader.
//!
//! Accepts anything: malformed quoting is closed at the end of input rather
//! than rejected.

/// Split CSV text into rows of cells.
///
/// Whitespace following a row break is dropped, which also swallows blank
/// lines. The head of the first line is kept verbatim. Inside quotes `""` is
/// a literal quote and line breaks are kept. A trailing comma yields a
/// trailing empty cell.
pub fn parse(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line_start = false;
    let mut touched = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }

        if line_start {
            if c.is_whitespace() {
                continue;
            }
            line_start = false;
        }
        touched = true;

        match c {
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
                line_start = true;
                touched = false;
            }
            '"' => in_quotes = true,
            _ => cell.push(c),
        }
    }

    if touched {
        row.push(cell);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(expected: &[&[&str]]) -> Vec<Vec<String>> {
        expected
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert_eq!(parse("a\n  \r\n "), rows(&[&["a"]]));
    }

    #[test]
    fn test_simple_rows() {
        assert_eq!(parse("a,b\nc,d"), rows(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn test_trailing_newline_adds_no_row() {
        assert_eq!(parse("a,b\n"), rows(&[&["a", "b"]]));
        assert_eq!(parse("a,b\r\n\r\n"), rows(&[&["a", "b"]]));
    }

    #[test]
    fn test_crlf_is_one_break() {
        assert_eq!(parse("a\r\nb\rc"), rows(&[&["a"], &["b"], &["c"]]));
    }

    #[test]
    fn test_trailing_comma_yields_empty_cell() {
        assert_eq!(parse("a,b,"), rows(&[&["a", "b", ""]]));
        assert_eq!(parse("a,,\n"), rows(&[&["a", "", ""]]));
    }

    #[test]
    fn test_line_head_whitespace_trimmed() {
        assert_eq!(parse("a\n   b, c\n\n\td"), rows(&[&["a"], &["b", " c"], &["d"]]));
    }

    #[test]
    fn test_first_line_head_kept() {
        assert_eq!(parse("  a,b"), rows(&[&["  a", "b"]]));
        assert_eq!(parse(" x\n y"), rows(&[&[" x"], &["y"]]));
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            parse("\"He said \"\"hi\"\"\",\"x,y\"\n\"line\nbreak\""),
            rows(&[&["He said \"hi\"", "x,y"], &["line\nbreak"]])
        );
    }

    #[test]
    fn test_unterminated_quote_closes_at_end() {
        assert_eq!(parse("a,\"open cell, still\nopen"), rows(&[&["a", "open cell, still\nopen"]]));
    }

    #[test]
    fn test_quoted_empty_cell_at_line_start() {
        assert_eq!(parse("\"\",b"), rows(&[&["", "b"]]));
    }
}
