/// Escapes text for embedding in an HTML document.
///
/// Beyond the five HTML metacharacters this also encodes whitespace, `/`, `=`
/// and backticks, so the result is safe in element content and in quoted or
/// unquoted attribute values.
pub fn escape_html(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Escapes text for plain-text contexts such as a mail body or header.
///
/// Same entity encoding as [`escape_html`], except that whitespace is kept
/// as is so line breaks and spacing stay readable.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for piece in text.split_inclusive(char::is_whitespace) {
        let word = piece.trim_end_matches(char::is_whitespace);
        escaped.push_str(&ammonia::clean_text(word));
        escaped.push_str(&piece[word.len()..]);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const METACHARACTERS: [char; 4] = ['<', '>', '"', '\''];

    fn has_bare_ampersand(s: &str) -> bool {
        s.match_indices('&').any(|(i, _)| {
            let rest = &s[i + 1..];
            let end = rest.find(';');
            match end {
                Some(end) => {
                    let entity = &rest[..end];
                    entity.is_empty() || !entity.chars().all(|c| c.is_ascii_alphanumeric() || c == '#')
                }
                None => true,
            }
        })
    }

    #[test]
    fn escapes_the_five_metacharacters() {
        let escaped = escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#);

        for c in METACHARACTERS {
            assert!(!escaped.contains(c), "found {c:?} in {escaped}");
        }
        assert!(!has_bare_ampersand(&escaped));
        assert!(escaped.contains("&lt;"));
        assert!(escaped.contains("&amp;"));
    }

    #[test]
    fn escaping_twice_stays_free_of_markup() {
        let inputs = [
            "<img src=x onerror=alert(1)>",
            "\"quoted\" & 'single'",
            "&lt; already escaped &gt;",
            "plain text",
            "",
        ];

        for input in inputs {
            let once = escape_html(input);
            let twice = escape_html(&once);
            for out in [&once, &twice] {
                for c in METACHARACTERS {
                    assert!(!out.contains(c), "found {c:?} in {out}");
                }
                assert!(!has_bare_ampersand(out), "bare & in {out}");
            }
        }
    }

    #[test]
    fn leaves_ordinary_characters_alone() {
        assert_eq!(escape_html("Grüße"), "Grüße");
    }

    #[test]
    fn text_escaping_keeps_whitespace_readable() {
        let escaped = escape_text("line <one>\n\tTom & 'Jerry'");

        assert!(escaped.starts_with("line &lt;one&gt;\n\tTom &amp; "));
        assert!(!escaped.contains('\''));
        assert!(!escaped.contains("&#32;"));
    }

    #[test]
    fn text_escaping_leaves_no_metacharacters() {
        for input in ["<b>x</b> & \"q\" 'y'", "a&b", "  leading", "trailing\r\n", ""] {
            let once = escape_text(input);
            let twice = escape_text(&once);
            for out in [&once, &twice] {
                for c in METACHARACTERS {
                    assert!(!out.contains(c), "found {c:?} in {out}");
                }
                assert!(!has_bare_ampersand(out), "bare & in {out}");
            }
        }
    }
}
