/// A command invocation split into its name and argument tokens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub items: Vec<&'a str>,
    /// Everything after the name, still quoted and escaped
    pub text: &'a str,
}

/// Splits a line into an [`Invocation`].
///
/// Tokens are runs of anything but whitespace, `\` and `"`, or double-quoted
/// strings which may contain `\"` and `\\`. Quoted tokens are kept as-is,
/// unquoting happens in [`Arg::string`](crate::Arg::string).
///
/// Returns `None` if there are no tokens or if the name is quoted.
pub fn lex(input: &str) -> Option<Invocation<'_>> {
    let mut tokens = Tokens { input, pos: 0 };

    let (name, end) = tokens.next()?;
    if name.starts_with('"') && name.ends_with('"') {
        return None;
    }

    let items = tokens.map(|(item, _)| item).collect();
    let text = input[end..].trim_start();
    Some(Invocation { name, items, text })
}

struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn is_bare(ch: char) -> bool {
        !matches!(ch, '\\' | '"') && !ch.is_whitespace()
    }

    // the length of a quoted string starting at the head of `input`
    fn quoted(input: &str) -> Option<usize> {
        let mut iter = input.char_indices().skip(1);
        while let Some((pos, ch)) = iter.next() {
            match ch {
                '"' => return Some(pos + 1),
                '\\' => match iter.next() {
                    Some((_, '"')) | Some((_, '\\')) => {}
                    _ => return None,
                },
                _ => {}
            }
        }
        None
    }
}

impl<'a> Iterator for Tokens<'a> {
    // the token and the offset just past it
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.input[self.pos..].chars().next() {
            let rest = &self.input[self.pos..];

            let len = if Self::is_bare(ch) {
                rest.find(|c| !Self::is_bare(c)).unwrap_or(rest.len())
            } else if ch == '"' {
                match Self::quoted(rest) {
                    Some(len) => len,
                    None => {
                        self.pos += ch.len_utf8();
                        continue;
                    }
                }
            } else {
                self.pos += ch.len_utf8();
                continue;
            };

            let start = self.pos;
            self.pos += len;
            return Some((&self.input[start..self.pos], self.pos));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words() {
        let inv = lex("hello world  this\tis a    test").unwrap();
        assert_eq!(inv.name, "hello");
        assert_eq!(inv.items, vec!["world", "this", "is", "a", "test"]);
        assert_eq!(inv.text, "world  this\tis a    test");

        let input = "a b c d e";
        let inv = lex(input).unwrap();
        let expected = input.split_whitespace().skip(1).collect::<Vec<_>>();
        assert_eq!(inv.items, expected);
    }

    #[test]
    fn quoted() {
        let inv = lex(r#"cmd "a b" c"#).unwrap();
        assert_eq!(inv.name, "cmd");
        assert_eq!(inv.items, vec![r#""a b""#, "c"]);
        assert_eq!(inv.text, r#""a b" c"#);

        let inv = lex(r#"say "she said \"hi\"" "back\\slash""#).unwrap();
        assert_eq!(inv.items, vec![r#""she said \"hi\"""#, r#""back\\slash""#]);
    }

    #[test]
    fn stray_characters_are_skipped() {
        let inv = lex(r#"cmd a\b "unterminated"#).unwrap();
        assert_eq!(inv.items, vec!["a", "b", "unterminated"]);

        let inv = lex(r#"cmd "bad \escape" x"#).unwrap();
        assert_eq!(inv.items, vec!["bad", "escape", "x"]);
    }

    #[test]
    fn name_only() {
        let inv = lex("ping").unwrap();
        assert_eq!(inv.name, "ping");
        assert!(inv.items.is_empty());
        assert_eq!(inv.text, "");

        let inv = lex("  ping   ").unwrap();
        assert_eq!(inv.name, "ping");
        assert_eq!(inv.text, "");
    }

    #[test]
    fn leading_whitespace() {
        let inv = lex("   hi there").unwrap();
        assert_eq!(inv.name, "hi");
        assert_eq!(inv.text, "there");
    }

    #[test]
    fn rejected() {
        for input in &["", "   ", "\t\n", r#""quoted" rest"#, r#""quoted""#, "\\"] {
            assert!(lex(input).is_none(), "{:?}", input);
        }
    }

    #[test]
    fn unicode() {
        let inv = lex("héllo wörld \"ünï cödé\"").unwrap();
        assert_eq!(inv.name, "héllo");
        assert_eq!(inv.items, vec!["wörld", "\"ünï cödé\""]);
    }
}
