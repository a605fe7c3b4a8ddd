use std::collections::HashSet;

use crate::Error;

/// A single piece of a usage pattern
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// `a|b|c`
    Literal(Box<[Box<str>]>),
    /// `-name`
    Flag(Box<str>),
    /// `<name>`, `<name...>`, `[name]` or `[name...]`
    Param {
        name: Box<str>,
        optional: bool,
        spread: bool,
    },
    /// `...`
    Ellipsis,
}

/// A compiled usage pattern, such as `<member> [reason...]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Usage {
    pattern: Box<str>,
    tokens: Box<[Token]>,
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl std::str::FromStr for Usage {
    type Err = Error;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl Usage {
    const ELLIPSIS: &'static str = "...";

    pub fn parse(pattern: &str) -> Result<Self, Error> {
        let mut tokens = vec![];
        let mut seen = HashSet::new();

        let mut pos = 0;
        while pos < pattern.len() {
            let rest = &pattern[pos..];

            let ch = match rest.chars().next() {
                Some(ch) if ch.is_whitespace() => {
                    pos += ch.len_utf8();
                    continue;
                }
                Some(ch) => ch,
                None => break,
            };

            let (token, len) = match Self::param(rest)
                .or_else(|| Self::word(rest))
                .or_else(|| Self::ellipsis(rest))
            {
                Some(ok) => ok,
                None => {
                    log::warn!("invalid character '{}' in usage '{}'", ch, pattern);
                    return Err(Error::InvalidCharacters {
                        pattern: pattern.to_string(),
                        position: pos,
                    });
                }
            };

            match &token {
                Token::Flag(name) | Token::Param { name, .. } => {
                    if !seen.insert(name.clone()) {
                        return Err(Error::DuplicateKey(name.to_string()));
                    }
                }
                _ => {}
            }

            tokens.push(token);
            pos += len;
        }

        Ok(Self {
            pattern: pattern.into(),
            tokens: tokens.into_boxed_slice(),
        })
    }

    pub fn pattern(&self) -> &str {
        &*self.pattern
    }

    pub fn tokens(&self) -> &[Token] {
        &*self.tokens
    }

    /// Names of every param and flag, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Flag(name) | Token::Param { name, .. } => Some(&**name),
            _ => None,
        })
    }

    fn is_word(ch: char) -> bool {
        matches!(ch, 'a'..='z' | '0'..='9' | '-')
    }

    // the length of the leading run of word characters
    fn word_len(input: &str) -> usize {
        input.find(|c| !Self::is_word(c)).unwrap_or(input.len())
    }

    fn param(input: &str) -> Option<(Token, usize)> {
        let (optional, close) = match input.chars().next()? {
            '<' => (false, '>'),
            '[' => (true, ']'),
            _ => return None,
        };

        let name_len = Self::word_len(&input[1..]);
        if name_len == 0 {
            return None;
        }
        let name = &input[1..1 + name_len];

        let mut tail = &input[1 + name_len..];
        let spread = tail.starts_with(Self::ELLIPSIS);
        if spread {
            tail = &tail[Self::ELLIPSIS.len()..];
        }

        if !tail.starts_with(close) {
            return None;
        }

        let len = input.len() - tail.len() + close.len_utf8();
        let token = Token::Param {
            name: name.into(),
            optional,
            spread,
        };
        Some((token, len))
    }

    fn word(input: &str) -> Option<(Token, usize)> {
        let flag = input.starts_with('-');
        let start = if flag { 1 } else { 0 };

        let mut len = Self::word_len(&input[start..]);
        if len == 0 {
            return None;
        }
        len += start;

        // keep taking `|word` alternatives
        while input[len..].starts_with('|') {
            match Self::word_len(&input[len + 1..]) {
                0 => break,
                next => len += 1 + next,
            }
        }

        let token = if flag {
            Token::Flag(input[1..len].into())
        } else {
            let options = input[..len].split('|').map(Into::into).collect();
            Token::Literal(options)
        };
        Some((token, len))
    }

    fn ellipsis(input: &str) -> Option<(Token, usize)> {
        if input.starts_with(Self::ELLIPSIS) {
            Some((Token::Ellipsis, Self::ELLIPSIS.len()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, optional: bool, spread: bool) -> Token {
        Token::Param {
            name: name.into(),
            optional,
            spread,
        }
    }

    fn literal(options: &[&str]) -> Token {
        Token::Literal(options.iter().map(|&s| s.into()).collect())
    }

    #[test]
    fn parse_tokens() {
        let tests = vec![
            ("", vec![]),
            ("<a>", vec![param("a", false, false)]),
            ("<a...>", vec![param("a", false, true)]),
            ("[a]", vec![param("a", true, false)]),
            ("[a...]", vec![param("a", true, true)]),
            ("-force", vec![Token::Flag("force".into())]),
            ("add|remove|list", vec![literal(&["add", "remove", "list"])]),
            ("list", vec![literal(&["list"])]),
            ("...", vec![Token::Ellipsis]),
            (
                "set <key-name> [value...]",
                vec![
                    literal(&["set"]),
                    param("key-name", false, false),
                    param("value", true, true),
                ],
            ),
            (
                "  <user>   -silent   ...  ",
                vec![
                    param("user", false, false),
                    Token::Flag("silent".into()),
                    Token::Ellipsis,
                ],
            ),
        ];

        for (input, expected) in tests {
            let usage = Usage::parse(input).unwrap();
            assert_eq!(usage.tokens(), &*expected, "{}", input);
            assert_eq!(usage.pattern(), input);
        }
    }

    #[test]
    fn adjacent_tokens() {
        let usage = Usage::parse("<a><b>...").unwrap();
        assert_eq!(
            usage.tokens(),
            &[
                param("a", false, false),
                param("b", false, false),
                Token::Ellipsis
            ]
        );

        // a dangling pipe ends the alternatives
        let usage = "a|b|".parse::<Usage>();
        assert!(usage.is_err());
    }

    #[test]
    fn keys() {
        let usage = Usage::parse("add|remove <name> -force [rest...]").unwrap();
        assert_eq!(usage.keys().collect::<Vec<_>>(), vec!["name", "force", "rest"]);
    }

    #[test]
    fn invalid() {
        let tests = vec!["<>", "<a", "[a>", "<a?>", "<Name>", "a b!", "<a..>", "{a}", "|a"];
        for test in tests {
            match Usage::parse(test) {
                Err(Error::InvalidCharacters { .. }) => {}
                res => panic!("{}: {:?}", test, res),
            }
        }

        let tests = vec!["<a> <a>", "<a> [a...]", "-a <a>", "-force -force"];
        for test in tests {
            match Usage::parse(test) {
                Err(Error::DuplicateKey(key)) => assert!(test.contains(&*key)),
                res => panic!("{}: {:?}", test, res),
            }
        }
    }
}
