use crate::{
    directory::Directories,
    usage::{Token, Usage},
    Arg, Error,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Unmatched,
    Invalid,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmatched => f.write_str("unmatched"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subkind {
    /// a literal didn't match any of its options
    Option,
    /// a required parameter had no value
    Parameter,
    /// text was left over after the whole usage was bound
    Arguments,
    /// raised by a handler through [`Arg::fail`]
    Other(Box<str>),
}

impl Subkind {
    pub fn other(subkind: impl Into<Box<str>>) -> Self {
        Self::Other(subkind.into())
    }
}

impl std::fmt::Display for Subkind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Option => f.write_str("option"),
            Self::Parameter => f.write_str("parameter"),
            Self::Arguments => f.write_str("arguments"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// Why a usage did not match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub usage: Box<str>,
    /// The parameter involved, if any
    pub name: Box<str>,
    /// The offending text, if any
    pub text: Box<str>,
    pub kind: Kind,
    pub subkind: Subkind,
    pub item: Option<Box<str>>,
}

impl Failure {
    fn new(usage: &str, name: &str, text: &str, kind: Kind, subkind: Subkind) -> Self {
        Self {
            usage: usage.into(),
            name: name.into(),
            text: text.into(),
            kind,
            subkind,
            item: None,
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} for '{}'", self.kind, self.subkind, self.usage)?;
        if !self.name.is_empty() {
            write!(f, " at '{}'", self.name)?;
        }
        if !self.text.is_empty() {
            write!(f, " with '{}'", self.text)?;
        }
        if let Some(item) = &self.item {
            write!(f, " ({})", item)?;
        }
        Ok(())
    }
}

/// Usages in declaration order, each with its handler
#[derive(Clone, Debug)]
pub struct Usages<H> {
    entries: Vec<(Usage, H)>,
}

impl<H> Default for Usages<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> Usages<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a usage. Later declarations are tried first.
    pub fn add(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        let usage = Usage::parse(pattern)?;
        self.entries.push((usage, handler));
        Ok(self)
    }

    pub fn with(mut self, pattern: &str, handler: H) -> Result<Self, Error> {
        self.add(pattern, handler)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usages in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Usage, &H)> + DoubleEndedIterator {
        self.entries.iter().map(|(usage, handler)| (usage, handler))
    }
}

/// The arguments bound by a matching usage
#[derive(Clone, Debug)]
pub struct Matched<'a> {
    usage: &'a str,
    args: Vec<Arg<'a>>,
    rest: Vec<&'a str>,
    remaining: &'a str,
}

impl<'a> Matched<'a> {
    pub const fn usage(&self) -> &'a str {
        self.usage
    }

    /// Bound arguments, in the order they appear in the usage
    pub fn args(&self) -> &[Arg<'a>] {
        &self.args
    }

    pub fn get(&self, name: &str) -> Option<&Arg<'a>> {
        self.args.iter().find(|arg| arg.name() == name)
    }

    /// Tokens that were not consumed
    pub fn rest(&self) -> &[&'a str] {
        &self.rest
    }

    /// Text that was not consumed
    pub const fn remaining(&self) -> &'a str {
        self.remaining
    }
}

impl<'a> std::ops::Index<usize> for Matched<'a> {
    type Output = Arg<'a>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.args[index]
    }
}

impl<'a> std::ops::Index<&str> for Matched<'a> {
    type Output = Arg<'a>;
    fn index(&self, index: &str) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("no argument named '{}' in '{}'", index, self.usage))
    }
}

#[derive(Debug)]
pub enum Outcome<'a, H> {
    Success { handler: &'a H, matched: Matched<'a> },
    /// The failure of the last usage tried
    Failure(Failure),
    /// There were no usages to try
    Empty,
}

// what's left of the input for a single usage attempt
#[derive(Copy, Clone)]
struct Cursor<'i, 'a> {
    items: &'i [&'a str],
    text: &'a str,
}

impl<'i, 'a> Cursor<'i, 'a> {
    fn peek(&self) -> Option<&'a str> {
        self.items.first().copied()
    }

    fn advance(&mut self) {
        if let Some((head, tail)) = self.items.split_first() {
            self.text = Self::skip(self.text, head.len());
            self.items = tail;
        }
    }

    fn clear(&mut self) {
        self.items = &[];
        self.text = "";
    }

    fn skip(text: &str, len: usize) -> &str {
        let mut pos = len.min(text.len());
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        text[pos..].trim_start()
    }
}

/// Matches input against [`Usages`].
///
/// The directories are handed to every bound [`Arg`] for its lookups.
#[derive(Default, Clone, Copy, Debug)]
pub struct Parser<'d> {
    directories: Directories<'d>,
}

impl<'d> Parser<'d> {
    pub const fn new(directories: Directories<'d>) -> Self {
        Self { directories }
    }

    pub const fn directories(&self) -> &Directories<'d> {
        &self.directories
    }

    /// Tries each usage, last declared first, returning the first full match.
    ///
    /// If nothing matches, only the failure of the last usage tried (the
    /// first declared) is kept.
    pub fn find<'a, H>(
        &'a self,
        items: &[&'a str],
        text: &'a str,
        usages: &'a Usages<H>,
    ) -> Outcome<'a, H> {
        let mut failure = None;

        for (usage, handler) in usages.iter().rev() {
            match self.attempt(usage, Cursor { items, text }) {
                Ok(matched) => {
                    log::trace!("matched usage '{}'", usage);
                    return Outcome::Success { handler, matched };
                }
                Err(err) => {
                    log::trace!("usage did not match: {}", err);
                    failure.replace(err);
                }
            }
        }

        match failure {
            Some(failure) => Outcome::Failure(failure),
            None => Outcome::Empty,
        }
    }

    /// Calls `on_success` with the matched handler, or `on_error` with the
    /// last failure. Neither is called if there were no usages.
    pub fn parse<'a, H, R, S, E>(
        &'a self,
        items: &[&'a str],
        text: &'a str,
        usages: &'a Usages<H>,
        on_success: S,
        on_error: E,
    ) -> Option<R>
    where
        S: FnOnce(&'a H, Matched<'a>) -> R,
        E: FnOnce(Failure),
    {
        match self.find(items, text, usages) {
            Outcome::Success { handler, matched } => Some(on_success(handler, matched)),
            Outcome::Failure(failure) => {
                on_error(failure);
                None
            }
            Outcome::Empty => None,
        }
    }

    /// Calls the matched handler with its arguments. Failures are only logged.
    pub fn dispatch<'a, H, R>(
        &'a self,
        items: &[&'a str],
        text: &'a str,
        usages: &'a Usages<H>,
    ) -> Option<R>
    where
        H: Fn(Matched<'a>) -> R,
    {
        self.parse(
            items,
            text,
            usages,
            |handler, matched| handler(matched),
            |failure| log::debug!("no usage matched: {}", failure),
        )
    }

    fn attempt<'a>(
        &'a self,
        usage: &'a Usage,
        mut cursor: Cursor<'_, 'a>,
    ) -> Result<Matched<'a>, Failure> {
        let pattern = usage.pattern();
        let bind = |name: &'a str, text: &'a str| Arg::new(pattern, name, text, self.directories);
        let mut args = vec![];

        for token in usage.tokens() {
            match token {
                Token::Ellipsis => cursor.clear(),

                // always consumes the next item, even when it isn't the flag
                Token::Flag(name) => {
                    let set = cursor.peek().map_or(false, |item| Self::is_flag(item, name));
                    args.push(bind(&**name, if set { "true" } else { "false" }));
                    cursor.advance();
                }

                Token::Literal(options) => {
                    let item = cursor.peek().map(str::to_lowercase);
                    let item = item.as_deref().unwrap_or_default();

                    let option = match options.iter().find(|option| ***option == *item) {
                        Some(option) => option,
                        None => {
                            let err = Failure::new(pattern, "", item, Kind::Unmatched, Subkind::Option);
                            return Err(err);
                        }
                    };

                    args.push(bind(&**option, &**option));
                    cursor.advance();
                }

                Token::Param {
                    name,
                    optional,
                    spread,
                } => {
                    let item = if *spread {
                        cursor.text
                    } else {
                        cursor.peek().unwrap_or_default()
                    };

                    if item.is_empty() && !optional {
                        let err = Failure::new(pattern, name, "", Kind::Unmatched, Subkind::Parameter);
                        return Err(err);
                    }

                    args.push(bind(&**name, item));
                    if *spread {
                        cursor.clear()
                    } else {
                        cursor.advance()
                    }
                }
            }
        }

        if !cursor.text.is_empty() {
            let err = Failure::new(pattern, "", "", Kind::Invalid, Subkind::Arguments);
            return Err(err);
        }

        Ok(Matched {
            usage: pattern,
            args,
            rest: cursor.items.to_vec(),
            remaining: cursor.text,
        })
    }

    fn is_flag(item: &str, name: &str) -> bool {
        item.strip_prefix('-')
            .map_or(false, |item| item.to_lowercase() == name)
    }
}
