use std::convert::TryFrom;

use serde::Deserialize;

use crate::Error;

/// A 17 to 19 digit numeric identifier
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Id(pub u64);

impl Id {
    const MIN_LEN: usize = 17;
    const MAX_LEN: usize = 19;

    /// Parses `input` only if the whole thing is an id
    pub fn parse(input: &str) -> Option<Self> {
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&input.len()) {
            return None;
        }
        if !input.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        input.parse().ok().map(Self)
    }

    /// Whether an id-shaped run of digits appears anywhere in `input`
    pub fn appears_in(input: &str) -> bool {
        input
            .split(|c: char| !c.is_ascii_digit())
            .any(|run| run.len() >= Self::MIN_LEN)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Id {
    type Err = Error;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input).ok_or_else(|| Error::InvalidId(input.to_string()))
    }
}

impl TryFrom<String> for Id {
    type Error = Error;
    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    News,
    Stage,
    Forum,
    Thread,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: Id,
    pub name: String,
    pub kind: ChannelKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EmojiKind {
    Static,
    Animated,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Emoji {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub animated: bool,
}

impl Emoji {
    pub const fn kind(&self) -> EmojiKind {
        if self.animated {
            EmojiKind::Animated
        } else {
            EmojiKind::Static
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl User {
    /// `username#discriminator`, or just the username when there is no discriminator
    pub fn tag(&self) -> String {
        match &self.discriminator {
            Some(disc) => format!("{}#{}", self.username, disc),
            None => self.username.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: Id,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub id: Id,
    pub channel: Id,
    pub author: Id,
    pub content: String,
}

/// Mention syntax wrapping an id, e.g. `<#id>` or `<@!id>`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mention {
    Channel,
    User,
    Role,
    Emoji,
}

impl Mention {
    /// Pulls the id out of `input` if it is either a bare id, a `<#id>` or this kind of mention
    pub(crate) fn extract(self, input: &str) -> Option<Id> {
        if let Some(id) = Id::parse(input) {
            return Some(id);
        }

        let inner = input.strip_prefix('<')?.strip_suffix('>')?;
        if let Some(id) = inner.strip_prefix('#').and_then(Id::parse) {
            return Some(id);
        }

        match self {
            Self::Channel => None,
            Self::User => {
                let id = inner.strip_prefix('@')?;
                Id::parse(id.strip_prefix('!').unwrap_or(id))
            }
            Self::Role => inner.strip_prefix("@&").and_then(Id::parse),
            Self::Emoji => {
                let inner = inner.strip_prefix('a').unwrap_or(inner);
                let (_name, id) = inner.strip_prefix(':')?.split_once(':')?;
                Id::parse(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id() {
        assert_eq!(Id::parse("12345678901234567"), Some(Id(12345678901234567)));
        assert_eq!(
            Id::parse("1234567890123456789"),
            Some(Id(1234567890123456789))
        );
        for input in &["1234567890123456", "12345678901234567890", "1234567890123456a", ""] {
            assert!(Id::parse(input).is_none(), "{}", input);
        }

        assert!(Id::appears_in("abc12345678901234567xyz"));
        assert!(Id::appears_in("<#123456789012345678>"));
        assert!(!Id::appears_in("1234567890123456"));
        assert!(!Id::appears_in("hello"));
    }

    #[test]
    fn mentions() {
        let id = Some(Id(123456789012345678));
        let tests = vec![
            (Mention::Channel, "123456789012345678", id),
            (Mention::Channel, "<#123456789012345678>", id),
            (Mention::Channel, "<@123456789012345678>", None),
            (Mention::User, "<@123456789012345678>", id),
            (Mention::User, "<@!123456789012345678>", id),
            (Mention::User, "<#123456789012345678>", id),
            (Mention::User, "<@&123456789012345678>", None),
            (Mention::Role, "<@&123456789012345678>", id),
            (Mention::Role, "<@123456789012345678>", None),
            (Mention::Emoji, "<:kappa:123456789012345678>", id),
            (Mention::Emoji, "<a:kappa:123456789012345678>", id),
            (Mention::Emoji, "<:kappa>", None),
            (Mention::Channel, "general", None),
            (Mention::User, "<#12345>", None),
        ];

        for (kind, input, expected) in tests {
            assert_eq!(kind.extract(input), expected, "{:?}: {}", kind, input);
        }
    }

    #[test]
    fn user_tag() {
        let mut user = User {
            id: Id(123456789012345678),
            username: "museun".into(),
            discriminator: Some("1234".into()),
        };
        assert_eq!(user.tag(), "museun#1234");
        user.discriminator.take();
        assert_eq!(user.tag(), "museun");
    }
}
