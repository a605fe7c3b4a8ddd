use crate::{
    directory::{Directories, MessageFetcher},
    model::{Channel, ChannelKind, Emoji, EmojiKind, Id, Member, Mention, Message, Role, User},
    Error, Failure, Kind, Subkind,
};

use std::{borrow::Cow, ops::RangeBounds};

/// A bound argument.
///
/// Holds the raw text that matched a part of a usage and lazily coerces it.
/// Nothing here mutates the argument, every method can be called any number
/// of times with the same result.
#[derive(Copy, Clone, Debug)]
pub struct Arg<'a> {
    usage: &'a str,
    name: &'a str,
    text: &'a str,
    directories: Directories<'a>,
}

impl<'a> Arg<'a> {
    pub(crate) const fn new(
        usage: &'a str,
        name: &'a str,
        text: &'a str,
        directories: Directories<'a>,
    ) -> Self {
        Self {
            usage,
            name,
            text,
            directories,
        }
    }

    pub const fn usage(&self) -> &'a str {
        self.usage
    }

    pub const fn name(&self) -> &'a str {
        self.name
    }

    pub const fn text(&self) -> &'a str {
        self.text
    }

    pub fn exists(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text with surrounding quotes removed and `\"` and `\\` unescaped
    pub fn string(&self) -> Cow<'a, str> {
        let text = self.text;
        if !(text.starts_with('"') && text.ends_with('"')) {
            return Cow::Borrowed(text);
        }

        let inner = text.get(1..text.len() - 1).unwrap_or_default();
        if !inner.contains('\\') {
            return Cow::Borrowed(inner);
        }

        let mut out = String::with_capacity(inner.len());
        let mut iter = inner.chars().peekable();
        while let Some(ch) = iter.next() {
            match (ch, iter.peek()) {
                ('\\', Some(&next)) if next == '\\' || next == '"' => {
                    out.push(next);
                    iter.next();
                }
                _ => out.push(ch),
            }
        }
        Cow::Owned(out)
    }

    /// The text, if an id appears anywhere in it
    pub fn id(&self) -> Option<&'a str> {
        Some(self.text).filter(|text| Id::appears_in(text))
    }

    pub fn boolean(&self) -> Option<bool> {
        match &*self.text.to_lowercase() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        }
    }

    /// A finite decimal number within `range`
    pub fn number<R>(&self, range: R) -> Option<f64>
    where
        R: RangeBounds<f64>,
    {
        self.numeric(range)
    }

    /// Like [`Arg::number`], but only for integer-looking text.
    ///
    /// Only the shape is checked, the value itself is not forced to be integral.
    pub fn integer<R>(&self, range: R) -> Option<f64>
    where
        R: RangeBounds<f64>,
    {
        self.numeric(range)
    }

    fn numeric<R>(&self, range: R) -> Option<f64>
    where
        R: RangeBounds<f64>,
    {
        // both shapes reduce to 'a digit somewhere'
        if !self.text.contains(|c: char| c.is_ascii_digit()) {
            return None;
        }

        self.text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .filter(|n| range.contains(n))
    }

    /// Finds a channel by id, `<#id>` or name, optionally restricted to `kinds`
    pub fn channel(&self, kinds: &[ChannelKind]) -> Result<Option<Channel>, Error> {
        let channels = self
            .directories
            .channels
            .ok_or(Error::MissingCapability("channels without a guild"))?;

        let text = self.text;
        let channel = match Mention::Channel.extract(text) {
            Some(id) => channels.channel(id),
            None => channels.find_channel(&|channel: &Channel| channel.name == text),
        };

        Ok(channel.filter(|channel| kinds.is_empty() || kinds.contains(&channel.kind)))
    }

    /// Finds an emoji by id, `<:name:id>` or name, optionally restricted to `kinds`
    pub fn emoji(&self, kinds: &[EmojiKind]) -> Result<Option<Emoji>, Error> {
        let emojis = self
            .directories
            .emojis
            .ok_or(Error::MissingCapability("emojis without a guild"))?;

        let text = self.text;
        let emoji = match Mention::Emoji.extract(text) {
            Some(id) => emojis.emoji(id),
            None => emojis.find_emoji(&|emoji: &Emoji| emoji.name == text),
        };

        Ok(emoji.filter(|emoji| kinds.is_empty() || kinds.contains(&emoji.kind())))
    }

    /// Fetches a message by id from `channel`
    pub async fn message(&self, channel: &dyn MessageFetcher) -> Option<Message> {
        let id = Mention::Channel.extract(self.text)?;
        Self::fetched(channel.fetch_message(id).await, "message", id)
    }

    /// Finds a member by id, mention, tag, nickname or username, in that order
    pub async fn member(&self) -> Result<Option<Member>, Error> {
        let members = self
            .directories
            .members
            .ok_or(Error::MissingCapability("members without a guild"))?;

        if let Some(id) = Mention::User.extract(self.text) {
            let member = members.fetch_member(id).await;
            return Ok(Self::fetched(member, "member", id));
        }

        let text = self.text;
        let by_tag = |member: &Member| member.user.tag() == text;
        let by_nickname = |member: &Member| member.nickname.as_deref() == Some(text);
        let by_username = |member: &Member| member.user.username == text;

        let member = members
            .find_member(&by_tag)
            .or_else(|| members.find_member(&by_nickname))
            .or_else(|| members.find_member(&by_username));
        Ok(member)
    }

    /// Finds a user by id, mention, tag or username, in that order
    pub async fn user(&self) -> Result<Option<User>, Error> {
        let users = self
            .directories
            .users
            .ok_or(Error::MissingCapability("users without a client"))?;

        if let Some(id) = Mention::User.extract(self.text) {
            let user = users.fetch_user(id).await;
            return Ok(Self::fetched(user, "user", id));
        }

        let text = self.text;
        let user = users
            .find_user(&|user: &User| user.tag() == text)
            .or_else(|| users.find_user(&|user: &User| user.username == text));
        Ok(user)
    }

    /// Finds a role by id, `<@&id>` or name
    pub async fn role(&self) -> Result<Option<Role>, Error> {
        let roles = self
            .directories
            .roles
            .ok_or(Error::MissingCapability("roles without a guild"))?;

        if let Some(id) = Mention::Role.extract(self.text) {
            let role = roles.fetch_role(id).await;
            return Ok(Self::fetched(role, "role", id));
        }

        let text = self.text;
        Ok(roles.find_role(&|role: &Role| role.name == text))
    }

    /// A failure describing this argument, for handlers that reject its value
    pub fn fail(&self, kind: Kind, subkind: Subkind, item: Option<&str>) -> Failure {
        Failure {
            usage: self.usage.into(),
            name: self.name.into(),
            text: self.text.into(),
            kind,
            subkind,
            item: item.map(Into::into),
        }
    }

    fn fetched<T>(result: anyhow::Result<T>, what: &str, id: Id) -> Option<T> {
        match result {
            Ok(item) => Some(item),
            Err(err) => {
                log::debug!("cannot fetch {} {}: {}", what, id, err);
                None
            }
        }
    }
}
