use crate::model::{Channel, Emoji, Id, Member, Message, Role, User};

use std::{future::Future, pin::Pin};

pub type BoxFuture<'t, T> = Pin<Box<dyn Future<Output = T> + Send + 't>>;

/// A predicate handed to the `find_*` lookups
pub type Predicate<'p, T> = &'p dyn Fn(&T) -> bool;

pub trait ChannelDirectory: Send + Sync {
    fn channel(&self, id: Id) -> Option<Channel>;
    /// The first cached channel matching `predicate`
    fn find_channel(&self, predicate: Predicate<'_, Channel>) -> Option<Channel>;
}

pub trait EmojiDirectory: Send + Sync {
    fn emoji(&self, id: Id) -> Option<Emoji>;
    fn find_emoji(&self, predicate: Predicate<'_, Emoji>) -> Option<Emoji>;
}

pub trait MemberDirectory: Send + Sync {
    fn fetch_member(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Member>>;
    fn find_member(&self, predicate: Predicate<'_, Member>) -> Option<Member>;
}

pub trait RoleDirectory: Send + Sync {
    fn fetch_role(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Role>>;
    fn find_role(&self, predicate: Predicate<'_, Role>) -> Option<Role>;
}

pub trait UserDirectory: Send + Sync {
    fn fetch_user(&self, id: Id) -> BoxFuture<'_, anyhow::Result<User>>;
    fn find_user(&self, predicate: Predicate<'_, User>) -> Option<User>;
}

/// Fetches messages from a single channel
pub trait MessageFetcher: Send + Sync {
    fn fetch_message(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Message>>;
}

/// The lookup capabilities available to argument coercions.
///
/// Everything is absent by default, coercions needing a missing one return
/// [`Error::MissingCapability`](crate::Error::MissingCapability).
#[derive(Default, Clone, Copy)]
pub struct Directories<'a> {
    pub channels: Option<&'a dyn ChannelDirectory>,
    pub emojis: Option<&'a dyn EmojiDirectory>,
    pub members: Option<&'a dyn MemberDirectory>,
    pub roles: Option<&'a dyn RoleDirectory>,
    pub users: Option<&'a dyn UserDirectory>,
}

impl<'a> std::fmt::Debug for Directories<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directories")
            .field("channels", &self.channels.is_some())
            .field("emojis", &self.emojis.is_some())
            .field("members", &self.members.is_some())
            .field("roles", &self.roles.is_some())
            .field("users", &self.users.is_some())
            .finish()
    }
}

impl<'a> Directories<'a> {
    /// Uses `guild` for channels, emojis, members and roles
    pub fn guild<G>(mut self, guild: &'a G) -> Self
    where
        G: ChannelDirectory + EmojiDirectory + MemberDirectory + RoleDirectory,
    {
        self.channels.replace(guild);
        self.emojis.replace(guild);
        self.members.replace(guild);
        self.roles.replace(guild);
        self
    }

    /// Uses `client` for users
    pub fn client(mut self, client: &'a dyn UserDirectory) -> Self {
        self.users.replace(client);
        self
    }
}
