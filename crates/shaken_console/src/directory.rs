use shaken_usage::{
    model::{Channel, Emoji, Id, Member, Message, Role, User},
    BoxFuture, ChannelDirectory, EmojiDirectory, MemberDirectory, MessageFetcher, Predicate,
    RoleDirectory, UserDirectory,
};

use anyhow::Context as _;
use futures_lite::future::ready;

/// A guild read from the config
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Guild {
    pub channels: Vec<Channel>,
    pub emojis: Vec<Emoji>,
    pub members: Vec<Member>,
    pub roles: Vec<Role>,
    pub messages: Vec<Message>,
}

impl Guild {
    pub fn channel_named(&self, name: &str) -> Option<&Channel> {
        let name = name.trim_start_matches('#');
        self.channels.iter().find(|channel| channel.name == name)
    }

    pub const fn messages_in(&self, channel: Id) -> ChannelMessages<'_> {
        ChannelMessages {
            guild: self,
            channel,
        }
    }
}

impl ChannelDirectory for Guild {
    fn channel(&self, id: Id) -> Option<Channel> {
        self.channels.iter().find(|channel| channel.id == id).cloned()
    }

    fn find_channel(&self, predicate: Predicate<'_, Channel>) -> Option<Channel> {
        self.channels.iter().find(|&channel| predicate(channel)).cloned()
    }
}

impl EmojiDirectory for Guild {
    fn emoji(&self, id: Id) -> Option<Emoji> {
        self.emojis.iter().find(|emoji| emoji.id == id).cloned()
    }

    fn find_emoji(&self, predicate: Predicate<'_, Emoji>) -> Option<Emoji> {
        self.emojis.iter().find(|&emoji| predicate(emoji)).cloned()
    }
}

impl MemberDirectory for Guild {
    fn fetch_member(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Member>> {
        let member = self
            .members
            .iter()
            .find(|member| member.user.id == id)
            .cloned()
            .with_context(|| format!("unknown member: {}", id));
        Box::pin(ready(member))
    }

    fn find_member(&self, predicate: Predicate<'_, Member>) -> Option<Member> {
        self.members.iter().find(|&member| predicate(member)).cloned()
    }
}

impl RoleDirectory for Guild {
    fn fetch_role(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Role>> {
        let role = self
            .roles
            .iter()
            .find(|role| role.id == id)
            .cloned()
            .with_context(|| format!("unknown role: {}", id));
        Box::pin(ready(role))
    }

    fn find_role(&self, predicate: Predicate<'_, Role>) -> Option<Role> {
        self.roles.iter().find(|&role| predicate(role)).cloned()
    }
}

/// Users known to the client, regardless of guild
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Client {
    pub users: Vec<User>,
}

impl UserDirectory for Client {
    fn fetch_user(&self, id: Id) -> BoxFuture<'_, anyhow::Result<User>> {
        let user = self
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .with_context(|| format!("unknown user: {}", id));
        Box::pin(ready(user))
    }

    fn find_user(&self, predicate: Predicate<'_, User>) -> Option<User> {
        self.users.iter().find(|&user| predicate(user)).cloned()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ChannelMessages<'a> {
    guild: &'a Guild,
    channel: Id,
}

impl<'a> MessageFetcher for ChannelMessages<'a> {
    fn fetch_message(&self, id: Id) -> BoxFuture<'_, anyhow::Result<Message>> {
        let channel = self.channel;
        let message = self
            .guild
            .messages
            .iter()
            .find(|message| message.channel == channel && message.id == id)
            .cloned()
            .with_context(|| format!("unknown message {} in {}", id, channel));
        Box::pin(ready(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use shaken_usage::model::ChannelKind;

    fn id(n: u64) -> Id {
        Id(100_000_000_000_000_000 + n)
    }

    fn guild() -> Guild {
        let user = User {
            id: id(10),
            username: "museun".into(),
            discriminator: None,
        };

        Guild {
            channels: vec![
                Channel {
                    id: id(1),
                    name: "general".into(),
                    kind: ChannelKind::Text,
                },
                Channel {
                    id: id(2),
                    name: "other".into(),
                    kind: ChannelKind::Text,
                },
            ],
            members: vec![Member {
                user,
                nickname: None,
            }],
            roles: vec![Role {
                id: id(20),
                name: "moderator".into(),
            }],
            messages: vec![Message {
                id: id(30),
                channel: id(1),
                author: id(10),
                content: "hello".into(),
            }],
            ..Guild::default()
        }
    }

    #[test]
    fn channels() {
        let guild = guild();
        assert_eq!(guild.channel_named("#general").unwrap().id, id(1));
        assert_eq!(guild.channel_named("other").unwrap().id, id(2));
        assert!(guild.channel_named("missing").is_none());

        assert_eq!(guild.channel(id(2)).unwrap().name, "other");
        let found = guild.find_channel(&|channel: &Channel| channel.name.starts_with('g'));
        assert_eq!(found.unwrap().id, id(1));
    }

    #[test]
    fn fetches() {
        let guild = guild();
        assert_eq!(
            block_on(guild.fetch_member(id(10))).unwrap().user.username,
            "museun"
        );
        assert!(block_on(guild.fetch_member(id(11))).is_err());
        assert_eq!(block_on(guild.fetch_role(id(20))).unwrap().name, "moderator");
        assert!(block_on(guild.fetch_role(id(21))).is_err());

        let client = Client {
            users: guild.members.iter().map(|m| m.user.clone()).collect(),
        };
        assert!(block_on(client.fetch_user(id(10))).is_ok());
        assert!(block_on(client.fetch_user(id(20))).is_err());
    }

    #[test]
    fn messages_are_per_channel() {
        let guild = guild();
        let general = guild.messages_in(id(1));
        assert_eq!(block_on(general.fetch_message(id(30))).unwrap().content, "hello");

        let other = guild.messages_in(id(2));
        assert!(block_on(other.fetch_message(id(30))).is_err());
    }
}
