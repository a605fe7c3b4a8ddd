use crate::{
    config::{Config, UsageReply},
    directory::{Client, Guild},
    template::Template,
};

use shaken_usage::{lex, model::Id, Directories, MessageFetcher, Outcome, Parser, Usage, Usages};

use anyhow::Context as _;
use std::collections::HashMap;

pub struct Console {
    leader: String,
    channel: Option<Id>,
    guild: Option<Guild>,
    client: Option<Client>,
    commands: HashMap<String, Usages<Template>>,
}

impl Console {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let Config {
            leader,
            channel,
            guild,
            client,
            commands: list,
        } = config;

        let channel = match (&channel, &guild) {
            (Some(name), Some(guild)) => {
                let channel = guild
                    .channel_named(name)
                    .with_context(|| format!("unknown channel: {}", name))?;
                Some(channel.id)
            }
            (Some(name), None) => anyhow::bail!("channel '{}' needs a [guild]", name),
            _ => None,
        };

        let mut commands = HashMap::with_capacity(list.len());
        for command in list {
            let mut usages = Usages::new();
            for UsageReply { pattern, reply } in &command.usages {
                let usage = Usage::parse(&pattern)
                    .with_context(|| format!("invalid usage for '{}'", command.name))?;
                let template = Template::parse(&reply)
                    .with_context(|| format!("invalid reply for '{}'", command.name))?;

                if let Some(key) = template.keys().find(|&key| usage.keys().all(|k| k != key)) {
                    anyhow::bail!(
                        "reply for '{}' uses '{}' which '{}' does not declare",
                        command.name,
                        key,
                        usage
                    )
                }

                usages.add(&pattern, template)?;
            }

            log::debug!("loaded '{}' with {} usage(s)", command.name, usages.len());
            if commands.insert(command.name.clone(), usages).is_some() {
                anyhow::bail!("'{}' was declared more than once", command.name)
            }
        }

        Ok(Self {
            leader,
            channel,
            guild,
            client,
            commands,
        })
    }

    /// Replies to `line` if it invokes a known command
    pub async fn handle(&self, line: &str) -> anyhow::Result<Option<String>> {
        let line = match line.trim().strip_prefix(&*self.leader) {
            Some(line) => line,
            None => return Ok(None),
        };

        let inv = match lex(line) {
            Some(inv) => inv,
            None => return Ok(None),
        };

        let usages = match self.commands.get(inv.name) {
            Some(usages) => usages,
            None => {
                log::debug!("unknown command: {}", inv.name);
                return Ok(None);
            }
        };

        let mut directories = Directories::default();
        if let Some(guild) = &self.guild {
            directories = directories.guild(guild);
        }
        if let Some(client) = &self.client {
            directories = directories.client(client);
        }

        let messages = match (&self.guild, self.channel) {
            (Some(guild), Some(channel)) => Some(guild.messages_in(channel)),
            _ => None,
        };

        let parser = Parser::new(directories);
        match parser.find(&inv.items, inv.text, usages) {
            Outcome::Success { handler, matched } => {
                let messages = messages.as_ref().map(|m| m as &dyn MessageFetcher);
                handler.render(&matched, messages).await.map(Some)
            }

            Outcome::Failure(failure) => {
                log::debug!("{}", failure);
                let usage = format!("{}{} {}", self.leader, inv.name, failure.usage);
                Ok(Some(format!(
                    "usage: {} ({} {})",
                    usage.trim_end(),
                    failure.kind,
                    failure.subkind
                )))
            }

            Outcome::Empty => Ok(None),
        }
    }
}
