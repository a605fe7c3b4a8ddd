use crate::directory::{Client, Guild};

use anyhow::Context as _;
use std::path::Path;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_leader")]
    pub leader: String,
    /// The channel `message` lookups are done in
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub guild: Option<Guild>,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub commands: Vec<Command>,
}

fn default_leader() -> String {
    String::from("!")
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Command {
    pub name: String,
    /// In declaration order, later ones are tried first
    pub usages: Vec<UsageReply>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct UsageReply {
    pub pattern: String,
    pub reply: String,
}

const EXAMPLE_PATH: &str = "shaken.toml.example";

const DEFAULT_CONFIG: &str = r##"leader  = "!"
channel = "general"

[guild]
channels = [
    { id = "100000000000000001", name = "general", kind = "text" },
    { id = "100000000000000002", name = "voice",   kind = "voice" },
]
emojis = [
    { id = "200000000000000001", name = "Kappa" },
    { id = "200000000000000002", name = "PogChamp", animated = true },
]
members = [
    { user = { id = "300000000000000001", username = "museun", discriminator = "0001" }, nickname = "shaken_bot" },
]
roles = [
    { id = "400000000000000001", name = "moderator" },
]
messages = [
    { id = "500000000000000001", channel = "100000000000000001", author = "300000000000000001", content = "hello world" },
]

[client]
users = [
    { id = "300000000000000001", username = "museun", discriminator = "0001" },
    { id = "300000000000000002", username = "someone" },
]

[[commands]]
name = "hello"

[[commands.usages]]
pattern = "[name...]"
reply   = "hello ${name}"

[[commands]]
name = "ban"

[[commands.usages]]
pattern = "<member>"
reply   = "banning ${member:member}"

[[commands.usages]]
pattern = "<member> -quiet <reason...>"
reply   = "quietly banning ${member:member} for: ${reason}"

[[commands]]
name = "quote"

[[commands.usages]]
pattern = "<id>"
reply   = "${id:message}"
"##;

impl Config {
    /// Loads the config at `path`, or writes an example and exits
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("cannot load config: {:#}", err);
                Self::write_default(path)
            }
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        Self::parse(&data).with_context(|| format!("cannot parse '{}'", path.display()))
    }

    fn parse(data: &str) -> anyhow::Result<Self> {
        toml::from_str(data).map_err(Into::into)
    }

    fn write_default(path: &Path) -> ! {
        eprintln!("cannot load config. creating a default at '{}'", EXAMPLE_PATH);
        eprintln!("copy it to '{}' and edit it then rerun", path.display());

        if let Err(err) = std::fs::write(EXAMPLE_PATH, DEFAULT_CONFIG) {
            eprintln!("cannot write '{}': {}", EXAMPLE_PATH, err);
        }

        std::process::exit(1);
    }
}
