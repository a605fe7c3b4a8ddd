use shaken_usage::{Arg, Matched, MessageFetcher};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coercion {
    Text,
    String,
    Id,
    Boolean,
    Number,
    Integer,
    Exists,
    Channel,
    Emoji,
    Member,
    User,
    Role,
    Message,
}

impl std::str::FromStr for Coercion {
    type Err = anyhow::Error;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let ok = match input {
            "text" => Self::Text,
            "string" => Self::String,
            "id" => Self::Id,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "exists" => Self::Exists,
            "channel" => Self::Channel,
            "emoji" => Self::Emoji,
            "member" => Self::Member,
            "user" => Self::User,
            "role" => Self::Role,
            "message" => Self::Message,
            _ => anyhow::bail!("unknown coercion: {}", input),
        };
        Ok(ok)
    }
}

impl std::fmt::Display for Coercion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::String => "string",
            Self::Id => "id",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Exists => "exists",
            Self::Channel => "channel",
            Self::Emoji => "emoji",
            Self::Member => "member",
            Self::User => "user",
            Self::Role => "role",
            Self::Message => "message",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Text(Box<str>),
    Key { name: Box<str>, coercion: Coercion },
}

/// A reply such as `banning ${member:member} for ${reason}`.
///
/// `${name}` is the argument's unquoted string, `${name:coercion}` looks it
/// up or converts it first.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    body: Box<str>,
    segments: Vec<Segment>,
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}

impl Template {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let keys = Self::find_keys(input)?;

        let mut segments = Vec::with_capacity(keys.len() * 2 + 1);
        let mut last = 0;
        for (head, tail) in keys {
            if head > last {
                segments.push(Segment::Text(input[last..head].into()));
            }

            let key = &input[head + 2..tail];
            let (name, coercion) = match key.split_once(':') {
                Some((name, coercion)) => (name.trim(), coercion.trim().parse()?),
                None => (key.trim(), Coercion::String),
            };
            anyhow::ensure!(!name.is_empty(), "empty templates are not allowed");

            segments.push(Segment::Key {
                name: name.into(),
                coercion,
            });
            last = tail + 1;
        }

        if last < input.len() {
            segments.push(Segment::Text(input[last..].into()));
        }

        Ok(Self {
            body: input.into(),
            segments,
        })
    }

    /// Names of the arguments this refers to
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Key { name, .. } => Some(&**name),
            _ => None,
        })
    }

    /// Fills in the keys from `matched`.
    ///
    /// If a lookup comes up empty the reply says so instead.
    pub async fn render(
        &self,
        matched: &Matched<'_>,
        messages: Option<&dyn MessageFetcher>,
    ) -> anyhow::Result<String> {
        let mut out = String::with_capacity(self.body.len());

        for segment in &self.segments {
            let (name, coercion) = match segment {
                Segment::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Key { name, coercion } => (name, *coercion),
            };

            let arg = match matched.get(name) {
                Some(arg) => arg,
                None => anyhow::bail!("'{}' has no argument named '{}'", matched.usage(), name),
            };

            match Self::coerce(arg, coercion, messages).await? {
                Some(value) => out.push_str(&value),
                None => return Ok(format!("I can't find {} '{}'", coercion, arg.string())),
            }
        }

        Ok(out.trim().to_string())
    }

    async fn coerce(
        arg: &Arg<'_>,
        coercion: Coercion,
        messages: Option<&dyn MessageFetcher>,
    ) -> anyhow::Result<Option<String>> {
        let value = match coercion {
            Coercion::Text => Some(arg.text().to_string()),
            Coercion::String => Some(arg.string().into_owned()),
            Coercion::Id => arg.id().map(ToString::to_string),
            Coercion::Boolean => arg
                .boolean()
                .map(|ok| (if ok { "yes" } else { "no" }).to_string()),
            Coercion::Number => arg.number(..).map(|n| n.to_string()),
            Coercion::Integer => arg.integer(..).map(|n| n.to_string()),
            Coercion::Exists => Some(arg.exists().to_string()),
            Coercion::Channel => arg.channel(&[])?.map(|c| format!("#{}", c.name)),
            Coercion::Emoji => arg.emoji(&[])?.map(|e| format!(":{}:", e.name)),
            Coercion::Member => arg
                .member()
                .await?
                .map(|m| m.nickname.unwrap_or(m.user.username)),
            Coercion::User => arg.user().await?.map(|u| u.tag()),
            Coercion::Role => arg.role().await?.map(|r| format!("@{}", r.name)),
            Coercion::Message => match messages {
                Some(messages) => arg.message(messages).await.map(|m| m.content),
                None => anyhow::bail!("cannot fetch messages without a channel"),
            },
        };
        Ok(value)
    }

    // positions of the `$` and the `}` of each key
    fn find_keys(input: &str) -> anyhow::Result<Vec<(usize, usize)>> {
        let (mut heads, mut tails) = (vec![], vec![]);

        let mut last = None;
        let mut iter = input.char_indices().peekable();
        while let Some((pos, ch)) = iter.next() {
            match (ch, iter.peek()) {
                ('$', Some((_, '{'))) => {
                    anyhow::ensure!(last.is_none(), "nested templates are not allowed");
                    last.replace(pos);
                    heads.push(pos);
                    iter.next();
                }

                ('{', ..) if last.is_some() => {
                    anyhow::bail!("nested templates are not allowed");
                }

                ('}', ..) if last.is_some() => {
                    tails.push(pos);
                    last.take();
                }
                _ => {}
            }
        }

        if heads.len() != tails.len() {
            anyhow::bail!("non-terminated template found")
        }

        let keys = heads.into_iter().zip(tails).collect::<Vec<_>>();
        if keys.iter().any(|&(head, tail)| tail == head + 2) {
            anyhow::bail!("empty templates are not allowed")
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaken_usage::{lex, Parser, Usages};

    fn render(template: &str, usage: &str, input: &str) -> String {
        let template = Template::parse(template).unwrap();
        let usages = Usages::new().with(usage, ()).unwrap();
        let inv = lex(input).unwrap();

        let parser = Parser::default();
        let matched = parser
            .parse(&inv.items, inv.text, &usages, |_, m| m, |f| panic!("{}", f))
            .unwrap();

        futures_lite::future::block_on(template.render(&matched, None)).unwrap()
    }

    #[test]
    fn parse() {
        let template = Template::parse("hello ${name}, you rolled ${n : integer}!").unwrap();
        assert_eq!(
            template.segments,
            vec![
                Segment::Text("hello ".into()),
                Segment::Key {
                    name: "name".into(),
                    coercion: Coercion::String
                },
                Segment::Text(", you rolled ".into()),
                Segment::Key {
                    name: "n".into(),
                    coercion: Coercion::Integer
                },
                Segment::Text("!".into()),
            ]
        );
        assert_eq!(template.keys().collect::<Vec<_>>(), vec!["name", "n"]);
        assert_eq!(template.to_string(), "hello ${name}, you rolled ${n : integer}!");

        let template = Template::parse("no keys at all").unwrap();
        assert!(template.keys().next().is_none());
    }

    #[test]
    fn invalid() {
        let tests = vec![
            "${}",
            "${a",
            "${a ${b}}",
            "${a:nope}",
            "${:string}",
            "${a}${}",
        ];
        for test in tests {
            assert!(Template::parse(test).is_err(), "{}", test);
        }
    }

    #[test]
    fn apply() {
        assert_eq!(
            render("hello ${name}", "<name>", r#"hi "some one""#),
            "hello some one"
        );
        assert_eq!(
            render("${name:text}", "<name>", r#"hi "some one""#),
            r#""some one""#
        );
        assert_eq!(
            render("${a:number} ${b:boolean} ${c:exists}", "<a> <b> [c]", "hi 1.5 YES"),
            "1.5 yes false"
        );
        assert_eq!(
            render("${n:integer}", "<n>", "hi lots"),
            "I can't find integer 'lots'"
        );
        assert_eq!(
            render("${who:id}", "<who>", "hi <@123456789012345678>"),
            "<@123456789012345678>"
        );
    }

    #[test]
    fn missing() {
        let template = Template::parse("${who:member}").unwrap();
        let usages = Usages::new().with("<who>", ()).unwrap();
        let parser = Parser::default();
        let matched = parser
            .parse(&["museun"], "museun", &usages, |_, m| m, |f| panic!("{}", f))
            .unwrap();

        let res = futures_lite::future::block_on(template.render(&matched, None));
        assert!(res.is_err());

        let template = Template::parse("${nope}").unwrap();
        let res = futures_lite::future::block_on(template.render(&matched, None));
        assert!(res.is_err());
    }
}
