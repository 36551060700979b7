//! Message parser - Parses raw messages into structured messages

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::{Content, Message};

/// Natural-language aliases, matched against the whole text when it carries
/// no command prefix. `names` captures a whitespace separated name list,
/// `message` captures free text.
static SUGARS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("print", r"^(打印|输出)\s?(?P<message>.+)$"),
        ("state", r"^(状态)$"),
        ("plugin", r"^(插件)$"),
        ("mount", r"^(挂载)\s?(?P<names>([a-z]|\s)+)$"),
        ("unmount", r"^(卸载)\s?(?P<names>([a-z]|\s)+)$"),
        ("reload", r"^(重载)\s?(?P<names>([a-z]|\s)+)$"),
        ("enable", r"^(启用)\s?(?P<names>([a-z]|\s)+)$"),
        ("disable", r"^(禁用)\s?(?P<names>([a-z]|\s)+)$"),
        ("server", r"^(服务|群服务|列表)$"),
        ("apply", r"^(应用)\s?(?P<names>([a-z]|\s)+)$"),
        ("exempt", r"^(免除)\s?(?P<names>([a-z]|\s)+)$"),
        ("help", r"^(帮助)$"),
        ("version", r"^(版本|ver)$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("sugar pattern must compile")))
    .collect()
});

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message sent in a private chat or, with `group_id`, a group
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        group_id: Option<String>,
    ) -> Message {
        let text = text.into();
        let trimmed = text.trim();

        let content = if trimmed.starts_with('/') || (!self.command_prefix.is_empty() && trimmed.starts_with(&self.command_prefix)) {
            self.parse_command(trimmed)
        } else if let Some(content) = Self::parse_sugar(trimmed) {
            content
        } else if trimmed.is_empty() {
            Content::Empty
        } else {
            Content::Text(text.clone())
        };

        Message::new(chat_id, content).with_group_opt(group_id)
    }

    /// Parse a prefixed command
    fn parse_command(&self, text: &str) -> Content {
        // Remove the command prefix (either / or custom prefix)
        let cmd_text = if text.starts_with('/') {
            text.trim_start_matches('/')
        } else {
            text.trim_start_matches(self.command_prefix.as_str())
        };

        let (name, rest) = match cmd_text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (cmd_text, ""),
        };

        Content::Command {
            name: name.to_string(),
            args: rest.split_whitespace().map(|s| s.to_string()).collect(),
            rest: rest.to_string(),
        }
    }

    fn parse_sugar(text: &str) -> Option<Content> {
        SUGARS.iter().find_map(|(name, re)| {
            let caps = re.captures(text)?;
            let (args, rest) = if let Some(names) = caps.name("names") {
                let names = names.as_str().trim();
                (names.split_whitespace().map(|s| s.to_string()).collect(), names.to_string())
            } else if let Some(message) = caps.name("message") {
                (vec![message.as_str().to_string()], message.as_str().to_string())
            } else {
                (Vec::new(), String::new())
            };
            Some(Content::Command { name: name.to_string(), args, rest })
        })
    }
}
