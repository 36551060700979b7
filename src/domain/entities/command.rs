/// What a command expects after its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    /// Free text taken verbatim, e.g. `print <message>`
    Text,
    /// One or more plugin names, e.g. `mount <...names>`
    Names,
}

/// Where a command may be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandScope {
    Any,
    /// Only inside a group chat; elsewhere the advisory is sent instead
    GroupOnly { advisory: String },
}

/// Represents a bot command
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub args: ArgKind,
    /// Maximum number of plugin names accepted in one call
    pub limit: Option<usize>,
    pub scope: CommandScope,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            args: ArgKind::None,
            limit: None,
            scope: CommandScope::Any,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_text_arg(mut self) -> Self {
        self.args = ArgKind::Text;
        self
    }

    pub fn with_names(mut self, limit: usize) -> Self {
        self.args = ArgKind::Names;
        self.limit = Some(limit);
        self
    }

    pub fn group_only(mut self, advisory: impl Into<String>) -> Self {
        self.scope = CommandScope::GroupOnly { advisory: advisory.into() };
        self
    }

    /// Usage line, falling back to the bare name
    pub fn raw_name(&self) -> &str {
        self.usage.as_deref().unwrap_or(&self.name)
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower ||
            self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// Command registry, kept in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the earlier command
    pub fn register(&mut self, command: Command) {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
