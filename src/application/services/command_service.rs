use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::errors::{BotError, CommandError};
use crate::application::services::{PluginLifecycleManager, ScopeBindingManager};
use crate::domain::entities::{ArgKind, Command, CommandRegistry, CommandScope, Content, Message};
use crate::domain::traits::{Bot, BotProfile};
use crate::infrastructure::metadata::PackageMetadata;

/// Bot status reported by the `state` command
#[derive(Debug, Serialize)]
struct BotState {
    uin: String,
    nickname: String,
    username: String,
    group_count: usize,
    enabled: Vec<String>,
}

/// Service for parsing, validating and executing admin commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
    lifecycle: PluginLifecycleManager,
    scope: ScopeBindingManager,
    metadata: PackageMetadata,
}

impl CommandService {
    pub fn new(
        prefix: impl Into<String>,
        lifecycle: PluginLifecycleManager,
        scope: ScopeBindingManager,
        metadata: PackageMetadata,
    ) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
            lifecycle,
            scope,
            metadata,
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("print")
            .with_description("Print a test message")
            .with_usage("print <message>")
            .with_text_arg());

        self.register(Command::new("state")
            .with_description("Show bot status"));

        self.register(Command::new("plugin")
            .with_description("List discovered plugin packages"));

        self.register(Command::new("mount")
            .with_description("Mount plugins")
            .with_usage("mount <...names>")
            .with_names(5));

        self.register(Command::new("unmount")
            .with_description("Unmount plugins")
            .with_usage("unmount <...names>")
            .with_names(5));

        self.register(Command::new("reload")
            .with_description("Reload plugins")
            .with_usage("reload <...names>")
            .with_names(5));

        self.register(Command::new("enable")
            .with_description("Enable plugins for this bot")
            .with_usage("enable <...names>")
            .with_names(4));

        self.register(Command::new("disable")
            .with_description("Disable plugins for this bot")
            .with_usage("disable <...names>")
            .with_names(4));

        self.register(Command::new("server")
            .with_description("List group services of the current group")
            .group_only("server command is only available in group chats, use the plugin command to list local plugins"));

        self.register(Command::new("apply")
            .with_description("Apply group services")
            .with_usage("apply <...names>")
            .with_names(3)
            .group_only("apply command is only available in group chats, use the enable command to enable plugins for this bot"));

        self.register(Command::new("exempt")
            .with_description("Exempt group services")
            .with_usage("exempt <...names>")
            .with_names(3)
            .group_only("exempt command is only available in group chats, use the disable command to disable plugins for this bot"));

        self.register(Command::new("help")
            .with_description("Show help message"));

        self.register(Command::new("version")
            .with_description("Show version information")
            .with_aliases(vec!["ver".to_string()]));
    }

    /// Handle a command message.
    ///
    /// Returns `Ok(None)` for anything that is not a command. Per-plugin
    /// failures are part of the reply; only host query failures, profile
    /// read failures and invalid invocations come back as `Err`.
    pub async fn handle(
        &self,
        bot: &dyn Bot,
        profile: &dyn BotProfile,
        message: &Message,
    ) -> Result<Option<String>, BotError> {
        let Content::Command { name, args, rest } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        tracing::info!("[{}] command {} {:?}", message.chat_id, cmd.name, args);
        Self::check_args(cmd, args)?;

        let group_id = match (&cmd.scope, message.group_id.as_deref()) {
            (CommandScope::GroupOnly { advisory }, None) => return Ok(Some(advisory.clone())),
            (_, group_id) => group_id,
        };

        let reply = match cmd.name.as_str() {
            "print" => rest.clone(),
            "state" => self.state(bot, profile).await?,
            "plugin" => serde_json::to_string_pretty(&self.lifecycle.list().await?)?,
            "mount" => self.lifecycle.mount(args).await?.to_pretty_json()?,
            "unmount" => self.lifecycle.unmount(args).await?.to_pretty_json()?,
            "reload" => self.lifecycle.reload(args).await?.to_pretty_json()?,
            "enable" => self.scope.enable(profile, args).await.to_pretty_json()?,
            "disable" => self.scope.disable(profile, args).await.to_pretty_json()?,
            "server" => self.server(profile, group_id).await?,
            "apply" => {
                let group_id = group_id.unwrap_or_default();
                self.scope.apply_server(profile, group_id, args).await.to_pretty_json()?
            }
            "exempt" => {
                let group_id = group_id.unwrap_or_default();
                self.scope.exempt_server(profile, group_id, args).await.to_pretty_json()?
            }
            "help" => self.get_help(),
            "version" => serde_json::to_string_pretty(&self.metadata)?,
            _ => format!("Command {} not implemented", cmd.name),
        };

        Ok(Some(reply))
    }

    fn check_args(cmd: &Command, args: &[String]) -> Result<(), CommandError> {
        match cmd.args {
            ArgKind::Names | ArgKind::Text if args.is_empty() => {
                Err(CommandError::InvalidArgs(cmd.raw_name().to_string()))
            }
            ArgKind::Names => match cmd.limit {
                Some(limit) if args.len() > limit => Err(CommandError::TooManyArgs {
                    command: cmd.name.clone(),
                    limit,
                    given: args.len(),
                }),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    async fn state(&self, bot: &dyn Bot, profile: &dyn BotProfile) -> Result<String, BotError> {
        let info = bot.bot_info();
        let state = BotState {
            uin: profile.uin().to_string(),
            nickname: info.name,
            username: info.username,
            group_count: profile.group_ids().await?.len(),
            enabled: profile.enabled_plugins().await?,
        };
        Ok(serde_json::to_string_pretty(&state)?)
    }

    async fn server(&self, profile: &dyn BotProfile, group_id: Option<&str>) -> Result<String, BotError> {
        let setting = profile.group_setting(group_id.unwrap_or_default()).await?;
        let server: BTreeMap<&str, bool> = setting
            .iter()
            .map(|(name, option)| (name.as_str(), option.apply))
            .collect();
        Ok(serde_json::to_string_pretty(&server)?)
    }

    pub fn get_help(&self) -> String {
        let mut help = vec!["Commands: ".to_string()];
        for cmd in self.registry.all() {
            help.push(format!("  {}  {}", cmd.raw_name(), cmd.description.as_deref().unwrap_or("")));
        }
        help.push(format!("\nMore: {}", self.metadata.homepage));
        help.join("\n")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
