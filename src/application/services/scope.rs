//! Scope binding manager - per-bot enablement and per-group services

use crate::application::errors::TransitionError;
use crate::application::services::batch::BatchRunner;
use crate::domain::entities::{BatchReport, Transition};
use crate::domain::traits::{BotProfile, GroupOption};

/// Binds plugins to a bot instance (enable/disable) and to one of its
/// groups (apply/exempt).
///
/// There are no local precondition checks: the bot profile is the authority
/// on the narrowing and its rejections surface as per-name failures.
pub struct ScopeBindingManager {
    runner: BatchRunner,
}

impl ScopeBindingManager {
    pub fn new(runner: BatchRunner) -> Self {
        Self { runner }
    }

    pub async fn enable(&self, bot: &dyn BotProfile, names: &[String]) -> BatchReport {
        tracing::info!("Bot {} enabling {:?}", bot.uin(), names);
        self.runner
            .run(Transition::Enable, names, |name| async move {
                bot.enable_plugin(name).await.map_err(TransitionError::from)
            })
            .await
    }

    pub async fn disable(&self, bot: &dyn BotProfile, names: &[String]) -> BatchReport {
        tracing::info!("Bot {} disabling {:?}", bot.uin(), names);
        self.runner
            .run(Transition::Disable, names, |name| async move {
                bot.disable_plugin(name).await.map_err(TransitionError::from)
            })
            .await
    }

    pub async fn apply_server(&self, bot: &dyn BotProfile, group_id: &str, names: &[String]) -> BatchReport {
        self.set_apply(Transition::Apply, bot, group_id, names, true).await
    }

    pub async fn exempt_server(&self, bot: &dyn BotProfile, group_id: &str, names: &[String]) -> BatchReport {
        self.set_apply(Transition::Exempt, bot, group_id, names, false).await
    }

    async fn set_apply(
        &self,
        transition: Transition,
        bot: &dyn BotProfile,
        group_id: &str,
        names: &[String],
        apply: bool,
    ) -> BatchReport {
        tracing::info!("Bot {} group {}: {} {:?}", bot.uin(), group_id, transition, names);
        self.runner
            .run(transition, names, |name| async move {
                bot.update_group_option(group_id, name, GroupOption::Apply(apply))
                    .await
                    .map_err(TransitionError::from)
            })
            .await
    }
}
