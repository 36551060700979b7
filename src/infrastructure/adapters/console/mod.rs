//! Console adapter for local administration

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter: reads commands from stdin, prints replies
pub struct ConsoleAdapter {
    info: BotInfo,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>, uin: impl Into<String>) -> Self {
        let uin = uin.into();
        Self {
            info: BotInfo {
                id: uin.clone(),
                name: name.into(),
                username: "console".to_string(),
            },
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next input line, `None` at end of input
    pub async fn read_line(&self) -> Result<Option<String>, BotError> {
        let line = self.lines.lock().await.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console admin for {}", self.info.name);
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
