use std::sync::Arc;

use jyotish_agents::AstrologerChat;
use jyotish_common::Result;
use jyotish_config::AppConfig;
use jyotish_kundali::KundaliClient;

pub type SharedState = Arc<AppState>;

/// Immutable per-process state. Conversation history lives with the caller.
pub struct AppState {
    pub config: AppConfig,
    pub kundali: KundaliClient,
    pub chat: AstrologerChat,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let kundali = KundaliClient::new(&config.astrology)?;
        let chat = AstrologerChat::from_config(&config.gemini);
        Ok(Self {
            config,
            kundali,
            chat,
        })
    }
}
