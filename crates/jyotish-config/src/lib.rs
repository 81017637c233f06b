pub mod loader;
pub mod model;

pub use loader::ConfigLoader;
pub use model::{
    AppConfig, AstrologyConfig, DEFAULT_ASTROLOGY_API_URL, DEFAULT_ASTROLOGY_USER_ID,
    DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL, GatewayConfig, GeminiConfig,
};
