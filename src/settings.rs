//! Bot section of the config file.

use maps_scraper::{load_document, parse_document, Error, Params, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Telegram rejects messages above this many characters.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

fn default_max_message_len() -> usize {
    maps_scraper::DEFAULT_MAX_MESSAGE_LEN
}

/// Which command set the bot serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// `/start`, `/manual`, `/help`; free text is relayed.
    Manual,
    /// `/start`, `/check`, `/help`; `/check` scrapes the site.
    #[default]
    Automated,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Automated => f.write_str("automated"),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct BotSettings {
    pub token: String,
    #[serde(default)]
    pub variant: Variant,
    /// Chat that receives relayed free-text messages (manual variant).
    pub relay_chat_id: Option<i64>,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

// Keeps the token out of logs.
impl fmt::Debug for BotSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotSettings")
            .field("token", &"<redacted>")
            .field("variant", &self.variant)
            .field("relay_chat_id", &self.relay_chat_id)
            .field("max_message_len", &self.max_message_len)
            .finish()
    }
}

#[derive(Deserialize)]
struct BotDocument {
    bot: BotSettings,
}

impl BotSettings {
    pub fn load<P: AsRef<Path>>(path: P, params: &Params) -> Result<Self> {
        let doc: BotDocument = load_document(path, params)?;
        doc.bot.validate()?;
        Ok(doc.bot)
    }

    pub fn parse(yaml: &str, params: &Params) -> Result<Self> {
        let doc: BotDocument = parse_document(yaml, params)?;
        doc.bot.validate()?;
        Ok(doc.bot)
    }

    fn validate(&self) -> Result<()> {
        let token = self.token.trim();
        if token.is_empty() || token.contains("${") {
            return Err(Error::Config(
                "bot.token is required (set BOT_TOKEN or pass -P BOT_TOKEN=...)".into(),
            ));
        }
        if self.max_message_len == 0 || self.max_message_len > TELEGRAM_MESSAGE_LIMIT {
            return Err(Error::Config(format!(
                "bot.max_message_len must be between 1 and {}",
                TELEGRAM_MESSAGE_LIMIT
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
params:
  BOT_TOKEN:
    required: true
bot:
  token: "${BOT_TOKEN}"
  variant: manual
  relay_chat_id: -100123
"#;

    #[test]
    fn test_parse_with_token_param() {
        let params = Params::new().set("BOT_TOKEN", "123:abc");
        let settings = BotSettings::parse(YAML, &params).unwrap();
        assert_eq!(settings.token, "123:abc");
        assert_eq!(settings.variant, Variant::Manual);
        assert_eq!(settings.relay_chat_id, Some(-100123));
        assert_eq!(settings.max_message_len, 3500);
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = BotSettings::parse(YAML, &Params::new()).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_unresolved_token_rejected() {
        let yaml = r#"
bot:
  token: "${SOME_UNSET_NAME}"
"#;
        assert!(BotSettings::parse(yaml, &Params::new()).is_err());
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
bot:
  token: "1:x"
"#;
        let settings = BotSettings::parse(yaml, &Params::new()).unwrap();
        assert_eq!(settings.variant, Variant::Automated);
        assert_eq!(settings.relay_chat_id, None);
    }

    #[test]
    fn test_message_len_bounds() {
        let yaml = r#"
bot:
  token: "1:x"
  max_message_len: 5000
"#;
        assert!(BotSettings::parse(yaml, &Params::new()).is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let params = Params::new().set("BOT_TOKEN", "123:secret");
        let settings = BotSettings::parse(YAML, &params).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_load_shipped_config() {
        let params = Params::new().set("BOT_TOKEN", "1:test");
        let settings = BotSettings::load("maps-bot.yaml", &params).unwrap();
        assert_eq!(settings.variant, Variant::Automated);
        let scrape = maps_scraper::Config::load_with_params("maps-bot.yaml", &params).unwrap();
        assert_eq!(scrape.target.url, "https://www.conflictnations.com/");
    }
}
