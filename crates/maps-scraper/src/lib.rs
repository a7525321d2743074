//! # maps-scraper
//!
//! Reads the active map listing of Conflict of Nations: drives a headless
//! browser to the game search screen, takes the visible page text and
//! rebuilds map records (name, id, player count) from it line by line.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maps_scraper::{chunk_blocks, Config, LogStatus, Scraper};
//!
//! # #[tokio::main]
//! # async fn main() -> maps_scraper::Result<()> {
//! let config = Config::load("configs/conflict-nations.yaml")?;
//! let scraper = Scraper::new(config);
//! let blocks = scraper.check(&LogStatus).await;
//! for message in chunk_blocks(&blocks, 3500) {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Extraction works on any text, no browser needed:
//!
//! ```rust
//! let lines = ["СВІТОВА БИТВА", "#12345", "14/40"];
//! let records = maps_scraper::extract(&lines);
//! assert_eq!(records[0].id.as_deref(), Some("#12345"));
//! ```

pub mod chunk;
pub mod classify;
pub mod config;
pub mod driver;
pub mod extract;
pub mod format;
mod runner;
pub mod status;

pub use chunk::{chunk_blocks, DEFAULT_MAX_MESSAGE_LEN};
pub use classify::{Classifier, LineKind};
pub use config::{
    load_document, parse_document, BrowserConfig, Config, ParamDef, Params, Step, WaitStrategy,
};
pub use driver::{BrowserSession, Driver, Element};
pub use extract::{extract, split_lines, Extractor, Record};
pub use format::{format_record, format_records, summarize, NO_RESULTS};
pub use runner::{Scraper, Summary, ERROR_PREFIX};
pub use status::{LogStatus, NullStatus, RecordingStatus, StatusReporter};

/// Result type for maps-scraper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a scrape.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid text pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::steps::Step;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.target.url, "https://example.com");
        assert!(config.browser.headless);
        assert_eq!(config.wait.strategy, WaitStrategy::Fixed);
        assert_eq!(config.extract.scope, "body");
        assert_eq!(config.extract.summary_limit, 20);
        assert_eq!(config.extract.fallback_limit, 15);
    }

    #[test]
    fn test_default_steps_match_reference_flow() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
"#;
        let config = Config::parse(yaml).unwrap();
        let names: Vec<_> = config.steps.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["wait_for_network_idle", "click", "wait", "click", "wait"]
        );
        if let Step::Wait(w) = &config.steps[2] {
            assert_eq!(w.ms, 3000);
        } else {
            panic!("Expected Wait step");
        }
        if let Step::Wait(w) = &config.steps[4] {
            assert_eq!(w.ms, 5000);
        } else {
            panic!("Expected Wait step");
        }
    }

    #[test]
    fn test_parse_browser_config() {
        let yaml = r#"
name: "Test"
browser:
  headless: false
  proxy: "http://localhost:8080"
  user_agent: "Custom UA"
  viewport:
    width: 1920
    height: 1080
target:
  url: "https://example.com"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(!config.browser.headless);
        assert_eq!(config.browser.proxy, Some("http://localhost:8080".into()));
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
        let viewport = config.browser.viewport.unwrap();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }

    #[test]
    fn test_parse_steps() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
steps:
  - goto:
      url: "https://example.com/play"
  - wait_for_network_idle: {}
  - click:
      pattern: "Ігри|Games"
      label: "Ігри"
  - wait:
      ms: 3000
      until: "Пошук"
  - log:
      message: "menu open"
  - screenshot:
      path: "menu.png"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.steps.len(), 6);

        if let Step::WaitForNetworkIdle(s) = &config.steps[1] {
            assert_eq!(s.idle_ms, 500);
            assert_eq!(s.timeout_ms, 10000);
        } else {
            panic!("Expected WaitForNetworkIdle step");
        }

        if let Step::Click(s) = &config.steps[2] {
            assert_eq!(s.pattern, "Ігри|Games");
            assert_eq!(s.label(), "Ігри");
            assert_eq!(s.timeout_ms, 10000);
        } else {
            panic!("Expected Click step");
        }

        if let Step::Wait(s) = &config.steps[3] {
            assert_eq!(s.ms, 3000);
            assert_eq!(s.until.as_deref(), Some("Пошук"));
        } else {
            panic!("Expected Wait step");
        }
    }

    #[test]
    fn test_click_label_defaults_to_pattern() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
steps:
  - click:
      pattern: "Search"
"#;
        let config = Config::parse(yaml).unwrap();
        if let Step::Click(s) = &config.steps[0] {
            assert_eq!(s.label(), "Search");
        } else {
            panic!("Expected Click step");
        }
    }

    #[test]
    fn test_unknown_step_rejected() {
        let yaml = r##"
name: "Test"
target:
  url: "https://example.com"
steps:
  - fill:
      selector: "#q"
"##;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_parse_poll_strategy() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
wait:
  strategy: poll
  poll:
    initial_interval_ms: 50
    timeout_ms: 4000
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.wait.strategy, WaitStrategy::Poll);
        assert_eq!(config.wait.poll.initial_interval_ms, 50);
        assert_eq!(config.wait.poll.max_interval_ms, 2000);
        assert_eq!(config.wait.poll.timeout_ms, 4000);
    }

    #[test]
    fn test_parse_extract_config() {
        let yaml = r##"
name: "Test"
target:
  url: "https://example.com"
extract:
  scope: "#games"
  summary_limit: 5
  title_keywords: ["WORLD WAR", "APOCALYPSE"]
"##;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.extract.scope, "#games");
        assert_eq!(config.extract.summary_limit, 5);
        assert_eq!(config.extract.fallback_limit, 15);
        assert_eq!(
            config.extract.title_keywords,
            Some(vec!["WORLD WAR".to_string(), "APOCALYPSE".to_string()])
        );
    }

    #[test]
    fn test_parse_on_failure() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
on_failure:
  screenshot: "error-{timestamp}.png"
"#;
        let config = Config::parse(yaml).unwrap();
        let on_failure = config.on_failure.unwrap();
        assert_eq!(on_failure.screenshot, Some("error-{timestamp}.png".into()));
    }

    #[test]
    fn test_validation_missing_name() {
        let yaml = r#"
target:
  url: "https://example.com"
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_empty_url() {
        let yaml = r#"
name: "Test"
target:
  url: ""
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_bad_click_pattern() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
steps:
  - click:
      pattern: "(Ігри"
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn test_validation_poll_factor() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
wait:
  poll:
    factor: 0.5
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("factor"));
    }

    #[test]
    fn test_validation_zero_limit() {
        let yaml = r#"
name: "Test"
target:
  url: "https://example.com"
extract:
  summary_limit: 0
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_params_in_target_url() {
        let yaml = r##"
name: "Test"
params:
  lang:
    default: "uk"
target:
  url: "https://www.conflictnations.com/${lang}/"
"##;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.target.url, "https://www.conflictnations.com/uk/");

        let params = Params::new().set("lang", "en");
        let config = Config::parse_with_params(yaml, &params).unwrap();
        assert_eq!(config.target.url, "https://www.conflictnations.com/en/");
    }

    #[test]
    fn test_params_missing_required() {
        let yaml = r##"
name: "Test"
params:
  site:
    required: true
target:
  url: "${site}"
"##;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("site"));
    }

    #[test]
    fn test_parse_document_ignores_other_sections() {
        #[derive(serde::Deserialize)]
        struct Partial {
            name: String,
        }
        let yaml = r#"
name: "Test"
bot:
  token: "x"
target:
  url: "https://example.com"
"#;
        let partial: Partial = parse_document(yaml, &Params::new()).unwrap();
        assert_eq!(partial.name, "Test");
        assert!(Config::parse(yaml).is_ok());
    }

    #[test]
    fn test_load_shipped_config() {
        let config = Config::load("configs/conflict-nations.yaml").unwrap();
        assert_eq!(config.name, "Conflict of Nations");
        assert!(config.target.url.starts_with("https://"));
        assert!(!config.steps.is_empty());
    }
}
