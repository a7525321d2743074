mod executor;

use crate::classify::Classifier;
use crate::config::Config;
use crate::driver::{BrowserSession, Driver};
use crate::extract::{split_lines, Extractor, Record};
use crate::format::summarize;
use crate::status::StatusReporter;
use crate::Result;
use executor::ExecutionContext;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Prefix of the single block returned when a scrape fails.
pub const ERROR_PREFIX: &str = "❌ Помилка під час перевірки:";

/// Records and display blocks of one scrape.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Every record found, uncapped.
    pub records: Vec<Record>,
    /// Display blocks, capped or fallen back as configured.
    pub blocks: Vec<String>,
}

/// Runs the check flow for one config.
pub struct Scraper {
    config: Config,
    extractor: Extractor,
}

impl Scraper {
    pub fn new(config: Config) -> Self {
        let classifier = match config.extract.title_keywords {
            Some(ref keywords) => Classifier::with_title_keywords(keywords.iter().cloned()),
            None => Classifier::new(),
        };
        Self {
            config,
            extractor: Extractor::new(classifier),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Launch a browser, walk to the listing and summarize it.
    ///
    /// Never fails: any error becomes a single block starting with
    /// [`ERROR_PREFIX`].
    pub async fn check<S: StatusReporter>(&self, status: &S) -> Vec<String> {
        match self.scrape(status).await {
            Ok(lines) => self.finish(&lines, status).await.blocks,
            Err(e) => error_blocks(&e),
        }
    }

    /// [`Scraper::check`] against an already available driver.
    pub async fn check_with<D, S>(&self, driver: &D, status: &S) -> Vec<String>
    where
        D: Driver,
        S: StatusReporter,
    {
        match self.read_lines(driver, status).await {
            Ok(lines) => self.finish(&lines, status).await.blocks,
            Err(e) => error_blocks(&e),
        }
    }

    /// Launch a browser and return the listing's lines. The browser is
    /// closed whether or not reading succeeded.
    pub async fn scrape<S: StatusReporter>(&self, status: &S) -> Result<Vec<String>> {
        let start = Instant::now();
        status.report("🚀 Запускаю браузер...").await;
        let session = BrowserSession::launch(&self.config.browser).await?;

        let driver = session.driver();
        let outcome = self.read_lines(&driver, status).await;
        if let Err(ref e) = outcome {
            warn!("Scrape failed: {}", e);
            self.handle_failure(&driver).await;
        }

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {}", e);
        }
        debug!("Scrape took {}ms", start.elapsed().as_millis());
        outcome
    }

    /// Open the target, run the steps and read the listing text.
    pub async fn read_lines<D, S>(&self, driver: &D, status: &S) -> Result<Vec<String>>
    where
        D: Driver,
        S: StatusReporter,
    {
        let config = &self.config;
        info!("Navigating to: {}", config.target.url);
        status.report("🌐 Відкриваю сайт...").await;
        driver.open(&config.target.url).await?;

        let ctx = ExecutionContext {
            wait: &config.wait,
            scope: &config.extract.scope,
        };
        for (i, step) in config.steps.iter().enumerate() {
            debug!("Executing step {}: {}", i + 1, step.name());
            executor::execute(driver, step, ctx, status).await?;
        }

        status.report("📄 Зчитую список карт...").await;
        let text = driver.visible_text(&config.extract.scope).await?;
        let lines = split_lines(&text);
        debug!("Read {} non-empty lines", lines.len());
        Ok(lines)
    }

    /// Extract and format already collected lines.
    pub fn summarize(&self, lines: &[String]) -> Summary {
        let records = self.extractor.extract(lines);
        let blocks = summarize(
            &records,
            lines,
            self.config.extract.summary_limit,
            self.config.extract.fallback_limit,
        );
        Summary { records, blocks }
    }

    async fn finish<S: StatusReporter>(&self, lines: &[String], status: &S) -> Summary {
        let summary = self.summarize(lines);
        info!("Found {} maps", summary.records.len());
        status
            .report(&format!("✅ Знайдено карт: {}", summary.records.len()))
            .await;
        summary
    }

    async fn handle_failure<D: Driver>(&self, driver: &D) {
        let Some(ref on_failure) = self.config.on_failure else {
            return;
        };
        let Some(ref screenshot_path) = on_failure.screenshot else {
            return;
        };
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = screenshot_path.replace("{timestamp}", &timestamp.to_string());
        info!("Saving failure screenshot to: {}", path);
        if let Ok(data) = driver.screenshot().await {
            if let Err(e) = std::fs::write(&path, data) {
                warn!("Failed to save screenshot: {}", e);
            }
        }
    }
}

fn error_blocks(error: &crate::Error) -> Vec<String> {
    vec![format!("{} {}", ERROR_PREFIX, error)]
}
