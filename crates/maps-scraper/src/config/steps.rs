use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A navigation step executed before the page text is read.
#[derive(Debug, Clone)]
pub enum Step {
    Goto(GotoStep),
    Wait(WaitStep),
    WaitForNetworkIdle(WaitForNetworkIdleStep),
    Click(ClickStep),
    Log(LogStep),
    Screenshot(ScreenshotStep),
}

impl Step {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Goto(_) => "goto",
            Self::Wait(_) => "wait",
            Self::WaitForNetworkIdle(_) => "wait_for_network_idle",
            Self::Click(_) => "click",
            Self::Log(_) => "log",
            Self::Screenshot(_) => "screenshot",
        }
    }

    /// The step list used when a config has none: settle, open the games
    /// menu, open the search tab, give the client time to render the list.
    pub fn default_list() -> Vec<Step> {
        vec![
            Step::WaitForNetworkIdle(WaitForNetworkIdleStep {
                idle_ms: default_idle_ms(),
                timeout_ms: default_timeout_ms(),
            }),
            Step::Click(ClickStep {
                pattern: "Ігри|Games".into(),
                label: Some("Ігри".into()),
                timeout_ms: default_timeout_ms(),
            }),
            Step::Wait(WaitStep {
                ms: 3000,
                until: Some("Пошук|Search".into()),
            }),
            Step::Click(ClickStep {
                pattern: "Пошук|Search".into(),
                label: Some("Пошук".into()),
                timeout_ms: default_timeout_ms(),
            }),
            Step::Wait(WaitStep {
                ms: 5000,
                until: Some("#\\d+".into()),
            }),
        ]
    }
}

const STEP_NAMES: &[&str] = &[
    "goto",
    "wait",
    "wait_for_network_idle",
    "click",
    "log",
    "screenshot",
];

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StepVisitor)
    }
}

struct StepVisitor;

impl<'de> Visitor<'de> for StepVisitor {
    type Value = Step;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a step map with a single key")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::custom("expected step type key"))?;

        let step = match key.as_str() {
            "goto" => Step::Goto(map.next_value()?),
            "wait" => Step::Wait(map.next_value()?),
            "wait_for_network_idle" => Step::WaitForNetworkIdle(map.next_value()?),
            "click" => Step::Click(map.next_value()?),
            "log" => Step::Log(map.next_value()?),
            "screenshot" => Step::Screenshot(map.next_value()?),
            other => return Err(de::Error::unknown_variant(other, STEP_NAMES)),
        };

        Ok(step)
    }
}

// --- Step payloads ---

#[derive(Debug, Clone, Deserialize)]
pub struct GotoStep {
    pub url: String,
}

/// Fixed delay, optionally with a readiness pattern used by the `poll`
/// wait strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitStep {
    pub ms: u64,
    /// Regex (case-insensitive) over visible text that signals readiness.
    pub until: Option<String>,
}

fn default_idle_ms() -> u64 {
    500
}
fn default_timeout_ms() -> u64 {
    10000
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaitForNetworkIdleStep {
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Click the first element whose visible text matches `pattern`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickStep {
    /// Regex, matched case-insensitively.
    pub pattern: String,
    /// Name used in status messages; defaults to the pattern.
    pub label: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ClickStep {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.pattern)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogStep {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotStep {
    pub path: String,
}
