use crate::config::schema::compile_pattern;
use crate::config::steps::{ClickStep, WaitStep};
use crate::config::{Step, WaitConfig, WaitStrategy};
use crate::driver::Driver;
use crate::status::StatusReporter;
use crate::Result;
use tracing::{debug, info, warn};

/// Settings shared by every step of one scrape.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub wait: &'a WaitConfig,
    /// Selector whose text is polled for readiness.
    pub scope: &'a str,
}

/// Execute a single navigation step.
///
/// Click steps never fail: a missing or unclickable element is reported and
/// the flow moves on against whatever the page shows.
pub async fn execute<D, S>(
    driver: &D,
    step: &Step,
    ctx: ExecutionContext<'_>,
    status: &S,
) -> Result<()>
where
    D: Driver,
    S: StatusReporter,
{
    match step {
        Step::Goto(s) => {
            info!("goto: {}", s.url);
            driver.open(&s.url).await?;
        }
        Step::Wait(s) => {
            wait(driver, s, ctx, status).await?;
        }
        Step::WaitForNetworkIdle(s) => {
            debug!(
                "wait_for_network_idle: idle={}ms, timeout={}ms",
                s.idle_ms, s.timeout_ms
            );
            driver.wait_for_network_idle(s.idle_ms, s.timeout_ms).await?;
        }
        Step::Click(s) => {
            click(driver, s, status).await;
        }
        Step::Log(s) => {
            info!("[log] {}", s.message);
            status.report(&s.message).await;
        }
        Step::Screenshot(s) => {
            info!("screenshot: {}", s.path);
            let data = driver.screenshot().await?;
            std::fs::write(&s.path, data)?;
        }
    }
    Ok(())
}

async fn click<D: Driver, S: StatusReporter>(driver: &D, step: &ClickStep, status: &S) {
    let label = step.label();
    status.report(&format!("👆 Натискаю «{}»...", label)).await;

    let element = match driver.find_by_text(&step.pattern, step.timeout_ms).await {
        Ok(Some(element)) => element,
        Ok(None) => {
            warn!("click: nothing matches '{}'", step.pattern);
            status
                .report(&format!("⚠️ «{}» не знайдено, продовжую", label))
                .await;
            return;
        }
        Err(e) => {
            warn!("click: lookup for '{}' failed: {}", step.pattern, e);
            status
                .report(&format!("⚠️ «{}» не знайдено ({}), продовжую", label, e))
                .await;
            return;
        }
    };

    info!("click: {}", element.selector);
    if let Err(e) = driver.click(&element).await {
        warn!("click on '{}' failed: {}", element.selector, e);
        status
            .report(&format!("⚠️ Не вдалося натиснути «{}», продовжую", label))
            .await;
    }
}

async fn wait<D: Driver, S: StatusReporter>(
    driver: &D,
    step: &WaitStep,
    ctx: ExecutionContext<'_>,
    status: &S,
) -> Result<()> {
    let until = match (ctx.wait.strategy, step.until.as_deref()) {
        (WaitStrategy::Poll, Some(until)) => until,
        _ => {
            debug!("wait: {}ms", step.ms);
            driver.sleep(step.ms).await;
            return Ok(());
        }
    };

    let re = compile_pattern(until)?;
    for interval in ctx.wait.poll.intervals() {
        if let Ok(text) = driver.visible_text(ctx.scope).await {
            if re.is_match(&text) {
                debug!("wait: '{}' is on the page", until);
                return Ok(());
            }
        }
        driver.sleep(interval).await;
    }

    warn!(
        "wait: '{}' not seen within {}ms, sleeping {}ms",
        until, ctx.wait.poll.timeout_ms, step.ms
    );
    status
        .report(&format!("⏳ Сторінка ще завантажується, чекаю {} мс", step.ms))
        .await;
    driver.sleep(step.ms).await;
    Ok(())
}
