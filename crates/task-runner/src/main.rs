//! Task runner entry point.
mod config;
mod scenario;

use std::sync::Arc;

use anyhow::Result;
use config::RunnerConfig;
use scenario::Robot;
use task_kernel::SharedTask;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunnerConfig::from_env();
    info!(?config, "task runner starting");

    let robot = Arc::new(Robot::new(config.battery));
    let task = SharedTask::new(scenario::patrol_shift(&robot));
    task.start()?;

    run(task, robot, config, tokio::signal::ctrl_c()).await
}

/// Ticks `task` on a spawned worker until it finishes, runs out of ticks, or
/// `shutdown` resolves. On shutdown the tree is stopped and reset and the
/// worker is aborted.
async fn run<S>(task: SharedTask, robot: Arc<Robot>, config: RunnerConfig, shutdown: S) -> Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    let mut ticker = tokio::spawn(drive(task.clone(), Arc::clone(&robot), config));

    tokio::select! {
        joined = &mut ticker => match joined?? {
            Some(ticks) => info!(ticks, evacuated = robot.evacuated(), "task tree finished"),
            None => info!(legs = robot.legs(), dockings = robot.dockings(), "tick budget exhausted"),
        },
        signal = shutdown => {
            signal?;
            info!("interrupted, stopping the task tree");
            if task.running()? {
                task.stop()?;
            }
            task.reset()?;

            ticker.abort();
            if let Err(err) = ticker.await
                && !err.is_cancelled()
            {
                return Err(err.into());
            }
        }
    }

    Ok(())
}

/// Ticks `task` at the configured rate.
///
/// Returns the tick on which the tree finished, or `None` once the tick
/// budget is spent; the tree is then stopped and reset.
async fn drive(task: SharedTask, robot: Arc<Robot>, config: RunnerConfig) -> Result<Option<u64>> {
    let mut interval = tokio::time::interval(config.tick_interval());

    for tick in 1..=config.max_ticks {
        interval.tick().await;

        if config.alarm_enabled() && tick == config.alarm_tick {
            robot.raise_alarm();
        }

        robot.tick();
        task.resume()?;
        if !task.running()? {
            return Ok(Some(tick));
        }
    }

    warn!(max_ticks = config.max_ticks, "giving up on the task tree");
    if task.running()? {
        task.stop()?;
    }
    task.reset()?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_resets_tree_and_aborts_ticker() {
        let config = RunnerConfig {
            tick_interval_ms: 1_000,
            max_ticks: 1_000,
            ..RunnerConfig::default()
        };
        let robot = Arc::new(Robot::new(config.battery));
        let task = SharedTask::new(scenario::patrol_shift(&robot));
        task.start().unwrap();

        run(task.clone(), Arc::clone(&robot), config, std::future::ready(Ok(())))
            .await
            .unwrap();

        assert!(!task.running().unwrap());
        assert!(!task.with(|node| node.is_active()).unwrap());
        // The worker never got to tick.
        assert_eq!(robot.legs(), 0);
    }
}
