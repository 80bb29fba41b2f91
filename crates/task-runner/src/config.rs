//! Runner configuration.
use std::env;
use std::time::Duration;

/// Host loop and demo scenario settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Wall-clock time between two ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Ticks to run before giving up and resetting the tree.
    pub max_ticks: u64,
    /// Tick on which the scenario's alarm goes off. `0` disables it.
    pub alarm_tick: u64,
    /// Battery charge of the patrol robot; each patrol leg costs one unit.
    pub battery: u32,
}

impl RunnerConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
    pub const DEFAULT_MAX_TICKS: u64 = 200;
    pub const DEFAULT_ALARM_TICK: u64 = 12;
    pub const DEFAULT_BATTERY: u32 = 4;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TASK_RUNNER_TICK_MS` - Tick interval in milliseconds (default: 100, min: 1)
    /// - `TASK_RUNNER_MAX_TICKS` - Tick budget (default: 200)
    /// - `TASK_RUNNER_ALARM_TICK` - Tick raising the alarm, 0 to disable (default: 12)
    /// - `TASK_RUNNER_BATTERY` - Initial battery charge (default: 4)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse::<u64>(&lookup, "TASK_RUNNER_TICK_MS") {
            config.tick_interval_ms = ms.max(1);
        }
        if let Some(ticks) = parse(&lookup, "TASK_RUNNER_MAX_TICKS") {
            config.max_ticks = ticks;
        }
        if let Some(tick) = parse(&lookup, "TASK_RUNNER_ALARM_TICK") {
            config.alarm_tick = tick;
        }
        if let Some(battery) = parse(&lookup, "TASK_RUNNER_BATTERY") {
            config.battery = battery;
        }

        config
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn alarm_enabled(&self) -> bool {
        self.alarm_tick > 0
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            alarm_tick: Self::DEFAULT_ALARM_TICK,
            battery: Self::DEFAULT_BATTERY,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
