use serde::Deserialize;
use std::fmt;
use std::time::Duration;

type Wh = i64;
type W = i32;

/// How far the poller waits between the end of one tick and the start of the next.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Applied both to connection establishment and to the whole request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Api {
    pub base_url: String,
    pub jwt: String,
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.base_url)
            .field("jwt", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        PollTiming {
            interval: POLL_INTERVAL,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Values extracted from the most recent reading. A `None` member means the key was absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeterValues {
    pub energy: Option<Wh>,
    pub energy_out: Option<Wh>,
    pub power: Option<W>,
}

impl MeterValues {
    pub fn is_empty(&self) -> bool {
        self.energy.is_none() && self.energy_out.is_none() && self.power.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    ActiveConsumptionEnergy,
    ActiveProductionEnergy,
    ActivePower,
}

impl ChannelId {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelId::ActiveConsumptionEnergy => "ActiveConsumptionEnergy",
            ChannelId::ActiveProductionEnergy => "ActiveProductionEnergy",
            ChannelId::ActivePower => "ActivePower",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ChannelId::ActiveConsumptionEnergy | ChannelId::ActiveProductionEnergy => "Wh",
            ChannelId::ActivePower => "W",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterType {
    Grid,
    Production,
    Consumption,
}

impl Default for MeterType {
    fn default() -> Self {
        MeterType::Grid
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeterType::Grid => "grid",
            MeterType::Production => "production",
            MeterType::Consumption => "consumption",
        };
        f.write_str(name)
    }
}
