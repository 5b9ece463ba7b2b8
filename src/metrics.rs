use crate::api::Error;
use crate::model::ChannelId;
use crate::sink::ChannelSink;
use prometheus::{Encoder, IntGaugeVec, TextEncoder};
use std::time::{SystemTime, UNIX_EPOCH};

lazy_static! {
    static ref ACTIVE_CONSUMPTION_ENERGY_GAUGE: IntGaugeVec = register_int_gauge_vec!(
        opts!(
            "active_consumption_energy",
            "cumulative energy consumed from the grid (in Wh)",
        ),
        &["component_id"],
    )
    .unwrap();
    static ref ACTIVE_PRODUCTION_ENERGY_GAUGE: IntGaugeVec = register_int_gauge_vec!(
        opts!(
            "active_production_energy",
            "cumulative energy fed into the grid (in Wh)",
        ),
        &["component_id"],
    )
    .unwrap();
    static ref ACTIVE_POWER_GAUGE: IntGaugeVec = register_int_gauge_vec!(
        opts!(
            "active_power",
            "active power reported by the meter (in W, negative when exporting)",
        ),
        &["component_id"],
    )
    .unwrap();
    static ref CHANNEL_LAST_UPDATE_GAUGE: IntGaugeVec = register_int_gauge_vec!(
        opts!(
            "channel_last_update_seconds",
            "unix time of the last value written to a channel",
        ),
        &["component_id", "channel"],
    )
    .unwrap();
}

/// Channel sink exposing every channel as a Prometheus gauge labelled with the component id.
#[derive(Debug, Clone)]
pub struct PrometheusSink {
    component_id: String,
}

impl PrometheusSink {
    pub fn new(component_id: impl Into<String>) -> Self {
        PrometheusSink {
            component_id: component_id.into(),
        }
    }
}

impl ChannelSink for PrometheusSink {
    fn set_next_value(&self, channel: ChannelId, value: i64) -> Result<(), Error> {
        let gauge = match channel {
            ChannelId::ActiveConsumptionEnergy => &*ACTIVE_CONSUMPTION_ENERGY_GAUGE,
            ChannelId::ActiveProductionEnergy => &*ACTIVE_PRODUCTION_ENERGY_GAUGE,
            ChannelId::ActivePower => &*ACTIVE_POWER_GAUGE,
        };
        gauge.with_label_values(&[&self.component_id]).set(value);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::SinkError(e.to_string()))?;
        CHANNEL_LAST_UPDATE_GAUGE
            .with_label_values(&[&self.component_id, channel.name()])
            .set(now.as_secs() as i64);

        Ok(())
    }
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(Error::FormatError))?;
    String::from_utf8(buffer).or(Err(Error::FormatError))
}
