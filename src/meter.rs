use crate::api::{self, Error};
use crate::model::{Api, ChannelId, MeterType, PollTiming};
use crate::poller::Poller;
use crate::publisher::Publisher;
use crate::settings::Settings;
use crate::sink::ChannelSink;
use reqwest::Client;
use std::sync::Arc;

/// IOMeter reading client: polls the reading API and republishes the latest values into the
/// channels of `sink`.
pub struct Meter {
    settings: Settings,
    timing: PollTiming,
    api: Api,
    client: Client,
    publisher: Arc<Publisher>,
    poller: Poller,
}

impl Meter {
    pub fn new(settings: Settings, sink: Arc<dyn ChannelSink>) -> Result<Self, Error> {
        Self::with_timing(settings, sink, PollTiming::default())
    }

    pub fn with_timing(
        settings: Settings,
        sink: Arc<dyn ChannelSink>,
        timing: PollTiming,
    ) -> Result<Self, Error> {
        let api = api::api(settings.base_url.clone(), settings.jwt.clone());
        /* Fail early on a base URL we could never request */
        api::reading_url(&api)?;

        Ok(Meter {
            client: api::client(timing.timeout)?,
            poller: Poller::new(settings.id.clone()),
            publisher: Arc::new(Publisher::new(sink)),
            settings,
            timing,
            api,
        })
    }

    pub fn id(&self) -> &str {
        &self.settings.id
    }

    pub fn alias(&self) -> &str {
        self.settings.alias()
    }

    pub fn meter_type(&self) -> MeterType {
        self.settings.meter_type
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_running()
    }

    /// Start polling. Must be called from within a Tokio runtime. A disabled meter stays idle.
    pub fn activate(&self) -> Result<(), Error> {
        if !self.settings.enabled {
            log::info!("[{}] meter is disabled, not polling", self.id());
            return Ok(());
        }

        self.publisher.open();

        let id = self.settings.id.clone();
        let api = self.api.clone();
        let client = self.client.clone();
        let publisher = Arc::clone(&self.publisher);
        let started = self.poller.start(self.timing.interval, move || {
            update(id.clone(), api.clone(), client.clone(), Arc::clone(&publisher))
        });

        if started.is_err() {
            self.publisher.close();
        }
        started
    }

    /// Stop polling. Once this returns no channel is written any more.
    pub fn deactivate(&self) {
        self.publisher.close();
        self.poller.stop();
    }

    /// Short summary for debug logging, e.g. `L:1234 W`.
    pub fn debug_log(&self) -> String {
        match self.publisher.active_power() {
            Some(power) => format!("L:{} {}", power, ChannelId::ActivePower.unit()),
            None => String::from("L:UNDEFINED"),
        }
    }
}

impl Drop for Meter {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// One tick: fetch the reading list, extract the latest values and publish them.
async fn update(
    id: String,
    api: Api,
    client: Client,
    publisher: Arc<Publisher>,
) -> Result<(), Error> {
    match api::latest_values(&api, &client).await? {
        Some(values) => {
            let written = publisher.publish(&values)?;
            log::debug!("[{}] published {} channel(s): {:?}", id, written, values);
        }
        None => log::warn!("[{}] No readings received from IOMeter API", id),
    }
    Ok(())
}
