#[macro_use]
extern crate rocket;

use iometer_rs::metrics::{self, PrometheusSink};
use iometer_rs::{settings, Error, Meter};
use rocket::fairing::AdHoc;
use rocket::State;
use std::sync::Arc;

#[get("/metrics")]
fn metrics_route() -> Result<String, Error> {
    metrics::read()
}

#[get("/debug-log")]
fn debug_log_route(meter: &State<Meter>) -> String {
    meter.debug_log()
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let settings = settings::read_settings()?;
    log::info!("loaded settings: {:?}", settings);

    let sink = Arc::new(PrometheusSink::new(settings.id.clone()));
    let meter = Meter::new(settings, sink)?;

    rocket::build()
        .manage(meter)
        .mount("/", routes![metrics_route, debug_log_route])
        .attach(AdHoc::on_liftoff("IOMeter poller", |rocket| {
            Box::pin(async move {
                if let Some(meter) = rocket.state::<Meter>() {
                    log::info!(
                        "activating {} meter {} ({})",
                        meter.meter_type(),
                        meter.id(),
                        meter.alias()
                    );
                    if let Err(e) = meter.activate() {
                        log::error!("[{}] Unable to start polling: {}", meter.id(), e);
                    }
                }
            })
        }))
        .attach(AdHoc::on_shutdown("IOMeter poller", |rocket| {
            Box::pin(async move {
                if let Some(meter) = rocket.state::<Meter>() {
                    meter.deactivate();
                }
            })
        }))
        .launch()
        .await
        .map(|_| ())
        .map_err(|e| Error::InternalError(e.to_string()))
}
