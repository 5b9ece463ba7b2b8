pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
pub use error::Error;
use reqwest::{Client, Url};
use std::time::Duration;

pub fn api(base_url: String, jwt: String) -> model::Api {
    model::Api { base_url, jwt }
}

/// Build the HTTP client shared by all ticks. `timeout` bounds both connecting and the whole
/// request, so a hung server cannot stall the poller.
pub fn client(timeout: Duration) -> Result<Client, Error> {
    reqwest::ClientBuilder::new()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::InternalError(e.to_string()))
}

/// `base_url` with the token appended as query credential.
pub fn reading_url(api: &model::Api) -> Result<Url, Error> {
    Url::parse_with_params(&api.base_url, &[(endpoint::TOKEN_PARAM, &api.jwt)])
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", api.base_url, e)))
}

/// Map transport errors to Error. The URL is dropped from the message since it carries the token.
fn map_fetch_err(error: reqwest::Error) -> Error {
    let error = error.without_url();
    if error.is_timeout() {
        Error::FetchError(format!("request timed out ({})", error))
    } else {
        Error::FetchError(error.to_string())
    }
}

/// Issue a single GET for the reading list and return the body of a `200 OK` response.
pub async fn fetch(api: &model::Api, client: &Client) -> Result<String, Error> {
    let response = client
        .get(reading_url(api)?)
        .send()
        .await
        .map_err(map_fetch_err)?;

    match response.status() {
        http::StatusCode::OK => response.text().await.map_err(map_fetch_err),
        status => Err(Error::HttpStatus(status)),
    }
}

/// Fetch the reading list and extract the values of the most recent reading.
/// `Ok(None)` means the API answered with an empty list.
pub async fn latest_values(
    api: &model::Api,
    client: &Client,
) -> Result<Option<model::MeterValues>, Error> {
    let response_text = fetch(api, client).await?;

    log::trace!("base_url: {}, response_text: {}", api.base_url, response_text);

    response::parse(&response_text)
}
