use http::StatusCode;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub enum Error {
    FetchError(String),
    HttpStatus(StatusCode),
    InvalidResponse(String),
    InvalidField(String, String),
    InvalidUrl(String),
    SinkError(String),
    ConfigError(String),
    FormatError,
    InternalError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FetchError(s) => write!(f, "Failed to fetch meter data: {}", s),
            Error::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            Error::InvalidResponse(s) => write!(f, "Failed to process JSON response: {}", s),
            Error::InvalidField(key, value) => write!(
                f,
                "Failed to process JSON response: unexpected value for `{}`: {}",
                key, value
            ),
            Error::InvalidUrl(s) => write!(f, "Invalid base URL: {}", s),
            Error::SinkError(s) => write!(f, "Failed to write channel: {}", s),
            Error::ConfigError(s) => write!(f, "Configuration error: {}", s),
            Error::FormatError => write!(f, "Failed to encode metrics"),
            Error::InternalError(s) => write!(f, "Internal error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Error::ConfigError(error.to_string())
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let error = format!(
            "<html><body><h3>500 Internal Server Error</h3><code>{}</code></body></html>",
            self
        );
        Response::build()
            .status(Status::InternalServerError)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
