//! Error type shared by the library modules.

use thiserror::Error;

/// Everything that can go wrong between the API and a rendered chart.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Transport failure or non-success HTTP status.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The response body did not have the expected shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no data to plot")]
    NoData,

    #[error("no usable font found (set EPIVIZ_FONT or chart.font_path)")]
    FontUnavailable,

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a plotters drawing error, which only implements `Debug` generically.
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        Error::Render(format!("{e:?}"))
    }
}
