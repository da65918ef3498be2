use thiserror::Error;

#[derive(Error, Debug)]
pub enum YahooError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status {status}")]
    Status { status: u16 },

    #[error("yahoo api error [{code}]: {description}")]
    Api { code: String, description: String },

    #[error("invalid response from yahoo: {0}")]
    InvalidResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}
