use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Config error: {0}")]
    ConfigIo(String),

    #[error("Failed to fetch version catalog: {0}")]
    CatalogFetch(String),

    #[error("Failed to scan installed versions: {0}")]
    Scan(String),

    #[error("No version selected for {0}")]
    MissingSelection(&'static str),

    #[error("Install error: {0}")]
    Install(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Installer backend error: {0}")]
    Backend(String),
}
