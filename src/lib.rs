// Library interface for the XoXoComics content source
// Hosts drive `sources::Source`; the other modules are the fetch/extract/normalize pipeline behind it

pub mod config;
pub mod error;
pub mod helpers;
pub mod http_client;
pub mod models;
pub mod parser;
pub mod rules;
pub mod sources;

pub use config::Config;
pub use error::{NetworkError, SourceResult};
pub use http_client::{Fetch, HttpFetcher};
pub use sources::{Source, XoXoComics};
