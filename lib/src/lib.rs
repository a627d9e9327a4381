//! Triple Pattern Fragments over read-only RDF datasets.
//!
//! A request names a dataset and a triple pattern. The pattern terms are resolved
//! against the dataset's storage engine, the matches are cut into one page with a
//! count estimate that never under-reports, and the page is written with Hydra
//! paging and search controls in the format the client negotiated.
//!
//! ```no_run
//! use ldfserver::config::Config;
//! use ldfserver::dispatch::{DispatchRequest, Dispatcher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::from_file(std::path::Path::new("config.json"))?;
//! let dispatcher = Dispatcher::from_config(config)?;
//! let response = dispatcher.handle(
//!     &DispatchRequest::dataset("dbpedia")
//!         .with_query("predicate=http%3A%2F%2Fxmlns.com%2Ffoaf%2F0.1%2Fname")
//!         .with_accept("text/turtle"),
//! );
//! println!("{}", String::from_utf8_lossy(&response.body));
//! # Ok(())
//! # }
//! ```

extern crate derive_builder;

pub mod config;
pub mod consts;
pub mod datasource;
pub mod dispatch;
pub mod errors;
pub mod fragment;
pub mod metadata;
pub mod negotiate;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod window;
pub mod writer;

pub use crate::config::Config;
pub use crate::dispatch::{DispatchRequest, DispatchResponse, Dispatcher};
pub use crate::errors::{ConfigError, FragmentError};
pub use crate::fragment::{Fragment, FragmentRequest};
