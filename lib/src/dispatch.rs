//! Request dispatch: dataset lookup, pattern evaluation and content-negotiated writing.
//!
//! The dispatcher is independent of the HTTP layer so that the server and the
//! command line produce byte-identical responses.

use crate::config::Config;
use crate::errors::ConfigError;
use crate::fragment::FragmentRequest;
use crate::negotiate::negotiate;
use crate::registry::{dataset_url, Registry};
use crate::writer::{self, DatasetLink, FragmentWriter, Site};
use axum::http::StatusCode;
use log::{debug, error};
use url::Url;

/// The parts of an HTTP GET the dispatcher looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Path segment naming the dataset; `None` for the index.
    pub dataset: Option<String>,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub host: Option<String>,
    pub accept: Option<String>,
}

impl DispatchRequest {
    pub fn dataset(name: impl Into<String>) -> Self {
        DispatchRequest {
            dataset: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

pub struct Dispatcher {
    config: Config,
    registry: Registry,
    media_types: Vec<&'static str>,
}

impl Dispatcher {
    pub fn new(config: Config, registry: Registry) -> Self {
        Dispatcher {
            config,
            registry,
            media_types: writer::media_types(),
        }
    }

    /// Open every dataset of `config`.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let registry = Registry::from_config(&config)?;
        Ok(Dispatcher::new(config, registry))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn site(&self, base_url: Url) -> Site {
        Site {
            title: self.config.title.clone(),
            prefixes: self
                .config
                .prefixes
                .iter()
                .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
                .collect(),
            datasets: self
                .registry
                .datasets()
                .map(|dataset| DatasetLink {
                    name: dataset.name.clone(),
                    title: dataset.title.clone(),
                    description: dataset.description.clone(),
                    url: dataset_url(&base_url, &dataset.name),
                })
                .collect(),
            base_url,
        }
    }

    /// Answer one GET request. Never fails: problems become 404 or 500 responses
    /// rendered in the negotiated format.
    pub fn handle(&self, request: &DispatchRequest) -> DispatchResponse {
        let media = negotiate(request.accept.as_deref(), &self.media_types);
        let writer = FragmentWriter::for_media_type(media);
        debug!(
            "GET /{}?{} as {}",
            request.dataset.as_deref().unwrap_or_default(),
            request.query.as_deref().unwrap_or_default(),
            writer.media_type()
        );
        let respond = |status: StatusCode, body: Vec<u8>| DispatchResponse {
            status,
            content_type: writer.content_type(),
            body,
        };

        let base_url = match self.config.base_url(request.host.as_deref()) {
            Ok(base_url) => base_url,
            Err(e) => {
                error!("{e}");
                let site = self.site(Url::parse("http://localhost/").expect("static URL"));
                return respond(StatusCode::INTERNAL_SERVER_ERROR, writer.write_error(&site, &e));
            }
        };
        let site = self.site(base_url.clone());
        let query = request.query.as_deref();

        let Some(name) = request.dataset.as_deref() else {
            let fragment_request =
                FragmentRequest::from_query("", base_url, query, self.config.page_size);
            let index = self.registry.index_fragment(&fragment_request);
            return match writer.write_fragment(&site, None, &index, &fragment_request) {
                Ok(body) => respond(StatusCode::OK, body),
                Err(e) => {
                    error!("cannot render the index: {e}");
                    respond(StatusCode::INTERNAL_SERVER_ERROR, writer.write_error(&site, &e))
                }
            };
        };

        let url = dataset_url(&base_url, name);
        let (Some(dataset), Some(link)) = (self.registry.get(name), site.dataset(name)) else {
            let mut requested = url;
            requested.set_query(query.filter(|q| !q.is_empty()));
            debug!("no dataset named '{name}'");
            return respond(
                StatusCode::NOT_FOUND,
                writer.write_not_found(&site, requested.as_str()),
            );
        };

        let fragment_request = FragmentRequest::from_query(name, url, query, self.config.page_size);
        let written = dataset
            .source()
            .fragment(&fragment_request)
            .and_then(|fragment| writer.write_fragment(&site, Some(link), &fragment, &fragment_request));
        match written {
            Ok(body) => respond(StatusCode::OK, body),
            Err(e) => {
                error!("request on dataset '{name}' failed: {e}");
                respond(StatusCode::INTERNAL_SERVER_ERROR, writer.write_error(&site, &e))
            }
        }
    }

    /// Close every dataset.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }
}
