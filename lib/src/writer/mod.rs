//! Response writers, one per registered media type.
//!
//! [`WRITERS`] is the only place formats are registered. The first entry is the
//! default for clients whose Accept header matches nothing.

mod html;
mod rdf;

pub use self::html::HtmlWriter;
pub use self::rdf::RdfWriter;

use crate::errors::FragmentError;
use crate::fragment::{Fragment, FragmentRequest};
use std::fmt::Display;
use url::Url;

/// A dataset as linked from rendered pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLink {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Url,
}

/// Server-wide context shared by every page of a response.
#[derive(Debug, Clone)]
pub struct Site {
    pub title: String,
    pub base_url: Url,
    /// `(prefix, namespace)` pairs.
    pub prefixes: Vec<(String, String)>,
    pub datasets: Vec<DatasetLink>,
}

impl Site {
    pub fn dataset(&self, name: &str) -> Option<&DatasetLink> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// `prefix:local` for IRIs inside a known namespace.
    pub fn abbreviate(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| !namespace.is_empty())
            .find_map(|(prefix, namespace)| {
                iri.strip_prefix(namespace.as_str())
                    .filter(|local| !local.contains(['/', '#']))
                    .map(|local| format!("{prefix}:{local}"))
            })
    }
}

type Constructor = fn(&'static str) -> FragmentWriter;

fn html(_media: &'static str) -> FragmentWriter {
    FragmentWriter::Html(HtmlWriter)
}

fn rdf(media: &'static str) -> FragmentWriter {
    FragmentWriter::Rdf(RdfWriter::new(media))
}

/// Registered media types and their writers, in preference order.
pub static WRITERS: [(&str, Constructor); 5] = [
    ("text/html", html),
    ("application/rdf+xml", rdf),
    ("application/n-triples", rdf),
    ("application/ld+json", rdf),
    ("text/turtle", rdf),
];

pub fn media_types() -> Vec<&'static str> {
    WRITERS.iter().map(|(media, _)| *media).collect()
}

#[derive(Debug, Clone)]
pub enum FragmentWriter {
    Html(HtmlWriter),
    Rdf(RdfWriter),
}

impl FragmentWriter {
    /// Writer registered for `media`, or the default writer.
    pub fn for_media_type(media: &str) -> FragmentWriter {
        let (media, constructor) = WRITERS
            .iter()
            .find(|(registered, _)| *registered == media)
            .copied()
            .unwrap_or(WRITERS[0]);
        constructor(media)
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            FragmentWriter::Html(_) => WRITERS[0].0,
            FragmentWriter::Rdf(writer) => writer.media_type(),
        }
    }

    /// Value of the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("{}; charset=utf-8", self.media_type())
    }

    /// Render one page of a dataset. `dataset` is `None` for the index.
    pub fn write_fragment(
        &self,
        site: &Site,
        dataset: Option<&DatasetLink>,
        fragment: &Fragment,
        request: &FragmentRequest,
    ) -> Result<Vec<u8>, FragmentError> {
        match self {
            FragmentWriter::Html(writer) => Ok(writer.fragment(site, dataset, fragment, request)),
            FragmentWriter::Rdf(writer) => writer.fragment(site, fragment),
        }
    }

    pub fn write_not_found(&self, site: &Site, url: &str) -> Vec<u8> {
        match self {
            FragmentWriter::Html(writer) => writer.not_found(site, url),
            FragmentWriter::Rdf(writer) => writer.not_found(url),
        }
    }

    pub fn write_error(&self, site: &Site, error: &dyn Display) -> Vec<u8> {
        match self {
            FragmentWriter::Html(writer) => writer.error(site, error),
            FragmentWriter::Rdf(writer) => writer.error(error),
        }
    }
}
