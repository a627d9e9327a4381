//! Fragment requests and the pages answering them.

use crate::metadata::Hypermedia;
use crate::pattern::{parse_page, PatternTerm, TripleRole};
use crate::window::is_last_page;
use oxigraph::model::Triple;
use std::collections::HashMap;
use url::{form_urlencoded, Url};

/// A triple pattern lookup against one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRequest {
    /// Registry name; empty for the index.
    pub dataset: String,
    pub dataset_url: Url,
    /// Dataset URL plus the original query string.
    pub fragment_url: Url,
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
}

impl FragmentRequest {
    /// Build a request from a raw query string. The first occurrence of each
    /// parameter wins.
    pub fn from_query(
        dataset: &str,
        dataset_url: Url,
        query: Option<&str>,
        page_size: u64,
    ) -> Self {
        let query = query.filter(|q| !q.is_empty());
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        let param = |name: &str| params.get(name).map(String::as_str);

        let mut fragment_url = dataset_url.clone();
        fragment_url.set_query(query);
        FragmentRequest {
            dataset: dataset.to_string(),
            dataset_url,
            fragment_url,
            subject: PatternTerm::parse(param("subject"), TripleRole::Subject),
            predicate: PatternTerm::parse(param("predicate"), TripleRole::Predicate),
            object: PatternTerm::parse(param("object"), TripleRole::Object),
            page: parse_page(param("page")),
            page_size,
        }
    }

    /// Number of matches preceding this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn pattern(&self, role: TripleRole) -> &PatternTerm {
        match role {
            TripleRole::Subject => &self.subject,
            TripleRole::Predicate => &self.predicate,
            TripleRole::Object => &self.object,
        }
    }
}

/// One page of matching triples with its count estimate and controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub triples: Vec<Triple>,
    /// Reconciled estimate of the total number of matches.
    pub total_size: u64,
    pub page_size: u64,
    pub is_last_page: bool,
    pub hypermedia: Hypermedia,
}

impl Fragment {
    pub fn new(request: &FragmentRequest, triples: Vec<Triple>, total_size: u64) -> Self {
        Fragment {
            is_last_page: is_last_page(total_size, request.offset(), request.page_size),
            hypermedia: Hypermedia::build(request, total_size, request.page_size),
            triples,
            total_size,
            page_size: request.page_size,
        }
    }

    /// The answer for a pattern that cannot match anything.
    pub fn empty(request: &FragmentRequest) -> Self {
        Fragment::new(request, Vec::new(), 0)
    }

    /// A fragment holding every triple on one page, regardless of the page size
    /// or the requested page.
    pub fn single_page(request: &FragmentRequest, triples: Vec<Triple>) -> Self {
        let total_size = triples.len() as u64;
        let page_size = request.page_size.max(total_size);
        let first = FragmentRequest {
            page: 1,
            page_size,
            ..request.clone()
        };
        Fragment {
            hypermedia: Hypermedia::build(&first, total_size, page_size),
            triples,
            total_size,
            page_size,
            is_last_page: true,
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Metadata, then the matches, then the controls.
    pub fn statements(&self) -> impl Iterator<Item = Triple> + '_ {
        self.hypermedia
            .metadata()
            .into_iter()
            .chain(self.triples.iter().cloned())
            .chain(self.hypermedia.controls())
    }
}
