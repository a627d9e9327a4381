//! Data source over an in-memory [`rdfdict::TripleStore`].

use super::{IdPattern, TripleSource};
use crate::errors::FragmentError;
use crate::pattern::TripleRole;
use crate::window::{MatchSequence, Seek};
use log::info;
use oxigraph::io::RdfFormat;
use oxigraph::model::{Term, Triple};
use rdfdict::{DictError, StoreOptions, TripleId, TripleIter, TripleStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const KIND: &str = "dictionary";

fn default_indexed() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    /// RDF file to load.
    pub file: PathBuf,
    /// Syntax of `file` as an extension (`ttl`) or media type (`text/turtle`).
    /// Guessed from the file name when absent.
    #[serde(default)]
    pub format: Option<String>,
    /// Build every triple permutation so that all patterns can seek.
    #[serde(default = "default_indexed")]
    pub indexed: bool,
}

impl DictionarySettings {
    /// `Some(None)` means "guess from the file name"; `None` is an unknown format.
    pub fn rdf_format(&self) -> Option<Option<RdfFormat>> {
        match &self.format {
            None => Some(None),
            Some(format) => RdfFormat::from_extension(format)
                .or_else(|| RdfFormat::from_media_type(format))
                .map(Some),
        }
    }
}

pub struct DictionarySource {
    store: TripleStore,
}

impl DictionarySource {
    pub fn new(store: TripleStore) -> Self {
        DictionarySource { store }
    }

    pub fn open(
        path: &Path,
        format: Option<RdfFormat>,
        indexed: bool,
    ) -> Result<Self, FragmentError> {
        let start = Instant::now();
        let store = TripleStore::load(path, format, StoreOptions { indexed })?;
        info!(
            "Loaded {} triples from {} in {:?}",
            store.len(),
            path.display(),
            start.elapsed()
        );
        Ok(DictionarySource { store })
    }

    pub fn store(&self) -> &TripleStore {
        &self.store
    }
}

impl TripleSource for DictionarySource {
    type Id = u64;
    type Match = TripleId;

    fn kind(&self) -> &'static str {
        KIND
    }

    fn locate(&self, term: &Term, role: TripleRole) -> Result<Option<u64>, FragmentError> {
        // terms the store cannot represent cannot occur in it
        Ok(rdfdict::Term::from_oxigraph(term.as_ref())
            .ok()
            .and_then(|term| self.store.dictionary().locate(&term, role)))
    }

    fn locate_blank(&self, label: &str, role: TripleRole) -> Result<Option<u64>, FragmentError> {
        Ok(self.store.dictionary().locate_blank(label, role))
    }

    fn search(
        &self,
        pattern: IdPattern<u64>,
    ) -> Result<Box<dyn MatchSequence<Item = TripleId> + '_>, FragmentError> {
        let ids = TripleId::new(
            pattern.subject.unwrap_or(0),
            pattern.predicate.unwrap_or(0),
            pattern.object.unwrap_or(0),
        );
        Ok(Box::new(DictionaryMatches {
            iter: self.store.search(ids),
        }))
    }

    fn decode(&self, item: TripleId) -> Result<Triple, FragmentError> {
        Ok(self.store.oxigraph_triple(item)?)
    }
}

struct DictionaryMatches<'a> {
    iter: TripleIter<'a>,
}

impl MatchSequence for DictionaryMatches<'_> {
    type Item = TripleId;

    fn next_match(&mut self) -> Result<Option<TripleId>, FragmentError> {
        Ok(self.iter.next())
    }

    fn seek(&mut self, offset: u64) -> Result<Seek, FragmentError> {
        if !self.iter.can_go_to() {
            return Ok(Seek::Unsupported);
        }
        match self.iter.go_to(offset) {
            Ok(()) => Ok(Seek::Positioned),
            Err(DictError::OutOfBounds { .. }) => Ok(Seek::OutOfBounds),
            Err(e) => Err(e.into()),
        }
    }

    fn estimated_total(&self) -> u64 {
        self.iter.estimated_num_results()
    }
}
