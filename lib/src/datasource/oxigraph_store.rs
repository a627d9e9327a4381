//! Data source over an on-disk oxigraph store, opened read-only.
//!
//! Patterns are evaluated against the default graph. Searches can only move
//! forwards and estimate their size as the number of matches seen so far.

use super::{IdPattern, TripleSource};
use crate::errors::FragmentError;
use crate::pattern::TripleRole;
use crate::window::{MatchSequence, Seek};
use log::info;
use oxigraph::model::{
    BlankNode, GraphNameRef, NamedNodeRef, NamedOrBlankNodeRef, Quad, Term, TermRef, Triple,
};
use oxigraph::store::{StorageError, Store};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const KIND: &str = "oxigraph";

#[derive(Debug, Clone, Deserialize)]
pub struct OxigraphSettings {
    /// Directory of the store.
    pub path: PathBuf,
}

pub struct OxigraphSource {
    store: Store,
}

impl OxigraphSource {
    pub fn new(store: Store) -> Self {
        OxigraphSource { store }
    }

    pub fn open(path: &Path) -> Result<Self, FragmentError> {
        let store = Store::open_read_only(path)?;
        info!("Opened oxigraph store at {}", path.display());
        Ok(OxigraphSource { store })
    }
}

fn subject_ref(term: &Term) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        Term::NamedNode(node) => Some(node.as_ref().into()),
        Term::BlankNode(node) => Some(node.as_ref().into()),
        _ => None,
    }
}

fn predicate_ref(term: &Term) -> Option<NamedNodeRef<'_>> {
    match term {
        Term::NamedNode(node) => Some(node.as_ref()),
        _ => None,
    }
}

impl TripleSource for OxigraphSource {
    type Id = Term;
    type Match = Quad;

    fn kind(&self) -> &'static str {
        KIND
    }

    fn locate(&self, term: &Term, role: TripleRole) -> Result<Option<Term>, FragmentError> {
        let default_graph = Some(GraphNameRef::DefaultGraph);
        let mut found = match role {
            TripleRole::Subject => match subject_ref(term) {
                Some(s) => self.store.quads_for_pattern(Some(s), None, None, default_graph),
                None => return Ok(None),
            },
            TripleRole::Predicate => match predicate_ref(term) {
                Some(p) => self.store.quads_for_pattern(None, Some(p), None, default_graph),
                None => return Ok(None),
            },
            TripleRole::Object => {
                self.store
                    .quads_for_pattern(None, None, Some(term.as_ref()), default_graph)
            }
        };
        match found.next() {
            Some(Ok(_)) => Ok(Some(term.clone())),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    fn locate_blank(&self, label: &str, role: TripleRole) -> Result<Option<Term>, FragmentError> {
        match BlankNode::new(label) {
            Ok(node) => self.locate(&Term::from(node), role),
            Err(_) => Ok(None),
        }
    }

    fn search(
        &self,
        pattern: IdPattern<Term>,
    ) -> Result<Box<dyn MatchSequence<Item = Quad> + '_>, FragmentError> {
        let subject: Option<NamedOrBlankNodeRef<'_>> =
            pattern.subject.as_ref().and_then(subject_ref);
        let predicate: Option<NamedNodeRef<'_>> =
            pattern.predicate.as_ref().and_then(predicate_ref);
        let object: Option<TermRef<'_>> = pattern.object.as_ref().map(Term::as_ref);
        let quads = self.store.quads_for_pattern(
            subject,
            predicate,
            object,
            Some(GraphNameRef::DefaultGraph),
        );
        Ok(Box::new(QuadMatches { quads, seen: 0 }))
    }

    fn decode(&self, item: Quad) -> Result<Triple, FragmentError> {
        Ok(item.into())
    }

    fn close(&self) {
        info!("Closing oxigraph store");
    }
}

struct QuadMatches<I> {
    quads: I,
    seen: u64,
}

impl<I> MatchSequence for QuadMatches<I>
where
    I: Iterator<Item = Result<Quad, StorageError>>,
{
    type Item = Quad;

    fn next_match(&mut self) -> Result<Option<Quad>, FragmentError> {
        match self.quads.next() {
            Some(Ok(quad)) => {
                self.seen += 1;
                Ok(Some(quad))
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    fn seek(&mut self, _offset: u64) -> Result<Seek, FragmentError> {
        Ok(Seek::Unsupported)
    }

    fn estimated_total(&self) -> u64 {
        self.seen
    }
}
