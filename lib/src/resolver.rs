//! Maps pattern elements onto a storage engine's identifier space.

use crate::datasource::TripleSource;
use crate::errors::FragmentError;
use crate::pattern::{PatternElement, PatternTerm, TripleRole};
use std::collections::HashMap;

/// Outcome of resolving one pattern position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<Id> {
    /// Matches any term.
    Wildcard,
    Id(Id),
    /// Nothing in the dataset can match this position.
    NoMatch,
}

impl<Id> Resolved<Id> {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Resolved::NoMatch)
    }

    /// `None` for the wildcard. Must not be called on [`Resolved::NoMatch`].
    pub fn into_bound(self) -> Option<Id> {
        match self {
            Resolved::Id(id) => Some(id),
            Resolved::Wildcard | Resolved::NoMatch => None,
        }
    }
}

/// Request-scoped resolver. Blank node labels resolve to the same answer for the
/// lifetime of one resolver.
pub struct TermResolver<'a, S: TripleSource + ?Sized> {
    source: &'a S,
    blank_nodes: HashMap<(TripleRole, String), Option<S::Id>>,
}

impl<'a, S: TripleSource + ?Sized> TermResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        TermResolver {
            source,
            blank_nodes: HashMap::new(),
        }
    }

    pub fn resolve(
        &mut self,
        term: &PatternTerm,
        role: TripleRole,
    ) -> Result<Resolved<S::Id>, FragmentError> {
        let element = match term {
            PatternTerm::Valid(element) => element,
            PatternTerm::Invalid(_) => return Ok(Resolved::NoMatch),
        };
        let id = match element {
            PatternElement::Variable(_) => return Ok(Resolved::Wildcard),
            PatternElement::Fixed(term) => self.source.locate(term, role)?,
            PatternElement::AnonymousVariable(label) => {
                let key = (role, label.clone());
                match self.blank_nodes.get(&key) {
                    Some(id) => id.clone(),
                    None => {
                        let id = self.source.locate_blank(label, role)?;
                        self.blank_nodes.insert(key, id.clone());
                        id
                    }
                }
            }
        };
        Ok(id.map_or(Resolved::NoMatch, Resolved::Id))
    }
}
