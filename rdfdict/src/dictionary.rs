//! Role-specific term dictionary.
//!
//! Layout (HDT style):
//!
//! - shared: terms used both as subject and object, ids `1..=S`
//! - subjects: subject-only terms, ids `S+1..`
//! - objects: object-only terms, ids `S+1..`
//! - predicates: ids `1..=P`
//!
//! Id `0` is never assigned; callers use it as the wildcard.

use std::collections::BTreeSet;

use crate::term::Term;

/// Position a term occupies inside a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TripleRole {
    Subject,
    Predicate,
    Object,
}

impl TripleRole {
    pub const ALL: [TripleRole; 3] = [
        TripleRole::Subject,
        TripleRole::Predicate,
        TripleRole::Object,
    ];
}

/// Sorted, duplicate-free list of terms. Local ids are 1-based.
#[derive(Debug, Clone, Default)]
struct Section {
    terms: Vec<Term>,
}

impl Section {
    fn from_set(set: BTreeSet<Term>) -> Self {
        Section {
            terms: set.into_iter().collect(),
        }
    }

    fn len(&self) -> u64 {
        self.terms.len() as u64
    }

    fn find(&self, term: &Term) -> Option<u64> {
        self.terms
            .binary_search(term)
            .ok()
            .map(|idx| idx as u64 + 1)
    }

    fn get(&self, local: u64) -> Option<&Term> {
        if local == 0 {
            return None;
        }
        self.terms.get((local - 1) as usize)
    }
}

/// Mapping between terms and compact role-specific identifiers.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    shared: Section,
    subjects: Section,
    objects: Section,
    predicates: Section,
}

impl Dictionary {
    /// Build the sections from every term occurrence of a triple set.
    pub(crate) fn build<'a, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (&'a Term, &'a Term, &'a Term)>,
    {
        let mut subjects = BTreeSet::new();
        let mut predicates = BTreeSet::new();
        let mut objects = BTreeSet::new();
        for (s, p, o) in triples {
            subjects.insert(s.clone());
            predicates.insert(p.clone());
            objects.insert(o.clone());
        }
        let shared: BTreeSet<Term> = subjects.intersection(&objects).cloned().collect();
        subjects.retain(|t| !shared.contains(t));
        objects.retain(|t| !shared.contains(t));
        Dictionary {
            shared: Section::from_set(shared),
            subjects: Section::from_set(subjects),
            objects: Section::from_set(objects),
            predicates: Section::from_set(predicates),
        }
    }

    /// Look up the identifier of `term` in the given role.
    ///
    /// Returns `None` if the term never occurs in that role.
    pub fn locate(&self, term: &Term, role: TripleRole) -> Option<u64> {
        match role {
            TripleRole::Predicate => self.predicates.find(term),
            TripleRole::Subject => self
                .shared
                .find(term)
                .or_else(|| self.subjects.find(term).map(|id| id + self.shared.len())),
            TripleRole::Object => self
                .shared
                .find(term)
                .or_else(|| self.objects.find(term).map(|id| id + self.shared.len())),
        }
    }

    /// Look up a blank node by label (without the `_:` prefix).
    pub fn locate_blank(&self, label: &str, role: TripleRole) -> Option<u64> {
        self.locate(&Term::BNode(label.to_string()), role)
    }

    /// Resolve an identifier back to its term.
    pub fn term(&self, id: u64, role: TripleRole) -> Option<&Term> {
        let n_shared = self.shared.len();
        match role {
            TripleRole::Predicate => self.predicates.get(id),
            TripleRole::Subject if id <= n_shared => self.shared.get(id),
            TripleRole::Subject => self.subjects.get(id - n_shared),
            TripleRole::Object if id <= n_shared => self.shared.get(id),
            TripleRole::Object => self.objects.get(id - n_shared),
        }
    }

    /// Number of terms used both as subject and object.
    pub fn num_shared(&self) -> u64 {
        self.shared.len()
    }

    /// Number of distinct subjects (shared section included).
    pub fn num_subjects(&self) -> u64 {
        self.shared.len() + self.subjects.len()
    }

    /// Number of distinct objects (shared section included).
    pub fn num_objects(&self) -> u64 {
        self.shared.len() + self.objects.len()
    }

    pub fn num_predicates(&self) -> u64 {
        self.predicates.len()
    }
}
