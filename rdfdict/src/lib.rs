//! rdfdict: compact, immutable, dictionary-encoded triple store.
//!
//! Terms are replaced by role-specific integer identifiers (HDT style: a
//! shared subject/object section followed by subject-only and object-only
//! sections, plus a separate predicate section). Triples are kept as sorted
//! id triples in SPO order, optionally with POS and OSP permutations so
//! that every triple pattern maps to one contiguous, seekable range.
//!
//! Quick start: build a store and search it
//!
//! ```
//! use rdfdict::{StoreOptions, Term, TripleId, TripleRole, TripleStore};
//!
//! let alice = Term::Iri("http://example.org/alice".into());
//! let knows = Term::Iri("http://xmlns.com/foaf/0.1/knows".into());
//! let bob = Term::Iri("http://example.org/bob".into());
//!
//! let store = TripleStore::from_triples(
//!     vec![(alice.clone(), knows.clone(), bob.clone())],
//!     StoreOptions::default(),
//! )
//! .expect("build");
//!
//! let p = store.dictionary().locate(&knows, TripleRole::Predicate).unwrap();
//! let mut matches = store.search(TripleId::new(0, p, 0));
//! assert_eq!(matches.estimated_num_results(), 1);
//! let first = matches.next().unwrap();
//! let (s, _, o) = store.decode(first).unwrap();
//! assert_eq!((s, o), (&alice, &bob));
//! ```
//!
//! With the `oxigraph` feature, [`TripleStore::load`] parses any RDF syntax
//! supported by oxigraph and [`TripleStore::oxigraph_triple`] converts id
//! triples back into oxigraph triples.

pub mod dictionary;
pub mod error;
pub mod store;
pub mod term;
pub mod triples;

pub use dictionary::{Dictionary, TripleRole};
pub use error::DictError;
pub use store::{StoreOptions, TripleStore};
pub use term::Term;
pub use triples::{TripleId, TripleIndex, TripleIter, TripleOrder};

/// Crate-level result type.
pub type Result<T> = std::result::Result<T, DictError>;
