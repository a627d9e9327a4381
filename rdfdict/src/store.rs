//! Immutable store: dictionary plus triple permutations.

#[cfg(feature = "oxigraph")]
use std::path::Path;

use crate::dictionary::{Dictionary, TripleRole};
use crate::error::DictError;
use crate::term::Term;
use crate::triples::{TripleId, TripleIndex, TripleIter};

/// Options controlling how a store is built.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Build POS and OSP permutations so every pattern is a seekable range.
    pub indexed: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions { indexed: true }
    }
}

/// Dictionary-encoded, read-only triple store.
#[derive(Debug, Clone)]
pub struct TripleStore {
    dictionary: Dictionary,
    triples: TripleIndex,
}

impl TripleStore {
    /// Build a store from term triples. Duplicates are collapsed.
    ///
    /// Fails if a subject is a literal or a predicate is not an IRI.
    pub fn from_triples<I>(triples: I, options: StoreOptions) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (Term, Term, Term)>,
    {
        let triples: Vec<(Term, Term, Term)> = triples.into_iter().collect();
        for (s, p, _) in &triples {
            if s.is_literal() {
                return Err(DictError::Invalid("literal subject"));
            }
            if !p.is_iri() {
                return Err(DictError::Invalid("non-IRI predicate"));
            }
        }
        let dictionary = Dictionary::build(triples.iter().map(|(s, p, o)| (s, p, o)));
        let mut ids = Vec::with_capacity(triples.len());
        for (s, p, o) in &triples {
            let id = match (
                dictionary.locate(s, TripleRole::Subject),
                dictionary.locate(p, TripleRole::Predicate),
                dictionary.locate(o, TripleRole::Object),
            ) {
                (Some(s), Some(p), Some(o)) => TripleId::new(s, p, o),
                _ => return Err(DictError::Corrupt(format!("unencodable triple {s} {p} {o}"))),
            };
            ids.push(id);
        }
        Ok(TripleStore {
            dictionary,
            triples: TripleIndex::build(ids, options.indexed),
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.triples.is_indexed()
    }

    /// Find the triples matching an id pattern (`0` = wildcard).
    pub fn search(&self, pattern: TripleId) -> TripleIter<'_> {
        self.triples.search(pattern)
    }

    /// Resolve an id triple to its terms.
    pub fn decode(&self, id: TripleId) -> crate::Result<(&Term, &Term, &Term)> {
        let lookup = |v: u64, role: TripleRole| {
            self.dictionary
                .term(v, role)
                .ok_or_else(|| DictError::Corrupt(format!("unknown {:?} id {}", role, v)))
        };
        Ok((
            lookup(id.subject, TripleRole::Subject)?,
            lookup(id.predicate, TripleRole::Predicate)?,
            lookup(id.object, TripleRole::Object)?,
        ))
    }
}

#[cfg(feature = "oxigraph")]
impl TripleStore {
    /// Parse an RDF file into a store. The syntax is guessed from the file
    /// extension unless `format` is given. Quads from every graph are merged.
    pub fn load(
        path: &Path,
        format: Option<oxigraph::io::RdfFormat>,
        options: StoreOptions,
    ) -> crate::Result<Self> {
        let format = format
            .or_else(|| format_from_path(path))
            .ok_or(DictError::Invalid("cannot guess RDF syntax from file name"))?;
        let file = std::fs::File::open(path)?;
        Self::load_from_reader(std::io::BufReader::new(file), format, options)
    }

    /// Parse RDF from a reader into a store.
    pub fn load_from_reader<R: std::io::Read>(
        reader: R,
        format: oxigraph::io::RdfFormat,
        options: StoreOptions,
    ) -> crate::Result<Self> {
        use oxigraph::io::RdfParser;
        use oxigraph::model::TermRef;
        let mut triples = Vec::new();
        for quad in RdfParser::from_format(format).for_reader(reader) {
            let quad = quad.map_err(|e| DictError::Parse(e.to_string()))?;
            triples.push((
                Term::from_oxigraph(TermRef::from(quad.subject.as_ref()))?,
                Term::Iri(quad.predicate.as_str().to_string()),
                Term::from_oxigraph(quad.object.as_ref())?,
            ));
        }
        Self::from_triples(triples, options)
    }

    /// Convert an id triple into an oxigraph triple.
    pub fn oxigraph_triple(&self, id: TripleId) -> crate::Result<oxigraph::model::Triple> {
        let (s, p, o) = self.decode(id)?;
        Ok(oxigraph::model::Triple::new(
            s.to_oxigraph_subject()?,
            p.to_oxigraph_predicate()?,
            o.to_oxigraph()?,
        ))
    }
}

/// Guess an RDF syntax from a file extension.
#[cfg(feature = "oxigraph")]
pub fn format_from_path(path: &Path) -> Option<oxigraph::io::RdfFormat> {
    use oxigraph::io::RdfFormat;
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    match ext {
        "ttl" => Some(RdfFormat::Turtle),
        "nt" => Some(RdfFormat::NTriples),
        "n3" => Some(RdfFormat::N3),
        "xml" | "rdf" | "owl" => Some(RdfFormat::RdfXml),
        "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        other => RdfFormat::from_extension(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_literal_subjects_and_blank_predicates() {
        let lit = Term::Literal {
            lex: "x".into(),
            dt: None,
            lang: None,
        };
        let p = Term::Iri("http://ex/p".into());
        let err = TripleStore::from_triples(
            vec![(lit.clone(), p.clone(), lit.clone())],
            StoreOptions::default(),
        );
        assert!(err.is_err());
        let err = TripleStore::from_triples(
            vec![(p.clone(), Term::BNode("b".into()), lit)],
            StoreOptions::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn decode_rejects_unknown_ids() {
        let a = Term::Iri("http://ex/a".into());
        let store =
            TripleStore::from_triples(vec![(a.clone(), a.clone(), a)], StoreOptions::default())
                .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.decode(TripleId::new(1, 1, 1)).is_ok());
        assert!(store.decode(TripleId::new(7, 1, 1)).is_err());
    }
}
