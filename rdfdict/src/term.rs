//! RDF terms as stored in the dictionary.

use std::fmt;

#[cfg(feature = "oxigraph")]
use crate::error::DictError;

/// RDF term kept in a dictionary section.
///
/// Blank node labels are stored without the `_:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// IRI/URI node.
    Iri(String),
    /// Blank node label.
    BNode(String),
    /// Literal with optional datatype or language tag.
    Literal {
        lex: String,
        dt: Option<String>,
        lang: Option<String>,
    },
}

impl Term {
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::BNode(label) => write!(f, "_:{}", label),
            Term::Literal { lex, dt, lang } => match (dt, lang) {
                (Some(dt), _) => write!(f, "\"{}\"^^<{}>", lex, dt),
                (None, Some(lang)) => write!(f, "\"{}\"@{}", lex, lang),
                _ => write!(f, "\"{}\"", lex),
            },
        }
    }
}

#[cfg(feature = "oxigraph")]
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

#[cfg(feature = "oxigraph")]
impl Term {
    /// Convert an oxigraph term into a dictionary term.
    ///
    /// Plain `xsd:string` literals are stored without a datatype so that
    /// `"a"` and `"a"^^xsd:string` share one dictionary entry.
    pub fn from_oxigraph(term: oxigraph::model::TermRef<'_>) -> crate::Result<Self> {
        use oxigraph::model::TermRef;
        #[allow(unreachable_patterns)]
        match term {
            TermRef::NamedNode(n) => Ok(Term::Iri(n.as_str().to_string())),
            TermRef::BlankNode(b) => Ok(Term::BNode(b.as_str().to_string())),
            TermRef::Literal(l) => {
                let lang = l.language().map(str::to_string);
                let dt = if lang.is_some() || l.datatype().as_str() == XSD_STRING {
                    None
                } else {
                    Some(l.datatype().as_str().to_string())
                };
                Ok(Term::Literal {
                    lex: l.value().to_string(),
                    dt,
                    lang,
                })
            }
            _ => Err(DictError::Invalid("quoted triples are not supported")),
        }
    }

    /// Convert back into an oxigraph term.
    pub fn to_oxigraph(&self) -> crate::Result<oxigraph::model::Term> {
        use oxigraph::model::{BlankNode, Literal, NamedNode};
        Ok(match self {
            Term::Iri(iri) => NamedNode::new(iri.as_str())
                .map_err(|_| DictError::Invalid("invalid IRI"))?
                .into(),
            Term::BNode(label) => BlankNode::new(label.as_str())
                .map_err(|_| DictError::Invalid("invalid blank node"))?
                .into(),
            Term::Literal { lex, dt, lang } => {
                if let Some(dt) = dt {
                    let nn = NamedNode::new(dt.as_str())
                        .map_err(|_| DictError::Invalid("invalid datatype IRI"))?;
                    Literal::new_typed_literal(lex.as_str(), nn).into()
                } else if let Some(lang) = lang {
                    Literal::new_language_tagged_literal(lex.as_str(), lang.as_str())
                        .map_err(|_| DictError::Invalid("invalid lang tag"))?
                        .into()
                } else {
                    Literal::new_simple_literal(lex.as_str()).into()
                }
            }
        })
    }

    pub(crate) fn to_oxigraph_subject(&self) -> crate::Result<oxigraph::model::NamedOrBlankNode> {
        use oxigraph::model::{BlankNode, NamedNode};
        match self {
            Term::Iri(iri) => Ok(NamedNode::new(iri.as_str())
                .map_err(|_| DictError::Invalid("invalid subject IRI"))?
                .into()),
            Term::BNode(label) => Ok(BlankNode::new(label.as_str())
                .map_err(|_| DictError::Invalid("invalid blank node"))?
                .into()),
            Term::Literal { .. } => Err(DictError::Invalid("literal subject")),
        }
    }

    pub(crate) fn to_oxigraph_predicate(&self) -> crate::Result<oxigraph::model::NamedNode> {
        match self {
            Term::Iri(iri) => oxigraph::model::NamedNode::new(iri.as_str())
                .map_err(|_| DictError::Invalid("invalid predicate IRI")),
            _ => Err(DictError::Invalid("non-IRI predicate")),
        }
    }
}
