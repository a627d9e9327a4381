//! Triple pattern elements and the parsing of `subject`/`predicate`/`object`/`page`
//! query parameters.

use lazy_static::lazy_static;
use oxigraph::model::{Literal, NamedNode, Term};
use regex::Regex;
use std::fmt;

pub use rdfdict::TripleRole;

lazy_static! {
    static ref LITERAL: Regex = Regex::new(r#"^"(.*)"(?:@(.*)|\^\^<?([^<>]*)>?)?$"#)
        .expect("literal pattern is valid");
}

/// One position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternElement {
    /// A concrete RDF term.
    Fixed(Term),
    /// An unbound variable (`?name`, or an absent parameter).
    Variable(String),
    /// A request-scoped blank node reference (`_:label`).
    AnonymousVariable(String),
}

/// A parsed query parameter. Malformed input is kept as a value: it matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Valid(PatternElement),
    Invalid(String),
}

impl PatternTerm {
    /// The unbound variable an absent parameter stands for.
    pub fn wildcard() -> Self {
        PatternTerm::Valid(PatternElement::Variable(String::new()))
    }

    pub fn fixed(term: impl Into<Term>) -> Self {
        PatternTerm::Valid(PatternElement::Fixed(term.into()))
    }

    /// Parse the raw value of a pattern parameter for the given triple position.
    ///
    /// Recognised forms: empty (variable), `?name`, `_:label`, `<iri>`, a bare IRI,
    /// `"lexical"`, `"lexical"@lang` and `"lexical"^^<datatype>`. A literal in subject or
    /// predicate position and a blank node in predicate position are malformed.
    pub fn parse(raw: Option<&str>, role: TripleRole) -> Self {
        let value = match raw {
            None | Some("") => return PatternTerm::wildcard(),
            Some(value) => value,
        };
        let invalid = || PatternTerm::Invalid(value.to_string());
        let element = match value.as_bytes()[0] {
            b'?' => PatternElement::Variable(value[1..].to_string()),
            b'_' => match value.strip_prefix("_:") {
                Some(label) if !label.is_empty() && role != TripleRole::Predicate => {
                    PatternElement::AnonymousVariable(label.to_string())
                }
                _ => return invalid(),
            },
            b'<' => match value
                .strip_prefix('<')
                .and_then(|v| v.strip_suffix('>'))
                .and_then(|iri| NamedNode::new(iri).ok())
            {
                Some(iri) => PatternElement::Fixed(iri.into()),
                None => return invalid(),
            },
            b'"' => {
                if role != TripleRole::Object {
                    return invalid();
                }
                match parse_literal(value) {
                    Some(literal) => PatternElement::Fixed(literal.into()),
                    None => return invalid(),
                }
            }
            _ => match NamedNode::new(value) {
                Ok(iri) => PatternElement::Fixed(iri.into()),
                Err(_) => return invalid(),
            },
        };
        PatternTerm::Valid(element)
    }

    pub fn element(&self) -> Option<&PatternElement> {
        match self {
            PatternTerm::Valid(element) => Some(element),
            PatternTerm::Invalid(_) => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, PatternTerm::Valid(PatternElement::Variable(_)))
    }

    /// Text to prefill a search form with: the term in N-Triples syntax, `_:label`,
    /// the raw input for malformed terms and nothing for variables.
    pub fn form_value(&self) -> String {
        match self {
            PatternTerm::Valid(PatternElement::Fixed(term)) => term.to_string(),
            PatternTerm::Valid(PatternElement::Variable(_)) => String::new(),
            PatternTerm::Valid(PatternElement::AnonymousVariable(label)) => format!("_:{label}"),
            PatternTerm::Invalid(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Valid(PatternElement::Variable(name)) => write!(f, "?{name}"),
            other => f.write_str(&other.form_value()),
        }
    }
}

fn parse_literal(value: &str) -> Option<Literal> {
    let captures = LITERAL.captures(value)?;
    let lexical = captures.get(1).map_or("", |m| m.as_str());
    if let Some(lang) = captures.get(2) {
        return Literal::new_language_tagged_literal(lexical, lang.as_str()).ok();
    }
    if let Some(datatype) = captures.get(3) {
        let datatype = NamedNode::new(datatype.as_str()).ok()?;
        return Some(Literal::new_typed_literal(lexical, datatype));
    }
    Some(Literal::new_simple_literal(lexical))
}

/// Parse the `page` parameter. Missing, unparsable and non-positive values mean page 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .map_or(1, |page| page as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::vocab::xsd;

    fn parse(raw: &str, role: TripleRole) -> PatternTerm {
        PatternTerm::parse(Some(raw), role)
    }

    #[test]
    fn absent_and_question_marks_are_variables() {
        assert!(PatternTerm::parse(None, TripleRole::Subject).is_variable());
        assert!(parse("", TripleRole::Object).is_variable());
        assert_eq!(
            parse("?who", TripleRole::Subject),
            PatternTerm::Valid(PatternElement::Variable("who".into()))
        );
    }

    #[test]
    fn iris_with_and_without_brackets() {
        let expected = PatternTerm::fixed(NamedNode::new_unchecked("http://ex.org/a"));
        assert_eq!(parse("<http://ex.org/a>", TripleRole::Subject), expected);
        assert_eq!(parse("http://ex.org/a", TripleRole::Predicate), expected);
        assert!(matches!(
            parse("<http://ex.org/a", TripleRole::Subject),
            PatternTerm::Invalid(_)
        ));
        assert!(matches!(
            parse("not an iri", TripleRole::Object),
            PatternTerm::Invalid(_)
        ));
    }

    #[test]
    fn literals() {
        assert_eq!(
            parse("\"hello\"", TripleRole::Object),
            PatternTerm::fixed(Literal::new_simple_literal("hello"))
        );
        assert_eq!(
            parse("\"hallo\"@de", TripleRole::Object),
            PatternTerm::fixed(Literal::new_language_tagged_literal_unchecked("hallo", "de"))
        );
        assert_eq!(
            parse(
                "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>",
                TripleRole::Object
            ),
            PatternTerm::fixed(Literal::new_typed_literal("42", xsd::INTEGER))
        );
        assert!(matches!(
            parse("\"unterminated", TripleRole::Object),
            PatternTerm::Invalid(_)
        ));
    }

    #[test]
    fn role_checks() {
        assert!(matches!(
            parse("\"x\"", TripleRole::Subject),
            PatternTerm::Invalid(_)
        ));
        assert!(matches!(
            parse("\"x\"", TripleRole::Predicate),
            PatternTerm::Invalid(_)
        ));
        assert!(matches!(
            parse("_:b0", TripleRole::Predicate),
            PatternTerm::Invalid(_)
        ));
        assert_eq!(
            parse("_:b0", TripleRole::Object),
            PatternTerm::Valid(PatternElement::AnonymousVariable("b0".into()))
        );
    }

    #[test]
    fn form_values() {
        assert_eq!(parse("http://ex.org/a", TripleRole::Subject).form_value(), "<http://ex.org/a>");
        assert_eq!(parse("?x", TripleRole::Subject).form_value(), "");
        assert_eq!(parse("_:b", TripleRole::Subject).form_value(), "_:b");
        assert_eq!(parse("\"a\"@en", TripleRole::Object).form_value(), "\"a\"@en");
    }

    #[test]
    fn pages() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
    }
}
