//! Data sources: storage engines bound to the triple pattern processor.
//!
//! A storage engine implements [`TripleSource`] (term lookup, pattern search and
//! decoding). [`PatternProcessor`] turns any `TripleSource` into a [`DataSource`],
//! the object-safe handle the registry keeps for every dataset.

pub mod dictionary;
pub mod oxigraph_store;

use crate::config::{Config, DataSourceConfig};
use crate::errors::{ConfigError, FragmentError};
use crate::fragment::{Fragment, FragmentRequest};
use crate::pattern::TripleRole;
use crate::resolver::TermResolver;
use crate::window::{window, MatchSequence};
use log::{debug, info};
use oxigraph::model::{Term, Triple};
use std::sync::Arc;

pub use self::dictionary::DictionarySource;
pub use self::oxigraph_store::OxigraphSource;

/// Identifiers of a resolved pattern. `None` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPattern<Id> {
    pub subject: Option<Id>,
    pub predicate: Option<Id>,
    pub object: Option<Id>,
}

/// A storage engine as seen by the pattern processor.
pub trait TripleSource: Send + Sync {
    /// Engine identifier of a term in one role.
    type Id: Clone;
    /// Raw match produced by a search, decoded lazily.
    type Match;

    /// Name of the engine, as used in configuration files.
    fn kind(&self) -> &'static str;

    /// Identifier of `term` in `role`, or `None` if it never occurs there.
    fn locate(&self, term: &Term, role: TripleRole) -> Result<Option<Self::Id>, FragmentError>;

    /// Identifier of the blank node labelled `label` in `role`.
    fn locate_blank(&self, label: &str, role: TripleRole)
        -> Result<Option<Self::Id>, FragmentError>;

    fn search(
        &self,
        pattern: IdPattern<Self::Id>,
    ) -> Result<Box<dyn MatchSequence<Item = Self::Match> + '_>, FragmentError>;

    fn decode(&self, item: Self::Match) -> Result<Triple, FragmentError>;

    fn close(&self) {}
}

/// Object-safe dataset handle.
pub trait DataSource: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Answer one triple pattern request.
    fn fragment(&self, request: &FragmentRequest) -> Result<Fragment, FragmentError>;

    /// Release the underlying storage.
    fn close(&self);
}

/// Resolves, searches and pages triple patterns over a [`TripleSource`].
pub struct PatternProcessor<S> {
    source: S,
}

impl<S: TripleSource> PatternProcessor<S> {
    pub fn new(source: S) -> Self {
        PatternProcessor { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: TripleSource> DataSource for PatternProcessor<S> {
    fn kind(&self) -> &'static str {
        self.source.kind()
    }

    fn fragment(&self, request: &FragmentRequest) -> Result<Fragment, FragmentError> {
        let mut resolver = TermResolver::new(&self.source);
        let subject = resolver.resolve(&request.subject, TripleRole::Subject)?;
        let predicate = resolver.resolve(&request.predicate, TripleRole::Predicate)?;
        let object = resolver.resolve(&request.object, TripleRole::Object)?;
        if subject.is_no_match() || predicate.is_no_match() || object.is_no_match() {
            debug!("pattern on '{}' cannot match anything", request.dataset);
            return Ok(Fragment::empty(request));
        }

        let pattern = IdPattern {
            subject: subject.into_bound(),
            predicate: predicate.into_bound(),
            object: object.into_bound(),
        };
        let mut matches = self.source.search(pattern)?;
        let offset = request.offset();
        let page = window(matches.as_mut(), offset, request.page_size)?;
        debug!(
            "found approximately {} results in '{}'",
            page.raw_estimate, request.dataset
        );
        let total = page.total(offset);
        let triples = page
            .items
            .into_iter()
            .map(|item| self.source.decode(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fragment::new(request, triples, total))
    }

    fn close(&self) {
        self.source.close();
    }
}

/// Open the storage engine configured for dataset `name`.
pub fn open(
    name: &str,
    source: &DataSourceConfig,
    config: &Config,
) -> Result<Arc<dyn DataSource>, ConfigError> {
    let settings_error = |source| ConfigError::Settings {
        name: name.to_string(),
        source,
    };
    let load_error = |source| ConfigError::Load {
        name: name.to_string(),
        source,
    };
    info!("Loading dataset '{}' ({})", name, source.kind);
    let opened: Arc<dyn DataSource> = match source.kind.as_str() {
        dictionary::KIND => {
            let settings: dictionary::DictionarySettings =
                serde_json::from_value(source.settings.clone()).map_err(settings_error)?;
            let format = settings.rdf_format().ok_or_else(|| ConfigError::UnknownFormat {
                name: name.to_string(),
                format: settings.format.clone().unwrap_or_default(),
            })?;
            let path = config.resolve_path(&settings.file);
            let store = DictionarySource::open(&path, format, settings.indexed)
                .map_err(load_error)?;
            Arc::new(PatternProcessor::new(store))
        }
        oxigraph_store::KIND => {
            let settings: oxigraph_store::OxigraphSettings =
                serde_json::from_value(source.settings.clone()).map_err(settings_error)?;
            let path = config.resolve_path(&settings.path);
            Arc::new(PatternProcessor::new(
                OxigraphSource::open(&path).map_err(load_error)?,
            ))
        }
        other => {
            return Err(ConfigError::UnknownType {
                name: name.to_string(),
                kind: other.to_string(),
            })
        }
    };
    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternTerm;
    use crate::resolver::Resolved;
    use crate::window::Seek;
    use oxigraph::model::NamedNode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// Numbered triples `<s{i}> <p> <o{i}>` with search and lookup counters.
    /// The only blank node label it knows is `known`.
    struct Counting {
        len: u64,
        searches: AtomicUsize,
        blank_lookups: AtomicUsize,
    }

    impl Counting {
        fn new(len: u64) -> Self {
            Counting {
                len,
                searches: AtomicUsize::new(0),
                blank_lookups: AtomicUsize::new(0),
            }
        }
    }

    struct Range {
        pos: u64,
        len: u64,
    }

    impl MatchSequence for Range {
        type Item = u64;

        fn next_match(&mut self) -> Result<Option<u64>, FragmentError> {
            if self.pos < self.len {
                self.pos += 1;
                Ok(Some(self.pos - 1))
            } else {
                Ok(None)
            }
        }

        fn seek(&mut self, _offset: u64) -> Result<Seek, FragmentError> {
            Ok(Seek::Unsupported)
        }

        fn estimated_total(&self) -> u64 {
            self.len
        }
    }

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex.org/{s}"))
    }

    impl TripleSource for Counting {
        type Id = ();
        type Match = u64;

        fn kind(&self) -> &'static str {
            "counting"
        }

        fn locate(&self, term: &Term, _role: TripleRole) -> Result<Option<()>, FragmentError> {
            Ok((*term == Term::from(iri("p"))).then_some(()))
        }

        fn locate_blank(&self, label: &str, _: TripleRole) -> Result<Option<()>, FragmentError> {
            self.blank_lookups.fetch_add(1, Ordering::SeqCst);
            Ok((label == "known").then_some(()))
        }

        fn search(
            &self,
            _pattern: IdPattern<()>,
        ) -> Result<Box<dyn MatchSequence<Item = u64> + '_>, FragmentError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Range {
                pos: 0,
                len: self.len,
            }))
        }

        fn decode(&self, i: u64) -> Result<Triple, FragmentError> {
            Ok(Triple::new(iri(&format!("s{i}")), iri("p"), iri(&format!("o{i}"))))
        }
    }

    fn request(query: &str) -> FragmentRequest {
        FragmentRequest::from_query(
            "numbers",
            Url::parse("http://localhost/numbers").unwrap(),
            Some(query),
            100,
        )
    }

    fn processor(len: u64) -> PatternProcessor<Counting> {
        PatternProcessor::new(Counting::new(len))
    }

    #[test]
    fn unknown_terms_short_circuit() {
        let processor = processor(37);
        let fragment = processor
            .fragment(&request("predicate=http%3A%2F%2Fex.org%2Fmissing"))
            .unwrap();
        assert!(fragment.is_empty());
        assert_eq!(fragment.total_size, 0);
        assert!(fragment.is_last_page);
        let fragment = processor.fragment(&request("subject=_%3Ab0")).unwrap();
        assert_eq!(fragment.total_size, 0);
        let fragment = processor.fragment(&request("subject=%22lit%22")).unwrap();
        assert_eq!(fragment.total_size, 0);
        assert_eq!(processor.source().searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn thirty_seven_matches_over_two_pages() {
        let processor = processor(37);
        let page1 = processor
            .fragment(&request("predicate=http%3A%2F%2Fex.org%2Fp"))
            .unwrap();
        assert_eq!(page1.len(), 37);
        assert!((38..=39).contains(&page1.total_size));
        assert!(page1.is_last_page);
        for triple in &page1.triples {
            assert_eq!(triple.predicate, iri("p"));
        }

        let page2 = processor
            .fragment(&request("predicate=http%3A%2F%2Fex.org%2Fp&page=2"))
            .unwrap();
        assert!(page2.is_empty());
        assert!(page2.total_size >= 1);
        assert!(page2.is_last_page);
        assert_eq!(processor.source().searches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resolver_resolves_fixed_terms_and_wildcards() {
        let source = Counting::new(0);
        let mut resolver = TermResolver::new(&source);
        assert_eq!(
            resolver
                .resolve(&PatternTerm::wildcard(), TripleRole::Object)
                .unwrap(),
            Resolved::Wildcard
        );
        assert_eq!(
            resolver
                .resolve(&PatternTerm::fixed(iri("p")), TripleRole::Predicate)
                .unwrap(),
            Resolved::Id(())
        );
        assert_eq!(
            resolver
                .resolve(&PatternTerm::fixed(iri("q")), TripleRole::Predicate)
                .unwrap(),
            Resolved::NoMatch
        );
    }

    #[test]
    fn resolver_memoizes_blank_nodes_per_request() {
        let source = Counting::new(0);
        let known = PatternTerm::parse(Some("_:known"), TripleRole::Subject);
        let unknown = PatternTerm::parse(Some("_:b1"), TripleRole::Subject);
        let lookups = || source.blank_lookups.load(Ordering::SeqCst);

        let mut resolver = TermResolver::new(&source);
        assert_eq!(
            resolver.resolve(&known, TripleRole::Subject).unwrap(),
            Resolved::Id(())
        );
        assert_eq!(
            resolver.resolve(&known, TripleRole::Subject).unwrap(),
            Resolved::Id(())
        );
        assert_eq!(lookups(), 1);

        assert_eq!(
            resolver.resolve(&unknown, TripleRole::Subject).unwrap(),
            Resolved::NoMatch
        );
        assert_eq!(
            resolver.resolve(&unknown, TripleRole::Subject).unwrap(),
            Resolved::NoMatch
        );
        assert_eq!(lookups(), 2);

        // another role is a separate entry
        assert_eq!(
            resolver.resolve(&known, TripleRole::Object).unwrap(),
            Resolved::Id(())
        );
        assert_eq!(lookups(), 3);

        // a new request starts with an empty cache
        let mut resolver = TermResolver::new(&source);
        assert_eq!(
            resolver.resolve(&known, TripleRole::Subject).unwrap(),
            Resolved::Id(())
        );
        assert_eq!(lookups(), 4);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let config = Config::builder().build().unwrap();
        let source = DataSourceConfig::new("hdt", serde_json::json!({ "file": "x.hdt" }));
        assert!(matches!(
            open("x", &source, &config),
            Err(ConfigError::UnknownType { .. })
        ));
        let source = DataSourceConfig::new("dictionary", serde_json::json!({}));
        assert!(matches!(
            open("x", &source, &config),
            Err(ConfigError::Settings { .. })
        ));
    }
}
