//! Named datasets served by one process, plus the synthetic index listing them.

use crate::config::{is_valid_dataset_name, Config};
use crate::consts::{DESCRIPTION, HYDRA_COLLECTION, LABEL, TITLE, TYPE, VOID_DATASET};
use crate::datasource::{self, DataSource};
use crate::errors::ConfigError;
use crate::fragment::{Fragment, FragmentRequest};
use log::info;
use oxigraph::model::{Literal, NamedNode, Triple};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// A registered dataset.
#[derive(Clone)]
pub struct Dataset {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    source: Arc<dyn DataSource>,
}

impl Dataset {
    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("kind", &self.source.kind())
            .finish()
    }
}

/// Dataset map built at startup and read-only afterwards.
#[derive(Default)]
pub struct Registry {
    datasets: BTreeMap<String, Dataset>,
    closed: AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open every configured dataset.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut registry = Registry::new();
        for (name, source) in &config.datasources {
            let opened = datasource::open(name, source, config)?;
            registry.register(
                name,
                source.title.clone().unwrap_or_else(|| name.clone()),
                source.description.clone(),
                opened,
            )?;
        }
        info!("Registered {} datasets", registry.len());
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        source: Arc<dyn DataSource>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if !is_valid_dataset_name(&name) {
            return Err(ConfigError::InvalidName(name));
        }
        if self.datasets.contains_key(&name) {
            return Err(ConfigError::Duplicate(name));
        }
        let dataset = Dataset {
            name: name.clone(),
            title: title.into(),
            description,
            source,
        };
        self.datasets.insert(name, dataset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Datasets ordered by name.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Description of every dataset, rooted at `base`.
    pub fn index_triples(&self, base: &Url) -> Vec<Triple> {
        let mut triples = Vec::new();
        for dataset in self.datasets() {
            let id = NamedNode::new_unchecked(format!("{}#dataset", dataset_url(base, &dataset.name)));
            let title = Literal::new_simple_literal(&dataset.title);
            triples.push(Triple::new(id.clone(), TYPE, VOID_DATASET.into_owned()));
            triples.push(Triple::new(id.clone(), TYPE, HYDRA_COLLECTION.into_owned()));
            triples.push(Triple::new(id.clone(), LABEL, title.clone()));
            triples.push(Triple::new(id.clone(), TITLE, title));
            if let Some(description) = &dataset.description {
                triples.push(Triple::new(
                    id,
                    DESCRIPTION,
                    Literal::new_simple_literal(description),
                ));
            }
        }
        triples
    }

    /// The index answers every request with the full dataset listing on one page.
    pub fn index_fragment(&self, request: &FragmentRequest) -> Fragment {
        Fragment::single_page(request, self.index_triples(&request.dataset_url))
    }

    /// Close every dataset. Later calls do nothing.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        for dataset in self.datasets() {
            info!("Closing dataset '{}'", dataset.name);
            dataset.source.close();
        }
    }
}

/// URL of dataset `name` under `base`.
pub fn dataset_url(base: &Url, name: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(name);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FragmentError;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Closable {
        closed: AtomicUsize,
    }

    impl DataSource for Closable {
        fn kind(&self) -> &'static str {
            "closable"
        }

        fn fragment(&self, request: &FragmentRequest) -> Result<Fragment, FragmentError> {
            Ok(Fragment::empty(request))
        }

        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn names_are_validated() {
        let mut registry = Registry::new();
        let source = Arc::new(Closable::default());
        assert!(registry.register("a", "A", None, source.clone()).is_ok());
        assert!(matches!(
            registry.register("a", "A", None, source.clone()),
            Err(ConfigError::Duplicate(_))
        ));
        assert!(matches!(
            registry.register("a/b", "A", None, source.clone()),
            Err(ConfigError::InvalidName(_))
        ));
        assert!(matches!(
            registry.register("", "A", None, source),
            Err(ConfigError::InvalidName(_))
        ));
    }

    #[test]
    fn index_lists_datasets() {
        let mut registry = Registry::new();
        registry
            .register(
                "people",
                "People",
                Some("Who knows whom".into()),
                Arc::new(Closable::default()),
            )
            .unwrap();
        registry
            .register("places", "Places", None, Arc::new(Closable::default()))
            .unwrap();
        let base = Url::parse("http://localhost:3000/").unwrap();
        let request = FragmentRequest::from_query("", base.clone(), None, 2);
        let index = registry.index_fragment(&request);
        assert_eq!(index.len(), 9);
        assert_eq!(index.total_size, 9);
        assert!(index.is_last_page);
        assert!(index.hypermedia.next_page.is_none());
        assert!(index.triples.iter().any(|t| t.subject.to_string()
            == "<http://localhost:3000/people#dataset>"
            && t.predicate.as_ref() == DESCRIPTION));

        let request = FragmentRequest::from_query("", base.clone(), Some("page=3"), 2);
        let index = registry.index_fragment(&request);
        assert_eq!(index.len(), 9);
        assert!(index.is_last_page);
        assert!(index.hypermedia.previous_page.is_none());
        assert!(index.hypermedia.next_page.is_none());
        assert_eq!(
            index.hypermedia.first_page.as_str(),
            "http://localhost:3000/?page=1"
        );
    }

    #[test]
    fn dataset_urls() {
        let base = Url::parse("http://example.org/ldf/").unwrap();
        assert_eq!(dataset_url(&base, "dbpedia").as_str(), "http://example.org/ldf/dbpedia");
        assert_eq!(dataset_url(&base, "a b").as_str(), "http://example.org/ldf/a%20b");
    }

    #[test]
    fn shutdown_closes_once() {
        let source = Arc::new(Closable::default());
        let mut registry = Registry::new();
        registry.register("a", "A", None, source.clone()).unwrap();
        registry.shutdown();
        registry.shutdown();
        assert_eq!(source.closed.load(Ordering::SeqCst), 1);
    }
}
