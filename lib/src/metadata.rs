//! Hypermedia description of a fragment: dataset/fragment metadata, paging links
//! and the Hydra search template.

use crate::consts::*;
use crate::fragment::FragmentRequest;
use oxigraph::model::vocab::xsd;
use oxigraph::model::{BlankNode, Literal, NamedNode, Triple};
use url::Url;

/// Controls attached to every fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypermedia {
    /// `<datasetUrl#dataset>`
    pub dataset: NamedNode,
    pub dataset_url: String,
    /// The requested URL, query string included.
    pub fragment: NamedNode,
    pub total_items: u64,
    pub items_per_page: u64,
    pub first_page: NamedNode,
    pub previous_page: Option<NamedNode>,
    pub next_page: Option<NamedNode>,
    /// `datasetUrl{?subject,predicate,object}`
    pub search_template: String,
}

impl Hypermedia {
    pub fn build(request: &FragmentRequest, total_items: u64, items_per_page: u64) -> Self {
        let dataset_url = request.dataset_url.as_str();
        let offset = request.offset();
        let link =
            |page: u64| NamedNode::new_unchecked(page_url(&request.fragment_url, page).as_str());
        Hypermedia {
            dataset: NamedNode::new_unchecked(format!("{dataset_url}#dataset")),
            dataset_url: dataset_url.to_string(),
            fragment: NamedNode::new_unchecked(request.fragment_url.as_str()),
            total_items,
            items_per_page,
            first_page: link(1),
            previous_page: (offset > 0).then(|| link(request.page - 1)),
            next_page: (offset.saturating_add(items_per_page) < total_items)
                .then(|| link(request.page + 1)),
            search_template: format!("{dataset_url}{{?subject,predicate,object}}"),
        }
    }

    /// Dataset and fragment descriptions with the count metadata.
    pub fn metadata(&self) -> Vec<Triple> {
        let total = integer(self.total_items);
        vec![
            Triple::new(self.dataset.clone(), TYPE, VOID_DATASET.into_owned()),
            Triple::new(self.dataset.clone(), TYPE, HYDRA_COLLECTION.into_owned()),
            Triple::new(self.dataset.clone(), VOID_SUBSET, self.fragment.clone()),
            Triple::new(self.fragment.clone(), TYPE, HYDRA_COLLECTION.into_owned()),
            Triple::new(self.fragment.clone(), TYPE, HYDRA_PAGED_COLLECTION.into_owned()),
            Triple::new(self.fragment.clone(), VOID_TRIPLES, total.clone()),
            Triple::new(self.fragment.clone(), HYDRA_TOTAL_ITEMS, total),
            Triple::new(
                self.fragment.clone(),
                HYDRA_ITEMS_PER_PAGE,
                integer(self.items_per_page),
            ),
        ]
    }

    /// Paging links and the search form.
    pub fn controls(&self) -> Vec<Triple> {
        let mut controls = vec![Triple::new(
            self.fragment.clone(),
            HYDRA_FIRST_PAGE,
            self.first_page.clone(),
        )];
        if let Some(previous) = &self.previous_page {
            controls.push(Triple::new(
                self.fragment.clone(),
                HYDRA_PREVIOUS_PAGE,
                previous.clone(),
            ));
        }
        if let Some(next) = &self.next_page {
            controls.push(Triple::new(
                self.fragment.clone(),
                HYDRA_NEXT_PAGE,
                next.clone(),
            ));
        }

        let search = BlankNode::new_unchecked("hydra-search");
        controls.push(Triple::new(self.dataset.clone(), HYDRA_SEARCH, search.clone()));
        controls.push(Triple::new(
            search.clone(),
            HYDRA_TEMPLATE,
            Literal::new_simple_literal(&self.search_template),
        ));
        for (variable, property) in [
            ("subject", SUBJECT),
            ("predicate", PREDICATE),
            ("object", OBJECT),
        ] {
            let mapping = BlankNode::new_unchecked(format!("hydra-{variable}"));
            controls.push(Triple::new(search.clone(), HYDRA_MAPPING, mapping.clone()));
            controls.push(Triple::new(
                mapping.clone(),
                HYDRA_VARIABLE,
                Literal::new_simple_literal(variable),
            ));
            controls.push(Triple::new(mapping, HYDRA_PROPERTY, property.into_owned()));
        }
        controls
    }
}

fn integer(value: u64) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER)
}

/// `url` with every `page` parameter removed and `page={page}` appended.
pub fn page_url(url: &Url, page: u64) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut paged = url.clone();
    paged
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
    paged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentRequest;
    use oxigraph::model::Term;

    fn request(query: &str) -> FragmentRequest {
        let dataset_url = Url::parse("http://example.org/people").unwrap();
        FragmentRequest::from_query("people", dataset_url, Some(query), 100)
    }

    fn has(triples: &[Triple], predicate: oxigraph::model::NamedNodeRef<'_>) -> bool {
        triples.iter().any(|t| t.predicate.as_ref() == predicate)
    }

    #[test]
    fn page_links_replace_only_the_page_parameter() {
        let url = Url::parse("http://example.org/people?page=4&subject=a&page=7&object=b").unwrap();
        assert_eq!(
            page_url(&url, 2).as_str(),
            "http://example.org/people?subject=a&object=b&page=2"
        );
        let url = Url::parse("http://example.org/people").unwrap();
        assert_eq!(page_url(&url, 1).as_str(), "http://example.org/people?page=1");
    }

    #[test]
    fn first_page_has_no_previous_link() {
        let meta = Hypermedia::build(&request("predicate=p"), 38, 100);
        assert_eq!(meta.dataset.as_str(), "http://example.org/people#dataset");
        assert_eq!(meta.fragment.as_str(), "http://example.org/people?predicate=p");
        assert_eq!(
            meta.first_page.as_str(),
            "http://example.org/people?predicate=p&page=1"
        );
        assert!(meta.previous_page.is_none());
        assert!(meta.next_page.is_none());
        let controls = meta.controls();
        assert!(has(&controls, HYDRA_FIRST_PAGE));
        assert!(!has(&controls, HYDRA_PREVIOUS_PAGE));
        assert!(!has(&controls, HYDRA_NEXT_PAGE));
    }

    #[test]
    fn middle_page_links_both_ways() {
        let meta = Hypermedia::build(&request("page=2"), 1000, 100);
        assert_eq!(
            meta.previous_page.as_ref().map(|n| n.as_str()),
            Some("http://example.org/people?page=1")
        );
        assert_eq!(
            meta.next_page.as_ref().map(|n| n.as_str()),
            Some("http://example.org/people?page=3")
        );
    }

    #[test]
    fn metadata_and_search_controls() {
        let meta = Hypermedia::build(&request(""), 7, 100);
        let metadata = meta.metadata();
        let total = integer(7);
        assert!(metadata.contains(&Triple::new(
            meta.fragment.clone(),
            HYDRA_TOTAL_ITEMS,
            total.clone()
        )));
        assert!(metadata.contains(&Triple::new(meta.fragment.clone(), VOID_TRIPLES, total)));
        assert!(metadata.contains(&Triple::new(
            meta.dataset.clone(),
            VOID_SUBSET,
            meta.fragment.clone()
        )));

        let controls = meta.controls();
        assert_eq!(
            controls.iter().filter(|t| t.predicate.as_ref() == HYDRA_MAPPING).count(),
            3
        );
        assert!(controls.iter().any(|t| t.predicate.as_ref() == HYDRA_TEMPLATE
            && t.object
                == Term::from(Literal::new_simple_literal(
                    "http://example.org/people{?subject,predicate,object}"
                ))));
        for property in [SUBJECT, PREDICATE, OBJECT] {
            assert!(controls
                .iter()
                .any(|t| t.predicate.as_ref() == HYDRA_PROPERTY
                    && t.object == Term::from(property.into_owned())));
        }
    }
}
