//! Defines constant NamedNodeRefs for the RDF, RDFS, DCTERMS, VoID and Hydra terms
//! used in fragment metadata and hypermedia controls, plus server-wide defaults.

use oxigraph::model::NamedNodeRef;

pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const SUBJECT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#subject");
pub const PREDICATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate");
pub const OBJECT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#object");
// rdfs
pub const LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");
// dcterms
pub const TITLE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
pub const DESCRIPTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
// void
pub const VOID_DATASET: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#Dataset");
pub const VOID_SUBSET: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#subset");
pub const VOID_TRIPLES: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#triples");
// hydra
pub const HYDRA_COLLECTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#Collection");
pub const HYDRA_PAGED_COLLECTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#PagedCollection");
pub const HYDRA_TOTAL_ITEMS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#totalItems");
pub const HYDRA_ITEMS_PER_PAGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#itemsPerPage");
pub const HYDRA_FIRST_PAGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#firstPage");
pub const HYDRA_PREVIOUS_PAGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#previousPage");
pub const HYDRA_NEXT_PAGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#nextPage");
pub const HYDRA_SEARCH: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#search");
pub const HYDRA_TEMPLATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#template");
pub const HYDRA_MAPPING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#mapping");
pub const HYDRA_VARIABLE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#variable");
pub const HYDRA_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/hydra/core#property");

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = "Linked Data Fragments Server";
pub const DEFAULT_TITLE: &str = "Linked Data Fragments server";
pub const DEFAULT_PAGE_SIZE: u64 = 100;

pub const DEFAULT_PREFIXES: [(&str, &str); 10] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("dc", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("dbpedia", "http://dbpedia.org/resource/"),
    ("dbpedia-owl", "http://dbpedia.org/ontology/"),
    ("dbpprop", "http://dbpedia.org/property/"),
    ("hydra", "http://www.w3.org/ns/hydra/core#"),
    ("void", "http://rdfs.org/ns/void#"),
];
