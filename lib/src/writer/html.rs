//! Human-readable view of fragments: a search form, the matches and paging links.

use super::{DatasetLink, Site};
use crate::fragment::{Fragment, FragmentRequest};
use crate::pattern::TripleRole;
use oxigraph::model::{Literal, Term, Triple};
use std::fmt::{Display, Write};
use url::form_urlencoded;

#[derive(Debug, Clone, Default)]
pub struct HtmlWriter;

/// Escape text for element content and double-quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl HtmlWriter {
    pub fn fragment(
        &self,
        site: &Site,
        dataset: Option<&DatasetLink>,
        fragment: &Fragment,
        request: &FragmentRequest,
    ) -> Vec<u8> {
        let mut body = String::new();
        match dataset {
            Some(dataset) => self.dataset_page(&mut body, site, dataset, fragment, request),
            None => self.index_page(&mut body, site),
        }
        let title = dataset.map_or(site.title.as_str(), |d| d.title.as_str());
        page(site, title, &body).into_bytes()
    }

    pub fn not_found(&self, site: &Site, url: &str) -> Vec<u8> {
        let body = format!(
            "<h2>Resource not found</h2>\n<p>No resource with URL <code>{}</code> was found.</p>\n",
            escape(url)
        );
        page(site, "Resource not found", &body).into_bytes()
    }

    pub fn error(&self, site: &Site, error: &dyn Display) -> Vec<u8> {
        let body = format!(
            "<h2>Error executing your request</h2>\n<p class=\"error\">{}</p>\n",
            escape(&error.to_string())
        );
        page(site, "Error", &body).into_bytes()
    }

    fn index_page(&self, out: &mut String, site: &Site) {
        out.push_str("<h2>Available datasets</h2>\n<dl class=\"datasets\">\n");
        for dataset in &site.datasets {
            let _ = writeln!(
                out,
                "  <dt><a href=\"{}\">{}</a></dt>",
                escape(dataset.url.as_str()),
                escape(&dataset.title)
            );
            if let Some(description) = &dataset.description {
                let _ = writeln!(out, "  <dd>{}</dd>", escape(description));
            }
        }
        out.push_str("</dl>\n");
    }

    fn dataset_page(
        &self,
        out: &mut String,
        site: &Site,
        dataset: &DatasetLink,
        fragment: &Fragment,
        request: &FragmentRequest,
    ) {
        let url = escape(dataset.url.as_str());
        let _ = writeln!(out, "<h2><a href=\"{url}\">{}</a></h2>", escape(&dataset.title));
        if let Some(description) = &dataset.description {
            let _ = writeln!(out, "<p class=\"description\">{}</p>", escape(description));
        }

        let _ = writeln!(out, "<form action=\"{url}\" method=\"get\">\n  <fieldset>\n    <ul>");
        for role in TripleRole::ALL {
            let name = role_name(role);
            let _ = writeln!(
                out,
                "      <li><label for=\"{name}\">{name}</label> \
                 <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"></li>",
                escape(&request.pattern(role).form_value())
            );
        }
        out.push_str(
            "    </ul>\n    <input type=\"submit\" value=\"Find matching triples\">\n  </fieldset>\n</form>\n",
        );

        let _ = writeln!(
            out,
            "<h3>Matches in {} for <em class=\"pattern\">{{ {} {} {} }}</em></h3>",
            escape(&dataset.title),
            escape(&request.subject.to_string()),
            escape(&request.predicate.to_string()),
            escape(&request.object.to_string()),
        );

        if fragment.is_empty() {
            out.push_str("<p>No triples found on this page.</p>\n");
        } else {
            let start = request.offset() + 1;
            let end = request.offset() + fragment.len() as u64;
            // The last page ends where the matches end.
            let (approximate, total) = if fragment.is_last_page {
                ("", end)
            } else {
                ("±", fragment.total_size)
            };
            let _ = writeln!(
                out,
                "<div class=\"counts\">Showing triples {start} to {end} of {approximate}{total}</div>"
            );
            out.push_str("<ul class=\"triples\">\n");
            for triple in &fragment.triples {
                let _ = writeln!(out, "  <li>{}</li>", render_triple(site, dataset, triple));
            }
            out.push_str("</ul>\n");
        }

        let hypermedia = &fragment.hypermedia;
        if hypermedia.previous_page.is_some() || hypermedia.next_page.is_some() {
            out.push_str("<ul class=\"pager\">\n");
            if let Some(previous) = &hypermedia.previous_page {
                let _ = writeln!(
                    out,
                    "  <li class=\"previous\"><a href=\"{}\" rel=\"prev\">previous</a></li>",
                    escape(previous.as_str())
                );
            }
            if let Some(next) = &hypermedia.next_page {
                let _ = writeln!(
                    out,
                    "  <li class=\"next\"><a href=\"{}\" rel=\"next\">next</a></li>",
                    escape(next.as_str())
                );
            }
            out.push_str("</ul>\n");
        }
    }
}

fn role_name(role: TripleRole) -> &'static str {
    match role {
        TripleRole::Subject => "subject",
        TripleRole::Predicate => "predicate",
        TripleRole::Object => "object",
    }
}

fn render_triple(site: &Site, dataset: &DatasetLink, triple: &Triple) -> String {
    format!(
        "{} {} {} .",
        render_term(site, dataset, &triple.subject.clone().into(), TripleRole::Subject),
        render_term(site, dataset, &triple.predicate.clone().into(), TripleRole::Predicate),
        render_term(site, dataset, &triple.object, TripleRole::Object),
    )
}

/// IRIs link to the fragment with the term fixed in the same position.
fn render_term(site: &Site, dataset: &DatasetLink, term: &Term, role: TripleRole) -> String {
    match term {
        Term::NamedNode(node) => {
            let iri = node.as_str();
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(role_name(role), iri)
                .finish();
            let label = site.abbreviate(iri).unwrap_or_else(|| iri.to_string());
            format!(
                "<a href=\"{}?{}\" title=\"{}\">{}</a>",
                escape(dataset.url.as_str()),
                escape(&query),
                escape(iri),
                escape(&label)
            )
        }
        Term::BlankNode(node) => format!("<span class=\"blank\">_:{}</span>", escape(node.as_str())),
        Term::Literal(literal) => render_literal(site, literal),
        #[allow(unreachable_patterns)]
        other => escape(&other.to_string()),
    }
}

fn render_literal(site: &Site, literal: &Literal) -> String {
    let value = escape(&format!("\"{}\"", literal.value()));
    if let Some(language) = literal.language() {
        return format!("<span class=\"literal\">{value}@{}</span>", escape(language));
    }
    let datatype = literal.datatype().as_str();
    if datatype == "http://www.w3.org/2001/XMLSchema#string" {
        return format!("<span class=\"literal\">{value}</span>");
    }
    let datatype = site
        .abbreviate(datatype)
        .unwrap_or_else(|| format!("<{datatype}>"));
    format!("<span class=\"literal\">{value}^^{}</span>", escape(&datatype))
}

fn page(site: &Site, title: &str, body: &str) -> String {
    let base = escape(site.base_url.as_str());
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <title>{}</title>\n  <link rel=\"stylesheet\" href=\"{base}assets/style.css\">\n\
         </head>\n<body>\n<header>\n  <h1><a href=\"{base}\">{}</a></h1>\n</header>\n<main>\n",
        escape(title),
        escape(&site.title),
    );
    html.push_str(body);
    html.push_str("</main>\n<nav class=\"datasets\">\n  <h2>Datasets</h2>\n  <ul>\n");
    for dataset in &site.datasets {
        let _ = writeln!(
            html,
            "    <li><a href=\"{}\">{}</a></li>",
            escape(dataset.url.as_str()),
            escape(&dataset.title)
        );
    }
    html.push_str("  </ul>\n</nav>\n</body>\n</html>\n");
    html
}
