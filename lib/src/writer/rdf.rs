use super::Site;
use crate::errors::FragmentError;
use crate::fragment::Fragment;
use log::warn;
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::NamedNode;
use std::fmt::Display;

/// Serializes fragments as a plain RDF graph.
#[derive(Debug, Clone)]
pub struct RdfWriter {
    media: &'static str,
    format: Option<RdfFormat>,
}

impl RdfWriter {
    pub fn new(media: &'static str) -> Self {
        RdfWriter {
            media,
            format: RdfFormat::from_media_type(media),
        }
    }

    pub fn media_type(&self) -> &'static str {
        self.media
    }

    /// Metadata, matches and controls, with the configured prefixes declared.
    pub fn fragment(&self, site: &Site, fragment: &Fragment) -> Result<Vec<u8>, FragmentError> {
        let format = self.format.clone().ok_or_else(|| {
            FragmentError::Internal(format!("no RDF serializer for {}", self.media))
        })?;
        let mut serializer = RdfSerializer::from_format(format);
        for (prefix, namespace) in &site.prefixes {
            if let Err(e) = NamedNode::new(namespace.as_str()) {
                warn!("Skipping prefix {prefix}: <{namespace}>: {e}");
                continue;
            }
            serializer = serializer
                .with_prefix(prefix, namespace)
                .map_err(|e| FragmentError::Internal(format!("prefix {prefix}: {e}")))?;
        }
        let mut serializer = serializer.for_writer(Vec::new());
        for triple in fragment.statements() {
            serializer.serialize_triple(triple.as_ref())?;
        }
        Ok(serializer.finish()?)
    }

    pub fn not_found(&self, url: &str) -> Vec<u8> {
        format!("{url} not found!\n").into_bytes()
    }

    pub fn error(&self, error: &dyn Display) -> Vec<u8> {
        format!("{error}\n").into_bytes()
    }
}
