//! Accept header negotiation against the registered response types.

use log::debug;
use mediatype::MediaType;

/// One parsed media range.
#[derive(Debug, Clone, PartialEq)]
struct Range {
    ty: String,
    subty: String,
    q: f32,
}

impl Range {
    fn parse(raw: &str) -> Option<Range> {
        let media = MediaType::parse(raw.trim()).ok()?;
        let mut q = 1.0;
        for (name, value) in media.params.iter() {
            if name.as_str().eq_ignore_ascii_case("q") {
                q = value.as_str().trim_matches('"').parse::<f32>().ok()?;
                if !(0.0..=1.0).contains(&q) {
                    return None;
                }
            }
        }
        let subty = match media.suffix {
            Some(suffix) => format!("{}+{}", media.subty.as_str(), suffix.as_str()),
            None => media.subty.as_str().to_string(),
        };
        Some(Range {
            ty: media.ty.as_str().to_ascii_lowercase(),
            subty: subty.to_ascii_lowercase(),
            q,
        })
    }

    /// 3 for an exact match, 2 for `type/*`, 1 for `*/*`, 0 otherwise.
    fn specificity(&self, ty: &str, subty: &str) -> u8 {
        match (self.ty.as_str(), self.subty.as_str()) {
            ("*", "*") => 1,
            (t, "*") if t == ty => 2,
            (t, s) if t == ty && s == subty => 3,
            _ => 0,
        }
    }
}

/// Weight the ranges give `media`: the q of the most specific matching range.
fn weight(ranges: &[Range], media: &str) -> Option<f32> {
    let (ty, subty) = media.split_once('/')?;
    let mut best: Option<(u8, f32)> = None;
    for range in ranges {
        let specificity = range.specificity(ty, subty);
        if specificity > 0 && best.map_or(true, |(s, _)| specificity > s) {
            best = Some((specificity, range.q));
        }
    }
    best.map(|(_, q)| q)
}

/// Pick the type from `supported` that best satisfies `accept`.
///
/// Ties go to the type registered first; when nothing is acceptable the first
/// registered type is returned. `supported` must not be empty.
pub fn negotiate<'a>(accept: Option<&str>, supported: &[&'a str]) -> &'a str {
    let fallback = supported[0];
    let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
        return fallback;
    };
    let ranges: Vec<Range> = accept.split(',').filter_map(Range::parse).collect();
    let mut chosen: Option<(&'a str, f32)> = None;
    for &media in supported {
        match weight(&ranges, media) {
            Some(q) if q > 0.0 && chosen.map_or(true, |(_, best)| q > best) => {
                chosen = Some((media, q))
            }
            _ => {}
        }
    }
    let media = chosen.map_or(fallback, |(media, _)| media);
    debug!("negotiated {media} for '{accept}'");
    media
}
