//! Sorted id-triple permutations and pattern search.

use crate::error::DictError;

/// A triple of dictionary identifiers. In patterns, `0` is the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TripleId {
    pub subject: u64,
    pub predicate: u64,
    pub object: u64,
}

impl TripleId {
    pub const fn new(subject: u64, predicate: u64, object: u64) -> Self {
        TripleId {
            subject,
            predicate,
            object,
        }
    }

    /// True if every bound (non-zero) position of `pattern` equals ours.
    pub fn matches(&self, pattern: &TripleId) -> bool {
        (pattern.subject == 0 || pattern.subject == self.subject)
            && (pattern.predicate == 0 || pattern.predicate == self.predicate)
            && (pattern.object == 0 || pattern.object == self.object)
    }
}

/// Sort order of a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleOrder {
    Spo,
    Pos,
    Osp,
}

impl TripleOrder {
    #[inline]
    fn key(self, t: &TripleId) -> (u64, u64, u64) {
        match self {
            TripleOrder::Spo => (t.subject, t.predicate, t.object),
            TripleOrder::Pos => (t.predicate, t.object, t.subject),
            TripleOrder::Osp => (t.object, t.subject, t.predicate),
        }
    }

    /// Number of leading key positions bound in `pattern`.
    fn bound_prefix(self, pattern: &TripleId) -> usize {
        let (a, b, c) = self.key(pattern);
        [a, b, c].iter().take_while(|v| **v != 0).count()
    }

    /// Permutation whose key prefix covers every bound position of `pattern`.
    fn best_for(pattern: &TripleId) -> TripleOrder {
        let s = pattern.subject != 0;
        let p = pattern.predicate != 0;
        let o = pattern.object != 0;
        match (s, p, o) {
            (true, false, true) => TripleOrder::Osp,
            (true, _, _) => TripleOrder::Spo,
            (false, true, _) => TripleOrder::Pos,
            (false, false, true) => TripleOrder::Osp,
            (false, false, false) => TripleOrder::Spo,
        }
    }
}

/// Triple permutations. SPO is always present; POS and OSP only when indexed.
#[derive(Debug, Clone, Default)]
pub struct TripleIndex {
    spo: Vec<TripleId>,
    pos: Option<Vec<TripleId>>,
    osp: Option<Vec<TripleId>>,
}

fn sorted(mut triples: Vec<TripleId>, order: TripleOrder) -> Vec<TripleId> {
    triples.sort_unstable_by_key(|t| order.key(t));
    triples
}

impl TripleIndex {
    /// Sort and deduplicate `triples`, building the extra permutations if `indexed`.
    pub fn build(triples: Vec<TripleId>, indexed: bool) -> Self {
        let mut spo = sorted(triples, TripleOrder::Spo);
        spo.dedup();
        let (pos, osp) = if indexed {
            (
                Some(sorted(spo.clone(), TripleOrder::Pos)),
                Some(sorted(spo.clone(), TripleOrder::Osp)),
            )
        } else {
            (None, None)
        };
        TripleIndex { spo, pos, osp }
    }

    pub fn len(&self) -> usize {
        self.spo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.pos.is_some() && self.osp.is_some()
    }

    fn permutation(&self, order: TripleOrder) -> Option<&[TripleId]> {
        match order {
            TripleOrder::Spo => Some(&self.spo),
            TripleOrder::Pos => self.pos.as_deref(),
            TripleOrder::Osp => self.osp.as_deref(),
        }
    }

    /// Find every triple matching `pattern`.
    ///
    /// When a permutation covers the bound positions the result is a
    /// contiguous, seekable range with an exact count. Otherwise the SPO
    /// order is scanned and filtered, which only supports forward iteration.
    pub fn search(&self, pattern: TripleId) -> TripleIter<'_> {
        let wanted = TripleOrder::best_for(&pattern);
        let (order, triples) = match self.permutation(wanted) {
            Some(triples) => (wanted, triples),
            None => (TripleOrder::Spo, self.spo.as_slice()),
        };
        let prefix = order.bound_prefix(&pattern);
        let range = key_range(triples, order, &pattern, prefix);
        let bound = [pattern.subject, pattern.predicate, pattern.object]
            .iter()
            .filter(|v| **v != 0)
            .count();
        let filter = if prefix < bound { Some(pattern) } else { None };
        TripleIter {
            triples: range,
            order,
            pos: 0,
            filter,
            matched: 0,
            exhausted: false,
        }
    }
}

fn key_range<'a>(
    triples: &'a [TripleId],
    order: TripleOrder,
    pattern: &TripleId,
    prefix: usize,
) -> &'a [TripleId] {
    let (a, b, c) = order.key(pattern);
    let fill = |bound: [u64; 3], blank: u64| -> (u64, u64, u64) {
        let v: Vec<u64> = bound
            .iter()
            .enumerate()
            .map(|(i, v)| if i < prefix { *v } else { blank })
            .collect();
        (v[0], v[1], v[2])
    };
    let lo = fill([a, b, c], 0);
    let hi = fill([a, b, c], u64::MAX);
    let start = triples.partition_point(|t| order.key(t) < lo);
    let end = triples.partition_point(|t| order.key(t) <= hi);
    &triples[start..end]
}

/// Lazy iterator over the matches of one pattern.
#[derive(Debug, Clone)]
pub struct TripleIter<'a> {
    triples: &'a [TripleId],
    order: TripleOrder,
    pos: usize,
    filter: Option<TripleId>,
    matched: u64,
    exhausted: bool,
}

impl<'a> TripleIter<'a> {
    /// Permutation this iterator walks.
    pub fn order(&self) -> TripleOrder {
        self.order
    }

    /// True if [`Self::go_to`] is supported.
    pub fn can_go_to(&self) -> bool {
        self.filter.is_none()
    }

    /// Position the iterator so that the next item is match number `pos` (0-based).
    pub fn go_to(&mut self, pos: u64) -> crate::Result<()> {
        if !self.can_go_to() {
            return Err(DictError::Invalid("filtered scans cannot seek"));
        }
        let len = self.triples.len() as u64;
        if pos >= len {
            return Err(DictError::OutOfBounds { pos, len });
        }
        self.pos = pos as usize;
        Ok(())
    }

    /// Rewind to the first match.
    pub fn go_to_start(&mut self) {
        self.pos = 0;
        self.matched = 0;
        self.exhausted = false;
    }

    /// Number of matches as far as currently known.
    ///
    /// Exact for ranges. For filtered scans this is the size of the scanned
    /// range (an over-estimate) until the scan has been exhausted, and the
    /// exact number of matches afterwards.
    pub fn estimated_num_results(&self) -> u64 {
        match self.filter {
            None => self.triples.len() as u64,
            Some(_) if self.exhausted => self.matched,
            Some(_) => self.triples.len() as u64,
        }
    }
}

impl<'a> Iterator for TripleIter<'a> {
    type Item = TripleId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(t) = self.triples.get(self.pos) {
            self.pos += 1;
            match &self.filter {
                Some(pattern) if !t.matches(pattern) => continue,
                _ => {
                    self.matched += 1;
                    return Some(*t);
                }
            }
        }
        self.exhausted = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.triples.len().saturating_sub(self.pos);
        match self.filter {
            None => (rest, Some(rest)),
            Some(_) => (0, Some(rest)),
        }
    }
}
