//! Cuts one page out of a match sequence and reconciles its count estimate.

use crate::errors::FragmentError;

/// Result of [`MatchSequence::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seek {
    /// The next match is the requested one.
    Positioned,
    /// Fewer matches exist than the requested offset.
    OutOfBounds,
    /// The sequence can only be iterated forwards.
    Unsupported,
}

/// Lazily produced matches of one resolved pattern, in a stable engine-defined order.
pub trait MatchSequence {
    type Item;

    fn next_match(&mut self) -> Result<Option<Self::Item>, FragmentError>;

    /// Position the sequence so that the next match is number `offset` (0-based),
    /// counted from the start regardless of what was consumed before.
    fn seek(&mut self, offset: u64) -> Result<Seek, FragmentError>;

    /// Approximate number of matches. May over- or under-estimate and may change
    /// while the sequence is consumed.
    fn estimated_total(&self) -> u64;
}

/// One page of matches plus what was learnt about the sequence while cutting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<T> {
    pub items: Vec<T>,
    pub raw_estimate: u64,
    pub had_any_match: bool,
}

impl<T> Window<T> {
    /// The reconciled total for a window taken at `offset`.
    pub fn total(&self, offset: u64) -> u64 {
        reconcile(self.items.len() as u64, offset, self.raw_estimate, self.had_any_match)
    }
}

/// Take up to `limit` matches starting at match number `offset`.
pub fn window<S>(sequence: &mut S, offset: u64, limit: u64) -> Result<Window<S::Item>, FragmentError>
where
    S: MatchSequence + ?Sized,
{
    let mut items = Vec::new();
    let first = sequence.next_match()?;
    let had_any_match = first.is_some();

    if let Some(first) = first {
        match sequence.seek(offset)? {
            Seek::Positioned => take(sequence, limit, &mut items)?,
            Seek::OutOfBounds => {}
            Seek::Unsupported => {
                // `first` is match number 0
                let mut pending = Some(first);
                let mut consumed = 0u64;
                let mut exhausted = false;
                while consumed < offset {
                    if pending.take().is_none() && sequence.next_match()?.is_none() {
                        exhausted = true;
                        break;
                    }
                    consumed += 1;
                }
                if !exhausted && limit > 0 {
                    if let Some(first) = pending {
                        items.push(first);
                    }
                    take(sequence, limit, &mut items)?;
                }
            }
        }
    }

    Ok(Window {
        items,
        raw_estimate: sequence.estimated_total(),
        had_any_match,
    })
}

fn take<S>(sequence: &mut S, limit: u64, items: &mut Vec<S::Item>) -> Result<(), FragmentError>
where
    S: MatchSequence + ?Sized,
{
    while (items.len() as u64) < limit {
        match sequence.next_match()? {
            Some(item) => items.push(item),
            None => break,
        }
    }
    Ok(())
}

/// Turn a raw estimate into a total that never under-reports what was seen.
///
/// With `n` matches on the page the total is at least `offset + n + 1`; an empty page of
/// a pattern that matched something reports at least 1; a pattern without matches reports 0.
pub fn reconcile(n: u64, offset: u64, raw_estimate: u64, had_any_match: bool) -> u64 {
    if n > 0 {
        offset.saturating_add(n).saturating_add(1).max(raw_estimate)
    } else if had_any_match {
        raw_estimate.max(1)
    } else {
        0
    }
}

pub fn is_last_page(total: u64, offset: u64, page_size: u64) -> bool {
    total < offset.saturating_add(page_size)
}
