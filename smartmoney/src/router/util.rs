use smartmoney_core::FetchError;

/// Releases race outcomes in priority order.
///
/// Outcomes arrive in completion order; a success at rank `k` is only handed
/// out once every rank below `k` has settled as a failure. Failures are kept
/// in rank order for the final aggregate.
pub(crate) struct PriorityGate<T> {
    slots: Vec<Option<Result<T, FetchError>>>,
    cursor: usize,
    errors: Vec<FetchError>,
}

impl<T> PriorityGate<T> {
    pub(crate) fn new(ranks: usize) -> Self {
        Self {
            slots: (0..ranks).map(|_| None).collect(),
            cursor: 0,
            errors: Vec::with_capacity(ranks),
        }
    }

    /// Record the outcome for `rank`; returns the winning `(rank, value)` once decidable.
    pub(crate) fn settle(&mut self, rank: usize, outcome: Result<T, FetchError>) -> Option<(usize, T)> {
        if let Some(slot) = self.slots.get_mut(rank) {
            *slot = Some(outcome);
        }
        while let Some(slot) = self.slots.get_mut(self.cursor) {
            match slot.take() {
                None => return None,
                Some(Ok(v)) => return Some((self.cursor, v)),
                Some(Err(e)) => {
                    self.errors.push(e);
                    self.cursor += 1;
                }
            }
        }
        None
    }

    /// Failures in rank order.
    pub(crate) fn into_errors(self) -> Vec<FetchError> {
        self.errors
    }
}
