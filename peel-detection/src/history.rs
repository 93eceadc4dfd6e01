use peel_common::Force;

/// A fixed capacity first-in-first-out record of the most recent peel peaks.
/// Once full, each new peak overwrites the oldest one in place.
#[derive(Default, Debug, Clone)]
pub struct PeakHistory {
    peaks: Vec<Force>,
    capacity: usize,
    // Index of the oldest peak, only ever non-zero once the buffer is full
    oldest: usize,
}

impl PeakHistory {
    /// Creates an empty history. A capacity of zero is raised to one, as the
    /// reference force is always the mean of a non-empty history.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            peaks: Vec::with_capacity(capacity),
            capacity,
            oldest: 0,
        }
    }

    /// Appends `peak`, returning the evicted peak if the history was full.
    pub fn push(&mut self, peak: Force) -> Option<Force> {
        if self.peaks.len() < self.capacity {
            self.peaks.push(peak);
            return None;
        }
        let slot = self.peaks.get_mut(self.oldest)?;
        let evicted = std::mem::replace(slot, peak);
        self.oldest = (self.oldest + 1) % self.capacity;
        Some(evicted)
    }

    /// The arithmetic mean of all recorded peaks, or None if there are none.
    pub fn mean(&self) -> Option<Force> {
        (!self.is_empty()).then(|| self.iter().sum::<Force>() / self.len() as Force)
    }

    /// Iterates from the oldest to the most recent peak.
    pub fn iter(&self) -> impl Iterator<Item = Force> + '_ {
        let (newer, older) = self.peaks.split_at(self.oldest);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<Force> {
        self.iter().collect()
    }

    pub fn latest(&self) -> Option<Force> {
        if self.is_full() {
            self.oldest
                .checked_sub(1)
                .map_or_else(|| self.peaks.last(), |i| self.peaks.get(i))
                .copied()
        } else {
            self.peaks.last().copied()
        }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.peaks.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.peaks.clear();
        self.oldest = 0;
    }
}
