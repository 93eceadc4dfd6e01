use crate::{PeelDetector, PeelEvent, Transition};
use peel_common::{Force, Time};

#[derive(Clone)]
pub struct PeelIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    source: I,
    detector: PeelDetector,
}

impl<I> PeelIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    pub fn detector(&self) -> &PeelDetector {
        &self.detector
    }

    pub fn into_detector(self) -> PeelDetector {
        self.detector
    }
}

impl<I> Iterator for PeelIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    type Item = PeelEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (time, force) = self.source.next()?;
            if let Some(event) = self.detector.process_sample(force, time).into_peel() {
                return Some(event);
            }
        }
    }
}

#[derive(Clone)]
pub struct TransitionIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    source: I,
    detector: PeelDetector,
}

impl<I> TransitionIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    pub fn detector(&self) -> &PeelDetector {
        &self.detector
    }
}

impl<I> Iterator for TransitionIter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    type Item = (Time, Transition);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (time, force) = self.source.next()?;
            if let Some(transition) = self.detector.process_sample(force, time).transition {
                return Some((time, transition));
            }
        }
    }
}

pub trait PeelFilter<I>
where
    I: Iterator<Item = (Time, Force)>,
{
    /// Yields each committed peel.
    fn peels(self, detector: PeelDetector) -> PeelIter<I>;

    /// Yields every state change, including started and discarded episodes.
    fn transitions(self, detector: PeelDetector) -> TransitionIter<I>;
}

impl<I> PeelFilter<I> for I
where
    I: Iterator<Item = (Time, Force)>,
{
    fn peels(self, detector: PeelDetector) -> PeelIter<I> {
        PeelIter {
            source: self,
            detector,
        }
    }

    fn transitions(self, detector: PeelDetector) -> TransitionIter<I> {
        TransitionIter {
            source: self,
            detector,
        }
    }
}
