/// The furthest point any rule attempt failed at, and which rule it was.
///
/// Only a failure strictly past the recorded position replaces it, so the
/// first rule to fail at the rightmost position wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureState<R> {
    furthest: Option<(usize, R)>,
}

impl<R> Default for FailureState<R> {
    fn default() -> Self {
        Self { furthest: None }
    }
}

impl<R: Copy> FailureState<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this failure became the new furthest one.
    pub fn record(&mut self, rule: R, pos: usize) -> bool {
        match self.furthest {
            Some((furthest, _)) if pos <= furthest => false,
            _ => {
                self.furthest = Some((pos, rule));
                true
            }
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.furthest.map(|(pos, _)| pos)
    }

    #[must_use]
    pub fn rule(&self) -> Option<R> {
        self.furthest.map(|(_, rule)| rule)
    }
}
