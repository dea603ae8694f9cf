use oxiwall_engine::Height;

/// State machine measuring one edge streak.
///
/// A scan starts [`Extending`](Self::Extending) from the edge block. Each
/// height fed to [`step`](Self::step) either extends the streak (strictly
/// higher than the previous one) or moves the scan to
/// [`Stopped`](Self::Stopped). `Stopped` is absorbing: later heights are
/// never counted, even if they would continue an increasing run.
///
/// # Example
///
/// ```
/// use oxiwall_evaluator::StreakScan;
///
/// let scan = StreakScan::start(1);
/// let (scan, counted) = scan.step(3);
/// assert!(counted);
/// let (scan, counted) = scan.step(2);
/// assert!(!counted);
/// assert!(scan.is_stopped());
/// let (_, counted) = scan.step(9);
/// assert!(!counted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StreakScan {
    Extending { previous: Height },
    Stopped,
}

impl StreakScan {
    /// Starts a scan at the edge block `edge`.
    #[must_use]
    pub const fn start(edge: Height) -> Self {
        Self::Extending { previous: edge }
    }

    /// Feeds the next height toward the center.
    ///
    /// Returns the new state and whether `height` extended the streak.
    #[must_use]
    pub const fn step(self, height: Height) -> (Self, bool) {
        match self {
            Self::Extending { previous } if height > previous => {
                (Self::Extending { previous: height }, true)
            }
            Self::Extending { .. } | Self::Stopped => (Self::Stopped, false),
        }
    }

    /// Returns the streak length from `edge` over `inward` heights.
    pub fn count<I>(edge: Height, inward: I) -> u32
    where
        I: IntoIterator<Item = Height>,
    {
        let mut state = Self::start(edge);
        let mut streak = 0;
        for height in inward {
            let (next, counted) = state.step(height);
            state = next;
            if state.is_stopped() {
                break;
            }
            if counted {
                streak += 1;
            }
        }
        streak
    }
}
