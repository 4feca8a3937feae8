//! Step tables and the linear step cursor shared by every dashboard.

use std::fmt;

/// 1-based position of a step inside its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(u8);

impl StepId {
    /// The entry step of every flow
    pub const FIRST: StepId = StepId(1);

    /// Build a step id for a static table. Ids are 1-based.
    pub const fn at(n: u8) -> Self {
        assert!(n >= 1, "step ids start at 1");
        StepId(n)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position for indexing step tables
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbolic icon attached to a step; the presentation layer picks the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIcon {
    Gift,
    Eye,
    Package,
    Party,
    HandHeart,
    Truck,
    Handshake,
    Bell,
    CheckCircle,
    Key,
    Door,
}

impl StepIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            StepIcon::Gift => "🎁",
            StepIcon::Eye => "👁",
            StepIcon::Package => "📦",
            StepIcon::Party => "🎉",
            StepIcon::HandHeart => "🤲",
            StepIcon::Truck => "🚚",
            StepIcon::Handshake => "🤝",
            StepIcon::Bell => "🔔",
            StepIcon::CheckCircle => "✔",
            StepIcon::Key => "🔑",
            StepIcon::Door => "🚪",
        }
    }
}

/// One stage of a guided workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub label: &'static str,
    pub icon: StepIcon,
}

impl Step {
    pub const fn new(id: u8, label: &'static str, icon: StepIcon) -> Self {
        Self {
            id: StepId::at(id),
            label,
            icon,
        }
    }
}

/// Returns true when ids run 1..=N in table order.
pub fn is_dense(steps: &[Step]) -> bool {
    !steps.is_empty()
        && steps
            .iter()
            .enumerate()
            .all(|(i, step)| step.id.index() == i)
}

/// Slide direction of the last transition. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Forward => "→",
            Direction::Backward => "←",
        }
    }
}

/// Where a step sits relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Upcoming,
}

/// Current step plus the direction we arrived from.
///
/// All transitions clamp into `[1, len]`; there is no failing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    current: StepId,
    direction: Direction,
    len: u8,
}

impl StepState {
    pub fn new(len: usize) -> Self {
        let len = u8::try_from(len.max(1)).unwrap_or(u8::MAX);
        Self {
            current: StepId::FIRST,
            direction: Direction::Forward,
            len,
        }
    }

    pub fn current(&self) -> StepId {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_terminal(&self) -> bool {
        self.current.0 == self.len
    }

    pub fn is_first(&self) -> bool {
        self.current == StepId::FIRST
    }

    /// Jump to `target`, clamped into range. Returns true if the step changed.
    ///
    /// Jumping to the current step leaves the direction untouched.
    pub fn go_to(&mut self, target: usize) -> bool {
        let clamped = target.clamp(1, usize::from(self.len));
        let target = StepId(clamped as u8);
        if target == self.current {
            return false;
        }
        self.direction = if target > self.current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.current = target;
        true
    }

    /// One step forward; no-op on the terminal step.
    pub fn next(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.go_to(usize::from(self.current.0) + 1)
    }

    /// One step back; no-op on the first step.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.go_to(usize::from(self.current.0) - 1)
    }

    pub fn status_of(&self, id: StepId) -> StepStatus {
        match id.cmp(&self.current) {
            std::cmp::Ordering::Less => StepStatus::Done,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Upcoming,
        }
    }

    /// Share of the flow already reached, 0-100. The first step counts as 0.
    pub fn progress_percent(&self) -> u8 {
        if self.len <= 1 {
            return 100;
        }
        let done = u32::from(self.current.0 - 1);
        let span = u32::from(self.len - 1);
        ((done * 100 + span / 2) / span) as u8
    }

    pub fn reset(&mut self) {
        self.current = StepId::FIRST;
        self.direction = Direction::Forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_forward_on_first_step() {
        let state = StepState::new(4);
        assert_eq!(state.current(), StepId::FIRST);
        assert_eq!(state.direction(), Direction::Forward);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_go_to_sets_direction() {
        let mut state = StepState::new(4);
        assert!(state.go_to(3));
        assert_eq!(state.direction(), Direction::Forward);
        assert!(state.go_to(2));
        assert_eq!(state.direction(), Direction::Backward);
    }

    #[test]
    fn test_go_to_same_step_keeps_direction() {
        let mut state = StepState::new(4);
        state.go_to(3);
        state.go_to(2);
        assert!(!state.go_to(2));
        assert_eq!(state.direction(), Direction::Backward);
    }

    #[test]
    fn test_go_to_clamps_out_of_range() {
        let mut state = StepState::new(3);
        state.go_to(99);
        assert_eq!(state.current().get(), 3);
        state.go_to(0);
        assert_eq!(state.current().get(), 1);
    }

    #[test]
    fn test_next_is_noop_on_terminal() {
        let mut state = StepState::new(3);
        state.go_to(3);
        assert!(!state.next());
        assert_eq!(state.current().get(), 3);
    }

    #[test]
    fn test_prev_is_noop_on_first() {
        let mut state = StepState::new(3);
        assert!(!state.prev());
        assert_eq!(state.current(), StepId::FIRST);
    }

    #[test]
    fn test_clamping_holds_for_mixed_sequences() {
        let mut state = StepState::new(4);
        let moves: [i8; 12] = [1, 1, 1, 1, 1, -1, 7, -1, -1, -1, -1, 0];
        for m in moves {
            match m {
                1 => {
                    state.next();
                }
                -1 => {
                    state.prev();
                }
                n => {
                    state.go_to(n as usize);
                }
            }
            let id = state.current().get();
            assert!((1..=4).contains(&id), "step {id} out of range");
        }
    }

    #[test]
    fn test_status_and_progress() {
        let mut state = StepState::new(4);
        state.go_to(3);
        assert_eq!(state.status_of(StepId::at(1)), StepStatus::Done);
        assert_eq!(state.status_of(StepId::at(3)), StepStatus::Current);
        assert_eq!(state.status_of(StepId::at(4)), StepStatus::Upcoming);
        assert_eq!(state.progress_percent(), 67);
        state.go_to(4);
        assert_eq!(state.progress_percent(), 100);
    }

    #[test]
    fn test_reset_returns_to_first_step() {
        let mut state = StepState::new(4);
        state.go_to(4);
        state.prev();
        state.reset();
        assert_eq!(state.current(), StepId::FIRST);
        assert_eq!(state.direction(), Direction::Forward);
    }

    #[test]
    fn test_is_dense() {
        let good = [
            Step::new(1, "A", StepIcon::Eye),
            Step::new(2, "B", StepIcon::Eye),
        ];
        let gap = [
            Step::new(1, "A", StepIcon::Eye),
            Step::new(3, "B", StepIcon::Eye),
        ];
        assert!(is_dense(&good));
        assert!(!is_dense(&gap));
        assert!(!is_dense(&[]));
    }
}
