#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Touch,
    Keyboard,
}

impl InputKind {
    /// Mouse drags resume playback on release even if the media was paused
    /// beforehand; touch and keyboard restore the previous state.
    pub fn always_resumes(self) -> bool {
        matches!(self, InputKind::Pointer)
    }
}

/// Interaction events the seek bar widget reports to its coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrubInput {
    ChangeStart(InputKind),
    Change(f64),
    ChangeEnd,
    PointerMove { x: f32 },
    PointerLeave,
    ChapterEnter { index: usize, x: f32, y: f32 },
    ChapterLeave,
    TrackResized { width: f32 },
}
