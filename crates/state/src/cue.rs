/// Start value ad systems use for a post-roll break.
pub const POST_ROLL_START: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuePoint {
    pub start: f64,
    pub end: Option<f64>,
}

impl CuePoint {
    pub fn new(start: f64, end: Option<f64>) -> Self {
        Self { start, end }
    }

    pub fn marker(start: f64) -> Self {
        Self { start, end: None }
    }

    pub fn post_roll() -> Self {
        Self {
            start: POST_ROLL_START,
            end: None,
        }
    }

    pub fn is_post_roll(&self) -> bool {
        self.start == POST_ROLL_START && self.end.is_none()
    }

    pub fn is_malformed(&self) -> bool {
        if !self.start.is_finite() {
            return true;
        }
        match self.end {
            Some(end) => !end.is_finite() || self.start > end,
            None => false,
        }
    }
}
