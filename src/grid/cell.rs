//! Renderer-agnostic cell contents

/// What a column renders for one row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Bar(DurationBar),
    /// A clickable action label
    Action(String),
    Empty,
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

/// Default start fraction past which the label is anchored to the right
pub const FROM_RIGHT_THRESHOLD: f64 = 0.8;

/// Duration-proportional bar: `start_us`/`duration_us` within `[0, total_us]`
#[derive(Debug, Clone, PartialEq)]
pub struct DurationBar {
    pub start_us: i64,
    pub duration_us: i64,
    pub total_us: i64,
    pub label: String,
    pub error: bool,
    pub from_right_threshold: f64,
}

impl DurationBar {
    pub fn new(start_us: i64, duration_us: i64, total_us: i64, label: impl Into<String>) -> Self {
        Self {
            start_us,
            duration_us,
            total_us,
            label: label.into(),
            error: false,
            from_right_threshold: FROM_RIGHT_THRESHOLD,
        }
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    /// Non-positive totals are treated as 1 so widths stay finite
    fn total(&self) -> f64 {
        if self.total_us > 0 {
            self.total_us as f64
        } else {
            1.0
        }
    }

    /// Whether the label sits at the right end of the bar
    pub fn from_right(&self) -> bool {
        self.start_us as f64 / self.total() > self.from_right_threshold
    }

    /// Bar placement inside a cell `width` units wide: `(offset, length)`.
    ///
    /// The bar is always at least one unit long and never leaves the cell.
    pub fn geometry(&self, width: u16) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let total = self.total();
        let scale = f64::from(width);
        let start = (self.start_us.max(0) as f64 / total * scale).floor();
        let start = (start as u16).min(width - 1);
        let len = (self.duration_us.max(0) as f64 / total * scale).round() as u16;
        let len = len.clamp(1, width - start);
        (start, len)
    }
}
