//! Numeric parameter input with `,` thousands separators
use thousands::Separable;

/// Parse what the user typed, ignoring separators. `None` when there is no finite number yet.
pub fn parse_number_input(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Zero, NaN and missing values do not count as a parameter
pub fn is_truthy(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}

/// Edit buffer behind the parameter field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberInput {
    text: String,
}

impl NumberInput {
    pub fn new(text: impl Into<String>) -> Self {
        let mut input = Self { text: text.into() };
        input.regroup();
        input
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `c` may be typed at the current position
    pub fn accepts(&self, c: char) -> bool {
        match c {
            '0'..='9' | ',' => true,
            '.' => !self.text.contains('.'),
            '-' => self.text.is_empty(),
            _ => false,
        }
    }

    /// Append `c` and regroup; returns false (and leaves the buffer alone) when it is not accepted
    pub fn push(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        self.text.push(c);
        self.regroup();
        true
    }

    /// Remove the last typed character (separators are not counted) and regroup
    pub fn pop(&mut self) -> Option<char> {
        let mut popped = self.text.pop();
        while popped == Some(',') {
            popped = self.text.pop();
        }
        self.regroup();
        popped
    }

    /// Re-insert `,` between groups of three integer digits
    fn regroup(&mut self) {
        let bare: String = self.text.chars().filter(|c| *c != ',').collect();
        self.text = bare.separate_with_commas();
    }

    /// Parsed value of the buffer
    pub fn value(&self) -> Option<f64> {
        parse_number_input(&self.text)
    }
}
