/// A submitted answer, either typed text or an already numeric value
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Number(f64),
}

impl Answer {
    /// Numeric reading of the answer. Blank or non-numeric text has none,
    /// so it can never match a result.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) if n.is_finite() => Some(*n),
            Answer::Number(_) => None,
            Answer::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    pub fn matches(&self, expected: f64) -> bool {
        self.as_number() == Some(expected)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<f64> for Answer {
    fn from(n: f64) -> Self {
        Answer::Number(n)
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Answer::Number(n as f64)
    }
}

impl From<i32> for Answer {
    fn from(n: i32) -> Self {
        Answer::Number(n as f64)
    }
}

impl From<u32> for Answer {
    fn from(n: u32) -> Self {
        Answer::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(Answer::from(" 8 ").as_number(), Some(8.0));
        assert_eq!(Answer::from("8.0").as_number(), Some(8.0));
        assert_eq!(Answer::from("-2").as_number(), Some(-2.0));
    }

    #[test]
    fn test_non_numeric_has_no_value() {
        assert_eq!(Answer::from("").as_number(), None);
        assert_eq!(Answer::from("   ").as_number(), None);
        assert_eq!(Answer::from("eight").as_number(), None);
        assert_eq!(Answer::from("inf").as_number(), None);
        assert_eq!(Answer::from(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_matches() {
        assert!(Answer::from(8).matches(8.0));
        assert!(Answer::from("12").matches(12.0));
        assert!(!Answer::from("12.5").matches(12.0));
        assert!(!Answer::from("").matches(0.0));
    }
}
