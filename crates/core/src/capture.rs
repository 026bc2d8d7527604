use std::fmt;

/// Where the text of a new task came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddSource {
    /// The compose box; its current text is submitted.
    Compose,
    /// A suggestion chip carrying its own text.
    Suggestion(String),
}

impl AddSource {
    pub fn is_suggestion(&self) -> bool {
        matches!(self, AddSource::Suggestion(_))
    }
}

/// Rejects task text that is empty once surrounding whitespace is ignored.
///
/// The original text is returned untouched; only its trimmed form is checked.
pub fn require_text(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text)
}

pub fn require_query(query: &str) -> Result<&str, ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(query)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyText,
    EmptyQuery,
    NotEnoughTasks { required: usize, available: usize },
}

impl ValidationError {
    /// Short heading shown above the message, mirroring an alert title.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::EmptyText => "No task entered",
            ValidationError::EmptyQuery => "No query entered",
            ValidationError::NotEnoughTasks { .. } => "Add more tasks",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyText => write!(f, "Please enter a task to add."),
            ValidationError::EmptyQuery => write!(f, "Please enter a search term."),
            ValidationError::NotEnoughTasks { required, .. } => write!(
                f,
                "Please add at least {required} tasks to get suggestions."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_text_is_rejected(#[case] text: &str) {
        assert_eq!(require_text(text), Err(ValidationError::EmptyText));
        assert_eq!(require_query(text), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn text_is_returned_untrimmed() {
        assert_eq!(require_text("  write tests "), Ok("  write tests "));
    }

    #[test]
    fn not_enough_tasks_mentions_threshold() {
        let err = ValidationError::NotEnoughTasks {
            required: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Please add at least 2 tasks to get suggestions."
        );
        assert_eq!(err.title(), "Add more tasks");
    }
}
