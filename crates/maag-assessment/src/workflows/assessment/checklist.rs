use super::schema::Question;

/// Selection rule for the red-flag checklist: the "none of the above" option never coexists
/// with a real selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistPolicy {
    exclusive_option: String,
}

impl ChecklistPolicy {
    pub fn new(exclusive_option: impl Into<String>) -> Self {
        Self {
            exclusive_option: exclusive_option.into(),
        }
    }

    /// Build the policy for a checklist question; `None` when it has no exclusive option.
    pub fn for_question(question: &Question) -> Option<Self> {
        question.exclusive_option.as_deref().map(Self::new)
    }

    pub fn exclusive_option(&self) -> &str {
        &self.exclusive_option
    }

    pub fn toggle(&self, current: &[String], option: &str) -> Vec<String> {
        toggle(current, option, &self.exclusive_option)
    }

    /// False when the exclusive option shares the selection with anything else.
    pub fn is_consistent(&self, selections: &[String]) -> bool {
        selections.len() <= 1
            || selections
                .iter()
                .all(|selection| selection != &self.exclusive_option)
    }

    /// True when the selection names at least one real condition.
    pub fn has_substantive(&self, selections: &[String]) -> bool {
        selections
            .iter()
            .any(|selection| selection != &self.exclusive_option)
    }
}

/// Apply one checkbox click to the current selection.
///
/// Picking the exclusive option replaces everything with it. Picking any other option first
/// clears the exclusive option, then flips that option in or out. Options are not checked
/// against the question's option list, and the result may be empty.
pub fn toggle(current: &[String], option: &str, exclusive_option: &str) -> Vec<String> {
    if option == exclusive_option {
        return vec![exclusive_option.to_string()];
    }

    let mut next: Vec<String> = current
        .iter()
        .filter(|selection| selection.as_str() != exclusive_option)
        .cloned()
        .collect();

    if let Some(position) = next.iter().position(|selection| selection == option) {
        next.remove(position);
    } else {
        next.push(option.to_string());
    }

    next
}
