use super::answers::{AnswerSet, AnswerValue};
use super::schema::{QuestionnaireSchema, Section, SectionKind};

/// Whether `section` is answered well enough to move past it.
///
/// Standard sections need a non-empty single choice for every question. The checklist section
/// only needs a non-empty selection; which options were picked is not inspected here.
pub fn is_complete(section: &Section, answers: &AnswerSet) -> bool {
    match section.kind {
        SectionKind::Standard => section.questions.iter().all(|question| {
            matches!(answers.get(&question.id), Some(AnswerValue::Scalar(value)) if !value.is_empty())
        }),
        SectionKind::ExclusiveChecklist => section.questions.iter().all(|question| {
            matches!(answers.get(&question.id), Some(AnswerValue::Checklist(values)) if !values.is_empty())
        }),
    }
}

/// First section (in traversal order) that still blocks navigation.
pub fn first_incomplete<'a>(
    schema: &'a QuestionnaireSchema,
    answers: &AnswerSet,
) -> Option<&'a Section> {
    schema
        .sections()
        .iter()
        .find(|section| !is_complete(section, answers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> QuestionnaireSchema {
        QuestionnaireSchema::builtin().expect("builtin schema is valid")
    }

    #[test]
    fn standard_section_needs_every_question() {
        let schema = schema();
        let main = &schema.sections()[0];
        let mut answers = AnswerSet::for_schema(&schema);

        answers.set_scalar("heartburn", "Ya");
        answers.set_scalar("burning_sensation", "Tidak");
        assert!(!is_complete(main, &answers));

        answers.set_scalar("bloating", "Tidak");
        assert!(is_complete(main, &answers));
    }

    #[test]
    fn empty_string_does_not_count_as_answered() {
        let schema = schema();
        let duration = &schema.sections()[2];
        let mut answers = AnswerSet::for_schema(&schema);

        answers.set_scalar("duration", "");
        assert!(!is_complete(duration, &answers));
    }

    #[test]
    fn checklist_section_needs_any_selection() {
        let schema = schema();
        let flags = schema.checklist_section();
        let mut answers = AnswerSet::for_schema(&schema);
        assert!(!is_complete(flags, &answers));

        answers.toggle_checklist("Tidak mengalami semua di atas");
        assert!(is_complete(flags, &answers));
    }

    #[test]
    fn unchecking_everything_blocks_the_checklist_again() {
        let schema = schema();
        let flags = schema.checklist_section();
        let mut answers = AnswerSet::for_schema(&schema);

        answers.toggle_checklist("Muntah darah");
        assert!(is_complete(flags, &answers));

        answers.toggle_checklist("Muntah darah");
        assert!(!is_complete(flags, &answers));
    }

    #[test]
    fn first_incomplete_walks_in_traversal_order() {
        let schema = schema();
        let mut answers = AnswerSet::for_schema(&schema);
        assert_eq!(
            first_incomplete(&schema, &answers).map(|s| s.id.as_str()),
            Some("B")
        );

        for id in ["heartburn", "burning_sensation", "bloating"] {
            answers.set_scalar(id, "Tidak");
        }
        assert_eq!(
            first_incomplete(&schema, &answers).map(|s| s.id.as_str()),
            Some("C")
        );
    }
}
