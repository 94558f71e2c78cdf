//! Built-in rubric presets
//!
//! The three review variants the tool ships with. `quality` is a quick
//! good/neutral/bad pass over single answers, `graded` rates single
//! answers on four named scales, `pairwise` compares two answers side by
//! side with per-answer issue flags. A custom schema can be loaded from a
//! TOML file instead (see the config module).

use oar_core::rubric::{
    CommentMode, Criterion, CriterionKind, IssueFlag, RatingOption, RubricSchema, PAIRWISE_FIRST,
    PAIRWISE_SECOND,
};

/// Names accepted by `--rubric`, in the order shown to the operator.
pub const PRESET_NAMES: [&str; 3] = ["quality", "graded", "pairwise"];

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<RubricSchema> {
    match name {
        "quality" => Some(quality()),
        "graded" => Some(graded()),
        "pairwise" => Some(pairwise()),
        _ => None,
    }
}

fn rating(key: &str, label: &str, description: &str, options: Vec<RatingOption>) -> Criterion {
    Criterion {
        key: key.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        kind: CriterionKind::Rating { options },
    }
}

fn pairwise_criterion(key: &str, label: &str, description: &str) -> Criterion {
    Criterion {
        key: key.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        kind: CriterionKind::Pairwise,
    }
}

fn option(value: &str, label: &str) -> RatingOption {
    RatingOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

/// Good/Neutral/Bad rating of single answers, one optional comment per
/// criterion.
pub fn quality() -> RubricSchema {
    let scale = || {
        vec![
            RatingOption::plain("Good"),
            RatingOption::plain("Neutral"),
            RatingOption::plain("Bad"),
        ]
    };
    RubricSchema {
        name: "quality".to_string(),
        question_column: "UserQuestion".to_string(),
        answer_columns: vec!["ModelAnswer".to_string()],
        criteria: vec![
            rating(
                "Localization",
                "Localization",
                "How well is the answer localized?",
                scale(),
            ),
            rating(
                "Pedagogy",
                "Pedagogy",
                "Is the answer pedagogically relevant?",
                scale(),
            ),
            rating(
                "Helpfulness",
                "Helpfulness",
                "How helpful is the answer?",
                scale(),
            ),
        ],
        issue_flags: vec![],
        issue_subjects: vec![],
        comment: CommentMode::PerCriterion,
    }
}

/// Four named scales for single answers, one shared comment per record.
pub fn graded() -> RubricSchema {
    RubricSchema {
        name: "graded".to_string(),
        question_column: "UserQuestion".to_string(),
        answer_columns: vec!["ModelAnswer".to_string()],
        criteria: vec![
            rating(
                "ContextualRelevance",
                "Contextual Relevance",
                "",
                vec![
                    RatingOption::plain("Excellent"),
                    RatingOption::plain("Good"),
                    RatingOption::plain("Poor"),
                ],
            ),
            rating(
                "PedagogicalQuality",
                "Pedagogical Quality",
                "",
                vec![
                    RatingOption::plain("Effective"),
                    RatingOption::plain("Acceptable"),
                    RatingOption::plain("Ineffective"),
                ],
            ),
            rating(
                "Actionability",
                "Actionability",
                "",
                vec![
                    option("VeryActionable", "Very Actionable"),
                    option("SomewhatActionable", "Somewhat Actionable"),
                    option("NotActionable", "Not Actionable"),
                ],
            ),
            rating(
                "CommunicationStyle",
                "Communication Style",
                "",
                vec![
                    option("Supportive", "Supportive & Encouraging"),
                    option("Neutral", "Neutral & Factual"),
                    option("Condescending", "Condescending or Dismissive"),
                ],
            ),
        ],
        issue_flags: vec![],
        issue_subjects: vec![],
        comment: CommentMode::Global,
    }
}

/// Side-by-side comparison of two answers: five pairwise criteria, three
/// issue flags per answer, one shared comment per record.
pub fn pairwise() -> RubricSchema {
    RubricSchema {
        name: "pairwise".to_string(),
        question_column: "UserQuestion".to_string(),
        answer_columns: vec!["ModelAnswer1".to_string(), "ModelAnswer2".to_string()],
        criteria: vec![
            pairwise_criterion(
                "ContextualRelevance",
                "Contextual Relevance",
                "How well does the answer fit the local educational environment?",
            ),
            pairwise_criterion(
                "PedagogicalQuality",
                "Pedagogical Quality",
                "How effective is the teaching advice?",
            ),
            pairwise_criterion(
                "CommunicationStyle",
                "Communication Style",
                "How does the chatbot communicate (Tone, Persona)?",
            ),
            pairwise_criterion(
                "FollowupQuality",
                "Follow-up Quality",
                "How good is the follow-up question(s) for the specific query?",
            ),
            pairwise_criterion(
                "OverallQuality",
                "Overall Quality\u{1F3C6}",
                "Which answer would you like to receive?",
            ),
        ],
        issue_flags: vec![
            IssueFlag {
                key: "Too_Wordy".to_string(),
                label: "Too Wordy (answer should be more concise)".to_string(),
            },
            IssueFlag {
                key: "No_Answer".to_string(),
                label: "No answer but should have been answered".to_string(),
            },
            IssueFlag {
                key: "Should_Not_Answer".to_string(),
                label: "Answer but should NOT have been answered".to_string(),
            },
        ],
        issue_subjects: vec![PAIRWISE_FIRST.to_string(), PAIRWISE_SECOND.to_string()],
        comment: CommentMode::Global,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_pass_validation() {
        for name in PRESET_NAMES {
            let schema = by_name(name).unwrap();
            schema.validate().unwrap();
            assert_eq!(schema.name, name);
        }
    }

    #[test]
    fn unknown_preset_is_none() {
        assert!(by_name("speed").is_none());
    }

    #[test]
    fn quality_uses_per_criterion_comments() {
        let schema = quality();
        assert_eq!(schema.comment, CommentMode::PerCriterion);
        assert_eq!(
            schema.required_columns(),
            vec!["UserQuestion", "ModelAnswer"]
        );
        assert_eq!(
            schema.judgment_columns(),
            vec![
                "Localization_rating",
                "Localization_comment",
                "Pedagogy_rating",
                "Pedagogy_comment",
                "Helpfulness_rating",
                "Helpfulness_comment",
            ]
        );
    }

    #[test]
    fn graded_keeps_internal_values_with_display_labels() {
        let schema = graded();
        let actionability = &schema.criteria[2];
        match &actionability.kind {
            CriterionKind::Rating { options } => {
                assert_eq!(options[0].value, "VeryActionable");
                assert_eq!(options[0].label, "Very Actionable");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(schema.comment, CommentMode::Global);
        assert_eq!(schema.judgment_columns().last().unwrap(), "Comments");
    }

    #[test]
    fn pairwise_layout_matches_export_vocabulary() {
        let schema = pairwise();
        assert_eq!(
            schema.required_columns(),
            vec!["UserQuestion", "ModelAnswer1", "ModelAnswer2"]
        );
        let columns = schema.judgment_columns();
        assert_eq!(columns.len(), 5 + 6 + 1);
        assert_eq!(columns[0], "ContextualRelevance_winner");
        assert_eq!(columns[4], "OverallQuality_winner");
        assert_eq!(columns[5], "LLM_1_Too_Wordy");
        assert_eq!(columns[10], "LLM_2_Should_Not_Answer");
        assert_eq!(columns[11], "Comments");
    }
}
