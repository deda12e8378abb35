//! Custom format evaluation.
//!
//! Patterns are compiled once per batch. A pattern that fails to compile
//! does not abort the batch: the owning spec is treated as faulted every
//! time it is evaluated, its format never matches, and the fault is
//! reported as a diagnostic.

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::quality::{Quality, QualityProfile};
use crate::release::Protocol;

use super::types::{CustomFormat, CustomFormatError, FormatCondition};

/// The release properties custom formats are tested against.
#[derive(Debug, Clone, Copy)]
pub struct FormatSubject<'a> {
    pub title: &'a str,
    pub release_group: Option<&'a str>,
    pub quality: Quality,
    pub size_bytes: u64,
    pub protocol: Protocol,
    pub indexer_id: i64,
}

/// Result of evaluating every format against one release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatEvaluation {
    /// IDs of satisfied formats, in definition order.
    pub matched: Vec<i64>,
    /// Sum of the profile's scores for the satisfied formats.
    pub score: i32,
    /// One entry per faulted spec.
    pub diagnostics: Vec<String>,
}

#[derive(Debug)]
enum CompiledCondition {
    Title(Result<Regex, CustomFormatError>),
    Group(Result<Regex, CustomFormatError>),
    Quality(Quality),
    Size { min: Option<u64>, max: Option<u64> },
    Protocol(Protocol),
    Indexer(i64),
}

#[derive(Debug)]
struct CompiledSpec {
    name: String,
    condition: CompiledCondition,
    negate: bool,
    required: bool,
}

#[derive(Debug)]
struct CompiledFormat {
    id: i64,
    name: String,
    specs: Vec<CompiledSpec>,
}

enum SpecResult {
    Holds(bool),
    Fault(String),
}

/// Evaluates a fixed set of custom formats.
#[derive(Debug, Default)]
pub struct CustomFormatEvaluator {
    formats: Vec<CompiledFormat>,
}

impl CustomFormatEvaluator {
    pub fn new(formats: &[CustomFormat]) -> Self {
        let formats = formats
            .iter()
            .map(|format| CompiledFormat {
                id: format.id,
                name: format.name.clone(),
                specs: format
                    .specs
                    .iter()
                    .map(|spec| CompiledSpec {
                        name: spec.name.clone(),
                        condition: compile_condition(&format.name, &spec.name, &spec.condition),
                        negate: spec.negate,
                        required: spec.required,
                    })
                    .collect(),
            })
            .collect();

        Self { formats }
    }

    /// Pattern errors found while compiling, in definition order.
    pub fn errors(&self) -> Vec<&CustomFormatError> {
        self.formats
            .iter()
            .flat_map(|f| f.specs.iter())
            .filter_map(|spec| match &spec.condition {
                CompiledCondition::Title(Err(e)) | CompiledCondition::Group(Err(e)) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// Evaluate every format and score the satisfied ones with `profile`.
    pub fn evaluate(&self, subject: &FormatSubject<'_>, profile: &QualityProfile) -> FormatEvaluation {
        let mut evaluation = FormatEvaluation::default();

        for format in &self.formats {
            if self.is_satisfied(format, subject, &mut evaluation.diagnostics) {
                evaluation.matched.push(format.id);
                evaluation.score = evaluation.score.saturating_add(profile.format_score(format.id));
            }
        }

        evaluation
    }

    fn is_satisfied(
        &self,
        format: &CompiledFormat,
        subject: &FormatSubject<'_>,
        diagnostics: &mut Vec<String>,
    ) -> bool {
        let mut faulted = false;
        let mut required_hold = true;
        let mut has_optional = false;
        let mut optional_holds = false;

        for spec in &format.specs {
            let holds = match spec_result(&spec.condition, subject) {
                SpecResult::Holds(holds) => holds != spec.negate,
                SpecResult::Fault(message) => {
                    diagnostics.push(format!(
                        "custom format '{}' spec '{}': {}",
                        format.name, spec.name, message
                    ));
                    faulted = true;
                    false
                }
            };

            if spec.required {
                required_hold &= holds;
            } else {
                has_optional = true;
                optional_holds |= holds;
            }
        }

        !faulted && required_hold && (!has_optional || optional_holds)
    }
}

fn compile_condition(format: &str, spec: &str, condition: &FormatCondition) -> CompiledCondition {
    match condition {
        FormatCondition::ReleaseTitle { pattern } => {
            CompiledCondition::Title(compile_pattern(format, spec, pattern))
        }
        FormatCondition::ReleaseGroup { pattern } => {
            CompiledCondition::Group(compile_pattern(format, spec, pattern))
        }
        FormatCondition::Quality { quality } => CompiledCondition::Quality(*quality),
        FormatCondition::Size {
            min_bytes,
            max_bytes,
        } => CompiledCondition::Size {
            min: *min_bytes,
            max: *max_bytes,
        },
        FormatCondition::Protocol { protocol } => CompiledCondition::Protocol(*protocol),
        FormatCondition::Indexer { indexer_id } => CompiledCondition::Indexer(*indexer_id),
    }
}

fn compile_pattern(format: &str, spec: &str, pattern: &str) -> Result<Regex, CustomFormatError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            warn!(custom_format = format, spec, pattern, error = %e, "Invalid custom format pattern");
            CustomFormatError::InvalidPattern {
                format: format.to_string(),
                spec: spec.to_string(),
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })
}

fn spec_result(condition: &CompiledCondition, subject: &FormatSubject<'_>) -> SpecResult {
    match condition {
        CompiledCondition::Title(Ok(regex)) => SpecResult::Holds(regex.is_match(subject.title)),
        CompiledCondition::Group(Ok(regex)) => {
            SpecResult::Holds(subject.release_group.is_some_and(|g| regex.is_match(g)))
        }
        CompiledCondition::Title(Err(e)) | CompiledCondition::Group(Err(e)) => {
            SpecResult::Fault(e.to_string())
        }
        CompiledCondition::Quality(quality) => SpecResult::Holds(subject.quality == *quality),
        CompiledCondition::Size { min, max } => {
            let size = subject.size_bytes;
            SpecResult::Holds(min.map_or(true, |m| size >= m) && max.map_or(true, |m| size <= m))
        }
        CompiledCondition::Protocol(protocol) => SpecResult::Holds(subject.protocol == *protocol),
        CompiledCondition::Indexer(id) => SpecResult::Holds(subject.indexer_id == *id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_format::CustomFormatSpec;
    use crate::quality::ProfileFormatItem;

    fn subject(title: &str) -> FormatSubject<'_> {
        FormatSubject {
            title,
            release_group: Some("BitBook"),
            quality: Quality::Epub,
            size_bytes: 2 * 1024 * 1024,
            protocol: Protocol::Torrent,
            indexer_id: 3,
        }
    }

    fn profile(scores: &[(i64, i32)]) -> QualityProfile {
        let mut profile = QualityProfile::new(1, "eBook", &[Quality::Pdf, Quality::Epub], Quality::Epub);
        profile.format_items = scores
            .iter()
            .map(|&(format_id, score)| ProfileFormatItem { format_id, score })
            .collect();
        profile
    }

    fn title_spec(pattern: &str) -> CustomFormatSpec {
        CustomFormatSpec::new(
            "title",
            FormatCondition::ReleaseTitle {
                pattern: pattern.to_string(),
            },
        )
    }

    #[test]
    fn test_required_specs_must_all_hold() {
        let formats = vec![
            CustomFormat::new(
                1,
                "Retail Torrent",
                vec![
                    title_spec(r"\bretail\b").required(),
                    CustomFormatSpec::new(
                        "torrent",
                        FormatCondition::Protocol {
                            protocol: Protocol::Torrent,
                        },
                    )
                    .required(),
                ],
            ),
            CustomFormat::new(
                2,
                "Usenet",
                vec![CustomFormatSpec::new(
                    "usenet",
                    FormatCondition::Protocol {
                        protocol: Protocol::Usenet,
                    },
                )],
            ),
        ];
        let evaluator = CustomFormatEvaluator::new(&formats);
        let profile = profile(&[(1, 50), (2, 10)]);

        let result = evaluator.evaluate(&subject("Author - Book RETAIL epub"), &profile);
        assert_eq!(result.matched, vec![1]);
        assert_eq!(result.score, 50);
        assert!(result.diagnostics.is_empty());

        let result = evaluator.evaluate(&subject("Author - Book epub"), &profile);
        assert!(result.matched.is_empty());
    }

    #[test]
    fn test_any_optional_spec_is_enough() {
        let formats = vec![CustomFormat::new(
            1,
            "Retail or Usenet",
            vec![
                title_spec(r"\bretail\b"),
                CustomFormatSpec::new(
                    "usenet",
                    FormatCondition::Protocol {
                        protocol: Protocol::Usenet,
                    },
                ),
                CustomFormatSpec::new("epub", FormatCondition::Quality { quality: Quality::Epub }).required(),
            ],
        )];
        let evaluator = CustomFormatEvaluator::new(&formats);
        let profile = profile(&[(1, 5)]);

        assert_eq!(evaluator.evaluate(&subject("Author - Book RETAIL"), &profile).matched, vec![1]);
        assert!(evaluator.evaluate(&subject("Author - Book"), &profile).matched.is_empty());

        let mut pdf = subject("Author - Book RETAIL");
        pdf.quality = Quality::Pdf;
        assert!(evaluator.evaluate(&pdf, &profile).matched.is_empty());
    }

    #[test]
    fn test_scores_saturate_instead_of_overflowing() {
        let epub = || CustomFormatSpec::new("epub", FormatCondition::Quality { quality: Quality::Epub });
        let formats = vec![
            CustomFormat::new(1, "Epub", vec![epub()]),
            CustomFormat::new(2, "Also Epub", vec![epub()]),
        ];
        let evaluator = CustomFormatEvaluator::new(&formats);

        let result = evaluator.evaluate(&subject("x"), &profile(&[(1, 2_000_000_000), (2, 2_000_000_000)]));
        assert_eq!(result.matched, vec![1, 2]);
        assert_eq!(result.score, i32::MAX);

        let result = evaluator.evaluate(&subject("x"), &profile(&[(1, -2_000_000_000), (2, -2_000_000_000)]));
        assert_eq!(result.score, i32::MIN);
    }

    #[test]
    fn test_negate_inverts_condition() {
        let formats = vec![CustomFormat::new(1, "Not Abridged", vec![title_spec("abridged").negated()])];
        let evaluator = CustomFormatEvaluator::new(&formats);
        let profile = profile(&[(1, 5)]);

        assert_eq!(evaluator.evaluate(&subject("Author - Book"), &profile).score, 5);
        assert_eq!(evaluator.evaluate(&subject("Author - Book ABRIDGED"), &profile).score, 0);
    }

    #[test]
    fn test_unscored_format_matches_with_zero() {
        let formats = vec![CustomFormat::new(
            9,
            "Indexer 3",
            vec![CustomFormatSpec::new("indexer", FormatCondition::Indexer { indexer_id: 3 })],
        )];
        let evaluator = CustomFormatEvaluator::new(&formats);

        let result = evaluator.evaluate(&subject("x"), &profile(&[]));
        assert_eq!(result.matched, vec![9]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_invalid_optional_pattern_fails_format() {
        let formats = vec![CustomFormat::new(
            1,
            "Broken",
            vec![
                title_spec("(unclosed"),
                CustomFormatSpec::new("epub", FormatCondition::Quality { quality: Quality::Epub }),
            ],
        )];
        let evaluator = CustomFormatEvaluator::new(&formats);
        assert_eq!(evaluator.errors().len(), 1);

        let result = evaluator.evaluate(&subject("Author - Book"), &profile(&[(1, 20)]));
        assert!(result.matched.is_empty());
        assert_eq!(result.score, 0);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].contains("Broken"));
    }

    #[test]
    fn test_invalid_negated_pattern_never_matches() {
        let formats = vec![CustomFormat::new(1, "Not Retail", vec![title_spec("(retail").negated()])];
        let evaluator = CustomFormatEvaluator::new(&formats);

        let result = evaluator.evaluate(&subject("Author - Book RETAIL"), &profile(&[(1, 100)]));
        assert!(result.matched.is_empty());
        assert_eq!(result.score, 0);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_invalid_required_pattern_fails_format() {
        let formats = vec![CustomFormat::new(1, "Broken", vec![title_spec("[z-a]").required()])];
        let evaluator = CustomFormatEvaluator::new(&formats);

        let result = evaluator.evaluate(&subject("Author - Book"), &profile(&[(1, 20)]));
        assert!(result.matched.is_empty());
        assert_eq!(result.score, 0);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_release_group_and_size() {
        let formats = vec![
            CustomFormat::new(
                1,
                "Group",
                vec![CustomFormatSpec::new(
                    "group",
                    FormatCondition::ReleaseGroup {
                        pattern: "^bitbook$".to_string(),
                    },
                )],
            ),
            CustomFormat::new(
                2,
                "Small",
                vec![CustomFormatSpec::new(
                    "size",
                    FormatCondition::Size {
                        min_bytes: None,
                        max_bytes: Some(1024 * 1024),
                    },
                )],
            ),
        ];
        let evaluator = CustomFormatEvaluator::new(&formats);

        let result = evaluator.evaluate(&subject("x"), &profile(&[(1, 1), (2, 1)]));
        assert_eq!(result.matched, vec![1]);

        let mut no_group = subject("x");
        no_group.release_group = None;
        no_group.size_bytes = 1000;
        let result = evaluator.evaluate(&no_group, &profile(&[]));
        assert_eq!(result.matched, vec![2]);
    }
}
