//! Stage registry: the legacy return pipeline and per-product stage lists.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ProductId, StageColor, StageId, StageName, StageSlug, TypeConstraintError,
};

/// Fixed stages of the legacy single-pipeline model, in pipeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStage {
    NotStarted,
    DocumentsGathering,
    InformationReview,
    ReturnPreparation,
    QualityReview,
    ClientReview,
    SignatureRequired,
    Filing,
    Filed,
}

impl ReturnStage {
    /// Every stage, ordered from initial to terminal.
    pub const ALL: [ReturnStage; 9] = [
        ReturnStage::NotStarted,
        ReturnStage::DocumentsGathering,
        ReturnStage::InformationReview,
        ReturnStage::ReturnPreparation,
        ReturnStage::QualityReview,
        ReturnStage::ClientReview,
        ReturnStage::SignatureRequired,
        ReturnStage::Filing,
        ReturnStage::Filed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ReturnStage::NotStarted => "not_started",
            ReturnStage::DocumentsGathering => "documents_gathering",
            ReturnStage::InformationReview => "information_review",
            ReturnStage::ReturnPreparation => "return_preparation",
            ReturnStage::QualityReview => "quality_review",
            ReturnStage::ClientReview => "client_review",
            ReturnStage::SignatureRequired => "signature_required",
            ReturnStage::Filing => "filing",
            ReturnStage::Filed => "filed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReturnStage::NotStarted => "Not Started",
            ReturnStage::DocumentsGathering => "Gathering Docs",
            ReturnStage::InformationReview => "Info Review",
            ReturnStage::ReturnPreparation => "Preparing Return",
            ReturnStage::QualityReview => "Quality Review",
            ReturnStage::ClientReview => "Client Review",
            ReturnStage::SignatureRequired => "Awaiting Signature",
            ReturnStage::Filing => "Filing",
            ReturnStage::Filed => "Filed",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            ReturnStage::NotStarted => "#6c757d",
            ReturnStage::DocumentsGathering => "#0dcaf0",
            ReturnStage::InformationReview => "#0d6efd",
            ReturnStage::ReturnPreparation => "#6610f2",
            ReturnStage::QualityReview => "#6f42c1",
            ReturnStage::ClientReview => "#d63384",
            ReturnStage::SignatureRequired => "#fd7e14",
            ReturnStage::Filing => "#ffc107",
            ReturnStage::Filed => "#198754",
        }
    }

    /// The stage reported for clients with no recorded state.
    pub const fn initial() -> Self {
        ReturnStage::NotStarted
    }

    pub const fn terminal() -> Self {
        ReturnStage::Filed
    }
}

impl Default for ReturnStage {
    fn default() -> Self {
        Self::initial()
    }
}

impl Display for ReturnStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnStage {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReturnStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| TypeConstraintError::UnknownStage(s.to_string()))
    }
}

impl TryFrom<&str> for ReturnStage {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A step in a product's workflow.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Stage {
    pub id: StageId,
    pub product_id: ProductId,
    pub name: StageName,
    pub slug: StageSlug,
    pub color: StageColor,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
}

impl PartialEq<StageId> for Stage {
    fn eq(&self, other: &StageId) -> bool {
        self.id == *other
    }
}

/// Stage definition supplied when a product is created.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStage {
    pub name: StageName,
    pub slug: StageSlug,
    pub color: StageColor,
    pub sort_order: i32,
}

impl NewStage {
    #[must_use]
    pub fn new(name: StageName, slug: StageSlug, color: StageColor, sort_order: i32) -> Self {
        Self {
            name,
            slug,
            color,
            sort_order,
        }
    }

    /// Builds a stage whose slug is derived from the name.
    pub fn from_name(name: &str, sort_order: i32) -> Result<Self, TypeConstraintError> {
        let name = StageName::new(name)?;
        let slug = StageSlug::from_name(name.as_str())?;
        Ok(Self::new(name, slug, StageColor::default(), sort_order))
    }
}

/// Orders stages ascending by `sort_order`, ties broken by creation order.
pub fn sort_stages(stages: &mut [Stage]) {
    stages.sort_by_key(|stage| (stage.sort_order, stage.id));
}

/// Position of `current` within `stages`, or `None` when it is not listed.
pub fn stage_index<S, K>(stages: &[S], current: &K) -> Option<usize>
where
    S: PartialEq<K>,
    K: ?Sized,
{
    stages.iter().position(|stage| stage == current)
}

/// Display label for a stage slug.
///
/// Legacy pipeline values use the fixed label table; any other slug is
/// titleized (`info_review` becomes "Info Review").
pub fn stage_label(slug: &str) -> String {
    match slug.parse::<ReturnStage>() {
        Ok(stage) => stage.label().to_string(),
        Err(_) => titleize(slug),
    }
}

fn titleize(slug: &str) -> String {
    slug.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn stage(id: i32, slug: &str, sort_order: i32) -> Stage {
        Stage {
            id: StageId::new(id).expect("valid stage id"),
            product_id: ProductId::new(1).expect("valid product id"),
            name: StageName::new(titleize(slug)).expect("valid name"),
            slug: StageSlug::new(slug).expect("valid slug"),
            color: StageColor::default(),
            sort_order,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn return_stage_round_trips_through_text() {
        for stage in ReturnStage::ALL {
            assert_eq!(stage.as_str().parse::<ReturnStage>(), Ok(stage));
        }
        assert_eq!(
            "submitted".parse::<ReturnStage>(),
            Err(TypeConstraintError::UnknownStage("submitted".to_string()))
        );
    }

    #[test]
    fn return_stage_serializes_as_snake_case() {
        let json = serde_json::to_string(&ReturnStage::SignatureRequired).expect("serialize");
        assert_eq!(json, "\"signature_required\"");
    }

    #[test]
    fn initial_and_terminal_bound_the_pipeline() {
        assert_eq!(ReturnStage::ALL.first(), Some(&ReturnStage::initial()));
        assert_eq!(ReturnStage::ALL.last(), Some(&ReturnStage::terminal()));
        assert_eq!(ReturnStage::default(), ReturnStage::NotStarted);
    }

    #[test]
    fn sort_orders_by_sort_order_then_creation() {
        let mut stages = vec![
            stage(3, "filed", 20),
            stage(2, "review_b", 10),
            stage(1, "review_a", 10),
            stage(4, "intake", 0),
        ];
        sort_stages(&mut stages);
        let slugs: Vec<_> = stages.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["intake", "review_a", "review_b", "filed"]);
    }

    #[test]
    fn stage_index_reports_missing_as_none() {
        let stages = vec![stage(1, "intake", 0), stage(2, "filed", 1)];
        let filed = StageId::new(2).expect("valid id");
        let unknown = StageId::new(9).expect("valid id");

        assert_eq!(stage_index(&stages, &filed), Some(1));
        assert_eq!(stage_index(&stages, &unknown), None);
        assert_eq!(
            stage_index(&ReturnStage::ALL, &ReturnStage::ReturnPreparation),
            Some(3)
        );
    }

    #[test]
    fn labels_use_table_then_titleize() {
        assert_eq!(stage_label("documents_gathering"), "Gathering Docs");
        assert_eq!(stage_label("not_started"), "Not Started");
        assert_eq!(stage_label("bank_verification"), "Bank Verification");
        assert_eq!(stage_label("e-file"), "E File");
    }

    #[test]
    fn new_stage_from_name_derives_slug() {
        let stage = NewStage::from_name("Awaiting Payment", 4).expect("valid stage");
        assert_eq!(stage.slug.as_str(), "awaiting_payment");
        assert_eq!(stage.sort_order, 4);
        assert_eq!(stage.color, StageColor::default());
    }
}
