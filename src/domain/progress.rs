//! Read-only projections derived from a stage list and a current pointer.

use serde::{Deserialize, Serialize};

use crate::domain::stage::{ReturnStage, stage_index};

/// Percentage of the pipeline completed, in `[0, 100]`.
///
/// A pointer at index `i` of `n` stages reports `round((i + 1) / n * 100)`.
/// An absent pointer, a pointer not in the list and an empty list all
/// report `0`.
pub fn progress_percent<S, K>(stages: &[S], current: Option<&K>) -> u8
where
    S: PartialEq<K>,
    K: ?Sized,
{
    let Some(current) = current else {
        return 0;
    };
    if stages.is_empty() {
        return 0;
    }
    match stage_index(stages, current) {
        Some(index) => {
            let ratio = (index + 1) as f64 / stages.len() as f64;
            (ratio * 100.0).round().clamp(0.0, 100.0) as u8
        }
        None => 0,
    }
}

/// Progress of the legacy pipeline.
///
/// An unrecorded stage reads as [`ReturnStage::initial`], so the initial
/// stage reports `0` whether or not it was recorded explicitly.
pub fn return_progress_percent(stage: ReturnStage) -> u8 {
    if stage == ReturnStage::initial() {
        return 0;
    }
    progress_percent(&ReturnStage::ALL, Some(&stage))
}

/// True iff `current` is the last stage of a non-empty list.
pub fn is_complete<S, K>(stages: &[S], current: Option<&K>) -> bool
where
    S: PartialEq<K>,
    K: ?Sized,
{
    match (stages.last(), current) {
        (Some(last), Some(current)) => last == current,
        _ => false,
    }
}

/// Independent signals pulled from the messages, documents and signatures
/// subsystems for one client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionSignals {
    pub unread_messages: usize,
    pub pending_documents: usize,
    pub pending_signatures: usize,
}

impl AttentionSignals {
    #[must_use]
    pub fn new(unread_messages: usize, pending_documents: usize, pending_signatures: usize) -> Self {
        Self {
            unread_messages,
            pending_documents,
            pending_signatures,
        }
    }

    pub fn needs_attention(&self) -> bool {
        needs_attention(self)
    }
}

/// True when any of the client's sibling-subsystem signals is raised.
pub fn needs_attention(signals: &AttentionSignals) -> bool {
    signals.unread_messages > 0 || signals.pending_documents > 0 || signals.pending_signatures > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_preparation_is_forty_four_percent() {
        let current = ReturnStage::ReturnPreparation;
        assert_eq!(progress_percent(&ReturnStage::ALL, Some(&current)), 44);
        assert!(!is_complete(&ReturnStage::ALL, Some(&current)));
    }

    #[test]
    fn filed_is_complete() {
        let current = ReturnStage::Filed;
        assert_eq!(progress_percent(&ReturnStage::ALL, Some(&current)), 100);
        assert!(is_complete(&ReturnStage::ALL, Some(&current)));
    }

    #[test]
    fn no_recorded_state_is_zero() {
        assert_eq!(progress_percent::<_, ReturnStage>(&ReturnStage::ALL, None), 0);
        assert!(!is_complete::<_, ReturnStage>(&ReturnStage::ALL, None));
        assert_eq!(ReturnStage::default().label(), "Not Started");
    }

    #[test]
    fn explicit_first_stage_counts_as_a_step() {
        let current = ReturnStage::NotStarted;
        assert_eq!(progress_percent(&ReturnStage::ALL, Some(&current)), 11);
    }

    #[test]
    fn legacy_initial_stage_reports_zero() {
        assert_eq!(return_progress_percent(ReturnStage::NotStarted), 0);
        assert_eq!(return_progress_percent(ReturnStage::DocumentsGathering), 22);
        assert_eq!(return_progress_percent(ReturnStage::ReturnPreparation), 44);
        assert_eq!(return_progress_percent(ReturnStage::Filed), 100);
    }

    #[test]
    fn empty_list_is_zero_and_never_complete() {
        let stages: [ReturnStage; 0] = [];
        let current = ReturnStage::Filed;
        assert_eq!(progress_percent(&stages, Some(&current)), 0);
        assert!(!is_complete(&stages, Some(&current)));
    }

    #[test]
    fn pointer_outside_list_is_zero() {
        let stages = [ReturnStage::NotStarted, ReturnStage::Filing];
        let current = ReturnStage::Filed;
        assert_eq!(progress_percent(&stages, Some(&current)), 0);
    }

    #[test]
    fn progress_stays_within_bounds_for_every_length_and_pointer() {
        let keys: Vec<i32> = (0..40).collect();
        for len in 0..keys.len() {
            let stages = &keys[..len];
            for pointer in -1..=(len as i32) {
                let percent = progress_percent(stages, Some(&pointer));
                assert!(percent <= 100, "len {len} pointer {pointer} gave {percent}");
                if len == 0 {
                    assert_eq!(percent, 0);
                }
            }
            if let Some(last) = stages.last() {
                assert_eq!(progress_percent(stages, Some(last)), 100);
            }
        }
    }

    #[test]
    fn attention_is_an_or_of_signals() {
        assert!(!AttentionSignals::default().needs_attention());
        assert!(AttentionSignals::new(1, 0, 0).needs_attention());
        assert!(AttentionSignals::new(0, 2, 0).needs_attention());
        assert!(AttentionSignals::new(0, 0, 1).needs_attention());
    }
}
