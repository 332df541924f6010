//! Delta computation between two versions of a manager.
//!
//! Assignments are matched by slot (their own URL). The delta decides how a
//! manager document is written back: an update that leaves no assignments
//! deletes the document, anything else replaces it.

use crate::error::{Result, ShapeTreeError};

use super::{ShapeTreeAssignment, ShapeTreeManager};

/// Difference between an existing and an updated manager.
///
/// # Matching Logic
///
/// - Slot in updated, absent from existing → `updated_assignments`
/// - Slot in both, any field differs → `updated_assignments`
/// - Slot in existing, absent from updated → `removed_assignments`
/// - Slot in both with identical fields → neither
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShapeTreeManagerDelta {
  /// Assignments added or changed, in slot order.
  pub updated_assignments: Vec<ShapeTreeAssignment>,

  /// Assignments whose slot no longer exists, in slot order.
  pub removed_assignments: Vec<ShapeTreeAssignment>,
}

impl ShapeTreeManagerDelta {
  /// Compare `existing` with `updated`.
  ///
  /// An absent manager is treated as one with no assignments. Fails with an
  /// input error when both are absent.
  pub fn evaluate(existing: Option<&ShapeTreeManager>, updated: Option<&ShapeTreeManager>) -> Result<Self> {
    if existing.is_none() && updated.is_none() {
      return Err(ShapeTreeError::Input(
        "cannot compare two absent managers".to_string(),
      ));
    }

    let mut delta = Self::default();

    if let Some(updated) = updated {
      for assignment in updated.assignments() {
        let unchanged = existing
          .and_then(|existing| existing.assignment(assignment.url()))
          .is_some_and(|current| current == assignment);
        if !unchanged {
          delta.updated_assignments.push(assignment.clone());
        }
      }
    }

    if let Some(existing) = existing {
      for assignment in existing.assignments() {
        let kept = updated.is_some_and(|updated| updated.assignment(assignment.url()).is_some());
        if !kept {
          delta.removed_assignments.push(assignment.clone());
        }
      }
    }

    Ok(delta)
  }

  /// Whether anything was added, changed, or removed.
  pub fn is_updated(&self) -> bool {
    !self.updated_assignments.is_empty() || !self.removed_assignments.is_empty()
  }

  /// Whether at least one slot was lost.
  pub fn was_reduced(&self) -> bool {
    !self.removed_assignments.is_empty()
  }

  /// Whether the delta only removes: nothing added or changed, at least one
  /// slot lost. Unchanged slots may still survive in the updated manager.
  pub fn all_removed(&self) -> bool {
    self.updated_assignments.is_empty() && !self.removed_assignments.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use url::Url;

  const MANAGER: &str = "https://pod.example/data/.shapetree";

  fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
  }

  fn assignment(slot: &str, tree: &str) -> ShapeTreeAssignment {
    let slot = url(&format!("{}#{}", MANAGER, slot));
    ShapeTreeAssignment::new(
      url(tree),
      url("https://pod.example/data/"),
      slot.clone(),
      None,
      None,
      slot,
    )
    .unwrap()
  }

  fn manager(assignments: &[ShapeTreeAssignment]) -> ShapeTreeManager {
    let mut manager = ShapeTreeManager::new(url(MANAGER));
    for a in assignments {
      manager.add_assignment(a.clone());
    }
    manager
  }

  #[test]
  fn both_absent_is_an_input_error() {
    assert!(matches!(
      ShapeTreeManagerDelta::evaluate(None, None),
      Err(ShapeTreeError::Input(_))
    ));
  }

  #[test]
  fn identical_managers_have_no_delta() {
    let m = manager(&[
      assignment("ln-a", "https://trees.example/a"),
      assignment("ln-b", "https://trees.example/b"),
    ]);
    let delta = ShapeTreeManagerDelta::evaluate(Some(&m), Some(&m)).unwrap();
    assert!(delta.updated_assignments.is_empty());
    assert!(delta.removed_assignments.is_empty());
    assert!(!delta.is_updated());
    assert!(!delta.was_reduced());
    assert!(!delta.all_removed());
  }

  #[test]
  fn emptied_manager_removes_everything() {
    let a = assignment("ln-a", "https://trees.example/a");
    let b = assignment("ln-b", "https://trees.example/b");
    let existing = manager(&[a.clone(), b.clone()]);
    let updated = manager(&[]);

    let delta = ShapeTreeManagerDelta::evaluate(Some(&existing), Some(&updated)).unwrap();

    assert_eq!(delta.removed_assignments, vec![a, b]);
    assert!(delta.updated_assignments.is_empty());
    assert!(delta.all_removed());
  }

  #[test]
  fn changed_added_and_removed_slots() {
    let a = assignment("ln-a", "https://trees.example/a");
    let b = assignment("ln-b", "https://trees.example/b");
    let c = assignment("ln-c", "https://trees.example/c");
    let c_changed = assignment("ln-c", "https://trees.example/c2");
    let d = assignment("ln-d", "https://trees.example/d");

    let existing = manager(&[a.clone(), b.clone(), c]);
    let updated = manager(&[b, c_changed.clone(), d.clone()]);

    let delta = ShapeTreeManagerDelta::evaluate(Some(&existing), Some(&updated)).unwrap();

    assert_eq!(delta.updated_assignments, vec![c_changed, d]);
    assert_eq!(delta.removed_assignments, vec![a]);
    assert!(delta.was_reduced());
    assert!(delta.is_updated());
    assert!(!delta.all_removed());
  }

  #[test]
  fn absent_updated_acts_as_empty_manager() {
    let existing = manager(&[
      assignment("ln-a", "https://trees.example/a"),
      assignment("ln-b", "https://trees.example/b"),
    ]);
    let empty = manager(&[]);

    let against_none = ShapeTreeManagerDelta::evaluate(Some(&existing), None).unwrap();
    let against_empty = ShapeTreeManagerDelta::evaluate(Some(&existing), Some(&empty)).unwrap();

    assert_eq!(against_none, against_empty);
    assert!(against_none.all_removed());
  }

  #[test]
  fn absent_existing_adds_everything() {
    let a = assignment("ln-a", "https://trees.example/a");
    let updated = manager(&[a.clone()]);

    let delta = ShapeTreeManagerDelta::evaluate(None, Some(&updated)).unwrap();

    assert_eq!(delta.updated_assignments, vec![a]);
    assert!(delta.removed_assignments.is_empty());
    assert!(delta.is_updated());
    assert!(!delta.was_reduced());
  }

  #[test]
  fn partial_unplant_reports_removal_with_survivors() {
    let a = assignment("ln-a", "https://trees.example/a");
    let b = assignment("ln-b", "https://trees.example/b");
    let existing = manager(&[a.clone(), b.clone()]);
    let updated = manager(&[b]);

    let delta = ShapeTreeManagerDelta::evaluate(Some(&existing), Some(&updated)).unwrap();

    assert_eq!(delta.removed_assignments, vec![a]);
    assert!(delta.all_removed());
    assert!(!updated.is_empty());
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use crate::util::testutil::arb_manager;
  use proptest::prelude::*;

  proptest! {
    #[test]
    fn identical_managers_never_differ(manager in arb_manager()) {
      let delta = ShapeTreeManagerDelta::evaluate(Some(&manager), Some(&manager.clone())).unwrap();
      prop_assert!(delta.updated_assignments.is_empty());
      prop_assert!(delta.removed_assignments.is_empty());
      prop_assert!(!delta.is_updated());
    }

    #[test]
    fn emptying_removes_every_slot(manager in arb_manager()) {
      let delta = ShapeTreeManagerDelta::evaluate(Some(&manager), None).unwrap();
      prop_assert_eq!(delta.removed_assignments.len(), manager.len());
      prop_assert!(delta.updated_assignments.is_empty());
      prop_assert_eq!(delta.all_removed(), !manager.is_empty());
    }
  }
}
