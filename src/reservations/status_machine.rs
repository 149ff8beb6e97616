use crate::reservations::models::ReservationStatus;

/// Service for managing reservation status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid on the normal lifecycle path
    ///
    /// # Valid Transitions
    /// - Pending → Completed (bulk completion / fulfillment)
    /// - Pending → Cancelled (employee or admin cancel)
    /// - Any status → Same status (idempotent; covers re-cancelling)
    /// - Completed is terminal
    ///
    /// Cancelled → Pending is deliberately NOT valid here; reactivation
    /// happens only through advance-order resubmission, see [`Self::reactivate`].
    pub fn is_valid_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        match (from, to) {
            (ReservationStatus::Pending, ReservationStatus::Completed) => true,
            (ReservationStatus::Pending, ReservationStatus::Cancelled) => true,

            // Completed is terminal
            (ReservationStatus::Completed, _) => false,

            // Cancelled only leaves via reactivation, not via this path
            (ReservationStatus::Cancelled, _) => false,

            _ => false,
        }
    }

    /// Attempt a normal-path transition
    pub fn transition(
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<ReservationStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }

    /// Whether a bulk completion sweep flips a row: Pending only. Completed
    /// and Cancelled rows are untouched, which is what makes a repeated
    /// sweep a no-op. The bulk UPDATE's status predicate implements the
    /// same rule in SQL.
    pub fn completes_on_sweep(status: ReservationStatus) -> bool {
        status == ReservationStatus::Pending
    }

    /// Indices of the rows one completion sweep would flip.
    pub fn sweep_completions(statuses: &[ReservationStatus]) -> Vec<usize> {
        statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| Self::completes_on_sweep(**status))
            .map(|(index, _)| index)
            .collect()
    }

    /// Reactivation path: an advance-order slot being resubmitted with a new
    /// menu choice returns to Pending. Allowed from Cancelled and from
    /// Pending (menu change on a live row); never from Completed.
    pub fn reactivate(from: ReservationStatus) -> Result<ReservationStatus, String> {
        match from {
            ReservationStatus::Cancelled | ReservationStatus::Pending => {
                Ok(ReservationStatus::Pending)
            }
            ReservationStatus::Completed => {
                Err("Completed reservations cannot be reactivated".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_completed() {
        assert!(StatusMachine::is_valid_transition(
            ReservationStatus::Pending,
            ReservationStatus::Completed
        ));
    }

    #[test]
    fn test_pending_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            ReservationStatus::Pending,
            ReservationStatus::Cancelled
        ));
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(!StatusMachine::is_valid_transition(
            ReservationStatus::Completed,
            ReservationStatus::Pending
        ));
        assert!(!StatusMachine::is_valid_transition(
            ReservationStatus::Completed,
            ReservationStatus::Cancelled
        ));
    }

    #[test]
    fn test_cancelled_does_not_return_on_normal_path() {
        assert!(!StatusMachine::is_valid_transition(
            ReservationStatus::Cancelled,
            ReservationStatus::Pending
        ));
        assert!(!StatusMachine::is_valid_transition(
            ReservationStatus::Cancelled,
            ReservationStatus::Completed
        ));
    }

    // Re-cancelling an already-cancelled reservation is a no-op success.
    #[test]
    fn test_same_status_is_idempotent() {
        assert!(StatusMachine::is_valid_transition(
            ReservationStatus::Cancelled,
            ReservationStatus::Cancelled
        ));
        assert!(StatusMachine::is_valid_transition(
            ReservationStatus::Pending,
            ReservationStatus::Pending
        ));
        assert!(StatusMachine::is_valid_transition(
            ReservationStatus::Completed,
            ReservationStatus::Completed
        ));
    }

    #[test]
    fn test_transition_valid() {
        let result =
            StatusMachine::transition(ReservationStatus::Pending, ReservationStatus::Completed);
        assert_eq!(result.unwrap(), ReservationStatus::Completed);
    }

    #[test]
    fn test_transition_invalid() {
        let result =
            StatusMachine::transition(ReservationStatus::Completed, ReservationStatus::Pending);
        assert!(result.unwrap_err().contains("Invalid status transition"));
    }

    #[test]
    fn test_sweep_flips_pending_rows_only() {
        let statuses = [
            ReservationStatus::Pending,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
            ReservationStatus::Pending,
        ];

        assert_eq!(StatusMachine::sweep_completions(&statuses), vec![0, 3]);
    }

    #[test]
    fn test_second_sweep_finds_nothing() {
        let mut statuses = vec![
            ReservationStatus::Pending,
            ReservationStatus::Cancelled,
            ReservationStatus::Pending,
        ];

        for index in StatusMachine::sweep_completions(&statuses) {
            statuses[index] = ReservationStatus::Completed;
        }

        assert!(StatusMachine::sweep_completions(&statuses).is_empty());
    }

    #[test]
    fn test_reactivate_from_cancelled() {
        assert_eq!(
            StatusMachine::reactivate(ReservationStatus::Cancelled).unwrap(),
            ReservationStatus::Pending
        );
    }

    #[test]
    fn test_reactivate_from_pending() {
        assert_eq!(
            StatusMachine::reactivate(ReservationStatus::Pending).unwrap(),
            ReservationStatus::Pending
        );
    }

    #[test]
    fn test_reactivate_from_completed_fails() {
        assert!(StatusMachine::reactivate(ReservationStatus::Completed).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
        prop_oneof![
            Just(ReservationStatus::Pending),
            Just(ReservationStatus::Completed),
            Just(ReservationStatus::Cancelled),
        ]
    }

    /// Completed can never be observed transitioning to another status,
    /// on either the normal path or the reactivation path.
    #[test]
    fn prop_completed_is_terminal() {
        proptest!(|(to in status_strategy())| {
            if to != ReservationStatus::Completed {
                prop_assert!(!StatusMachine::is_valid_transition(
                    ReservationStatus::Completed,
                    to
                ));
            }
        });
        assert!(StatusMachine::reactivate(ReservationStatus::Completed).is_err());
    }

    /// Same-status transitions always succeed.
    #[test]
    fn prop_same_status_is_valid() {
        proptest!(|(status in status_strategy())| {
            prop_assert!(StatusMachine::is_valid_transition(status, status));
        });
    }

    /// A completion sweep is idempotent: applying it once leaves nothing
    /// for a second sweep to flip, and non-Pending rows never change.
    #[test]
    fn prop_sweep_is_idempotent() {
        proptest!(|(statuses in proptest::collection::vec(status_strategy(), 0..24))| {
            let mut after = statuses.clone();
            for index in StatusMachine::sweep_completions(&after) {
                after[index] = ReservationStatus::Completed;
            }

            prop_assert!(StatusMachine::sweep_completions(&after).is_empty());
            for (before, after) in statuses.iter().zip(after.iter()) {
                if *before != ReservationStatus::Pending {
                    prop_assert_eq!(before, after);
                }
            }
        });
    }

    /// transition() and is_valid_transition() agree.
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(from in status_strategy(), to in status_strategy())| {
            let is_valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);
            prop_assert_eq!(is_valid, result.is_ok());
        });
    }
}
