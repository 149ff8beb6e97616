// Advance-order conflict resolver
//
// Pure planning logic: given the submitter's identity, business-today, the
// incoming selection batch, and the existing rows for the relevant meal
// time, decide exactly which rows to insert and which to overwrite. No I/O
// happens here; the service layer executes the resulting plan in one
// transaction.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::menus::models::MenuType;
use crate::reservations::models::ReservationStatus;
use crate::reservations::status_machine::StatusMachine;

/// One incoming (employee, date, menu) request from the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub employee_id: String,
    pub date: NaiveDate,
    pub menu_type: MenuType,
}

/// Existing advance-order row relevant to the batch: same meal time,
/// same employee, within the target month.
#[derive(Debug, Clone)]
pub struct ExistingSlot {
    pub employee_id: String,
    pub date: NaiveDate,
    pub menu_type: MenuType,
    pub status: ReservationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotActionKind {
    /// No row exists for (employee, date, meal time); create one, quantity 1,
    /// status Pending.
    Insert,
    /// A row exists with a different menu; overwrite the menu and reset the
    /// status to Pending. This is the Cancelled -> Pending reactivation path
    /// and also covers menu changes on a live Pending row.
    Overwrite,
}

/// One planned write, keyed by (employee, date). At most one action per key
/// leaves the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAction {
    pub kind: SlotActionKind,
    pub employee_id: String,
    pub date: NaiveDate,
    pub menu_type: MenuType,
}

/// Resolver output: the write plan plus counters for everything dropped
/// along the way. Skips are silent by policy; the counters exist so the
/// caller can log and report them.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub actions: Vec<SlotAction>,
    pub skipped_duplicates: usize,
    pub skipped_unauthorized: usize,
    pub skipped_past_dates: usize,
    pub unchanged: usize,
}

/// Reconcile a selection batch against existing advance-order rows.
///
/// Processing order:
/// 1. Deduplicate incoming selections on (employee, date, menu); only the
///    first occurrence of an exact triple is considered.
/// 2. Drop selections not belonging to `submitter_id` (self-service only).
/// 3. Drop selections dated before `today` (business-local).
/// 4. Per surviving selection, compare against the slot's current state:
///    existing row with a different menu becomes an Overwrite, an identical
///    menu is left untouched, no row becomes an Insert. A Completed slot is
///    never overwritten; it has already been fulfilled and billed.
///
/// A later selection in the same batch that targets an already-planned
/// (employee, date) slot with a different menu amends the planned action in
/// place, so the batch [Bento, Bento, Maki] for one slot yields exactly one
/// action carrying Maki.
pub fn reconcile(
    submitter_id: &str,
    today: NaiveDate,
    selections: &[Selection],
    existing: &[ExistingSlot],
) -> ReconcileOutcome {
    let existing_by_slot: HashMap<(&str, NaiveDate), &ExistingSlot> = existing
        .iter()
        .map(|slot| ((slot.employee_id.as_str(), slot.date), slot))
        .collect();

    let mut outcome = ReconcileOutcome::default();
    let mut seen_triples: HashSet<(String, NaiveDate, MenuType)> = HashSet::new();
    // (employee, date) -> index into outcome.actions
    let mut planned_slots: HashMap<(String, NaiveDate), usize> = HashMap::new();

    for selection in selections {
        let triple = (
            selection.employee_id.clone(),
            selection.date,
            selection.menu_type,
        );
        if !seen_triples.insert(triple) {
            outcome.skipped_duplicates += 1;
            continue;
        }

        if selection.employee_id != submitter_id {
            outcome.skipped_unauthorized += 1;
            continue;
        }

        if selection.date < today {
            outcome.skipped_past_dates += 1;
            continue;
        }

        let slot_key = (selection.employee_id.clone(), selection.date);

        if let Some(&index) = planned_slots.get(&slot_key) {
            // A distinct menu for an already-planned slot amends the plan.
            outcome.actions[index].menu_type = selection.menu_type;
            continue;
        }

        match existing_by_slot.get(&(selection.employee_id.as_str(), selection.date)) {
            Some(slot) if slot.menu_type == selection.menu_type => {
                outcome.unchanged += 1;
            }
            Some(slot) if StatusMachine::reactivate(slot.status).is_err() => {
                outcome.unchanged += 1;
            }
            Some(_) => {
                planned_slots.insert(slot_key, outcome.actions.len());
                outcome.actions.push(SlotAction {
                    kind: SlotActionKind::Overwrite,
                    employee_id: selection.employee_id.clone(),
                    date: selection.date,
                    menu_type: selection.menu_type,
                });
            }
            None => {
                planned_slots.insert(slot_key, outcome.actions.len());
                outcome.actions.push(SlotAction {
                    kind: SlotActionKind::Insert,
                    employee_id: selection.employee_id.clone(),
                    date: selection.date,
                    menu_type: selection.menu_type,
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn sel(employee_id: &str, day: u32, menu_type: MenuType) -> Selection {
        Selection {
            employee_id: employee_id.to_string(),
            date: d(day),
            menu_type,
        }
    }

    fn slot(
        employee_id: &str,
        day: u32,
        menu_type: MenuType,
        status: ReservationStatus,
    ) -> ExistingSlot {
        ExistingSlot {
            employee_id: employee_id.to_string(),
            date: d(day),
            menu_type,
            status,
        }
    }

    #[test]
    fn fresh_selection_becomes_insert() {
        let outcome = reconcile("E1", d(9), &[sel("E1", 10, MenuType::Bento)], &[]);

        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].kind, SlotActionKind::Insert);
        assert_eq!(outcome.actions[0].menu_type, MenuType::Bento);
    }

    #[test]
    fn duplicate_triples_keep_first_occurrence_and_later_distinct_menu_wins_the_slot() {
        // [Bento, Bento, Maki] for one slot: the repeated Bento is dropped,
        // the distinct Maki amends the planned row. Exactly one action, Maki.
        let outcome = reconcile(
            "E1",
            d(9),
            &[
                sel("E1", 10, MenuType::Bento),
                sel("E1", 10, MenuType::Bento),
                sel("E1", 10, MenuType::Maki),
            ],
            &[],
        );

        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].menu_type, MenuType::Maki);
        assert_eq!(outcome.actions[0].kind, SlotActionKind::Insert);
        assert_eq!(outcome.skipped_duplicates, 1);
    }

    #[test]
    fn selections_for_other_employees_are_silently_skipped() {
        let outcome = reconcile(
            "E1",
            d(9),
            &[
                sel("E2", 10, MenuType::Bento),
                sel("E1", 11, MenuType::Curry),
            ],
            &[],
        );

        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].employee_id, "E1");
        assert_eq!(outcome.skipped_unauthorized, 1);
    }

    #[test]
    fn past_dates_are_skipped_with_no_action() {
        let outcome = reconcile("E1", d(10), &[sel("E1", 9, MenuType::Bento)], &[]);

        assert!(outcome.actions.is_empty());
        assert_eq!(outcome.skipped_past_dates, 1);
    }

    #[test]
    fn today_itself_is_not_a_past_date() {
        let outcome = reconcile("E1", d(10), &[sel("E1", 10, MenuType::Bento)], &[]);
        assert_eq!(outcome.actions.len(), 1);
    }

    #[test]
    fn existing_row_with_different_menu_becomes_overwrite() {
        let outcome = reconcile(
            "E1",
            d(9),
            &[sel("E1", 15, MenuType::Curry)],
            &[slot("E1", 15, MenuType::Bento, ReservationStatus::Pending)],
        );

        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].kind, SlotActionKind::Overwrite);
        assert_eq!(outcome.actions[0].menu_type, MenuType::Curry);
    }

    #[test]
    fn cancelled_slot_resubmitted_with_new_menu_is_overwritten() {
        // Reactivation: the Overwrite action resets the row to Pending
        // when executed, regardless of its stored Cancelled status.
        let outcome = reconcile(
            "E1",
            d(9),
            &[sel("E1", 15, MenuType::Curry)],
            &[slot("E1", 15, MenuType::Bento, ReservationStatus::Cancelled)],
        );

        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].kind, SlotActionKind::Overwrite);
    }

    #[test]
    fn completed_slot_is_never_overwritten() {
        let outcome = reconcile(
            "E1",
            d(9),
            &[sel("E1", 15, MenuType::Curry)],
            &[slot("E1", 15, MenuType::Bento, ReservationStatus::Completed)],
        );

        assert!(outcome.actions.is_empty());
        assert_eq!(outcome.unchanged, 1);
    }

    #[test]
    fn identical_menu_on_existing_row_is_left_untouched() {
        let outcome = reconcile(
            "E1",
            d(9),
            &[sel("E1", 15, MenuType::Bento)],
            &[slot("E1", 15, MenuType::Bento, ReservationStatus::Pending)],
        );

        assert!(outcome.actions.is_empty());
        assert_eq!(outcome.unchanged, 1);
    }

    #[test]
    fn independent_dates_each_get_their_own_action() {
        let outcome = reconcile(
            "E1",
            d(9),
            &[
                sel("E1", 10, MenuType::Bento),
                sel("E1", 11, MenuType::Maki),
                sel("E1", 12, MenuType::Noodles),
            ],
            &[],
        );

        assert_eq!(outcome.actions.len(), 3);
    }

    proptest! {
        /// No two planned actions ever target the same (employee, date) slot.
        #[test]
        fn prop_at_most_one_action_per_slot(
            days in proptest::collection::vec(10u32..20, 1..12),
            menus in proptest::collection::vec(0usize..5, 1..12),
        ) {
            let menu_types = [
                MenuType::Bento,
                MenuType::Maki,
                MenuType::Curry,
                MenuType::Noodles,
                MenuType::Breakfast,
            ];
            let selections: Vec<Selection> = days
                .iter()
                .zip(menus.iter())
                .map(|(&day, &m)| sel("E1", day, menu_types[m]))
                .collect();

            let outcome = reconcile("E1", d(9), &selections, &[]);

            let mut slots = HashSet::new();
            for action in &outcome.actions {
                prop_assert!(slots.insert((action.employee_id.clone(), action.date)));
            }
        }
    }
}
