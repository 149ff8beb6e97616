// Reservation lifecycle services
//
// All "today"-sensitive operations take the current instant as an explicit
// parameter; nothing in this layer reads the wall clock itself.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock;
use crate::employees::repository::EmployeeRepository;
use crate::menus::models::MenuType;
use crate::menus::repository::MenuRepository;
use crate::notify::{dispatch_best_effort, NotificationDispatcher, NotificationRequest};
use crate::reservations::conflict::{self, ExistingSlot, Selection, SlotActionKind};
use crate::reservations::error::ReservationError;
use crate::reservations::models::{
    AdvanceBatchRequest, AdvanceSelection, BatchSubmitResponse, CombinedOrder, NewReservation,
    Order, PlaceOrderRequest, ReservationStatus, Source, UpdateReservationRequest,
};
use crate::reservations::reference;
use crate::reservations::repository::{
    AdvanceOrderRepository, CombinedOrderRepository, OrderRepository, SlotOverwrite,
};
use crate::reservations::status_machine::StatusMachine;
use crate::tokens::{summary_link, AccessTokenService, TokenError};

/// Advance-order meal category. The two batch endpoints differ only in
/// their default meal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealCategory {
    Lunch,
    Breakfast,
}

impl MealCategory {
    pub fn default_meal_time(&self) -> &'static str {
        match self {
            MealCategory::Lunch => "12:00",
            MealCategory::Breakfast => "07:00",
        }
    }
}

/// Service driving the reservation lifecycle: placement, correction,
/// cancellation, and bulk completion.
#[derive(Clone)]
pub struct ReservationService {
    orders: OrderRepository,
    advance_orders: AdvanceOrderRepository,
    combined: CombinedOrderRepository,
    menus: MenuRepository,
    employees: EmployeeRepository,
    tokens: AccessTokenService,
    dispatcher: Arc<dyn NotificationDispatcher>,
    base_url: String,
}

impl ReservationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: OrderRepository,
        advance_orders: AdvanceOrderRepository,
        combined: CombinedOrderRepository,
        menus: MenuRepository,
        employees: EmployeeRepository,
        tokens: AccessTokenService,
        dispatcher: Arc<dyn NotificationDispatcher>,
        base_url: String,
    ) -> Self {
        Self {
            orders,
            advance_orders,
            combined,
            menus,
            employees,
            tokens,
            dispatcher,
            base_url,
        }
    }

    /// Place a same-day order. Persists the row as Pending, then sends a
    /// confirmation carrying a tokenized summary link. Notification failure
    /// never rolls the placement back.
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, ReservationError> {
        let employee = self
            .employees
            .find_by_employee_id(&request.employee_id)
            .await?
            .ok_or_else(|| ReservationError::EmployeeNotFound(request.employee_id.clone()))?;

        let order_name = self
            .menus
            .resolve_display_name(request.menu_type, request.reservation_date)
            .await?;

        let row = NewReservation {
            reference_number: reference::generate(clock::business_today(now)),
            employee_id: employee.employee_id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            section: employee.section.clone(),
            menu_type: request.menu_type,
            order_name,
            quantity: request.quantity,
            reservation_date: clock::day_start_utc(request.reservation_date),
            meal_time: request.meal_time.clone(),
            customer_type: employee.customer_type(),
        };

        let order = self.orders.insert(&row).await?;

        tracing::info!(
            reference = %order.reference_number,
            employee_id = %order.employee_id,
            menu_type = %order.menu_type,
            "order placed"
        );

        if let Some(email) = employee.email.clone() {
            self.send_confirmation(&order, &email, now).await;
        }

        Ok(order)
    }

    async fn send_confirmation(&self, order: &Order, email: &str, now: DateTime<Utc>) {
        let link = match self.tokens.issue(&order.employee_id, now).await {
            Ok(token) => summary_link(&self.base_url, token.token),
            Err(e) => {
                tracing::warn!(
                    reference = %order.reference_number,
                    "could not issue summary token for confirmation: {:?}",
                    e
                );
                return;
            }
        };

        dispatch_best_effort(
            self.dispatcher.as_ref(),
            NotificationRequest {
                recipient: email.to_string(),
                subject: "Order Confirmation".to_string(),
                reference_number: order.reference_number.clone(),
                item: order.order_name.clone(),
                date: clock::business_date(order.reservation_date),
                meal_time: order.meal_time.clone(),
                link,
            },
        )
        .await;
    }

    /// Correct quantity and menu on an existing reservation, whichever table
    /// owns it. The stored display name is re-resolved from the catalog on
    /// every update; a client-supplied name is ignored.
    pub async fn update_reservation(
        &self,
        reference: &str,
        request: UpdateReservationRequest,
    ) -> Result<CombinedOrder, ReservationError> {
        let existing = self
            .combined
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| ReservationError::NotFound(reference.to_string()))?;

        let business_date = clock::business_date(existing.reservation_date);
        let order_name = self
            .menus
            .resolve_display_name(request.menu_type, business_date)
            .await?;

        let updated = match existing.source {
            Source::Order => self
                .orders
                .update_details(reference, request.quantity, request.menu_type, &order_name)
                .await?
                .is_some(),
            Source::AdvanceOrder => self
                .advance_orders
                .update_details(reference, request.quantity, request.menu_type, &order_name)
                .await?
                .is_some(),
        };

        if !updated {
            return Err(ReservationError::NotFound(reference.to_string()));
        }

        self.combined
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| ReservationError::NotFound(reference.to_string()))
    }

    /// Cancel a reservation. Cancelling an already-cancelled reservation is
    /// a no-op success by policy; a Completed reservation cannot be
    /// cancelled. Sends a cancellation notice best-effort.
    pub async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CombinedOrder, ReservationError> {
        let existing = self
            .combined
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| ReservationError::NotFound(reference.to_string()))?;

        StatusMachine::transition(existing.status, ReservationStatus::Cancelled)
            .map_err(ReservationError::InvalidTransition)?;

        match existing.source {
            Source::Order => {
                self.orders
                    .set_status(reference, ReservationStatus::Cancelled)
                    .await?;
            }
            Source::AdvanceOrder => {
                self.advance_orders
                    .set_status(reference, ReservationStatus::Cancelled)
                    .await?;
            }
        }

        tracing::info!(reference = %reference, "reservation cancelled");

        if let Some(email) = existing.email.clone() {
            dispatch_best_effort(
                self.dispatcher.as_ref(),
                NotificationRequest {
                    recipient: email,
                    subject: "Order Cancellation".to_string(),
                    reference_number: existing.reference_number.clone(),
                    item: existing.order_name.clone(),
                    date: clock::business_date(existing.reservation_date),
                    meal_time: existing.meal_time.clone(),
                    link: String::new(),
                },
            )
            .await;
        }

        self.combined
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| ReservationError::NotFound(reference.to_string()))
    }

    /// Flip every Pending reservation of one type dated business-today to
    /// Completed. Safe to repeat; the second sweep affects zero rows.
    pub async fn bulk_complete_by_type(
        &self,
        menu_type: MenuType,
        now: DateTime<Utc>,
    ) -> Result<u64, ReservationError> {
        let (start, end) = clock::day_range_utc(clock::business_today(now));
        let affected = self.combined.bulk_complete(menu_type, start, end).await?;

        tracing::info!(
            menu_type = %menu_type,
            affected = affected,
            "bulk completion sweep finished"
        );
        Ok(affected)
    }

    /// Business-today's reservations of one type, every status.
    pub async fn today_orders(
        &self,
        menu_type: MenuType,
        now: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let (start, end) = clock::day_range_utc(clock::business_today(now));
        self.combined
            .list_by_type_in_range(menu_type, start, end)
            .await
    }

    /// Resolve a summary token and return the owning employee's upcoming
    /// reservations, business-today included.
    pub async fn order_summary(
        &self,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(String, Vec<CombinedOrder>), ReservationError> {
        let employee_id = self.tokens.resolve(token, now).await.map_err(|e| match e {
            TokenError::Unknown => ReservationError::Unauthorized,
            TokenError::Expired => ReservationError::TokenExpired,
            TokenError::Database(db) => ReservationError::DatabaseError(db.to_string()),
        })?;

        let from = clock::day_start_utc(clock::business_today(now));
        let orders = self
            .combined
            .list_upcoming_by_employee(&employee_id, from)
            .await?;
        Ok((employee_id, orders))
    }
}

/// Service for the advance-order batch path: eligibility gate, conflict
/// resolution, and atomic plan execution.
#[derive(Clone)]
pub struct AdvanceOrderService {
    advance_orders: AdvanceOrderRepository,
    menus: MenuRepository,
    employees: EmployeeRepository,
}

impl AdvanceOrderService {
    pub fn new(
        advance_orders: AdvanceOrderRepository,
        menus: MenuRepository,
        employees: EmployeeRepository,
    ) -> Self {
        Self {
            advance_orders,
            menus,
            employees,
        }
    }

    /// Reconcile and persist an advance-order batch for the submitter.
    ///
    /// Only expats and managers may use this path. Selections for other
    /// employees and past-dated selections are silently dropped, matching
    /// the per-item skip policy; the batch itself still succeeds.
    pub async fn submit_batch(
        &self,
        submitter_id: &str,
        request: AdvanceBatchRequest,
        category: MealCategory,
        now: DateTime<Utc>,
    ) -> Result<BatchSubmitResponse, ReservationError> {
        let submitter = self
            .employees
            .find_by_employee_id(submitter_id)
            .await?
            .ok_or_else(|| ReservationError::EmployeeNotFound(submitter_id.to_string()))?;

        if !submitter.is_meal_eligible() {
            return Err(ReservationError::NotEligible(submitter_id.to_string()));
        }

        let meal_time = request
            .meal_time
            .unwrap_or_else(|| category.default_meal_time().to_string());
        crate::validation::validate_meal_time(&meal_time)
            .map_err(|_| ReservationError::ValidationError("invalid meal time".to_string()))?;

        if request.selections.is_empty() {
            return Ok(BatchSubmitResponse {
                created: 0,
                updated: 0,
                unchanged: 0,
                skipped: 0,
            });
        }

        let today = clock::business_today(now);
        let (range_start, range_end) = candidate_window(&request.selections, today);

        let existing_rows = self
            .advance_orders
            .find_slots(submitter_id, &meal_time, range_start, range_end)
            .await?;
        let existing: Vec<ExistingSlot> = existing_rows
            .iter()
            .map(|row| ExistingSlot {
                employee_id: row.employee_id.clone(),
                date: clock::business_date(row.reservation_date),
                menu_type: row.menu_type,
                status: row.status,
            })
            .collect();

        let selections: Vec<Selection> = request
            .selections
            .iter()
            .map(|s| Selection {
                employee_id: s.employee_id.clone(),
                date: s.date,
                menu_type: s.menu_type,
            })
            .collect();

        let outcome = conflict::reconcile(submitter_id, today, &selections, &existing);

        let mut inserts = Vec::new();
        let mut overwrites = Vec::new();
        for action in &outcome.actions {
            let order_name = self
                .menus
                .resolve_display_name(action.menu_type, action.date)
                .await?;

            match action.kind {
                SlotActionKind::Insert => inserts.push(NewReservation {
                    reference_number: reference::generate(today),
                    employee_id: submitter.employee_id.clone(),
                    first_name: submitter.first_name.clone(),
                    last_name: submitter.last_name.clone(),
                    section: submitter.section.clone(),
                    menu_type: action.menu_type,
                    order_name,
                    quantity: 1,
                    reservation_date: clock::day_start_utc(action.date),
                    meal_time: meal_time.clone(),
                    customer_type: submitter.customer_type(),
                }),
                SlotActionKind::Overwrite => {
                    let (day_start, day_end) = clock::day_range_utc(action.date);
                    overwrites.push(SlotOverwrite {
                        employee_id: action.employee_id.clone(),
                        day_start,
                        day_end,
                        meal_time: meal_time.clone(),
                        menu_type: action.menu_type,
                        order_name,
                    });
                }
            }
        }

        self.advance_orders.apply_plan(&inserts, &overwrites).await?;

        tracing::info!(
            employee_id = %submitter_id,
            meal_time = %meal_time,
            created = inserts.len(),
            updated = overwrites.len(),
            unchanged = outcome.unchanged,
            skipped_duplicates = outcome.skipped_duplicates,
            skipped_unauthorized = outcome.skipped_unauthorized,
            skipped_past_dates = outcome.skipped_past_dates,
            "advance-order batch reconciled"
        );

        Ok(BatchSubmitResponse {
            created: inserts.len(),
            updated: overwrites.len(),
            unchanged: outcome.unchanged,
            skipped: outcome.skipped_duplicates
                + outcome.skipped_unauthorized
                + outcome.skipped_past_dates,
        })
    }
}

/// UTC window the resolver's candidate rows are drawn from: the full months
/// spanned by the batch, so a batch crossing a month boundary still sees
/// every existing slot it may touch.
fn candidate_window(
    selections: &[AdvanceSelection],
    today: NaiveDate,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let min_date = selections.iter().map(|s| s.date).min().unwrap_or(today);
    let max_date = selections.iter().map(|s| s.date).max().unwrap_or(today);
    let (start, _) = clock::month_range_utc(min_date);
    let (_, end) = clock::month_range_utc(max_date);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(y: i32, m: u32, d: u32) -> AdvanceSelection {
        AdvanceSelection {
            employee_id: "E00001".to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            menu_type: MenuType::Bento,
        }
    }

    #[test]
    fn candidate_window_covers_the_submission_month() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let (start, end) = candidate_window(&[selection(2025, 6, 15)], today);

        assert_eq!(start, clock::day_start_utc(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert_eq!(end, clock::day_start_utc(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    }

    #[test]
    fn candidate_window_spans_every_month_the_batch_touches() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let (start, end) = candidate_window(
            &[selection(2025, 6, 20), selection(2025, 7, 3)],
            today,
        );

        assert_eq!(start, clock::day_start_utc(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert_eq!(end, clock::day_start_utc(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
    }

    #[test]
    fn lunch_defaults_to_noon() {
        assert_eq!(MealCategory::Lunch.default_meal_time(), "12:00");
    }

    #[test]
    fn breakfast_defaults_to_seven() {
        assert_eq!(MealCategory::Breakfast.default_meal_time(), "07:00");
    }
}
