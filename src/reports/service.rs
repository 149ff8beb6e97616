// Report aggregation
//
// Aggregation itself is pure; the service wraps it with the range queries
// and takes the current instant as an explicit parameter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::clock;
use crate::employees::models::CustomerType;
use crate::menus::models::MenuType;
use crate::reports::models::{DailySummaryEntry, ExpatMonthlyDeduction};
use crate::reservations::error::ReservationError;
use crate::reservations::models::{CombinedOrder, ReservationStatus};
use crate::reservations::repository::CombinedOrderRepository;

/// Group Completed Expat reservations by (first name, last name) and sum
/// price * quantity into the payroll buckets. Rows without a catalog price
/// contribute nothing; money stays decimal end to end.
pub fn aggregate_deductions(rows: &[CombinedOrder]) -> Vec<ExpatMonthlyDeduction> {
    let mut by_person: BTreeMap<(String, String), ExpatMonthlyDeduction> = BTreeMap::new();

    for row in rows {
        let price = match row.price {
            Some(price) => price,
            None => continue,
        };
        let amount = price * Decimal::from(row.quantity);

        let entry = by_person
            .entry((row.last_name.clone(), row.first_name.clone()))
            .or_insert_with(|| ExpatMonthlyDeduction::new(&row.first_name, &row.last_name));

        match row.menu_type {
            MenuType::Bento => entry.expat_bento += amount,
            MenuType::Curry => entry.expat_curry_rice += amount,
            MenuType::Noodles => entry.expat_noodles += amount,
            MenuType::Maki => entry.maki_roll += amount,
            MenuType::Breakfast => entry.breakfast += amount,
        }
    }

    by_person.into_values().collect()
}

/// Rows the daily CSV export keeps: the requested customer type, every
/// status. Cancelled rows stay in the file; the Status column is how the
/// kitchen tells them apart.
pub fn filter_for_export(
    rows: Vec<CombinedOrder>,
    customer_type: CustomerType,
) -> Vec<CombinedOrder> {
    rows.into_iter()
        .filter(|row| row.customer_type == customer_type)
        .collect()
}

/// Single-pass partition of one day's reservations into per-type counters.
pub fn summarize_daily(rows: &[CombinedOrder]) -> Vec<DailySummaryEntry> {
    let mut by_type: BTreeMap<&'static str, (MenuType, DailySummaryEntry)> = BTreeMap::new();

    for row in rows {
        let (_, entry) = by_type.entry(row.menu_type.as_str()).or_insert_with(|| {
            (
                row.menu_type,
                DailySummaryEntry {
                    menu_type: row.menu_type,
                    total_orders: 0,
                    total_quantity: 0,
                    pending: 0,
                    completed: 0,
                    cancelled: 0,
                },
            )
        });

        entry.total_orders += 1;
        entry.total_quantity += i64::from(row.quantity);
        match row.status {
            ReservationStatus::Pending => entry.pending += 1,
            ReservationStatus::Completed => entry.completed += 1,
            ReservationStatus::Cancelled => entry.cancelled += 1,
        }
    }

    by_type.into_values().map(|(_, entry)| entry).collect()
}

#[derive(Clone)]
pub struct ReportService {
    combined: CombinedOrderRepository,
}

impl ReportService {
    pub fn new(combined: CombinedOrderRepository) -> Self {
        Self { combined }
    }

    /// Monthly payroll deductions for the month containing business-today.
    pub async fn monthly_deductions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExpatMonthlyDeduction>, ReservationError> {
        let (start, end) = clock::month_range_utc(clock::business_today(now));
        let rows = self.combined.list_completed_expat_in_range(start, end).await?;
        Ok(aggregate_deductions(&rows))
    }

    /// Per-type counters for business-today.
    pub async fn daily_summary(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<DailySummaryEntry>, ReservationError> {
        let (start, end) = clock::day_range_utc(clock::business_today(now));
        let rows = self.combined.list_in_range(start, end).await?;
        Ok(summarize_daily(&rows))
    }

    /// Business-today's reservations of one customer type, for the CSV
    /// export. All statuses are included, Cancelled ones too.
    pub async fn daily_orders_for_export(
        &self,
        customer_type: CustomerType,
        now: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let (start, end) = clock::day_range_utc(clock::business_today(now));
        let rows = self.combined.list_in_range(start, end).await?;
        Ok(filter_for_export(rows, customer_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservations::models::Source;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn completed_expat(
        first_name: &str,
        last_name: &str,
        menu_type: MenuType,
        price: Decimal,
        quantity: i32,
    ) -> CombinedOrder {
        CombinedOrder {
            source: Source::AdvanceOrder,
            reference_number: format!("ORD-20250610-{:06}", quantity),
            employee_id: "E00001".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            section: None,
            menu_type,
            order_name: "Item".to_string(),
            quantity,
            reservation_date: Utc.with_ymd_and_hms(2025, 6, 10, 4, 0, 0).unwrap(),
            meal_time: "12:00".to_string(),
            customer_type: CustomerType::Expat,
            status: ReservationStatus::Completed,
            email: None,
            price: Some(price),
        }
    }

    #[test]
    fn deduction_sums_price_times_quantity_exactly() {
        // 150.00 x 2 + 150.00 x 1 = exactly 450.00
        let rows = vec![
            completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 2),
            completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 1),
        ];

        let report = aggregate_deductions(&rows);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].expat_bento, dec!(450.00));
        assert_eq!(report[0].total(), dec!(450.00));
    }

    #[test]
    fn deductions_bucket_by_menu_type() {
        let rows = vec![
            completed_expat("Jane", "Doe", MenuType::Curry, dec!(120.50), 1),
            completed_expat("Jane", "Doe", MenuType::Maki, dec!(95.25), 2),
            completed_expat("Jane", "Doe", MenuType::Breakfast, dec!(60.00), 1),
        ];

        let report = aggregate_deductions(&rows);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].expat_curry_rice, dec!(120.50));
        assert_eq!(report[0].maki_roll, dec!(190.50));
        assert_eq!(report[0].breakfast, dec!(60.00));
        assert_eq!(report[0].expat_bento, Decimal::ZERO);
    }

    #[test]
    fn deductions_group_by_full_name() {
        let rows = vec![
            completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 1),
            completed_expat("John", "Doe", MenuType::Bento, dec!(150.00), 1),
            completed_expat("Jane", "Smith", MenuType::Bento, dec!(150.00), 1),
        ];

        let report = aggregate_deductions(&rows);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn rows_without_a_price_contribute_nothing() {
        let mut row = completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 2);
        row.price = None;

        let report = aggregate_deductions(&[row]);
        assert!(report.is_empty());
    }

    #[test]
    fn export_keeps_cancelled_rows() {
        let mut cancelled = completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 1);
        cancelled.status = ReservationStatus::Cancelled;
        let pending = {
            let mut row = completed_expat("John", "Doe", MenuType::Maki, dec!(95.00), 1);
            row.status = ReservationStatus::Pending;
            row
        };

        let exported = filter_for_export(vec![cancelled, pending], CustomerType::Expat);

        assert_eq!(exported.len(), 2);
        assert!(exported
            .iter()
            .any(|row| row.status == ReservationStatus::Cancelled));
    }

    #[test]
    fn export_filters_by_customer_type_only() {
        let expat = completed_expat("Jane", "Doe", MenuType::Bento, dec!(150.00), 1);
        let local = {
            let mut row = completed_expat("Alice", "Santos", MenuType::Bento, dec!(150.00), 1);
            row.customer_type = CustomerType::Local;
            row
        };

        let exported = filter_for_export(vec![expat, local], CustomerType::Local);

        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].first_name, "Alice");
    }

    #[test]
    fn daily_summary_partitions_by_type_and_status() {
        let mut cancelled = completed_expat("A", "B", MenuType::Bento, dec!(1), 1);
        cancelled.status = ReservationStatus::Cancelled;
        let mut pending = completed_expat("A", "B", MenuType::Bento, dec!(1), 3);
        pending.status = ReservationStatus::Pending;
        let completed = completed_expat("A", "B", MenuType::Maki, dec!(1), 2);

        let summary = summarize_daily(&[cancelled, pending, completed]);

        let bento = summary.iter().find(|e| e.menu_type == MenuType::Bento).unwrap();
        assert_eq!(bento.total_orders, 2);
        assert_eq!(bento.total_quantity, 4);
        assert_eq!(bento.pending, 1);
        assert_eq!(bento.cancelled, 1);

        let maki = summary.iter().find(|e| e.menu_type == MenuType::Maki).unwrap();
        assert_eq!(maki.completed, 1);
    }
}
