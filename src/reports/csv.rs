// CSV rendering for daily fulfillment exports
//
// The column order and the absence of quoting are load-bearing: the
// downstream kitchen import expects these exact bytes. Fields containing
// commas are passed through unescaped, matching the historical exports.

use chrono::NaiveDate;

use crate::employees::models::CustomerType;
use crate::reservations::models::CombinedOrder;

pub const CSV_HEADER: &str =
    "MenuType,ReferenceNumber,EmployeeId,FirstName,LastName,Section,Quantity,Status";

pub fn render_orders_csv(rows: &[CombinedOrder]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            row.menu_type,
            row.reference_number,
            row.employee_id,
            row.first_name,
            row.last_name,
            row.section.as_deref().unwrap_or(""),
            row.quantity,
            row.status,
        ));
    }
    out
}

/// Download filename, e.g. `LocalOrders_20250610.csv`.
pub fn csv_filename(customer_type: CustomerType, date: NaiveDate) -> String {
    format!("{}Orders_{}.csv", customer_type.as_str(), date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menus::models::MenuType;
    use crate::reservations::models::{ReservationStatus, Source};
    use chrono::{TimeZone, Utc};

    fn row(first_name: &str, section: Option<&str>) -> CombinedOrder {
        CombinedOrder {
            source: Source::Order,
            reference_number: "ORD-20250610-A1B2C3".to_string(),
            employee_id: "E00001".to_string(),
            first_name: first_name.to_string(),
            last_name: "Santos".to_string(),
            section: section.map(|s| s.to_string()),
            menu_type: MenuType::Bento,
            order_name: "Chicken Bento".to_string(),
            quantity: 2,
            reservation_date: Utc.with_ymd_and_hms(2025, 6, 10, 4, 0, 0).unwrap(),
            meal_time: "12:00".to_string(),
            customer_type: CustomerType::Local,
            status: ReservationStatus::Pending,
            email: None,
            price: None,
        }
    }

    #[test]
    fn header_row_is_byte_exact() {
        let csv = render_orders_csv(&[]);
        assert_eq!(
            csv,
            "MenuType,ReferenceNumber,EmployeeId,FirstName,LastName,Section,Quantity,Status\n"
        );
    }

    #[test]
    fn rows_are_comma_joined_in_fixed_column_order() {
        let csv = render_orders_csv(&[row("Alice", Some("Assembly"))]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Bento,ORD-20250610-A1B2C3,E00001,Alice,Santos,Assembly,2,Pending"
        );
    }

    #[test]
    fn cancelled_rows_render_with_their_status() {
        let mut cancelled = row("Alice", Some("Assembly"));
        cancelled.status = ReservationStatus::Cancelled;

        let csv = render_orders_csv(&[cancelled]);
        assert!(csv.ends_with(",2,Cancelled\n"));
    }

    #[test]
    fn missing_section_renders_as_empty_field() {
        let csv = render_orders_csv(&[row("Alice", None)]);
        assert!(csv.contains(",Santos,,2,"));
    }

    #[test]
    fn embedded_commas_are_not_escaped() {
        // Historical behavior: no quoting, a comma in a name shifts columns.
        let csv = render_orders_csv(&[row("Alice, Jr.", Some("Assembly"))]);
        assert!(csv.contains("E00001,Alice, Jr.,Santos"));
        assert!(!csv.contains('"'));
    }

    #[test]
    fn filename_encodes_customer_type_and_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(csv_filename(CustomerType::Local, date), "LocalOrders_20250610.csv");
        assert_eq!(csv_filename(CustomerType::Expat, date), "ExpatOrders_20250610.csv");
    }
}
