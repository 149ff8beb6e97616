// Reference number generation
//
// Format: ORD-yyyyMMdd-XXXXXX. The date segment is the business-local
// creation date; the tail is six uppercase hex characters from a fresh
// UUID, which keeps references unique even within the same millisecond.

use chrono::NaiveDate;
use uuid::Uuid;

pub fn generate(business_date: NaiveDate) -> String {
    let token: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("ORD-{}-{}", business_date.format("%Y%m%d"), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn reference_has_expected_format() {
        let reference = generate(date());
        assert_eq!(reference.len(), "ORD-20250610-".len() + 6);
        assert!(reference.starts_with("ORD-20250610-"));

        let token = &reference["ORD-20250610-".len()..];
        assert!(token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn references_are_unique_within_a_run() {
        let mut seen = HashSet::new();
        for _ in 0..64 {
            assert!(seen.insert(generate(date())));
        }
    }

    #[test]
    fn date_segment_follows_the_given_business_date() {
        let reference = generate(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(reference.starts_with("ORD-20251231-"));
    }
}
