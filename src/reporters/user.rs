use crate::reporters::types::{Availability, BirthYearStats, UserStats};
use crate::reporters::utility::{mode, value_counts};
use crate::table::TripTable;

/// User type distribution, plus gender and birth-year statistics when the
/// dataset carries those columns.
///
/// Column presence comes from the table's [`Capabilities`](crate::table::Capabilities);
/// missing cells in a present column are skipped.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn report_user_stats(table: &TripTable) -> UserStats {
    let capabilities = table.capabilities();

    let user_types = value_counts(table.user_types().iter().flatten())
        .into_iter()
        .map(|c| c.map(String::clone))
        .collect();

    let gender = if capabilities.has_gender {
        Availability::Available(
            value_counts(table.genders().iter().flatten())
                .into_iter()
                .map(|c| c.map(String::clone))
                .collect(),
        )
    } else {
        Availability::Unavailable
    };

    let birth_year = if capabilities.has_birth_year {
        Availability::Available(birth_year_stats(table))
    } else {
        Availability::Unavailable
    };

    UserStats {
        user_types,
        gender,
        birth_year,
    }
}

fn birth_year_stats(table: &TripTable) -> Option<BirthYearStats> {
    let years: Vec<i32> = table.birth_years().iter().flatten().copied().collect();

    Some(BirthYearStats {
        earliest: *years.iter().min()?,
        latest: *years.iter().max()?,
        most_common: mode(years.iter().copied())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::types::ValueCount;
    use crate::table::test_support::trip;
    use crate::table::{Capabilities, TripRecord};

    fn rider(user_type: &str, gender: Option<&str>, year: Option<i32>) -> TripRecord {
        let mut record = trip(1, 2, 8, "A", "B", 60.0).with_user_type(user_type);
        record.gender = gender.map(str::to_string);
        record.birth_year = year;
        record
    }

    #[test]
    fn test_full_dataset_reports_everything() {
        let table = TripTable::from_records(
            vec![
                rider("Subscriber", Some("Male"), Some(1989)),
                rider("Subscriber", Some("Female"), Some(1989)),
                rider("Customer", None, None),
                rider("Subscriber", Some("Male"), Some(1950)),
                rider("Subscriber", Some("Male"), Some(2001)),
            ],
            Capabilities::full(),
        );

        let stats = report_user_stats(&table);
        assert_eq!(
            stats.user_types,
            vec![
                ValueCount::new("Subscriber".to_string(), 4),
                ValueCount::new("Customer".to_string(), 1),
            ]
        );
        assert_eq!(
            stats.gender,
            Availability::Available(vec![
                ValueCount::new("Male".to_string(), 3),
                ValueCount::new("Female".to_string(), 1),
            ])
        );
        assert_eq!(
            stats.birth_year,
            Availability::Available(Some(BirthYearStats {
                earliest: 1950,
                latest: 2001,
                most_common: ValueCount::new(1989, 2),
            }))
        );
    }

    #[test]
    fn test_missing_columns_are_unavailable() {
        let table = TripTable::from_records(
            vec![rider("Subscriber", None, None), rider("Customer", None, None)],
            Capabilities::default(),
        );

        let stats = report_user_stats(&table);
        assert_eq!(stats.user_types.len(), 2);
        assert_eq!(stats.gender, Availability::Unavailable);
        assert_eq!(stats.birth_year, Availability::Unavailable);
    }

    #[test]
    fn test_present_columns_on_empty_table_have_no_data() {
        let stats = report_user_stats(&TripTable::new(Capabilities::full()));
        assert!(stats.user_types.is_empty());
        assert_eq!(stats.gender, Availability::Available(vec![]));
        assert_eq!(stats.birth_year, Availability::Available(None));
    }
}
