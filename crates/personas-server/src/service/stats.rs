//! Aggregate statistics over stored personas.
//!
//! The pure helpers here take already-loaded values so they can be checked
//! without a database; `persona.rs` feeds them from storage.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Age statistics in whole years
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeStats {
    pub average: i32,
    pub minimum: i32,
    pub maximum: i32,
}

/// Whole years between `birth` and `today`, one less if the birthday has not come yet.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    today.year() - birth.year() - i32::from(before_birthday)
}

/// Average (floor division), minimum and maximum age. All zeros for no dates.
pub fn compute_age_stats<I>(birth_dates: I, today: NaiveDate) -> AgeStats
where
    I: IntoIterator<Item = NaiveDate>,
{
    let ages: Vec<i64> = birth_dates
        .into_iter()
        .map(|birth| i64::from(age_on(birth, today)))
        .collect();

    let (Some(minimum), Some(maximum)) = (ages.iter().min(), ages.iter().max()) else {
        return AgeStats::default();
    };

    let sum: i64 = ages.iter().sum();
    let average = sum.div_euclid(ages.len() as i64);

    AgeStats {
        average: average as i32,
        minimum: *minimum as i32,
        maximum: *maximum as i32,
    }
}

/// The part of an email after its first `@`, if there is one.
pub fn email_domain(email: &str) -> Option<&str> {
    email.split('@').nth(1)
}

/// Counts emails per domain. Values without `@` are skipped.
pub fn count_domains<'a, I>(emails: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for domain in emails.into_iter().filter_map(email_domain) {
        *counts.entry(domain.to_string()).or_insert(0) += 1;
    }
    counts
}
