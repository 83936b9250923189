//! Point-in-time statistics over the full user set.
//!
//! # Responsibility
//! - Aggregate count, age extremes, mean age and an age histogram.
//!
//! # Invariants
//! - An empty set reports zero for every numeric field, never an error.
//! - All four histogram buckets are always present.
//! - Ages outside the three explicit ranges (including ages below 18) are
//!   counted in the `51+` bucket.

use crate::clock::Clock;
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use chrono::{DateTime, Local};
use serde::Serialize;

const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Histogram bucket for user ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    /// 18 to 25 inclusive.
    Young,
    /// 26 to 35 inclusive.
    Adult,
    /// 36 to 50 inclusive.
    Middle,
    /// Everything else.
    Senior,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 4] = [Self::Young, Self::Adult, Self::Middle, Self::Senior];

    pub fn for_age(age: i32) -> Self {
        match age {
            18..=25 => Self::Young,
            26..=35 => Self::Adult,
            36..=50 => Self::Middle,
            _ => Self::Senior,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Young => "18-25",
            Self::Adult => "26-35",
            Self::Middle => "36-50",
            Self::Senior => "51+",
        }
    }
}

/// Per-bucket user counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeRanges {
    #[serde(rename = "18-25")]
    young: usize,
    #[serde(rename = "26-35")]
    adult: usize,
    #[serde(rename = "36-50")]
    middle: usize,
    #[serde(rename = "51+")]
    senior: usize,
}

impl AgeRanges {
    pub fn count(&self, bucket: AgeBucket) -> usize {
        match bucket {
            AgeBucket::Young => self.young,
            AgeBucket::Adult => self.adult,
            AgeBucket::Middle => self.middle,
            AgeBucket::Senior => self.senior,
        }
    }

    fn record(&mut self, age: i32) {
        match AgeBucket::for_age(age) {
            AgeBucket::Young => self.young += 1,
            AgeBucket::Adult => self.adult += 1,
            AgeBucket::Middle => self.middle += 1,
            AgeBucket::Senior => self.senior += 1,
        }
    }
}

/// Summary report over all stored users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_users: usize,
    pub average_age: f64,
    pub min_age: i32,
    pub max_age: i32,
    pub age_ranges: AgeRanges,
    /// Local time formatted as `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
}

/// Computes stats over `users` in a single pass.
pub fn summarize(users: &[User], generated_at: DateTime<Local>) -> UserStats {
    let mut total_age: i64 = 0;
    let mut extremes: Option<(i32, i32)> = None;
    let mut age_ranges = AgeRanges::default();

    for user in users {
        total_age += i64::from(user.age);
        extremes = Some(match extremes {
            Some((min, max)) => (min.min(user.age), max.max(user.age)),
            None => (user.age, user.age),
        });
        age_ranges.record(user.age);
    }

    let (min_age, max_age) = extremes.unwrap_or((0, 0));
    let average_age = if users.is_empty() {
        0.0
    } else {
        total_age as f64 / users.len() as f64
    };

    UserStats {
        total_users: users.len(),
        average_age,
        min_age,
        max_age,
        age_ranges,
        generated_at: generated_at.format(GENERATED_AT_FORMAT).to_string(),
    }
}

/// Reads the full user set from `repo` and summarizes it at `clock.now()`.
pub fn compute_stats<R, C>(repo: &R, clock: &C) -> UserStats
where
    R: UserRepository + ?Sized,
    C: Clock + ?Sized,
{
    let users = repo.get_all();
    summarize(&users, clock.now().with_timezone(&Local))
}
