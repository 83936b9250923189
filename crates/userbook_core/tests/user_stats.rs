use chrono::{Local, TimeZone, Utc};
use userbook_core::{
    compute_stats, summarize, AgeBucket, InMemoryUserRepository, ManualClock, UserInput,
    UserRepository,
};

fn repo_with_ages(ages: &[i32]) -> InMemoryUserRepository {
    let repo = InMemoryUserRepository::new();
    for (index, age) in ages.iter().enumerate() {
        repo.create(&UserInput::new(
            format!("user {index}"),
            format!("user{index}@example.com"),
            *age,
        ));
    }
    repo
}

#[test]
fn empty_set_reports_zeroes_and_all_buckets() {
    let clock = ManualClock::at(Utc::now());
    let stats = compute_stats(&InMemoryUserRepository::new(), &clock);

    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.average_age, 0.0);
    assert_eq!(stats.min_age, 0);
    assert_eq!(stats.max_age, 0);
    for bucket in AgeBucket::ALL {
        assert_eq!(stats.age_ranges.count(bucket), 0, "bucket {}", bucket.label());
    }
}

#[test]
fn three_users_one_per_explicit_bucket() {
    let repo = repo_with_ages(&[25, 35, 45]);
    let clock = ManualClock::at(Utc::now());
    let stats = compute_stats(&repo, &clock);

    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.average_age, 35.0);
    assert_eq!(stats.min_age, 25);
    assert_eq!(stats.max_age, 45);
    assert_eq!(stats.age_ranges.count(AgeBucket::Young), 1);
    assert_eq!(stats.age_ranges.count(AgeBucket::Adult), 1);
    assert_eq!(stats.age_ranges.count(AgeBucket::Middle), 1);
    assert_eq!(stats.age_ranges.count(AgeBucket::Senior), 0);
}

#[test]
fn minors_are_counted_in_the_fifty_one_plus_bucket() {
    let repo = repo_with_ages(&[12, 17, 51, 80]);
    let clock = ManualClock::at(Utc::now());
    let stats = compute_stats(&repo, &clock);

    assert_eq!(stats.age_ranges.count(AgeBucket::Senior), 4);
    assert_eq!(stats.min_age, 12);
    assert_eq!(stats.max_age, 80);
}

#[test]
fn generated_at_follows_the_clock_in_local_time() {
    let local = Local.with_ymd_and_hms(2024, 11, 5, 16, 45, 10).unwrap();
    let clock = ManualClock::at(local.with_timezone(&Utc));
    let stats = compute_stats(&repo_with_ages(&[30]), &clock);

    assert_eq!(stats.generated_at, "2024-11-05 16:45:10");
}

#[test]
fn summarize_formats_a_fixed_local_instant() {
    let at = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let stats = summarize(&[], at);

    assert_eq!(stats.generated_at, "2023-12-31 23:59:59");
}

#[test]
fn stats_serialize_with_all_bucket_keys() {
    let repo = repo_with_ages(&[20]);
    let clock = ManualClock::at(Utc::now());
    let json = serde_json::to_value(compute_stats(&repo, &clock)).unwrap();

    assert_eq!(json["total_users"], 1);
    assert_eq!(json["average_age"], 20.0);
    assert_eq!(json["age_ranges"]["18-25"], 1);
    assert_eq!(json["age_ranges"]["26-35"], 0);
    assert_eq!(json["age_ranges"]["36-50"], 0);
    assert_eq!(json["age_ranges"]["51+"], 0);
    assert!(json["generated_at"].is_string());
}

#[test]
fn stats_reflect_deletions() {
    let repo = repo_with_ages(&[22, 60]);
    let oldest = repo.get_all().into_iter().max_by_key(|user| user.age).unwrap();
    repo.delete(oldest.id).unwrap();

    let clock = ManualClock::at(Utc::now());
    let stats = compute_stats(&repo, &clock);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.max_age, 22);
    assert_eq!(stats.age_ranges.count(AgeBucket::Senior), 0);
}
