//! Leaderboard projection
//!
//! This module computes ranking views from current student state. Rankings
//! are a pure projection: nothing here is stored, and positions are
//! recomputed on every call from the balances as they stand.
//!
//! # Ordering
//!
//! Students sort by `total_points` descending. Ties are broken by enrollment
//! sequence ascending, so two students on the same balance always appear in
//! the same order across calls and across processing strategies.

use crate::types::{classify, RankingEntry, Student};
use std::cmp::Reverse;

/// Compute a ranking view over the given students
///
/// Sorts by balance descending (ties by enrollment sequence), truncates to
/// `limit` when one is given, and assigns 1-based positions over the
/// returned set. Each entry carries the tier derived from the student's
/// current balance. The `trend` field is reserved and always reports 0.
pub fn compute_rankings<'a, I>(students: I, limit: Option<usize>) -> Vec<RankingEntry>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut students: Vec<&Student> = students.into_iter().collect();
    students.sort_by_key(|s| (Reverse(s.total_points), s.enrolled_seq));

    if let Some(limit) = limit {
        students.truncate(limit);
    }

    students
        .into_iter()
        .enumerate()
        .map(|(index, student)| RankingEntry {
            position: index + 1,
            student_id: student.id,
            name: student.name.clone(),
            avatar: student.avatar.clone(),
            total_points: student.total_points,
            tier: classify(student.total_points),
            trend: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Points, StudentId, Tier};

    fn student(id: StudentId, points: Points, seq: u64) -> Student {
        let mut student = Student::new(id, 100, format!("Student {}", id));
        student.total_points = points;
        student.enrolled_seq = seq;
        student
    }

    #[test]
    fn test_orders_by_points_descending() {
        let students = vec![student(1, 82, 1), student(2, 245, 2), student(3, 35, 3)];

        let rankings = compute_rankings(&students, None);

        let view: Vec<(usize, StudentId, Points)> = rankings
            .iter()
            .map(|e| (e.position, e.student_id, e.total_points))
            .collect();
        assert_eq!(view, vec![(1, 2, 245), (2, 1, 82), (3, 3, 35)]);
    }

    #[test]
    fn test_entries_carry_derived_tier() {
        let students = vec![student(1, 245, 1), student(2, 82, 2), student(3, 35, 3)];

        let rankings = compute_rankings(&students, None);

        assert_eq!(rankings[0].tier, Tier::Diamond);
        assert_eq!(rankings[1].tier, Tier::Silver);
        assert_eq!(rankings[2].tier, Tier::Bronze);
    }

    #[test]
    fn test_ties_broken_by_enrollment_sequence() {
        let students = vec![student(7, 50, 3), student(2, 50, 1), student(5, 50, 2)];

        let rankings = compute_rankings(&students, None);

        let ids: Vec<StudentId> = rankings.iter().map(|e| e.student_id).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    #[test]
    fn test_limit_caps_returned_set() {
        let students = vec![
            student(1, 40, 1),
            student(2, 30, 2),
            student(3, 20, 3),
            student(4, 10, 4),
        ];

        let rankings = compute_rankings(&students, Some(2));

        assert_eq!(rankings.len(), 2);
        // Positions are 1-based over the returned set
        assert_eq!(rankings[0].position, 1);
        assert_eq!(rankings[0].student_id, 1);
        assert_eq!(rankings[1].position, 2);
        assert_eq!(rankings[1].student_id, 2);
    }

    #[test]
    fn test_limit_larger_than_set_returns_all() {
        let students = vec![student(1, 40, 1), student(2, 30, 2)];

        let rankings = compute_rankings(&students, Some(10));

        assert_eq!(rankings.len(), 2);
    }

    #[test]
    fn test_limit_zero_returns_empty() {
        let students = vec![student(1, 40, 1)];

        let rankings = compute_rankings(&students, Some(0));

        assert!(rankings.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_rankings() {
        let rankings = compute_rankings(std::iter::empty(), None);
        assert!(rankings.is_empty());
    }

    #[test]
    fn test_trend_is_always_zero() {
        let students = vec![student(1, 245, 1), student(2, 0, 2)];

        let rankings = compute_rankings(&students, None);

        assert!(rankings.iter().all(|e| e.trend == 0));
    }

    #[test]
    fn test_entries_carry_profile_fields() {
        let mut s = student(1, 10, 1);
        s.name = "An".to_string();
        s.avatar = Some("an.png".to_string());

        let rankings = compute_rankings(std::iter::once(&s), None);

        assert_eq!(rankings[0].name, "An");
        assert_eq!(rankings[0].avatar.as_deref(), Some("an.png"));
    }

    #[test]
    fn test_recomputed_from_current_balances() {
        let mut s = student(1, 10, 1);

        let before = compute_rankings(std::iter::once(&s), None);
        assert_eq!(before[0].tier, Tier::Bronze);

        s.total_points = 210;
        let after = compute_rankings(std::iter::once(&s), None);
        assert_eq!(after[0].tier, Tier::Diamond);
        assert_eq!(after[0].total_points, 210);
    }
}
