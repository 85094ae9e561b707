//! Client-side filtering and headline statistics over fetched lists.

use caja_core::filter::join_members;
use caja_core::stats::{ContributionSummary, Dashboard};
use caja_core::{
    Contribution, ContributionStatus, Member, MemberStatus, Order, Query, SavingsAccount,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn member(id: i64, first: &str, last: &str, status: MemberStatus, joined: &str) -> Member {
    Member {
        id,
        member_number: Some(format!("S-{id:03}")),
        document_id: Some(format!("10{id:08}")),
        first_names: Some(first.to_string()),
        last_names: Some(last.to_string()),
        email: None,
        phone: None,
        address: None,
        birth_date: None,
        city: None,
        joined_on: joined.to_string(),
        status: Some(status),
        created_at: None,
        notes: None,
    }
}

fn members() -> Vec<Member> {
    vec![
        member(1, "Ana", "Ruiz", MemberStatus::Active, "2023-01-10"),
        member(2, "Luis", "Paz", MemberStatus::Inactive, "2023-06-01T09:30:00"),
        member(3, "Ana", "Paz", MemberStatus::Active, ""),
    ]
}

fn contribution(id: i64, member_id: i64, amount: Decimal, status: ContributionStatus) -> Contribution {
    Contribution {
        id,
        member_id,
        contribution_type_id: 1,
        receipt_number: Some(format!("R-{id}")),
        amount,
        contributed_on: format!("2024-03-{id:02}"),
        reason: None,
        payment_method: None,
        status: Some(status),
        recorded_by: 1,
        recorded_at: None,
        notes: None,
    }
}

fn contributions() -> Vec<Contribution> {
    vec![
        contribution(1, 1, dec!(100), ContributionStatus::Approved),
        contribution(2, 2, dec!(50), ContributionStatus::Pending),
        contribution(3, 3, dec!(25), ContributionStatus::Approved),
    ]
}

fn names(found: &[&Member]) -> Vec<String> {
    found.iter().map(|m| m.full_name()).collect()
}

#[test]
fn search_ignores_case_and_keeps_source_order() {
    let members = members();
    assert_eq!(
        names(&Query::new().text("ana").apply(&members)),
        ["Ana Ruiz", "Ana Paz"]
    );
    assert_eq!(
        names(&Query::new().text("PAZ").apply(&members)),
        ["Luis Paz", "Ana Paz"]
    );
}

#[test]
fn document_ids_match_verbatim() {
    let members = members();
    let found = Query::new().text("1000000002").apply(&members);
    assert_eq!(names(&found), ["Luis Paz"]);
}

#[test]
fn predicates_combine() {
    let members = members();
    let found = Query::new()
        .text("paz")
        .status(MemberStatus::Active.as_str())
        .apply(&members);
    assert_eq!(names(&found), ["Ana Paz"]);
}

#[test]
fn empty_query_is_identity() {
    let members = members();
    let query = Query::new().text("").status("");
    assert!(query.is_empty());
    let all = query.apply(&members);
    assert_eq!(all.len(), members.len());
    assert!(all.iter().zip(&members).all(|(a, b)| std::ptr::eq(*a, b)));
}

#[test]
fn results_are_a_subset_and_filtering_is_idempotent() {
    let members = members();
    let queries = [
        Query::new().text("a"),
        Query::new().status("Activo"),
        Query::new().between(NaiveDate::from_ymd_opt(2023, 1, 1), None),
        Query::new().text("zzz"),
    ];
    for query in queries {
        let once: Vec<Member> = query.apply(&members).into_iter().cloned().collect();
        assert!(once.iter().all(|m| members.contains(m)));
        let twice: Vec<Member> = query.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }
}

#[test]
fn date_range_is_inclusive_and_excludes_undated() {
    let members = members();
    let found = Query::new()
        .between(
            NaiveDate::from_ymd_opt(2023, 1, 10),
            NaiveDate::from_ymd_opt(2023, 6, 1),
        )
        .apply(&members);
    assert_eq!(names(&found), ["Ana Ruiz", "Luis Paz"]);
}

#[test]
fn date_descending_puts_newest_first() {
    let members = members();
    let found = Query::new().order(Order::DateDescending).apply(&members);
    assert_eq!(names(&found), ["Luis Paz", "Ana Ruiz", "Ana Paz"]);
}

#[test]
fn approved_total_ignores_the_active_filter() {
    let contributions = contributions();
    let shown = Query::new().status("Pendiente").apply(&contributions);
    assert_eq!(shown.len(), 1);

    let summary = ContributionSummary::of(&contributions);
    assert_eq!(summary.approved_total, dec!(125));
    assert_eq!(summary.approved_count, 2);
    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.count, 3);
}

#[test]
fn joined_contributions_search_member_names() {
    let members = members();
    let contributions = contributions();
    let joined = join_members(&contributions, &members);

    let found = Query::new().text("ruiz").apply(&joined);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].item.id, 1);

    let by_amount = Query::new().text("25").apply(&joined);
    assert_eq!(by_amount.len(), 1);
    assert_eq!(by_amount[0].item.id, 3);
}

#[test]
fn orphan_contribution_has_no_member() {
    let members = members();
    let contributions = vec![contribution(9, 42, dec!(10), ContributionStatus::Rejected)];
    let joined = join_members(&contributions, &members);
    assert!(joined[0].member.is_none());
    assert!(Query::new().text("ana").apply(&joined).is_empty());
    assert_eq!(Query::new().owner(42).apply(&joined).len(), 1);
}

#[test]
fn unknown_status_filters_by_its_raw_value() {
    let mut contributions = contributions();
    contributions[1].status = Some(ContributionStatus::from("Anulada"));

    let shown = Query::new().status("Anulada").apply(&contributions);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, 2);

    let summary = ContributionSummary::of(&contributions);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.pending_count, 0);
    assert_eq!(summary.approved_total, dec!(125));
}

#[test]
fn empty_inputs_give_empty_outputs() {
    let none: Vec<Member> = Vec::new();
    assert!(Query::new().text("ana").apply(&none).is_empty());
    assert_eq!(ContributionSummary::of(&[]), ContributionSummary::default());
    assert_eq!(Dashboard::of(&[], &[] as &[SavingsAccount], &[]), Dashboard::default());
}
