//! Client-side filtering of already-fetched lists.
//!
//! # Design
//! A `Query` holds optional predicate values. A predicate whose value is
//! unset or empty is inactive; the result is the AND of the active ones and
//! is always a subsequence of the input, borrowed rather than cloned.
//! Ordering, when requested, is applied after filtering and is stable.
//!
//! Entities describe themselves to the filter through `Filterable`. A field
//! that is absent never matches an active predicate.
//!
//! Amounts take part in free-text search as the substring of their decimal
//! string (`"150.5"` matches `"50"`), not as a numeric comparison.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{Contribution, Loan, LoanPayment, Member, Movement, SavingsAccount};

/// One field offered to free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField<'a> {
    value: Option<Cow<'a, str>>,
    fold_case: bool,
}

impl<'a> TextField<'a> {
    /// Case-insensitive field (names, descriptions).
    pub fn folded(value: Option<&'a str>) -> Self {
        Self {
            value: value.map(Cow::Borrowed),
            fold_case: true,
        }
    }

    /// Case-sensitive field (document ids, receipt numbers).
    pub fn verbatim(value: Option<&'a str>) -> Self {
        Self {
            value: value.map(Cow::Borrowed),
            fold_case: false,
        }
    }

    /// An amount, searched through its normalized decimal string.
    pub fn amount(value: Decimal) -> Self {
        Self {
            value: Some(Cow::Owned(value.normalize().to_string())),
            fold_case: false,
        }
    }

    fn matches(&self, needle: &str, folded_needle: &str) -> bool {
        match &self.value {
            None => false,
            Some(value) if self.fold_case => value.to_lowercase().contains(folded_needle),
            Some(value) => value.contains(needle),
        }
    }
}

/// How an entity exposes itself to a `Query`. Every method except
/// `text_fields` defaults to "not applicable", which fails any active
/// predicate on that dimension.
pub trait Filterable {
    fn text_fields(&self) -> Vec<TextField<'_>>;

    fn status(&self) -> Option<&str> {
        None
    }

    /// Exact-match category, e.g. movement kind or contribution type id.
    fn category(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Owning record id, e.g. member for contributions, account for movements.
    fn owner(&self) -> Option<i64> {
        None
    }

    fn day(&self) -> Option<NaiveDate> {
        None
    }
}

/// Calendar day of an ISO date or date-time string.
pub fn day_of(value: &str) -> Option<NaiveDate> {
    let date = value.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Keep the order of the source list.
    #[default]
    Source,
    /// Newest day first; records without a day go last.
    DateDescending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub owner: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub order: Order,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn owner(mut self, owner: i64) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Inclusive day range; either end may be left open.
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.text).is_none()
            && active(&self.status).is_none()
            && active(&self.category).is_none()
            && self.owner.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        if let Some(needle) = active(&self.text) {
            let folded = needle.to_lowercase();
            if !item
                .text_fields()
                .iter()
                .any(|field| field.matches(needle, &folded))
            {
                return false;
            }
        }
        if let Some(status) = active(&self.status) {
            if item.status() != Some(status) {
                return false;
            }
        }
        if let Some(category) = active(&self.category) {
            if item.category().as_deref() != Some(category) {
                return false;
            }
        }
        if let Some(owner) = self.owner {
            if item.owner() != Some(owner) {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let Some(day) = item.day() else {
                return false;
            };
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }
        true
    }

    /// Filter, then order.
    pub fn apply<'a, T: Filterable>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut matched: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        if self.order == Order::DateDescending {
            matched.sort_by(|a, b| b.day().cmp(&a.day()));
        }
        matched
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A record paired with its member, looked up in an already-fetched list, so
/// the member's names take part in search.
#[derive(Debug, Clone, Copy)]
pub struct WithMember<'a, T> {
    pub item: &'a T,
    pub member: Option<&'a Member>,
}

/// Pair each contribution with its member by id.
pub fn join_members<'a>(
    contributions: &'a [Contribution],
    members: &'a [Member],
) -> Vec<WithMember<'a, Contribution>> {
    contributions
        .iter()
        .map(|item| WithMember {
            item,
            member: members.iter().find(|m| m.id == item.member_id),
        })
        .collect()
}

impl Filterable for Member {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::folded(self.first_names.as_deref()),
            TextField::folded(self.last_names.as_deref()),
            TextField::verbatim(self.document_id.as_deref()),
            TextField::verbatim(self.member_number.as_deref()),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.as_str())
    }

    fn day(&self) -> Option<NaiveDate> {
        day_of(&self.joined_on)
    }
}

impl Filterable for SavingsAccount {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        let owner = self.member.as_ref();
        vec![
            TextField::folded(self.account_number.as_deref()),
            TextField::folded(self.account_type.as_ref().map(|t| t.as_str())),
            TextField::folded(owner.and_then(|m| m.first_names.as_deref())),
            TextField::folded(owner.and_then(|m| m.last_names.as_deref())),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.as_str())
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        self.account_type.as_ref().map(|t| Cow::Borrowed(t.as_str()))
    }

    fn owner(&self) -> Option<i64> {
        Some(self.member_id)
    }

    fn day(&self) -> Option<NaiveDate> {
        day_of(&self.opened_on)
    }
}

impl Filterable for Movement {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::folded(self.description.as_deref()),
            TextField::verbatim(self.receipt_number.as_deref()),
            TextField::amount(self.amount),
        ]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        self.kind.as_ref().map(|k| Cow::Borrowed(k.as_str()))
    }

    fn owner(&self) -> Option<i64> {
        Some(self.account_id)
    }

    fn day(&self) -> Option<NaiveDate> {
        self.occurred_at.as_deref().and_then(day_of)
    }
}

impl Filterable for Contribution {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::verbatim(self.receipt_number.as_deref()),
            TextField::amount(self.amount),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.as_str())
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.contribution_type_id.to_string()))
    }

    fn owner(&self) -> Option<i64> {
        Some(self.member_id)
    }

    fn day(&self) -> Option<NaiveDate> {
        day_of(&self.contributed_on)
    }
}

impl Filterable for WithMember<'_, Contribution> {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        let mut fields = vec![
            TextField::folded(self.member.and_then(|m| m.first_names.as_deref())),
            TextField::folded(self.member.and_then(|m| m.last_names.as_deref())),
            TextField::verbatim(self.member.and_then(|m| m.document_id.as_deref())),
        ];
        fields.extend(self.item.text_fields());
        fields
    }

    fn status(&self) -> Option<&str> {
        self.item.status()
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        self.item.category()
    }

    fn owner(&self) -> Option<i64> {
        self.item.owner()
    }

    fn day(&self) -> Option<NaiveDate> {
        self.item.day()
    }
}

impl Filterable for LoanPayment {
    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![
            TextField::verbatim(self.receipt_number.as_deref()),
            TextField::amount(self.amount),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn owner(&self) -> Option<i64> {
        Some(self.loan_id)
    }

    fn day(&self) -> Option<NaiveDate> {
        day_of(&self.paid_on)
    }
}

impl Filterable for Loan {
    /// The loans view searches by document id only.
    fn text_fields(&self) -> Vec<TextField<'_>> {
        vec![TextField::verbatim(Some(self.cedula_socio.as_str()))]
    }

    fn status(&self) -> Option<&str> {
        Some(&self.estado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn movement(id: i64, description: Option<&str>, amount: Decimal, at: Option<&str>) -> Movement {
        Movement {
            id,
            account_id: 1,
            kind: None,
            amount,
            prior_balance: Decimal::ZERO,
            new_balance: amount,
            description: description.map(str::to_string),
            occurred_at: at.map(str::to_string),
            receipt_number: None,
            recorded_by: 1,
            ledger_account_id: None,
        }
    }

    #[test]
    fn day_of_accepts_date_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6);
        assert_eq!(day_of("2024-05-06"), expected);
        assert_eq!(day_of("2024-05-06T13:45:00.123"), expected);
        assert_eq!(day_of(""), None);
        assert_eq!(day_of("06/05/2024"), None);
    }

    #[test]
    fn amount_matches_as_substring() {
        let m = movement(1, None, dec!(150.50), None);
        assert!(Query::new().text("50.5").matches(&m));
        assert!(Query::new().text("15").matches(&m));
        assert!(!Query::new().text("150.50").matches(&m));
    }

    #[test]
    fn folded_fields_ignore_case_verbatim_do_not() {
        let mut m = movement(1, Some("Pago de CUOTA"), dec!(1), None);
        m.receipt_number = Some("AB-1".to_string());
        assert!(Query::new().text("cuota").matches(&m));
        assert!(Query::new().text("AB-1").matches(&m));
        assert!(!Query::new().text("ab-1").matches(&m));
    }

    #[test]
    fn missing_date_fails_active_range() {
        let m = movement(1, None, dec!(1), None);
        let day = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(!Query::new().between(day, None).matches(&m));
        assert!(Query::new().matches(&m));
    }

    #[test]
    fn range_is_inclusive_at_day_granularity() {
        let m = movement(1, None, dec!(1), Some("2024-01-31T23:59:00"));
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 1, 31);
        assert!(Query::new().between(from, to).matches(&m));
        assert!(!Query::new().between(None, NaiveDate::from_ymd_opt(2024, 1, 30)).matches(&m));
    }

    #[test]
    fn empty_strings_are_inactive() {
        let q = Query::new().text("").status("").category("");
        assert!(q.is_empty());
        let m = movement(1, None, dec!(1), None);
        assert!(q.matches(&m));
    }

    #[test]
    fn date_descending_is_stable_and_puts_undated_last() {
        let items = vec![
            movement(1, None, dec!(1), Some("2024-01-01")),
            movement(2, None, dec!(1), None),
            movement(3, None, dec!(1), Some("2024-03-01")),
            movement(4, None, dec!(1), Some("2024-01-01")),
        ];
        let ids: Vec<i64> = Query::new()
            .order(Order::DateDescending)
            .apply(&items)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[test]
    fn loan_stub_filters_by_document_id() {
        let loan = Loan {
            id: 1,
            cedula_socio: "1020304050".to_string(),
            monto: dec!(1000),
            plazo_meses: 12,
            tasa_interes: dec!(1.2),
            estado: "Aprobado".to_string(),
        };
        assert!(Query::new().text("3040").matches(&loan));
        assert!(!Query::new().text("999").matches(&loan));
    }
}
