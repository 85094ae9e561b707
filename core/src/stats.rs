//! Headline statistics over a whole fetched list.
//!
//! These are computed from the unfiltered source so the numbers describe the
//! full data set, whatever filter the view currently shows.

use rust_decimal::Decimal;

use crate::types::{
    AccountStatus, Contribution, ContributionStatus, Member, Movement, MovementKind,
    SavingsAccount,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionSummary {
    pub count: usize,
    pub approved_total: Decimal,
    pub approved_count: usize,
    pub pending_count: usize,
}

impl ContributionSummary {
    pub fn of(contributions: &[Contribution]) -> Self {
        contributions
            .iter()
            .fold(Self::default(), |mut summary, contribution| {
                summary.count += 1;
                match &contribution.status {
                    Some(ContributionStatus::Approved) => {
                        summary.approved_total += contribution.amount;
                        summary.approved_count += 1;
                    }
                    Some(ContributionStatus::Pending) => summary.pending_count += 1,
                    _ => {}
                }
                summary
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementSummary {
    pub deposits_total: Decimal,
    pub withdrawals_total: Decimal,
}

impl MovementSummary {
    pub fn of(movements: &[Movement]) -> Self {
        let mut summary = Self::default();
        for movement in movements {
            match &movement.kind {
                Some(MovementKind::Deposit) => summary.deposits_total += movement.amount,
                Some(MovementKind::Withdrawal) => summary.withdrawals_total += movement.amount,
                _ => {}
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountSummary {
    pub active: usize,
    pub inactive: usize,
    /// Missing balances count as zero.
    pub total_balance: Decimal,
}

impl AccountSummary {
    pub fn of(accounts: &[SavingsAccount]) -> Self {
        let mut summary = Self::default();
        for account in accounts {
            match &account.status {
                Some(AccountStatus::Active) => summary.active += 1,
                Some(AccountStatus::Inactive) => summary.inactive += 1,
                _ => {}
            }
            summary.total_balance += account.balance.unwrap_or_default();
        }
        summary
    }
}

/// Figures shown on the landing dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub members: usize,
    pub active_accounts: usize,
    pub contributions: usize,
    pub total_balance: Decimal,
}

impl Dashboard {
    pub fn of(members: &[Member], accounts: &[SavingsAccount], contributions: &[Contribution]) -> Self {
        let accounts = AccountSummary::of(accounts);
        Self {
            members: members.len(),
            active_accounts: accounts.active,
            contributions: contributions.len(),
            total_balance: accounts.total_balance,
        }
    }
}
