//! Named accessors, one per endpoint path of the cooperative API.
//!
//! Write accessors validate their input first; an invalid payload never
//! reaches the transport.

use chrono::NaiveDate;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    AccountInput, AccountStatus, Contribution, ContributionInput, ContributionStatus,
    ContributionType, Edit, Loan, LoanPayment, LoanPaymentInput, Member, MemberInput, Movement,
    MovementInput, MovementKind, SavingsAccount,
};
use crate::validate::Validate;

pub const MEMBERS: &str = "/api/Socio";
pub const ACCOUNTS: &str = "/api/CuentasAhorro";
pub const MOVEMENTS: &str = "/api/MovimientosAhorro";
pub const CONTRIBUTIONS: &str = "/api/Aportaciones";
pub const CONTRIBUTION_TYPES: &str = "/api/TiposAportacion";
pub const LOAN_PAYMENTS: &str = "/api/PagosCredito";
pub const LOANS: &str = "/api/Creditos";

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Percent-encode one path segment. Unreserved characters pass through.
fn segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

impl ApiClient {
    pub fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.get(MEMBERS)
    }

    pub fn get_member(&self, id: i64) -> Result<Member, ApiError> {
        self.get(&format!("{MEMBERS}/{id}"))
    }

    pub fn create_member(&self, input: &MemberInput) -> Result<Member, ApiError> {
        input.validate()?;
        self.post(MEMBERS, input)
    }

    pub fn update_member(&self, id: i64, input: &MemberInput) -> Result<Member, ApiError> {
        input.validate()?;
        self.put(&format!("{MEMBERS}/{id}"), input)
    }

    pub fn save_member(&self, edit: &Edit<MemberInput>) -> Result<Member, ApiError> {
        match edit {
            Edit::Create(input) => self.create_member(input),
            Edit::Update { id, input } => self.update_member(*id, input),
        }
    }

    pub fn delete_member(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{MEMBERS}/{id}"))
    }

    pub fn list_accounts(&self) -> Result<Vec<SavingsAccount>, ApiError> {
        self.get(ACCOUNTS)
    }

    pub fn get_account(&self, id: i64) -> Result<SavingsAccount, ApiError> {
        self.get(&format!("{ACCOUNTS}/{id}"))
    }

    pub fn accounts_by_member(&self, member_id: i64) -> Result<Vec<SavingsAccount>, ApiError> {
        self.get(&format!("{ACCOUNTS}/socio/{member_id}"))
    }

    pub fn accounts_by_status(&self, status: AccountStatus) -> Result<Vec<SavingsAccount>, ApiError> {
        self.get(&format!("{ACCOUNTS}/estado/{}", segment(status.as_str())))
    }

    /// Account statement looked up by owner document id and account number.
    /// The server defines its shape, so it comes back as raw JSON.
    pub fn account_summary(&self, cedula: &str, account_number: &str) -> Result<Value, ApiError> {
        self.get(&format!(
            "{ACCOUNTS}/resumen/{}/{}",
            segment(cedula),
            segment(account_number)
        ))
    }

    pub fn create_account(&self, input: &AccountInput) -> Result<SavingsAccount, ApiError> {
        input.validate()?;
        self.post(ACCOUNTS, input)
    }

    pub fn update_account(&self, id: i64, input: &AccountInput) -> Result<SavingsAccount, ApiError> {
        input.validate()?;
        self.put(&format!("{ACCOUNTS}/{id}"), input)
    }

    pub fn save_account(&self, edit: &Edit<AccountInput>) -> Result<SavingsAccount, ApiError> {
        match edit {
            Edit::Create(input) => self.create_account(input),
            Edit::Update { id, input } => self.update_account(*id, input),
        }
    }

    pub fn delete_account(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{ACCOUNTS}/{id}"))
    }

    pub fn list_movements(&self) -> Result<Vec<Movement>, ApiError> {
        self.get(MOVEMENTS)
    }

    pub fn get_movement(&self, id: i64) -> Result<Movement, ApiError> {
        self.get(&format!("{MOVEMENTS}/{id}"))
    }

    pub fn movements_by_account(&self, account_id: i64) -> Result<Vec<Movement>, ApiError> {
        self.get(&format!("{MOVEMENTS}/cuenta/{account_id}"))
    }

    pub fn movements_by_kind(&self, kind: MovementKind) -> Result<Vec<Movement>, ApiError> {
        self.get(&format!("{MOVEMENTS}/tipo/{}", segment(kind.as_str())))
    }

    /// Movements whose date falls in `from..=to`, filtered server-side.
    pub fn movements_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Movement>, ApiError> {
        self.get(&format!("{MOVEMENTS}/fecha/{}/{}", day(from), day(to)))
    }

    pub fn create_movement(&self, input: &MovementInput) -> Result<Movement, ApiError> {
        input.validate()?;
        self.post(MOVEMENTS, input)
    }

    pub fn delete_movement(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{MOVEMENTS}/{id}"))
    }

    pub fn list_contributions(&self) -> Result<Vec<Contribution>, ApiError> {
        self.get(CONTRIBUTIONS)
    }

    pub fn get_contribution(&self, id: i64) -> Result<Contribution, ApiError> {
        self.get(&format!("{CONTRIBUTIONS}/{id}"))
    }

    pub fn contributions_by_member(&self, member_id: i64) -> Result<Vec<Contribution>, ApiError> {
        self.get(&format!("{CONTRIBUTIONS}/socio/{member_id}"))
    }

    pub fn contributions_by_status(
        &self,
        status: ContributionStatus,
    ) -> Result<Vec<Contribution>, ApiError> {
        self.get(&format!("{CONTRIBUTIONS}/estado/{}", segment(status.as_str())))
    }

    pub fn create_contribution(&self, input: &ContributionInput) -> Result<Contribution, ApiError> {
        input.validate()?;
        self.post(CONTRIBUTIONS, input)
    }

    pub fn update_contribution(
        &self,
        id: i64,
        input: &ContributionInput,
    ) -> Result<Contribution, ApiError> {
        input.validate()?;
        self.put(&format!("{CONTRIBUTIONS}/{id}"), input)
    }

    pub fn save_contribution(&self, edit: &Edit<ContributionInput>) -> Result<Contribution, ApiError> {
        match edit {
            Edit::Create(input) => self.create_contribution(input),
            Edit::Update { id, input } => self.update_contribution(*id, input),
        }
    }

    pub fn delete_contribution(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{CONTRIBUTIONS}/{id}"))
    }

    pub fn list_contribution_types(&self) -> Result<Vec<ContributionType>, ApiError> {
        self.get(CONTRIBUTION_TYPES)
    }

    pub fn list_loan_payments(&self) -> Result<Vec<LoanPayment>, ApiError> {
        self.get(LOAN_PAYMENTS)
    }

    pub fn get_loan_payment(&self, id: i64) -> Result<LoanPayment, ApiError> {
        self.get(&format!("{LOAN_PAYMENTS}/{id}"))
    }

    pub fn payments_by_loan(&self, loan_id: i64) -> Result<Vec<LoanPayment>, ApiError> {
        self.get(&format!("{LOAN_PAYMENTS}/credito/{loan_id}"))
    }

    pub fn payments_by_status(&self, status: &str) -> Result<Vec<LoanPayment>, ApiError> {
        self.get(&format!("{LOAN_PAYMENTS}/estado/{}", segment(status)))
    }

    pub fn payments_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<LoanPayment>, ApiError> {
        self.get(&format!("{LOAN_PAYMENTS}/fecha/{}/{}", day(from), day(to)))
    }

    pub fn create_loan_payment(&self, input: &LoanPaymentInput) -> Result<LoanPayment, ApiError> {
        input.validate()?;
        self.post(LOAN_PAYMENTS, input)
    }

    pub fn list_loans(&self) -> Result<Vec<Loan>, ApiError> {
        self.get(LOANS)
    }
}
