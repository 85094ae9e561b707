//! Client-side validation of write payloads.
//!
//! Failures are reported per field and stop the request before it is built.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::{AccountInput, ContributionInput, LoanPaymentInput, MemberInput, MovementInput};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Largest amount the forms accept: 999 999 999.99.
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

/// Smallest positive amount for movements and contributions: 0.01.
pub fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the offending field.
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    /// First message reported for `field`, for inline display.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn length_between(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
        errors.push(field, format!("must have at least {min} characters"));
    } else if len > max {
        errors.push(field, format!("must not exceed {max} characters"));
    }
}

/// Optional text: absent and empty are both accepted.
fn optional_length(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, min: usize, max: usize) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        length_between(errors, field, v, min, max);
    }
}

fn positive_id(errors: &mut ValidationErrors, field: &'static str, id: i64) {
    if id < 1 {
        errors.push(field, "must reference an existing record");
    }
}

fn money(errors: &mut ValidationErrors, field: &'static str, amount: Decimal, min: Decimal) {
    if amount < min {
        errors.push(field, format!("must be at least {min}"));
    } else if amount > max_amount() {
        errors.push(field, format!("must not exceed {}", max_amount()));
    } else if amount.normalize().scale() > 2 {
        errors.push(field, "must have at most 2 decimal places");
    }
}

fn optional_money(errors: &mut ValidationErrors, field: &'static str, amount: Option<Decimal>) {
    if let Some(amount) = amount {
        money(errors, field, amount, Decimal::ZERO);
    }
}

/// Enumerated field: values read back from the server may be unknown, but
/// nothing unknown is sent.
fn known(errors: &mut ValidationErrors, field: &'static str, is_known: bool, value: &str) {
    if !is_known {
        errors.push(field, format!("unknown value `{value}`"));
    }
}

fn iso_day(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(field, "is required");
    } else if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        errors.push(field, "must be a date in YYYY-MM-DD format");
    }
}

impl Validate for MemberInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        length_between(&mut errors, "cedula", &self.document_id, 6, 10);
        if !self.document_id.chars().all(|c| c.is_ascii_digit()) {
            errors.push("cedula", "must contain digits only");
        }
        length_between(&mut errors, "nombres", &self.first_names, 2, 50);
        length_between(&mut errors, "apellidos", &self.last_names, 2, 50);

        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !EMAIL.is_match(email) {
                errors.push("correo", "must be a valid email address");
            }
        }
        optional_length(&mut errors, "telefono", self.phone.as_deref(), 7, 15);
        known(&mut errors, "estado", self.status.is_known(), self.status.as_str());
        optional_length(&mut errors, "direccion", self.address.as_deref(), 0, 200);
        optional_length(&mut errors, "ciudad", self.city.as_deref(), 0, 50);
        optional_length(&mut errors, "observaciones", self.notes.as_deref(), 0, 500);

        errors.into_result()
    }
}

impl Validate for AccountInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        positive_id(&mut errors, "idSocio", self.member_id);
        optional_length(&mut errors, "numeroCuenta", self.account_number.as_deref(), 6, 20);
        known(&mut errors, "tipoCuenta", self.account_type.is_known(), self.account_type.as_str());
        if let Some(status) = &self.status {
            known(&mut errors, "estado", status.is_known(), status.as_str());
        }
        optional_money(&mut errors, "saldoActual", self.balance);
        optional_money(&mut errors, "montoMinimo", self.minimum_amount);
        if let Some(rate) = self.interest_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                errors.push("tasaInteres", "must be between 0 and 100");
            }
        }
        optional_length(&mut errors, "observaciones", self.notes.as_deref(), 0, 500);

        errors.into_result()
    }
}

impl Validate for MovementInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        positive_id(&mut errors, "idCuentaAhorro", self.account_id);
        known(&mut errors, "tipoMovimiento", self.kind.is_known(), self.kind.as_str());
        money(&mut errors, "monto", self.amount, min_amount());
        length_between(&mut errors, "descripcion", &self.description, 1, 200);
        optional_length(&mut errors, "numeroComprobante", self.receipt_number.as_deref(), 0, 50);

        errors.into_result()
    }
}

impl Validate for ContributionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        positive_id(&mut errors, "idSocio", self.member_id);
        positive_id(&mut errors, "idTipoAportacion", self.contribution_type_id);
        money(&mut errors, "monto", self.amount, min_amount());
        iso_day(&mut errors, "fechaAportacion", &self.contributed_on);
        known(&mut errors, "metodoPago", self.payment_method.is_known(), self.payment_method.as_str());
        optional_length(&mut errors, "numeroComprobante", self.receipt_number.as_deref(), 0, 50);
        optional_length(&mut errors, "motivo", self.reason.as_deref(), 0, 200);
        optional_length(&mut errors, "observaciones", self.notes.as_deref(), 0, 500);

        errors.into_result()
    }
}

impl Validate for LoanPaymentInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        positive_id(&mut errors, "idCredito", self.loan_id);
        money(&mut errors, "montoPago", self.amount, min_amount());
        money(&mut errors, "montoCapital", self.principal, Decimal::ZERO);
        money(&mut errors, "montoInteres", self.interest, Decimal::ZERO);
        optional_money(&mut errors, "montoMora", self.late_fee);
        iso_day(&mut errors, "fechaPago", &self.paid_on);
        if let Some(method) = &self.payment_method {
            known(&mut errors, "metodoPago", method.is_known(), method.as_str());
        }
        optional_length(&mut errors, "numeroComprobante", self.receipt_number.as_deref(), 0, 50);
        optional_length(&mut errors, "observaciones", self.notes.as_deref(), 0, 500);

        errors.into_result()
    }
}
