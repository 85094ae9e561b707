//! Wire types for the cooperative API.
//!
//! # Design
//! Field names are English; `serde` renames map them onto the server's
//! camelCase Spanish keys. The server is the system of record, so these are
//! transient copies.
//!
//! Statuses and kinds are enums over the values the forms offer. Reads are
//! lenient: a value outside that set lands in `Other` with the raw text, and
//! `null` in a defaulted field reads as the default, so one odd row never
//! fails a whole list. Write payloads are checked by `Validate`, which
//! rejects `Other`.
//!
//! Write payloads are separate `*Input` types. `Edit` says whether an input
//! creates a new record or replaces an existing one.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value the server sent that is not one of the known ones.
            Other(String),
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value the server uses on the wire and in filter paths.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok($name::from(raw.as_str()))
            }
        }
    };
}

/// Reads `null` as `T::default()`; pair with `#[serde(default)]` for absent keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

wire_enum!(MemberStatus {
    Active => "Activo",
    Inactive => "Inactivo",
    Suspended => "Suspendido",
});

wire_enum!(AccountStatus {
    Active => "Activa",
    Inactive => "Inactiva",
    Suspended => "Suspendida",
    Closed => "Cerrada",
});

wire_enum!(AccountType {
    Savings => "Ahorro",
    Checking => "Corriente",
    Special => "Especial",
});

wire_enum!(MovementKind {
    Deposit => "Deposito",
    Withdrawal => "Retiro",
    Transfer => "Transferencia",
    Interest => "Interes",
});

wire_enum!(ContributionStatus {
    Approved => "Aprobada",
    Pending => "Pendiente",
    Rejected => "Rechazada",
});

wire_enum!(PaymentMethod {
    Cash => "Efectivo",
    Transfer => "Transferencia",
    Check => "Cheque",
    Card => "Tarjeta",
    Pse => "PSE",
});

/// A cooperative member (`/api/Socio`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "idSocio")]
    pub id: i64,
    #[serde(rename = "numeroSocio", default)]
    pub member_number: Option<String>,
    #[serde(rename = "cedula", default)]
    pub document_id: Option<String>,
    #[serde(rename = "nombres", default)]
    pub first_names: Option<String>,
    #[serde(rename = "apellidos", default)]
    pub last_names: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "fechaNacimiento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "ciudad", default)]
    pub city: Option<String>,
    #[serde(rename = "fechaIngreso", default, deserialize_with = "null_as_default")]
    pub joined_on: String,
    #[serde(rename = "estado", default)]
    pub status: Option<MemberStatus>,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: Option<String>,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
}

impl Member {
    /// "Nombres Apellidos", skipping whichever part is missing.
    pub fn full_name(&self) -> String {
        [self.first_names.as_deref(), self.last_names.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A savings account (`/api/CuentasAhorro`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    #[serde(rename = "idCuentaAhorro")]
    pub id: i64,
    #[serde(rename = "idSocio")]
    pub member_id: i64,
    #[serde(rename = "numeroCuenta", default)]
    pub account_number: Option<String>,
    #[serde(rename = "tipoCuenta", default)]
    pub account_type: Option<AccountType>,
    #[serde(rename = "saldoActual", default)]
    pub balance: Option<Decimal>,
    #[serde(rename = "tasaInteres", default)]
    pub interest_rate: Option<Decimal>,
    #[serde(rename = "fechaApertura", default, deserialize_with = "null_as_default")]
    pub opened_on: String,
    #[serde(rename = "estado", default)]
    pub status: Option<AccountStatus>,
    #[serde(rename = "montoMinimo", default)]
    pub minimum_amount: Option<Decimal>,
    #[serde(rename = "fechaUltimoMovimiento", default)]
    pub last_movement_at: Option<String>,
    /// Owner embedded by the server on some endpoints.
    #[serde(rename = "idSocioNavigation", default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

/// A movement on a savings account (`/api/MovimientosAhorro`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "idMovimiento")]
    pub id: i64,
    #[serde(rename = "idCuentaAhorro")]
    pub account_id: i64,
    #[serde(rename = "tipoMovimiento", default)]
    pub kind: Option<MovementKind>,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "saldoAnterior", default, deserialize_with = "null_as_default")]
    pub prior_balance: Decimal,
    #[serde(rename = "saldoNuevo", default, deserialize_with = "null_as_default")]
    pub new_balance: Decimal,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fechaMovimiento", default)]
    pub occurred_at: Option<String>,
    #[serde(rename = "numeroComprobante", default)]
    pub receipt_number: Option<String>,
    #[serde(rename = "usuarioRegistro", default, deserialize_with = "null_as_default")]
    pub recorded_by: i64,
    #[serde(rename = "idCuentaContable", default)]
    pub ledger_account_id: Option<i64>,
}

/// A member contribution (`/api/Aportaciones`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(rename = "idAportacion")]
    pub id: i64,
    #[serde(rename = "idSocio")]
    pub member_id: i64,
    #[serde(rename = "idTipoAportacion")]
    pub contribution_type_id: i64,
    #[serde(rename = "numeroComprobante", default)]
    pub receipt_number: Option<String>,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "fechaAportacion", default, deserialize_with = "null_as_default")]
    pub contributed_on: String,
    #[serde(rename = "motivo", default)]
    pub reason: Option<String>,
    #[serde(rename = "metodoPago", default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "estado", default)]
    pub status: Option<ContributionStatus>,
    #[serde(rename = "usuarioRegistro", default, deserialize_with = "null_as_default")]
    pub recorded_by: i64,
    #[serde(rename = "fechaRegistro", default)]
    pub recorded_at: Option<String>,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
}

/// Catalog entry for contribution types (`/api/TiposAportacion`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionType {
    #[serde(rename = "idTipoAportacion")]
    pub id: i64,
    #[serde(rename = "nombreTipo", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "montoMinimo", default)]
    pub minimum_amount: Option<Decimal>,
    #[serde(rename = "esObligatoria", default)]
    pub mandatory: Option<bool>,
    #[serde(rename = "frecuencia", default)]
    pub frequency: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

impl ContributionType {
    /// Falls back to "Tipo {id}" when the catalog entry has no name.
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Tipo {}", self.id),
        }
    }
}

/// A loan payment (`/api/PagosCredito`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    #[serde(rename = "idPago")]
    pub id: i64,
    #[serde(rename = "idCredito")]
    pub loan_id: i64,
    #[serde(rename = "idCuota", default)]
    pub installment_id: Option<i64>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "montoPago")]
    pub amount: Decimal,
    #[serde(rename = "montoCapital", default, deserialize_with = "null_as_default")]
    pub principal: Decimal,
    #[serde(rename = "montoInteres", default, deserialize_with = "null_as_default")]
    pub interest: Decimal,
    #[serde(rename = "montoMora", default)]
    pub late_fee: Option<Decimal>,
    #[serde(rename = "fechaPago", default, deserialize_with = "null_as_default")]
    pub paid_on: String,
    #[serde(rename = "metodoPago", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "numeroComprobante", default)]
    pub receipt_number: Option<String>,
    #[serde(rename = "usuarioRegistro", default, deserialize_with = "null_as_default")]
    pub recorded_by: i64,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
}

/// Loan summary served by the loans stub (`/api/Creditos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub cedula_socio: String,
    pub monto: Decimal,
    pub plazo_meses: u32,
    pub tasa_interes: Decimal,
    pub estado: String,
}

/// Create-or-update intent for a write payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit<I> {
    Create(I),
    Update { id: i64, input: I },
}

impl<I> Edit<I> {
    pub fn input(&self) -> &I {
        match self {
            Edit::Create(input) | Edit::Update { input, .. } => input,
        }
    }

    /// `None` for a record that does not exist yet.
    pub fn id(&self) -> Option<i64> {
        match self {
            Edit::Create(_) => None,
            Edit::Update { id, .. } => Some(*id),
        }
    }
}

/// Write payload for members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInput {
    #[serde(rename = "cedula")]
    pub document_id: String,
    #[serde(rename = "nombres")]
    pub first_names: String,
    #[serde(rename = "apellidos")]
    pub last_names: String,
    #[serde(rename = "correo", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "fechaNacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    pub status: MemberStatus,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Write payload for savings accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInput {
    #[serde(rename = "idSocio")]
    pub member_id: i64,
    #[serde(rename = "numeroCuenta", default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(rename = "tipoCuenta")]
    pub account_type: AccountType,
    #[serde(rename = "saldoActual", default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(rename = "tasaInteres", default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(rename = "montoMinimo", default, skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<Decimal>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Write payload for movements. Movements are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementInput {
    #[serde(rename = "idCuentaAhorro")]
    pub account_id: i64,
    #[serde(rename = "tipoMovimiento")]
    pub kind: MovementKind,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "numeroComprobante", default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
}

/// Write payload for contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionInput {
    #[serde(rename = "idSocio")]
    pub member_id: i64,
    #[serde(rename = "idTipoAportacion")]
    pub contribution_type_id: i64,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "fechaAportacion")]
    pub contributed_on: String,
    #[serde(rename = "metodoPago")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "numeroComprobante", default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Write payload for loan payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPaymentInput {
    #[serde(rename = "idCredito")]
    pub loan_id: i64,
    #[serde(rename = "idCuota", default, skip_serializing_if = "Option::is_none")]
    pub installment_id: Option<i64>,
    #[serde(rename = "montoPago")]
    pub amount: Decimal,
    #[serde(rename = "montoCapital")]
    pub principal: Decimal,
    #[serde(rename = "montoInteres")]
    pub interest: Decimal,
    #[serde(rename = "montoMora", default, skip_serializing_if = "Option::is_none")]
    pub late_fee: Option<Decimal>,
    #[serde(rename = "fechaPago")]
    pub paid_on: String,
    #[serde(rename = "metodoPago", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "numeroComprobante", default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
