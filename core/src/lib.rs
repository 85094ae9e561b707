//! Client core for the savings-cooperative back office.
//!
//! # Overview
//! Talks to the cooperative's REST API (members, savings accounts, movements,
//! contributions, loan payments) and gives views what they need on top of
//! it: observable async resources, client-side filtering, headline
//! statistics, and input validation that runs before any request is sent.
//!
//! # Design
//! - `ApiClient` holds a base URL and an injected `Transport`; construct one
//!   and pass it around. `UreqTransport` is the production transport.
//! - Requests are built and responses parsed by pure functions around a
//!   single `Transport::execute` call.
//! - `Resource` exposes `{data, loading, error}` through a `watch` channel.
//!   Failures keep the previous `data`.
//! - Filters borrow from the fetched list and never reorder unless asked.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod filter;
pub mod format;
pub mod http;
pub mod resource;
pub mod stats;
pub mod types;
pub mod validate;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, Failure};
pub use filter::{Filterable, Order, Query};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use resource::{blocking, Resource, ResourceState, SettlePolicy};
pub use types::{
    AccountInput, AccountStatus, AccountType, Contribution, ContributionInput, ContributionStatus,
    ContributionType, Edit, Loan, LoanPayment, LoanPaymentInput, Member, MemberInput, MemberStatus,
    Movement, MovementInput, MovementKind, PaymentMethod, SavingsAccount,
};
pub use validate::{FieldError, Validate, ValidationErrors};
