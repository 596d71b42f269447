//! Payment and refund repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::parse_column;
use crate::adapters::payments_sea as payments_adapter;
use crate::domain::{PaymentProvider, PaymentStatus};
use crate::entities::{payments, refunds};
use crate::errors::domain::DomainError;

pub use payments_adapter::PaymentCreate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub amount_cents: i64,
    pub currency: String,
    pub provider_ref: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Refund {
    pub id: i64,
    pub payment_id: i64,
    pub amount_cents: i64,
    pub reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PaymentCreate,
) -> Result<Payment, DomainError> {
    Payment::try_from(payments_adapter::create(conn, dto).await?)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Payment>, DomainError> {
    payments_adapter::find_by_id(conn, id)
        .await?
        .map(Payment::try_from)
        .transpose()
}

pub async fn find_by_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<Payment>, DomainError> {
    payments_adapter::find_by_order(conn, order_id)
        .await?
        .map(Payment::try_from)
        .transpose()
}

/// Apply a payment status change, rejecting illegal transitions.
pub async fn transition<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    next: PaymentStatus,
) -> Result<Option<Payment>, DomainError> {
    let Some(model) = payments_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let current: PaymentStatus = parse_column(&model.status, "payments.status")?;
    current.ensure_transition(next)?;
    Payment::try_from(payments_adapter::update_status(conn, model, next.as_str()).await?).map(Some)
}

pub async fn create_refund<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
    amount_cents: i64,
    reason: Option<String>,
) -> Result<Refund, DomainError> {
    Ok(payments_adapter::create_refund(conn, payment_id, amount_cents, reason)
        .await?
        .into())
}

pub async fn list_refunds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
) -> Result<Vec<Refund>, DomainError> {
    let rows = payments_adapter::list_refunds(conn, payment_id).await?;
    Ok(rows.into_iter().map(Refund::from).collect())
}

impl TryFrom<payments::Model> for Payment {
    type Error = DomainError;

    fn try_from(model: payments::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            order_id: model.order_id,
            provider: parse_column(&model.provider, "payments.provider")?,
            status: parse_column(&model.status, "payments.status")?,
            amount_cents: model.amount_cents,
            currency: model.currency,
            provider_ref: model.provider_ref,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<refunds::Model> for Refund {
    fn from(model: refunds::Model) -> Self {
        Self {
            id: model.id,
            payment_id: model.payment_id,
            amount_cents: model.amount_cents,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
