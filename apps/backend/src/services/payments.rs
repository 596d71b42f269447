//! Payment intents, admin status moves and refunds.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::orders as order_service;
use crate::domain::{OrderStatus, PaymentProvider, PaymentStatus};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::orders::{self, Order};
use crate::repos::payments::{self, Payment, PaymentCreate, Refund};

pub const CURRENCY: &str = "EUR";

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Payment, "Payment not found")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaymentWithRefunds {
    #[serde(flatten)]
    pub payment: Payment,
    pub refunds: Vec<Refund>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RefundOutcome {
    pub order: Order,
    pub payment: Payment,
    pub refund: Refund,
}

/// Pending payment for the order total. One payment per order.
pub async fn create_intent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order: &Order,
    provider: PaymentProvider,
    payments_enabled: bool,
) -> Result<Payment, DomainError> {
    if !payments_enabled {
        return Err(DomainError::validation(
            ValidationKind::PaymentsDisabled,
            "Payments are disabled",
        ));
    }
    if payments::find_by_order(conn, order.id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::PaymentExists,
            format!("Order {} already has a payment", order.id),
        ));
    }

    let payment = payments::create(
        conn,
        PaymentCreate {
            order_id: order.id,
            provider: provider.as_str().to_string(),
            amount_cents: order.total_cents,
            currency: CURRENCY.to_string(),
            provider_ref: Some(format!("pay_{}", Uuid::new_v4().simple())),
        },
    )
    .await?;

    info!(
        payment_id = payment.id,
        order_id = order.id,
        provider = provider.as_str(),
        amount_cents = payment.amount_cents,
        "payment.created"
    );
    Ok(payment)
}

/// Customer-initiated intent for one of their own orders.
pub async fn create_for_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    order_id: i64,
    provider: PaymentProvider,
    payments_enabled: bool,
) -> Result<Payment, DomainError> {
    let order = order_service::get_mine(conn, customer_id, order_id).await?;
    create_intent(conn, &order, provider, payments_enabled).await
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
    next: PaymentStatus,
) -> Result<Payment, DomainError> {
    let payment = payments::transition(conn, payment_id, next)
        .await?
        .ok_or_else(not_found)?;
    info!(payment_id, status = %next, "payment.status_changed");
    Ok(payment)
}

pub async fn get_with_refunds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
) -> Result<PaymentWithRefunds, DomainError> {
    let payment = payments::find_by_id(conn, payment_id)
        .await?
        .ok_or_else(not_found)?;
    let refunds = payments::list_refunds(conn, payment.id).await?;
    Ok(PaymentWithRefunds { payment, refunds })
}

pub fn validate_refund_amount(amount_cents: i64, paid_cents: i64) -> Result<(), DomainError> {
    if amount_cents <= 0 || amount_cents > paid_cents {
        return Err(DomainError::validation(
            ValidationKind::InvalidRefundAmount,
            format!("Refund must be between 1 and {paid_cents} cents"),
        ));
    }
    Ok(())
}

/// Refund a delivered or cancelled order against its captured payment.
pub async fn refund_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    amount_cents: Option<i64>,
    reason: Option<String>,
) -> Result<RefundOutcome, DomainError> {
    let order = orders::find_by_id(conn, order_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Order, "Order not found"))?;

    match order.status {
        OrderStatus::Refunded => {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyRefunded,
                "Order was already refunded",
            ))
        }
        OrderStatus::Delivered | OrderStatus::Cancelled => {}
        other => {
            return Err(DomainError::conflict(
                ConflictKind::InvalidStatusTransition,
                format!("Order in status {other} cannot be refunded"),
            ))
        }
    }

    let payment = payments::find_by_order(conn, order.id)
        .await?
        .ok_or_else(not_found)?;
    match payment.status {
        PaymentStatus::Captured => {}
        PaymentStatus::Refunded => {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyRefunded,
                "Payment was already refunded",
            ))
        }
        _ => {
            return Err(DomainError::conflict(
                ConflictKind::PaymentNotCaptured,
                "Payment has not been captured",
            ))
        }
    }

    let amount_cents = amount_cents.unwrap_or(payment.amount_cents);
    validate_refund_amount(amount_cents, payment.amount_cents)?;

    let refund = payments::create_refund(conn, payment.id, amount_cents, reason).await?;
    let payment = set_status(conn, payment.id, PaymentStatus::Refunded).await?;
    let order = order_service::set_status(conn, order.id, OrderStatus::Refunded).await?;

    info!(
        order_id = order.id,
        payment_id = payment.id,
        refund_id = refund.id,
        amount_cents,
        "payment.refunded"
    );
    Ok(RefundOutcome {
        order,
        payment,
        refund,
    })
}
