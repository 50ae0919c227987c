//! Order summaries for the account page.
//!
//! Each order is reduced to its first line item plus a monthly "plan
//! renewal" window: the renewal date is one calendar month after the order
//! date, and `daysLeft` counts down to it.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use shelfmark_core::OrderId;

use crate::shopify::Order;

const SECONDS_PER_DAY: i64 = 86_400;

/// A flattened order as returned by `GET /order/{email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub order_number: Option<String>,
    /// Order date (UTC), `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Renewal date, one calendar month after `date`.
    pub next_month_date: NaiveDate,
    /// Whole days until the renewal date, rounded up. Negative once past.
    pub days_left: i64,
    pub financial_status: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub payment_gateway: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub product_title: Option<String>,
    pub variant_title: Option<String>,
    pub quantity: Option<u32>,
    pub order_status_url: Option<String>,
}

impl OrderSummary {
    /// Summarize `order` as seen at `now`.
    #[must_use]
    pub fn from_order(order: &Order, now: DateTime<Utc>) -> Self {
        let date = order.created_at.with_timezone(&Utc).date_naive();
        let next_month_date = next_month(date);
        let line_item = order.line_items.first();

        Self {
            order_id: order.id,
            order_number: order.name.clone(),
            date,
            next_month_date,
            days_left: days_until(next_month_date, now),
            financial_status: order.financial_status.clone(),
            total_price: order.total_price.clone(),
            currency: order.currency.clone(),
            payment_gateway: order.payment_gateway_names.first().cloned(),
            customer_name: order.customer.as_ref().map(|c| {
                format!(
                    "{} {}",
                    c.first_name.as_deref().unwrap_or_default(),
                    c.last_name.as_deref().unwrap_or_default()
                )
                .trim()
                .to_string()
            }),
            customer_email: order.customer.as_ref().and_then(|c| c.email.clone()),
            product_title: line_item.and_then(|li| li.title.clone()),
            variant_title: line_item.and_then(|li| li.variant_title.clone()),
            quantity: line_item.and_then(|li| li.quantity),
            order_status_url: order.order_status_url.clone(),
        }
    }
}

/// One calendar month later, clamped to the end of a shorter month
/// (Jan 31 -> Feb 28/29).
#[must_use]
pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

/// Days from `now` until midnight UTC at the start of `target`, rounded up.
#[must_use]
pub fn days_until(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let seconds = (target.and_time(NaiveTime::MIN).and_utc() - now).num_seconds();
    (seconds + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_next_month_clamps_to_month_end() {
        assert_eq!(next_month(date("2024-01-15")), date("2024-02-15"));
        assert_eq!(next_month(date("2024-01-31")), date("2024-02-29"));
        assert_eq!(next_month(date("2023-01-31")), date("2023-02-28"));
        assert_eq!(next_month(date("2024-12-10")), date("2025-01-10"));
    }

    #[test]
    fn test_days_until_rounds_up() {
        let target = date("2024-02-15");
        assert_eq!(days_until(target, at("2024-02-15T00:00:00Z")), 0);
        assert_eq!(days_until(target, at("2024-02-14T23:59:59Z")), 1);
        assert_eq!(days_until(target, at("2024-02-13T12:00:00Z")), 2);
        assert_eq!(days_until(target, at("2024-02-16T12:00:00Z")), -1);
    }

    #[test]
    fn test_summary_from_order() {
        let order: Order = serde_json::from_value(json!({
            "id": 1001,
            "name": "#1001",
            "created_at": "2024-01-31T22:30:00-05:00",
            "financial_status": "paid",
            "total_price": "29.99",
            "currency": "USD",
            "payment_gateway_names": ["shopify_payments", "gift_card"],
            "customer": {"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"},
            "line_items": [
                {"title": "Red Mug", "variant_title": "6 Pack", "quantity": 2},
                {"title": "Blue Cup", "variant_title": null, "quantity": 1}
            ],
            "order_status_url": "https://shop.example.com/orders/1001"
        }))
        .unwrap();

        let summary = OrderSummary::from_order(&order, at("2024-02-20T00:00:00Z"));

        // 22:30 EST is already Feb 1 in UTC.
        assert_eq!(summary.date, date("2024-02-01"));
        assert_eq!(summary.next_month_date, date("2024-03-01"));
        assert_eq!(summary.days_left, 10);
        assert_eq!(summary.customer_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(summary.payment_gateway.as_deref(), Some("shopify_payments"));
        assert_eq!(summary.product_title.as_deref(), Some("Red Mug"));
        assert_eq!(summary.quantity, Some(2));

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["orderId"], json!(1001));
        assert_eq!(value["orderNumber"], json!("#1001"));
        assert_eq!(value["date"], json!("2024-02-01"));
        assert_eq!(value["nextMonthDate"], json!("2024-03-01"));
        assert_eq!(value["daysLeft"], json!(10));
        assert_eq!(value["variantTitle"], json!("6 Pack"));
    }

    #[test]
    fn test_summary_without_line_items_or_customer() {
        let order: Order = serde_json::from_value(json!({
            "id": 1002,
            "created_at": "2024-03-05T10:00:00Z",
        }))
        .unwrap();

        let summary = OrderSummary::from_order(&order, at("2024-03-05T10:00:00Z"));
        assert_eq!(summary.customer_name, None);
        assert_eq!(summary.product_title, None);
        assert_eq!(summary.payment_gateway, None);
        assert_eq!(summary.days_left, 31);
    }
}
