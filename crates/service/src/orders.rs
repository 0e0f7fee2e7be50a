use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use common::metrics::ORDERS_PLACED_TOTAL;

use crate::errors::ServiceError;
use crate::json::{is_truthy, present};
use crate::storage::{Collection, CollectionStore};

/// Status every order is created with. There is no transition operation.
pub const STATUS_PLACED: &str = "placed";

/// A customer order as stored in `orders.json`.
///
/// `createdAt` is kept as the stored text and `total` as whatever JSON was
/// submitted, including an explicit `null`. Keys this type does not know
/// about are kept in `extra`, so appending an order rewrites older records
/// without losing anything.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer: Value,
    pub items: Vec<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    pub created_at: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order submission. Every field is optional here so that missing ones can be
/// reported as an invalid order rather than a body parse failure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub customer: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub total: Option<Value>,
}

/// What the client gets back after placing an order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub created_at: String,
    pub status: String,
}

impl NewOrder {
    /// Presence checks only: a truthy `customer` and a non-empty `items` array.
    fn validate(self) -> Result<(Value, Vec<Value>, Option<Value>), ServiceError> {
        let customer = self
            .customer
            .filter(|c| is_truthy(c))
            .ok_or_else(|| ServiceError::InvalidOrder("customer is required".into()))?;
        let items = match self.items {
            Some(Value::Array(items)) if !items.is_empty() => items,
            Some(Value::Array(_)) => return Err(ServiceError::InvalidOrder("items must not be empty".into())),
            Some(_) => return Err(ServiceError::InvalidOrder("items must be an array".into())),
            None => return Err(ServiceError::InvalidOrder("items is required".into())),
        };
        Ok((customer, items, self.total))
    }
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<CollectionStore>,
}

impl OrderService {
    pub fn new(store: Arc<CollectionStore>) -> Self {
        Self { store }
    }

    /// Whole order book in stored order.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        self.store.read_collection(Collection::Orders).await
    }

    /// Validate, stamp and append a new order.
    pub async fn place_order(&self, new_order: NewOrder) -> Result<OrderReceipt, ServiceError> {
        let (customer, items, total) = new_order.validate()?;
        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            customer,
            items,
            total,
            created_at: iso_millis::format(&Utc::now()),
            status: STATUS_PLACED.to_string(),
            extra: Map::new(),
        };
        let receipt = OrderReceipt {
            order_id: order.order_id.clone(),
            created_at: order.created_at.clone(),
            status: order.status.clone(),
        };
        let item_count = order.items.len();

        self.store
            .modify_collection::<Order, _, _>(Collection::Orders, move |orders| {
                orders.push(order);
                Ok(())
            })
            .await?;

        ORDERS_PLACED_TOTAL.inc();
        info!(order_id = %receipt.order_id, items = item_count, "order placed");
        Ok(receipt)
    }
}

/// RFC 3339 in UTC with millisecond precision and a `Z` suffix,
/// e.g. `2025-01-02T03:04:05.678Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::collection_store::tests::{temp_backend, ReadOnlyBackend};
    use crate::storage::{CollectionBackend, WritePolicy};
    use serde_json::json;

    fn service_with(policy: WritePolicy) -> (OrderService, crate::storage::FileBackend, std::path::PathBuf) {
        let (backend, dir) = temp_backend();
        let store = Arc::new(CollectionStore::new(Arc::new(backend.clone()), policy));
        (OrderService::new(store), backend, dir)
    }

    fn valid_order() -> NewOrder {
        NewOrder {
            customer: Some(json!({"name": "A"})),
            items: Some(json!([{"sku": "x", "qty": 1}])),
            total: Some(json!(9.5)),
        }
    }

    #[tokio::test]
    async fn place_order_appends_and_returns_receipt() -> Result<(), anyhow::Error> {
        let (svc, _backend, dir) = service_with(WritePolicy::Strict);
        let first = svc.place_order(valid_order()).await?;
        let second = svc.place_order(valid_order()).await?;
        assert_ne!(first.order_id, second.order_id);
        assert_eq!(first.status, STATUS_PLACED);

        let orders = svc.list_orders().await?;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, first.order_id);
        assert_eq!(orders[0].created_at, first.created_at);
        assert_eq!(orders[0].customer, json!({"name": "A"}));
        assert_eq!(orders[0].total, Some(json!(9.5)));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_orders_are_rejected_without_writing() -> Result<(), anyhow::Error> {
        let (svc, backend, dir) = service_with(WritePolicy::Strict);
        let cases = [
            NewOrder { customer: None, ..valid_order() },
            NewOrder { customer: Some(json!("")), ..valid_order() },
            NewOrder { items: None, ..valid_order() },
            NewOrder { items: Some(json!([])), ..valid_order() },
            NewOrder { items: Some(json!("x")), ..valid_order() },
        ];
        for case in cases {
            let err = svc.place_order(case).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidOrder(_)));
        }
        assert!(backend.load(Collection::Orders).await?.is_none());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_total_is_omitted() -> Result<(), anyhow::Error> {
        let (svc, backend, dir) = service_with(WritePolicy::Strict);
        svc.place_order(NewOrder { total: None, ..valid_order() }).await?;
        let stored = backend.load(Collection::Orders).await?.unwrap_or_default();
        assert!(!stored.contains("total"));
        assert!(stored.contains("\"orderId\""));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn read_only_storage_still_accepts_orders() -> Result<(), anyhow::Error> {
        let (inner, _dir) = temp_backend();
        let store = Arc::new(CollectionStore::new(Arc::new(ReadOnlyBackend { inner }), WritePolicy::BestEffort));
        let svc = OrderService::new(store);
        let receipt = svc.place_order(valid_order()).await?;
        assert_eq!(receipt.status, STATUS_PLACED);
        assert!(svc.list_orders().await?.is_empty());
        Ok(())
    }

    #[test]
    fn timestamps_use_millisecond_utc() -> Result<(), anyhow::Error> {
        let ts = chrono::DateTime::parse_from_rfc3339("2025-01-02T03:04:05.678901Z")?.with_timezone(&Utc);
        assert_eq!(iso_millis::format(&ts), "2025-01-02T03:04:05.678Z");
        Ok(())
    }

    #[tokio::test]
    async fn earlier_orders_survive_a_new_placement() -> Result<(), anyhow::Error> {
        let (svc, backend, dir) = service_with(WritePolicy::Strict);
        let legacy = json!({
            "orderId": "o1",
            "customer": {"name": "A"},
            "items": [1],
            "total": null,
            "createdAt": "2025-01-02T03:04:05Z",
            "status": "placed",
            "note": "ring bell"
        });
        backend.save(Collection::Orders, &json!([legacy.clone()]).to_string()).await?;

        svc.place_order(valid_order()).await?;

        let stored: Value = serde_json::from_str(&backend.load(Collection::Orders).await?.unwrap_or_default())?;
        assert_eq!(stored[0], legacy);
        assert!(stored[1]["createdAt"].as_str().is_some_and(|s| s.ends_with('Z')));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn explicit_null_total_is_kept() -> Result<(), anyhow::Error> {
        let (svc, backend, dir) = service_with(WritePolicy::Strict);
        let order: NewOrder = serde_json::from_value(json!({
            "customer": {"name": "A"},
            "items": [1],
            "total": null
        }))?;
        svc.place_order(order).await?;
        let stored: Value = serde_json::from_str(&backend.load(Collection::Orders).await?.unwrap_or_default())?;
        assert_eq!(stored[0].get("total"), Some(&Value::Null));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
