use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use common::metrics::MENU_UPSERTS_TOTAL;

use crate::errors::ServiceError;
use crate::json::{is_truthy, present};
use crate::storage::{Collection, CollectionStore};

/// A dish on the menu as stored in `menu.json`.
///
/// Field values are kept as whatever JSON the admin sent, so a price of
/// `"2.50"` or a numeric id survives a read/write cycle unchanged. Absent
/// fields stay absent; an explicit `null` stays `null`. Keys this type does
/// not know about are kept in `extra` and written back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Value,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The five fields an admin edit replaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemFields {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
}

impl MenuItem {
    fn create(fields: MenuItemFields) -> Self {
        let mut item = Self {
            id: Value::String(Uuid::new_v4().to_string()),
            name: None,
            description: None,
            price: None,
            image_url: None,
            category: None,
            extra: Map::new(),
        };
        item.overwrite(fields);
        item
    }

    /// Replace every mutable field, including with `None` for omitted ones.
    fn overwrite(&mut self, fields: MenuItemFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.image_url = fields.image_url;
        self.category = fields.category;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created { id: Value },
    Updated { id: Value },
}

impl UpsertOutcome {
    pub fn id(&self) -> &Value {
        match self {
            UpsertOutcome::Created { id } | UpsertOutcome::Updated { id } => id,
        }
    }
}

#[derive(Clone)]
pub struct MenuService {
    store: Arc<CollectionStore>,
}

impl MenuService {
    pub fn new(store: Arc<CollectionStore>) -> Self {
        Self { store }
    }

    /// Whole menu in stored order.
    pub async fn list_menu(&self) -> Result<Vec<MenuItem>, ServiceError> {
        self.store.read_collection(Collection::Menu).await
    }

    /// Update the item whose id equals `id`, or append a new item when `id`
    /// is absent or falsy (`null`, `false`, `0`, `""`).
    ///
    /// An update overwrites all five mutable fields; it does not merge.
    pub async fn upsert_menu_item(
        &self,
        id: Option<&Value>,
        fields: MenuItemFields,
    ) -> Result<UpsertOutcome, ServiceError> {
        let id = id.filter(|id| is_truthy(id)).cloned();
        let outcome = self
            .store
            .modify_collection::<MenuItem, _, _>(Collection::Menu, move |menu| match id {
                Some(id) => {
                    let item = menu
                        .iter_mut()
                        .find(|item| item.id == id)
                        .ok_or_else(|| ServiceError::not_found("menu item"))?;
                    item.overwrite(fields);
                    Ok(UpsertOutcome::Updated { id })
                }
                None => {
                    let item = MenuItem::create(fields);
                    let id = item.id.clone();
                    menu.push(item);
                    Ok(UpsertOutcome::Created { id })
                }
            })
            .await?;

        let op = match outcome {
            UpsertOutcome::Created { .. } => "create",
            UpsertOutcome::Updated { .. } => "update",
        };
        MENU_UPSERTS_TOTAL.with_label_values(&[op]).inc();
        info!(id = %outcome.id(), op, "menu item upserted");
        Ok(outcome)
    }
}
