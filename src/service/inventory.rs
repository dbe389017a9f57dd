use crate::db::{DashboardSummary, InventoryStorage, NewStockItem, StockItem};
use crate::error::StockError;
use serde::Deserialize;
use tracing::info;

/// Raw add/edit form as submitted by the browser. Every field is text;
/// missing fields deserialize as empty strings and fail validation later.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
}

impl ItemForm {
    pub fn validate(&self) -> Result<NewStockItem, StockError> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        let price = self.price.trim();
        if name.is_empty() || quantity.is_empty() || price.is_empty() {
            return Err(StockError::Validation(
                "Name, quantity and price are required".to_string(),
            ));
        }

        let quantity: i64 = quantity.parse().map_err(|_| {
            StockError::Validation("Quantity must be a whole number".to_string())
        })?;
        let price: f64 = price
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| StockError::Validation("Price must be a number".to_string()))?;

        let description = self.description.trim();
        Ok(NewStockItem {
            name: name.to_string(),
            quantity,
            price,
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

impl From<&StockItem> for ItemForm {
    fn from(item: &StockItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            price: item.price.to_string(),
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

/// CRUD over `stock_items` plus the dashboard aggregate.
#[derive(Clone)]
pub struct InventoryService {
    storage: InventoryStorage,
}

impl InventoryService {
    pub fn new(storage: InventoryStorage) -> Self {
        Self { storage }
    }

    pub async fn list_items(&self) -> Result<Vec<StockItem>, StockError> {
        self.storage.list_items().await
    }

    pub async fn add_item(&self, form: &ItemForm) -> Result<StockItem, StockError> {
        let item = form.validate()?;
        let stored = self.storage.insert_item(&item).await?;
        info!(item_id = stored.id, name = %stored.name, "item added");
        Ok(stored)
    }

    pub async fn get_item(&self, id: i64) -> Result<StockItem, StockError> {
        self.storage
            .get_item(id)
            .await?
            .ok_or(StockError::NotFound(id))
    }

    /// Full overwrite of the item's mutable fields; never inserts.
    pub async fn edit_item(&self, id: i64, form: &ItemForm) -> Result<StockItem, StockError> {
        let item = form.validate()?;
        let stored = self
            .storage
            .update_item(id, &item)
            .await?
            .ok_or(StockError::NotFound(id))?;
        info!(item_id = id, "item updated");
        Ok(stored)
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), StockError> {
        self.storage.delete_item(id).await?;
        info!(item_id = id, "item deleted");
        Ok(())
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, StockError> {
        self.storage.summary().await
    }
}
