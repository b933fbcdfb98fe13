use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Incoming order payload: who is buying, and what.
#[derive(Deserialize, Debug, Clone)]
pub struct OrderRequest {
    pub customer_id: i32,
    pub products: Vec<OrderItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OrderItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// One product entry inside an aggregated order, as served to clients.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductEntry {
    pub product_id: i32,
    pub product_name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Read-time composition of an order with its products. Exists only in the
/// aggregation layer and on the wire, never in the store. The product
/// sequence carries no defined order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderWithProducts {
    pub order_id: i32,
    pub customer_id: i32,
    pub date: NaiveDateTime,
    pub status: String,
    pub products: Vec<ProductEntry>,
}

/// Single-order shape with per-line quantities, feeding the CSV report.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub order_id: i32,
    pub customer_id: i32,
    pub date: NaiveDateTime,
    pub status: String,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: i32,
    pub product_name: String,
    pub price: f64,
    pub quantity: i32,
}
