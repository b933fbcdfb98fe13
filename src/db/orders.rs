use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::db::models::{
    OrderDetail, OrderLine, OrderRequest, OrderWithProducts, ProductEntry,
};

/// Initial status of every new order; the reminder sweep keys off it.
pub const STATUS_PENDING: &str = "Pending";

/// Flat result of the orders × order_products × products join, one row per
/// (order, product) pair.
#[derive(FromRow, Debug, Clone)]
struct OrderProductRow {
    order_id: i32,
    customer_id: i32,
    date: NaiveDateTime,
    status: String,
    product_id: i32,
    product_name: String,
    price: f64,
    description: Option<String>,
    image_url: Option<String>,
}

/// Same join narrowed to the single-order shape, with quantities.
#[derive(FromRow, Debug, Clone)]
struct OrderLineRow {
    order_id: i32,
    customer_id: i32,
    date: NaiveDateTime,
    status: String,
    product_id: i32,
    product_name: String,
    price: f64,
    quantity: i32,
}

const ORDER_LIST_SELECT: &str = "\
    SELECT o.id AS order_id, o.customer_id, o.date, o.status,
           p.id AS product_id, p.name AS product_name, p.price, p.description, p.image_url
    FROM orders o
    JOIN order_products op ON o.id = op.order_id
    JOIN products p ON op.product_id = p.id";

/// Every order owned by `customer_id`, grouped with its products.
pub async fn customer_orders(
    pool: &PgPool,
    customer_id: i32,
) -> Result<Vec<OrderWithProducts>, sqlx::Error> {
    let rows: Vec<OrderProductRow> =
        sqlx::query_as(&format!("{ORDER_LIST_SELECT} WHERE o.customer_id = $1"))
            .bind(customer_id)
            .fetch_all(pool)
            .await?;

    Ok(group_rows(rows))
}

/// Every order in the system, grouped with its products.
pub async fn all_orders(pool: &PgPool) -> Result<Vec<OrderWithProducts>, sqlx::Error> {
    let rows: Vec<OrderProductRow> = sqlx::query_as(ORDER_LIST_SELECT).fetch_all(pool).await?;

    Ok(group_rows(rows))
}

/// A single order scoped to its owner. The ownership check lives in the
/// WHERE clause: an order belonging to a different customer joins to zero
/// rows and comes back as `None`, never as someone else's data.
pub async fn order_detail(
    pool: &PgPool,
    order_id: i32,
    customer_id: i32,
) -> Result<Option<OrderDetail>, sqlx::Error> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
        "SELECT o.id AS order_id, o.customer_id, o.date, o.status,
                p.id AS product_id, p.name AS product_name, p.price, op.quantity
         FROM orders o
         JOIN order_products op ON o.id = op.order_id
         JOIN products p ON op.product_id = p.id
         WHERE o.id = $1 AND o.customer_id = $2",
    )
    .bind(order_id)
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(fold_detail(rows))
}

/// Checks an incoming order before anything touches the store.
pub fn validate_order_request(request: &OrderRequest) -> Result<(), String> {
    if request.customer_id <= 0 {
        return Err("customer_id must be a positive integer".to_string());
    }

    if request.products.is_empty() {
        return Err("order must contain at least one product".to_string());
    }

    if let Some(item) = request.products.iter().find(|item| item.quantity <= 0) {
        return Err(format!(
            "quantity for product {} must be a positive integer",
            item.product_id
        ));
    }

    Ok(())
}

/// Persists the order header and its product associations as one unit: a
/// failure on either side rolls the whole order back, so an order is never
/// visible with a partial product set.
pub async fn create_order(pool: &PgPool, request: &OrderRequest) -> Result<i32, sqlx::Error> {
    let mut transaction = pool.begin().await?;

    let order_id: i32 = sqlx::query_scalar(
        "INSERT INTO orders (customer_id, date, status) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(request.customer_id)
    .bind(Utc::now().naive_utc())
    .bind(STATUS_PENDING)
    .fetch_one(&mut *transaction)
    .await?;

    for item in &request.products {
        sqlx::query("INSERT INTO order_products (order_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *transaction)
            .await?;
    }

    transaction.commit().await?;

    Ok(order_id)
}

/// Folds flat join rows into nested orders keyed by order id: the first row
/// for an id creates the record with a one-element product list, later rows
/// append. Result order is unspecified. An order with no associations
/// produces no rows from the inner join and therefore never appears here.
fn group_rows(rows: Vec<OrderProductRow>) -> Vec<OrderWithProducts> {
    let mut orders: HashMap<i32, OrderWithProducts> = HashMap::new();

    for row in rows {
        let product = ProductEntry {
            product_id: row.product_id,
            product_name: row.product_name,
            price: row.price,
            description: row.description,
            image_url: row.image_url,
        };

        match orders.entry(row.order_id) {
            Entry::Occupied(mut existing) => existing.get_mut().products.push(product),
            Entry::Vacant(slot) => {
                slot.insert(OrderWithProducts {
                    order_id: row.order_id,
                    customer_id: row.customer_id,
                    date: row.date,
                    status: row.status,
                    products: vec![product],
                });
            }
        }
    }

    orders.into_values().collect()
}

fn fold_detail(rows: Vec<OrderLineRow>) -> Option<OrderDetail> {
    let mut detail: Option<OrderDetail> = None;

    for row in rows {
        let line = OrderLine {
            product_id: row.product_id,
            product_name: row.product_name,
            price: row.price,
            quantity: row.quantity,
        };

        match detail.as_mut() {
            Some(existing) => existing.lines.push(line),
            None => {
                detail = Some(OrderDetail {
                    order_id: row.order_id,
                    customer_id: row.customer_id,
                    date: row.date,
                    status: row.status,
                    lines: vec![line],
                })
            }
        }
    }

    detail
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::models::OrderItem;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn list_row(order_id: i32, customer_id: i32, product_id: i32) -> OrderProductRow {
        OrderProductRow {
            order_id,
            customer_id,
            date: noon(),
            status: STATUS_PENDING.to_string(),
            product_id,
            product_name: format!("product-{product_id}"),
            price: 9.99,
            description: None,
            image_url: None,
        }
    }

    fn line_row(order_id: i32, customer_id: i32, product_id: i32, quantity: i32) -> OrderLineRow {
        OrderLineRow {
            order_id,
            customer_id,
            date: noon(),
            status: STATUS_PENDING.to_string(),
            product_id,
            product_name: format!("product-{product_id}"),
            price: 9.99,
            quantity,
        }
    }

    fn request(customer_id: i32, items: Vec<(i32, i32)>) -> OrderRequest {
        OrderRequest {
            customer_id,
            products: items
                .into_iter()
                .map(|(product_id, quantity)| OrderItem {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    fn sorted(mut orders: Vec<OrderWithProducts>) -> Vec<OrderWithProducts> {
        for order in &mut orders {
            order.products.sort_by_key(|p| p.product_id);
        }
        orders.sort_by_key(|o| o.order_id);
        orders
    }

    #[test]
    fn groups_rows_by_order_id() {
        let rows = vec![
            list_row(1, 7, 3),
            list_row(1, 7, 5),
            list_row(2, 8, 3),
        ];

        let orders = sorted(group_rows(rows));

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 1);
        assert_eq!(orders[0].customer_id, 7);
        assert_eq!(orders[0].products.len(), 2);
        assert_eq!(orders[0].products[0].product_id, 3);
        assert_eq!(orders[0].products[1].product_id, 5);
        assert_eq!(orders[1].order_id, 2);
        assert_eq!(orders[1].products.len(), 1);
    }

    #[test]
    fn grouping_is_idempotent_over_the_same_rows() {
        let rows = vec![list_row(1, 7, 3), list_row(2, 7, 5), list_row(1, 7, 9)];

        let first = sorted(group_rows(rows.clone()));
        let second = sorted(group_rows(rows));

        assert_eq!(first, second);
    }

    #[test]
    fn no_rows_means_no_orders() {
        assert!(group_rows(Vec::new()).is_empty());
    }

    #[test]
    fn detail_fold_collects_all_lines() {
        let detail = fold_detail(vec![line_row(4, 7, 3, 2), line_row(4, 7, 5, 1)]).unwrap();

        assert_eq!(detail.order_id, 4);
        assert_eq!(detail.customer_id, 7);
        assert_eq!(detail.lines.len(), 2);
        assert_eq!(detail.lines[0].quantity, 2);
        assert_eq!(detail.lines[1].quantity, 1);
    }

    #[test]
    fn detail_fold_of_zero_rows_is_none() {
        // An order owned by a different customer joins to nothing, so the
        // caller sees an absent order, never foreign data.
        assert_eq!(fold_detail(Vec::new()), None);
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(validate_order_request(&request(7, vec![(3, 2), (5, 1)])).is_ok());
    }

    #[test]
    fn rejects_a_non_positive_customer_id() {
        assert!(validate_order_request(&request(0, vec![(3, 2)])).is_err());
        assert!(validate_order_request(&request(-4, vec![(3, 2)])).is_err());
    }

    #[test]
    fn rejects_an_empty_product_list() {
        assert!(validate_order_request(&request(7, vec![])).is_err());
    }

    #[test]
    fn rejects_a_non_positive_quantity() {
        assert!(validate_order_request(&request(7, vec![(3, 0)])).is_err());
        assert!(validate_order_request(&request(7, vec![(3, 2), (5, -1)])).is_err());
    }
}
