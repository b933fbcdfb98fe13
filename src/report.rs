use std::io;
use std::path::Path;

use csv::Writer;
use thiserror::Error;

use crate::db::models::OrderDetail;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Writes the tabular export of a freshly placed order, one row per line
/// item. Overwrites whatever report was at `path` before.
pub fn write_order_report(path: &Path, order: &OrderDetail) -> Result<(), ReportError> {
    let mut writer = Writer::from_path(path)?;

    writer.write_record([
        "Order ID",
        "Customer ID",
        "Date",
        "Status",
        "Product ID",
        "Product Name",
        "Price",
        "Quantity",
    ])?;

    for line in &order.lines {
        writer.write_record([
            order.order_id.to_string(),
            order.customer_id.to_string(),
            order.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            order.status.clone(),
            line.product_id.to_string(),
            line.product_name.clone(),
            format!("{:.2}", line.price),
            line.quantity.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::models::OrderLine;

    #[test]
    fn writes_a_header_and_one_row_per_line() {
        let order = OrderDetail {
            order_id: 42,
            customer_id: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
            status: "Pending".to_string(),
            lines: vec![
                OrderLine {
                    product_id: 3,
                    product_name: "Espresso Cup".to_string(),
                    price: 12.5,
                    quantity: 2,
                },
                OrderLine {
                    product_id: 5,
                    product_name: "Moka Pot".to_string(),
                    price: 34.0,
                    quantity: 1,
                },
            ],
        };

        let path = std::env::temp_dir().join(format!("order_report_{}.csv", std::process::id()));
        write_order_report(&path, &order).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Order ID,Customer ID,Date,Status"));
        assert_eq!(lines[1], "42,7,2024-03-05 14:30:00,Pending,3,Espresso Cup,12.50,2");
        assert_eq!(lines[2], "42,7,2024-03-05 14:30:00,Pending,5,Moka Pot,34.00,1");

        std::fs::remove_file(&path).unwrap();
    }
}
