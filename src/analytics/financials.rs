//! # Derived Financials
//!
//! Pure calculations over product and sale records, shared by the dashboard
//! and the product/sale listings. Inventory is valued at material cost, not
//! at selling price.

use serde::Serialize;

use crate::models::{InventorySummary, ProductRecord, SaleRecord, SalesSummary};

/// Inventory band for a product's on-hand quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Out,
    Low,
    Medium,
    Good,
}

pub const LOW_STOCK_MAX: i64 = 5;
pub const MEDIUM_STOCK_MAX: i64 = 10;

/// Margin as a percentage of selling price; 0 when the selling price is not positive.
pub fn profit_margin_percent(material_cost: f64, selling_price: f64) -> f64 {
    if selling_price > 0.0 {
        ((selling_price - material_cost) / selling_price) * 100.0
    } else {
        0.0
    }
}

/// Sum of `quantity * material_cost` over all products.
pub fn inventory_value(products: &[ProductRecord]) -> f64 {
    products
        .iter()
        .map(|p| p.quantity as f64 * p.material_cost)
        .sum()
}

/// Classify on-hand quantity. Bands are inclusive: 1..=5 low, 6..=10 medium.
/// Negative quantities are treated as out of stock.
pub fn stock_status(quantity: i64) -> StockStatus {
    match quantity {
        q if q <= 0 => StockStatus::Out,
        1..=LOW_STOCK_MAX => StockStatus::Low,
        q if q <= MEDIUM_STOCK_MAX => StockStatus::Medium,
        _ => StockStatus::Good,
    }
}

pub fn sale_total(sale: &SaleRecord) -> f64 {
    sale.quantity as f64 * sale.price_per_unit
}

pub fn inventory_summary(products: &[ProductRecord]) -> InventorySummary {
    let mut summary = InventorySummary {
        total_products: products.len(),
        inventory_value: inventory_value(products),
        ..Default::default()
    };
    for product in products {
        match stock_status(product.quantity) {
            StockStatus::Out => summary.out_of_stock_count += 1,
            StockStatus::Low => summary.low_stock_count += 1,
            StockStatus::Medium | StockStatus::Good => {}
        }
    }
    summary
}

pub fn sales_summary(sales: &[SaleRecord]) -> SalesSummary {
    SalesSummary {
        total_sales: sales.len(),
        total_revenue: sales.iter().map(sale_total).sum(),
    }
}
