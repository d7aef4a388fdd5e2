//! Product listing routes.
//!
//! GET /users/{user_id}/products - Products with margin and stock status

use axum::extract::Path;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::instrument;

use crate::analytics::financials::{inventory_value, profit_margin_percent, stock_status};
use crate::db::{read_products, AppDb};
use crate::models::{ProductRecord, ProductView, ProductsResponse};

/// Build the products router.
pub fn router() -> Router {
    Router::new().route("/users/{user_id}/products", get(list_products))
}

#[instrument(skip_all, fields(user_id = %user_id))]
async fn list_products(
    Extension(store): Extension<AppDb>,
    Path(user_id): Path<String>,
) -> Json<ProductsResponse> {
    let outcome = read_products(store.as_ref(), &user_id).await;

    Json(ProductsResponse {
        success: true,
        inventory_value: inventory_value(&outcome.data),
        products: outcome.data.into_iter().map(to_view).collect(),
        degraded: outcome.degraded,
    })
}

fn to_view(product: ProductRecord) -> ProductView {
    ProductView {
        id: product.id,
        price: product.selling_price,
        quantity: product.quantity,
        date_added: product.added_date,
        material_cost: product.material_cost,
        selling_price: product.selling_price,
        profit_margin: profit_margin_percent(product.material_cost, product.selling_price),
        stock_status: stock_status(product.quantity),
        name: product.product_name,
    }
}
