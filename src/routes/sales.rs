//! Sale listing routes.
//!
//! GET /users/{user_id}/sales - Sales with line totals and total revenue

use axum::extract::Path;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::instrument;

use crate::analytics::financials::{sale_total, sales_summary};
use crate::db::{read_sales, AppDb};
use crate::models::{SaleView, SalesResponse};

/// Build the sales router.
pub fn router() -> Router {
    Router::new().route("/users/{user_id}/sales", get(list_sales))
}

#[instrument(skip_all, fields(user_id = %user_id))]
async fn list_sales(
    Extension(store): Extension<AppDb>,
    Path(user_id): Path<String>,
) -> Json<SalesResponse> {
    let outcome = read_sales(store.as_ref(), &user_id).await;
    let summary = sales_summary(&outcome.data);

    let sales = outcome
        .data
        .into_iter()
        .map(|sale| SaleView {
            id: sale.id,
            total: sale_total(&sale),
            quantity: sale.quantity,
            price_per_unit: sale.price_per_unit,
            sale_date: sale.sale_date,
            product_name: sale.product_name,
        })
        .collect();

    Json(SalesResponse {
        success: true,
        sales,
        total_revenue: summary.total_revenue,
        degraded: outcome.degraded,
    })
}
