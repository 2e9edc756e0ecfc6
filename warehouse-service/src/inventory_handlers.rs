use crate::app_state::AppState;
use crate::models::{
    missing_fields_message, InventoryDetail, InventoryListing, InventoryPatch, NewInventoryItem,
    INVENTORY_REQUIRED_FIELDS,
};
use crate::warehouse_handlers::invalid_body;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common_http_errors::{ApiError, ApiResult};
use sqlx::{query, query_as};
use uuid::Uuid;

pub(crate) const LIST_INVENTORY_SQL: &str =
    "SELECT warehouses.warehouse_name, inventories.id, inventories.item_name, inventories.category, inventories.status, inventories.quantity FROM inventories INNER JOIN warehouses ON warehouses.id = inventories.warehouse_id";

/// LEFT JOIN so an item whose warehouse row is missing (no FK on the store)
/// still reads back, with a null `warehouse_name`.
pub(crate) const GET_INVENTORY_ITEM_SQL: &str =
    "SELECT warehouses.warehouse_name, inventories.id, inventories.warehouse_id, inventories.item_name, inventories.description, inventories.category, inventories.status, inventories.quantity FROM inventories LEFT JOIN warehouses ON warehouses.id = inventories.warehouse_id WHERE inventories.id = $1";

pub(crate) const INSERT_INVENTORY_ITEM_SQL: &str =
    "INSERT INTO inventories (id, warehouse_id, item_name, description, category, status, quantity) VALUES ($1, $2, $3, $4, $5, $6, $7)";

pub(crate) const PATCH_INVENTORY_ITEM_SQL: &str =
    "UPDATE inventories SET warehouse_id = COALESCE($1, warehouse_id), item_name = COALESCE($2, item_name), description = COALESCE($3, description), category = COALESCE($4, category), status = COALESCE($5, status), quantity = COALESCE($6, quantity) WHERE id = $7";

pub(crate) const DELETE_INVENTORY_ITEM_SQL: &str = "DELETE FROM inventories WHERE id = $1";

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "inventory_item_not_found",
        format!("Record with id: {id} is not found"),
    )
}

async fn fetch_listing(state: &AppState) -> ApiResult<Vec<InventoryListing>> {
    query_as::<_, InventoryListing>(LIST_INVENTORY_SQL)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            state.store_error("list_inventory", "Error retrieving Inventories".into(), e)
        })
}

pub async fn list_inventory(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<InventoryListing>>> {
    Ok(Json(fetch_listing(&state).await?))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryDetail>> {
    let item = query_as::<_, InventoryDetail>(GET_INVENTORY_ITEM_SQL)
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            state.store_error(
                "get_inventory_item",
                format!("Error retrieving inventory item {id}"),
                e,
            )
        })?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(item))
}

/// The referenced warehouse is not looked up here. With a foreign key on the
/// store a dangling `warehouse_id` surfaces as a store error; without one the
/// item is stored and read back with a null `warehouse_name`.
pub async fn create_inventory_item(
    State(state): State<AppState>,
    payload: Result<Json<NewInventoryItem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InventoryDetail>)> {
    let Json(new_item) = payload.map_err(invalid_body)?;
    let missing = new_item.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::validation(
            "missing_fields",
            missing_fields_message(INVENTORY_REQUIRED_FIELDS, &missing),
        ));
    }

    let item = new_item.into_record(Uuid::new_v4().to_string());
    let fail = |e| {
        state.store_error("create_inventory_item", "Error creating Inventory item".into(), e)
    };

    let mut tx = state.db.begin().await.map_err(fail)?;
    query(INSERT_INVENTORY_ITEM_SQL)
        .bind(&item.id)
        .bind(&item.warehouse_id)
        .bind(&item.item_name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.status)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;
    let created = query_as::<_, InventoryDetail>(GET_INVENTORY_ITEM_SQL)
        .bind(&item.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(fail)?
        .ok_or_else(|| not_found(&item.id))?;
    tx.commit().await.map_err(fail)?;

    tracing::debug!(
        item_id = %created.id,
        warehouse_id = %created.warehouse_id,
        "Inventory item created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn patch_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<InventoryPatch>, JsonRejection>,
) -> ApiResult<Json<InventoryDetail>> {
    let Json(patch) = payload.map_err(invalid_body)?;
    if patch.is_empty() {
        return Err(ApiError::validation(
            "empty_update",
            "Request body contains no inventory fields to update",
        ));
    }
    let fail = |e| {
        state.store_error("patch_inventory_item", format!("Error updating Inventory item {id}"), e)
    };

    let mut tx = state.db.begin().await.map_err(fail)?;
    let result = query(PATCH_INVENTORY_ITEM_SQL)
        .bind(patch.warehouse_id)
        .bind(patch.item_name)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.status)
        .bind(patch.quantity)
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;
    if result.rows_affected() == 0 {
        return Err(not_found(&id));
    }
    let updated = query_as::<_, InventoryDetail>(GET_INVENTORY_ITEM_SQL)
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(fail)?
        .ok_or_else(|| not_found(&id))?;
    tx.commit().await.map_err(fail)?;

    Ok(Json(updated))
}

/// Deletes the item and answers with the refreshed joined listing so the
/// client can redraw its table without a second request.
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InventoryListing>>> {
    let result = query(DELETE_INVENTORY_ITEM_SQL)
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            state.store_error(
                "delete_inventory_item",
                format!("Error deleting Inventory item {id}"),
                e,
            )
        })?;
    tracing::debug!(
        item_id = %id,
        rows = result.rows_affected(),
        "Inventory item delete executed"
    );

    Ok(Json(fetch_listing(&state).await?))
}
