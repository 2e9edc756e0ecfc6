use crate::app_state::AppState;
use crate::models::{
    missing_fields_message, DeletedWarehouse, InventoryItem, Warehouse, WarehouseInput,
    WarehousePatch, WarehouseSummary, WAREHOUSE_REQUIRED_FIELDS,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common_http_errors::{ApiError, ApiResult};
use sqlx::{query, query_as};
use uuid::Uuid;

pub(crate) const LIST_WAREHOUSES_SQL: &str =
    "SELECT id, warehouse_name, contact_name, address, contact_phone, contact_email, city, country FROM warehouses";

pub(crate) const GET_WAREHOUSE_SQL: &str =
    "SELECT id, warehouse_name, address, city, country, contact_name, contact_position, contact_phone, contact_email FROM warehouses WHERE id = $1";

pub(crate) const LIST_WAREHOUSE_INVENTORY_SQL: &str =
    "SELECT id, warehouse_id, item_name, description, category, status, quantity FROM inventories WHERE warehouse_id = $1";

pub(crate) const INSERT_WAREHOUSE_SQL: &str =
    "INSERT INTO warehouses (id, warehouse_name, address, city, country, contact_name, contact_position, contact_phone, contact_email) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

pub(crate) const REPLACE_WAREHOUSE_SQL: &str =
    "UPDATE warehouses SET warehouse_name = $1, address = $2, city = $3, country = $4, contact_name = $5, contact_position = $6, contact_phone = $7, contact_email = $8 WHERE id = $9";

pub(crate) const PATCH_WAREHOUSE_SQL: &str =
    "UPDATE warehouses SET warehouse_name = COALESCE($1, warehouse_name), address = COALESCE($2, address), city = COALESCE($3, city), country = COALESCE($4, country), contact_name = COALESCE($5, contact_name), contact_position = COALESCE($6, contact_position), contact_phone = COALESCE($7, contact_phone), contact_email = COALESCE($8, contact_email) WHERE id = $9";

pub(crate) const DELETE_WAREHOUSE_SQL: &str = "DELETE FROM warehouses WHERE id = $1";

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "warehouse_not_found",
        format!("Record with id: {id} is not found"),
    )
}

pub(crate) fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::validation("invalid_body", rejection.body_text())
}

pub async fn list_warehouses(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<WarehouseSummary>>> {
    let warehouses = query_as::<_, WarehouseSummary>(LIST_WAREHOUSES_SQL)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            state.store_error("list_warehouses", "Error retrieving Warehouses".into(), e)
        })?;

    Ok(Json(warehouses))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Warehouse>> {
    let warehouse = query_as::<_, Warehouse>(GET_WAREHOUSE_SQL)
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            state.store_error("get_warehouse", format!("Error retrieving warehouse {id}"), e)
        })?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(warehouse))
}

/// Items stocked at a warehouse. An unknown warehouse id yields an empty list.
pub async fn list_warehouse_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let items = query_as::<_, InventoryItem>(LIST_WAREHOUSE_INVENTORY_SQL)
        .bind(&id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            state.store_error(
                "list_warehouse_inventory",
                format!("Error retrieving inventories for Warehouse {id}"),
                e,
            )
        })?;

    Ok(Json(items))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    payload: Result<Json<WarehouseInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Warehouse>)> {
    let Json(input) = payload.map_err(invalid_body)?;
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::validation(
            "missing_fields",
            missing_fields_message(WAREHOUSE_REQUIRED_FIELDS, &missing),
        ));
    }

    let record = input.into_record(Uuid::new_v4().to_string());
    let fail = |e| state.store_error("create_warehouse", "Error creating Warehouse".into(), e);

    let mut tx = state.db.begin().await.map_err(fail)?;
    query(INSERT_WAREHOUSE_SQL)
        .bind(&record.id)
        .bind(&record.warehouse_name)
        .bind(&record.address)
        .bind(&record.city)
        .bind(&record.country)
        .bind(&record.contact_name)
        .bind(&record.contact_position)
        .bind(&record.contact_phone)
        .bind(&record.contact_email)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;
    let created = query_as::<_, Warehouse>(GET_WAREHOUSE_SQL)
        .bind(&record.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(fail)?
        .ok_or_else(|| not_found(&record.id))?;
    tx.commit().await.map_err(fail)?;

    tracing::debug!(warehouse_id = %created.id, "Warehouse created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Full replace: fields absent from the body are written as empty strings.
pub async fn replace_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WarehouseInput>, JsonRejection>,
) -> ApiResult<Json<Warehouse>> {
    let Json(input) = payload.map_err(invalid_body)?;
    let record = input.into_record(id);
    let fail = |e| {
        state.store_error(
            "replace_warehouse",
            format!("Error updating Warehouse {}", record.id),
            e,
        )
    };

    let mut tx = state.db.begin().await.map_err(fail)?;
    let result = query(REPLACE_WAREHOUSE_SQL)
        .bind(&record.warehouse_name)
        .bind(&record.address)
        .bind(&record.city)
        .bind(&record.country)
        .bind(&record.contact_name)
        .bind(&record.contact_position)
        .bind(&record.contact_phone)
        .bind(&record.contact_email)
        .bind(&record.id)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;
    if result.rows_affected() == 0 {
        return Err(not_found(&record.id));
    }
    let updated = query_as::<_, Warehouse>(GET_WAREHOUSE_SQL)
        .bind(&record.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(fail)?
        .ok_or_else(|| not_found(&record.id))?;
    tx.commit().await.map_err(fail)?;

    Ok(Json(updated))
}

pub async fn patch_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WarehousePatch>, JsonRejection>,
) -> ApiResult<Json<Warehouse>> {
    let Json(patch) = payload.map_err(invalid_body)?;
    if patch.is_empty() {
        return Err(ApiError::validation(
            "empty_update",
            "Request body contains no warehouse fields to update",
        ));
    }
    let fail = |e| {
        state.store_error("patch_warehouse", format!("Error updating Warehouse {id}"), e)
    };

    let mut tx = state.db.begin().await.map_err(fail)?;
    let result = query(PATCH_WAREHOUSE_SQL)
        .bind(patch.warehouse_name)
        .bind(patch.address)
        .bind(patch.city)
        .bind(patch.country)
        .bind(patch.contact_name)
        .bind(patch.contact_position)
        .bind(patch.contact_phone)
        .bind(patch.contact_email)
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;
    if result.rows_affected() == 0 {
        return Err(not_found(&id));
    }
    let updated = query_as::<_, Warehouse>(GET_WAREHOUSE_SQL)
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(fail)?
        .ok_or_else(|| not_found(&id))?;
    tx.commit().await.map_err(fail)?;

    Ok(Json(updated))
}

/// Idempotent: deleting an unknown id still answers 200.
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedWarehouse>> {
    let result = query(DELETE_WAREHOUSE_SQL)
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            state.store_error("delete_warehouse", format!("Error deleting Warehouse {id}"), e)
        })?;
    tracing::debug!(
        warehouse_id = %id,
        rows = result.rows_affected(),
        "Warehouse delete executed"
    );

    Ok(Json(DeletedWarehouse::new(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_projection_omits_contact_position() {
        assert!(!LIST_WAREHOUSES_SQL.contains("contact_position"));
        assert!(GET_WAREHOUSE_SQL.contains("contact_position"));
    }

    #[test]
    fn queries_use_parameter_placeholders() {
        assert!(GET_WAREHOUSE_SQL.ends_with("WHERE id = $1"));
        assert!(LIST_WAREHOUSE_INVENTORY_SQL.ends_with("WHERE warehouse_id = $1"));
        assert!(REPLACE_WAREHOUSE_SQL.ends_with("WHERE id = $9"));
        assert!(PATCH_WAREHOUSE_SQL.ends_with("WHERE id = $9"));
        assert_eq!(DELETE_WAREHOUSE_SQL, "DELETE FROM warehouses WHERE id = $1");
    }

    #[test]
    fn patch_only_touches_supplied_columns() {
        for column in WAREHOUSE_REQUIRED_FIELDS {
            let clause = format!("{column} = COALESCE(");
            assert!(PATCH_WAREHOUSE_SQL.contains(&clause), "missing COALESCE for {column}");
        }
    }

    #[test]
    fn not_found_message_includes_id() {
        let err = not_found("abc-123");
        assert_eq!(err.to_string(), "Record with id: abc-123 is not found");
        assert_eq!(err.code(), "warehouse_not_found");
    }
}
