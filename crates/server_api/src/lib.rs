use shared::{
    domain::{CategoryId, CategorySummary, OperationId, OperationSummary},
    error::{ApiError, ErrorCode},
    protocol::{UpdateCategoryRequest, UpdateCategoryResponse},
};
use storage::Storage;
use tracing::{info, warn};

const MAX_CATEGORY_NAME_CHARS: usize = 100;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// Assigns (or clears) the category of an operation.
///
/// A missing operation or category is an application-level rejection and is
/// reported as `isOk: false` with a readable reason. Storage failures are
/// returned as `Err` so the caller can answer with a server error.
pub async fn update_operation_category(
    ctx: &ApiContext,
    request: UpdateCategoryRequest,
) -> Result<UpdateCategoryResponse, ApiError> {
    match assign_category(ctx, request.operation_id(), request.category_id()).await {
        Ok(()) => Ok(UpdateCategoryResponse::ok()),
        Err(err) if matches!(err.code, ErrorCode::NotFound) => {
            warn!(
                operation_id = request.op,
                category = request.cat,
                reason = %err.message,
                "category update rejected"
            );
            Ok(UpdateCategoryResponse::rejected(err.message))
        }
        Err(err) => Err(err),
    }
}

async fn assign_category(
    ctx: &ApiContext,
    operation_id: OperationId,
    category_id: Option<CategoryId>,
) -> Result<(), ApiError> {
    ctx.storage
        .get_operation(operation_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::NotFound,
                format!("Opération [{operation_id}] inexistante."),
            )
        })?;

    if let Some(category_id) = category_id {
        ctx.storage
            .get_category(category_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                ApiError::new(
                    ErrorCode::NotFound,
                    format!("Catégorie [{category_id}] inexistante."),
                )
            })?;
    }

    let updated = ctx
        .storage
        .set_operation_category(operation_id, category_id)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("Opération [{operation_id}] inexistante."),
        ));
    }

    info!(
        operation_id = operation_id.0,
        category_id = category_id.map(|id| id.0),
        "operation category updated"
    );
    Ok(())
}

pub async fn list_categories(ctx: &ApiContext) -> Result<Vec<CategorySummary>, ApiError> {
    let categories = ctx.storage.list_categories().await.map_err(internal)?;
    Ok(categories.into_iter().map(Into::into).collect())
}

pub async fn add_category(ctx: &ApiContext, name: &str) -> Result<CategorySummary, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "category name cannot be empty",
        ));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_CHARS {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("category name exceeds {MAX_CATEGORY_NAME_CHARS} characters"),
        ));
    }

    if let Some(existing) = ctx
        .storage
        .find_category_by_name(name)
        .await
        .map_err(internal)?
    {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("category '{name}' already exists [{}]", existing.category_id),
        ));
    }

    let category_id = ctx.storage.create_category(name).await.map_err(internal)?;
    info!(category_id = category_id.0, name, "category added");
    Ok(CategorySummary {
        category_id,
        name: name.to_string(),
    })
}

pub async fn list_operations(ctx: &ApiContext) -> Result<Vec<OperationSummary>, ApiError> {
    let operations = ctx.storage.list_operations().await.map_err(internal)?;
    Ok(operations.into_iter().map(Into::into).collect())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
