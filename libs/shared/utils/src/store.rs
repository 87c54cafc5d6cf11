use shared_database::error::StoreError;
use shared_models::error::AppError;

/// Re-map store transport failures to the user-visible taxonomy. Duplicate
/// keys surface as `Conflict` so unique-index violations read like the
/// pre-check rejection would.
pub fn map_store_error(e: StoreError) -> AppError {
    match e {
        StoreError::Conflict(_) => {
            AppError::Conflict("A record with these unique values already exists".to_string())
        }
        StoreError::NotFound(msg) => AppError::NotFound(msg),
        StoreError::Auth(msg) => AppError::ExternalService(msg),
        StoreError::Payload(msg) => AppError::Database(msg),
        StoreError::Unavailable(msg) => AppError::Database(msg),
    }
}
