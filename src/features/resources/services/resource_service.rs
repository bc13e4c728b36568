use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::resources::models::{Resource, ResourceType};
use crate::modules::storage::Storage;

/// Read side of discovered resources
pub struct ResourceService {
    storage: Arc<dyn Storage>,
}

impl ResourceService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// List resources of an account in discovery order.
    ///
    /// An unknown account yields an empty list.
    pub async fn list_by_account(
        &self,
        cloud_account_id: i32,
        resource_type: Option<&str>,
    ) -> Result<Vec<Resource>> {
        let resource_type = resource_type
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.trim().parse::<ResourceType>())
            .transpose()
            .map_err(AppError::Validation)?;

        self.storage
            .list_resources(cloud_account_id, resource_type)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::features::resources::models::NewResource;
    use crate::modules::storage::MemoryStorage;

    async fn seeded() -> ResourceService {
        let storage = Arc::new(MemoryStorage::new());
        let resource = |resource_type, id: &str| NewResource {
            resource_id: id.to_string(),
            name: id.to_string(),
            resource_type,
            region: "eastus".to_string(),
            state: "running".to_string(),
            cloud_account_id: 7,
            metadata: Map::new(),
        };
        storage
            .create_resources(vec![
                resource(ResourceType::Vm, "vm-1"),
                resource(ResourceType::Database, "db-1"),
            ])
            .await
            .unwrap();
        ResourceService::new(storage)
    }

    #[tokio::test]
    async fn test_type_filter_is_case_insensitive() {
        let service = seeded().await;
        let dbs = service.list_by_account(7, Some("database")).await.unwrap();
        assert_eq!(dbs.len(), 1);
        assert_eq!(dbs[0].resource_id, "db-1");

        assert_eq!(service.list_by_account(7, Some("")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_type_is_rejected() {
        let service = seeded().await;
        let err = service.list_by_account(7, Some("S3")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_account_is_empty() {
        let service = seeded().await;
        assert!(service.list_by_account(99, None).await.unwrap().is_empty());
    }
}
