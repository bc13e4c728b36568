use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::cloud_accounts::dtos::CreateCloudAccountDto;
use crate::features::cloud_accounts::models::{CloudAccount, NewCloudAccount};
use crate::modules::storage::Storage;

pub struct CloudAccountService {
    storage: Arc<dyn Storage>,
}

impl CloudAccountService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<CloudAccount>> {
        self.storage.list_cloud_accounts().await
    }

    /// Create an account. An existing `(name, provider)` pair is rejected.
    pub async fn create(&self, dto: CreateCloudAccountDto) -> Result<CloudAccount> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name must not be blank".to_string()));
        }

        self.storage
            .create_cloud_account(NewCloudAccount {
                name,
                provider: dto.provider,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    use super::*;
    use crate::features::cloud_accounts::models::CloudProvider;
    use crate::modules::storage::MemoryStorage;

    fn service() -> CloudAccountService {
        CloudAccountService::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let service = service();
        let name: String = CompanyName().fake();

        let account = service
            .create(CreateCloudAccountDto {
                name: format!("  {}  ", name),
                provider: CloudProvider::Azure,
            })
            .await
            .unwrap();

        assert_eq!(account.name, name);
        assert_eq!(service.list().await.unwrap(), vec![account]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let err = service()
            .create(CreateCloudAccountDto {
                name: "   ".to_string(),
                provider: CloudProvider::Aws,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
