use async_trait::async_trait;

use super::categories_model::{Category, CategoryUpdate, NewCategory};
use crate::errors::Result;

/// Persistence contract for categories, scoped to the owning user.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;

    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        category_update: CategoryUpdate,
    ) -> Result<Category>;

    /// Returns the number of deleted records.
    async fn delete_many(&self, user_id: &str, category_ids: Vec<String>) -> Result<usize>;

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>>;

    /// Lists categories newest first, optionally filtered by a
    /// case-insensitive substring of name or id.
    fn list(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        category_update: CategoryUpdate,
    ) -> Result<Category>;

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()>;

    async fn delete_categories(&self, user_id: &str, category_ids: Vec<String>) -> Result<usize>;

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;

    fn list_categories(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Category>>;
}
