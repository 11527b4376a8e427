use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::categories_model::{Category, CategoryUpdate, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        debug!("Creating category '{}' for user {}", new_category.name, user_id);
        self.repository.create(user_id, new_category).await
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        category_update: CategoryUpdate,
    ) -> Result<Category> {
        category_update.validate()?;
        self.repository
            .update(user_id, category_id, category_update)
            .await
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_many(user_id, vec![category_id.to_string()])
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    async fn delete_categories(&self, user_id: &str, category_ids: Vec<String>) -> Result<usize> {
        if category_ids.is_empty() {
            return Err(Error::invalid("No categories selected"));
        }
        self.repository.delete_many(user_id, category_ids).await
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.repository
            .get_by_id(user_id, category_id)?
            .ok_or_else(|| Error::NotFound("Category not found".to_string()))
    }

    fn list_categories(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Category>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repository.list(user_id, search)
    }
}
