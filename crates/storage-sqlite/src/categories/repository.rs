use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use fintrack_core::categories::{Category, CategoryRepositoryTrait, CategoryUpdate, NewCategory};
use fintrack_core::{Error, Result};

use super::model::CategoryDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::financial_categories;
use crate::schema::financial_categories::dsl::*;
use crate::utils::{chunk_for_sqlite, like_pattern, LIKE_ESCAPE};

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn create(&self, owner_id: &str, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        let category_db = CategoryDB::new(owner_id, new_category);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let created = diesel::insert_into(financial_categories::table)
                    .values(&category_db)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(created.into())
            })
            .await
    }

    async fn update(
        &self,
        owner_id: &str,
        category_id: &str,
        category_update: CategoryUpdate,
    ) -> Result<Category> {
        category_update.validate()?;
        let owner_id = owner_id.to_string();
        let category_id = category_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let updated = diesel::update(
                    financial_categories
                        .filter(id.eq(&category_id))
                        .filter(user_id.eq(&owner_id)),
                )
                .set((
                    name.eq(category_update.name.trim()),
                    updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .returning(CategoryDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?;
                updated
                    .map(Category::from)
                    .ok_or_else(|| Error::NotFound("Category not found".to_string()))
            })
            .await
    }

    async fn delete_many(&self, owner_id: &str, category_ids: Vec<String>) -> Result<usize> {
        let owner_id = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&category_ids) {
                    deleted += diesel::delete(
                        financial_categories
                            .filter(user_id.eq(&owner_id))
                            .filter(id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, owner_id: &str, category_id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let category = financial_categories
            .filter(id.eq(category_id))
            .filter(user_id.eq(owner_id))
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(category.map(Category::from))
    }

    fn list(&self, owner_id: &str, search: Option<&str>) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = financial_categories::table
            .filter(user_id.eq(owner_id))
            .into_boxed();

        if let Some(pattern) = like_pattern(search) {
            query = query.filter(
                name.like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(id.like(pattern).escape(LIKE_ESCAPE)),
            );
        }

        let results = query
            .select(CategoryDB::as_select())
            .order((created_at.desc(), id.asc()))
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Category::from).collect())
    }
}
