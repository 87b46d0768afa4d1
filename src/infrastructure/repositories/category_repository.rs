//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{Category, CategoryInput, CategoryRepository, DomainError, Page, PageRequest};
use crate::models::category::{ActiveModel, Column, Entity as CategoryEntity, Model};

pub(crate) fn category_from_model(m: Model) -> Category {
    Category {
        id: m.id,
        name: m.name,
        description: m.description,
    }
}

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> Result<(), DomainError> {
        let existing = CategoryEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;

        match existing {
            Some(c) if Some(c.id) != except_id => Err(DomainError::Conflict(format!(
                "Category with name '{}' already exists",
                name
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_page(&self, request: PageRequest) -> Result<Page<Category>, DomainError> {
        let paginator = CategoryEntity::find()
            .order_by_asc(Column::Id)
            .paginate(&self.db, request.size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(request.page).await?;

        Ok(Page::new(
            items.into_iter().map(category_from_model).collect(),
            total,
            request,
        ))
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(category.map(category_from_model))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(category.map(category_from_model))
    }

    async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        self.ensure_name_free(&input.name, None).await?;

        let category = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        };

        let result = category.insert(&self.db).await?;
        tracing::info!("Created category {} ({})", result.name, result.id);
        Ok(category_from_model(result))
    }

    async fn update(&self, id: i32, input: CategoryInput) -> Result<Category, DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))?;

        self.ensure_name_free(&input.name, Some(id)).await?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);

        let result = active.update(&self.db).await?;
        Ok(category_from_model(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Category", id));
        }

        Ok(())
    }
}
