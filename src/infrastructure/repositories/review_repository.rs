//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::values::{date_to_db, now, parse_date};
use crate::domain::{DomainError, ReviewRepository, TourReview, TourReviewInput};
use crate::models::tour::Entity as TourEntity;
use crate::models::tour_review::{ActiveModel, Column, Entity as ReviewEntity, Model};

pub(crate) fn review_from_model(m: Model) -> Result<TourReview, DomainError> {
    Ok(TourReview {
        id: m.id,
        tour_id: m.tour_id,
        platform: m.platform,
        rating: m.rating,
        comment: m.comment,
        reviewer_name: m.reviewer_name,
        review_date: parse_date(&m.review_date)?,
    })
}

fn check_rating(rating: f32) -> Result<(), DomainError> {
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Rating must be between 0 and 5, got {}",
            rating
        )))
    }
}

/// SeaORM-based implementation of ReviewRepository
pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<TourReview>, DomainError> {
        ReviewEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .order_by_desc(Column::ReviewDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(review_from_model)
            .collect()
    }

    async fn find_by_tour_and_platform(
        &self,
        tour_id: i32,
        platform: &str,
    ) -> Result<Vec<TourReview>, DomainError> {
        ReviewEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .filter(Column::Platform.eq(platform))
            .order_by_desc(Column::ReviewDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(review_from_model)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TourReview>, DomainError> {
        ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(review_from_model)
            .transpose()
    }

    async fn count_by_tour(&self, tour_id: i32) -> Result<u64, DomainError> {
        TourEntity::find_by_id(tour_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", tour_id))?;

        let count = ReviewEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, tour_id: i32, input: TourReviewInput) -> Result<TourReview, DomainError> {
        check_rating(input.rating)?;
        TourEntity::find_by_id(tour_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", tour_id))?;

        let review_date = input.review_date.unwrap_or_else(|| now().date());
        let review = ActiveModel {
            tour_id: Set(tour_id),
            platform: Set(input.platform),
            rating: Set(input.rating),
            comment: Set(input.comment),
            reviewer_name: Set(input.reviewer_name),
            review_date: Set(date_to_db(review_date)),
            ..Default::default()
        };

        let result = review.insert(&self.db).await?;
        review_from_model(result)
    }

    async fn update(&self, id: i32, input: TourReviewInput) -> Result<TourReview, DomainError> {
        check_rating(input.rating)?;
        let existing = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("TourReview", id))?;

        let mut active: ActiveModel = existing.into();
        active.platform = Set(input.platform);
        active.rating = Set(input.rating);
        active.comment = Set(input.comment);
        active.reviewer_name = Set(input.reviewer_name);
        if let Some(date) = input.review_date {
            active.review_date = Set(date_to_db(date));
        }

        let result = active.update(&self.db).await?;
        review_from_model(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("TourReview", id));
        }

        Ok(())
    }
}
