use rust_decimal::Decimal;
use sea_orm::*;

use crate::auth::{ROLE_ADMIN, ROLE_USER};
use crate::domain::{
    AdditionalServiceInput, AdditionalServiceRepository, CategoryInput, CategoryRepository,
    DomainError, ReviewRepository, TourInput, TourPricingInput, TourRepository, TourReviewInput,
    TourServiceRef,
};
use crate::infrastructure::{
    SeaOrmAdditionalServiceRepository, SeaOrmCategoryRepository, SeaOrmReviewRepository,
    SeaOrmTourRepository,
};
use crate::models::{tour, user};
use crate::services::user_service::{self, NewUser};

async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> Result<(), DomainError> {
    let exists = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    user_service::create_user(
        db,
        NewUser {
            email: email.to_owned(),
            password: password.to_owned(),
            full_name: full_name.to_owned(),
            phone_number: None,
        },
        role,
    )
    .await?;
    Ok(())
}

fn strings(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

fn tier(customer_type: &str, price: Decimal, round_trip: bool) -> TourPricingInput {
    TourPricingInput {
        customer_type: customer_type.to_owned(),
        price,
        round_trip,
    }
}

/// Demo accounts and a small catalog. Safe to run repeatedly.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    // 1. Accounts
    seed_user(db, "admin@meetup.travel", "admin123", "Meetup Admin", ROLE_ADMIN).await?;
    seed_user(db, "user@meetup.travel", "user123", "Demo Traveller", ROLE_USER).await?;

    // 2. Catalog, only into an empty database
    if tour::Entity::find().count(db).await? > 0 {
        tracing::info!("Tours already present, skipping catalog seed");
        return Ok(());
    }

    let categories = SeaOrmCategoryRepository::new(db.clone());
    for (name, description) in [
        ("Day Trip", "Back the same evening"),
        ("Adventure", "Trekking, caves and kayaking"),
        ("Culture", "Villages, temples and food"),
    ] {
        categories
            .create(CategoryInput {
                name: name.to_owned(),
                description: Some(description.to_owned()),
            })
            .await?;
    }

    let services = SeaOrmAdditionalServiceRepository::new(db.clone());
    let transfer = services
        .create(AdditionalServiceInput {
            name: "Airport Transfer".to_owned(),
            description: Some("Private car from Noi Bai airport".to_owned()),
            price: Decimal::new(2500, 2),
            price_unit: Some("per car".to_owned()),
        })
        .await?;

    let tours = SeaOrmTourRepository::new(db.clone());
    let ha_long = tours
        .create(TourInput {
            title: "Ha Long Bay Cruise".to_owned(),
            description: Some("Limestone karsts, caves and kayaking on the bay".to_owned()),
            schedule_description: Some("08:00 pickup, 12:30 lunch on board, 18:00 return".to_owned()),
            price: Decimal::new(5900, 2),
            duration: Some(1),
            min_pax: Some(1),
            max_pax: Some(20),
            rating: Some(4.7),
            featured: true,
            highlights: strings(&["Sung Sot cave", "Kayaking at Luon cave"]),
            included_services: strings(&["Lunch", "Entrance fees", "English speaking guide"]),
            excluded_services: strings(&["Drinks", "Tips"]),
            pickup_points: strings(&["Hanoi Old Quarter", "Opera House"]),
            available_guides: strings(&["English", "French"]),
            categories: strings(&["Day Trip", "Adventure"]),
            additional_services: Some(vec![
                TourServiceRef {
                    id: Some(transfer.id),
                    ..Default::default()
                },
                TourServiceRef {
                    name: Some("Travel Insurance".to_owned()),
                    price: Some(Decimal::new(500, 2)),
                    price_unit: Some("per person".to_owned()),
                    ..Default::default()
                },
            ]),
            pricing_options: Some(vec![
                tier("Adult", Decimal::new(5900, 2), false),
                tier("Child", Decimal::new(3900, 2), false),
                tier("Adult", Decimal::new(6900, 2), true),
            ]),
            ..Default::default()
        })
        .await?;

    tours
        .create(TourInput {
            title: "Ninh Binh Countryside".to_owned(),
            description: Some("Boat ride through rice fields and Bai Dinh pagoda".to_owned()),
            price: Decimal::new(4500, 2),
            duration: Some(1),
            rating: Some(4.5),
            highlights: strings(&["Trang An boat ride", "Mua cave viewpoint"]),
            pickup_points: strings(&["Hanoi Old Quarter"]),
            categories: strings(&["Day Trip", "Culture"]),
            pricing_options: Some(vec![
                tier("Adult", Decimal::new(4500, 2), false),
                tier("Child", Decimal::new(3000, 2), false),
            ]),
            ..Default::default()
        })
        .await?;

    SeaOrmReviewRepository::new(db.clone())
        .create(
            ha_long.id,
            TourReviewInput {
                platform: Some("TripAdvisor".to_owned()),
                rating: 5.0,
                comment: Some("Great guide and delicious seafood lunch".to_owned()),
                reviewer_name: Some("Anna K.".to_owned()),
                review_date: None,
            },
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    #[tokio::test]
    async fn seeding_twice_is_harmless() {
        let db = init_db("sqlite::memory:").await.unwrap();

        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        assert_eq!(tour::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 2);

        let login = user_service::authenticate(&db, "admin@meetup.travel", "admin123")
            .await
            .unwrap();
        assert_eq!(login.role, ROLE_ADMIN);
    }
}
