//! Property insert and search tests.

use chrono::NaiveDate;
use lightbnb::RepositoryError;
use lightbnb::repository::Repository;
use lightbnb::search::PropertySearch;
use lightbnb_tests::{
    book_and_review, create_user, sample_property, test_repository, unique_token,
};
use rust_decimal_macros::dec;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, n).expect("valid date")
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_added_property_found_by_owner() {
    let repo = test_repository().await;
    let owner = create_user(&repo, "owner").await;
    let guest = create_user(&repo, "guest").await;

    let created = repo
        .add_property(sample_property(owner.id, "Vancouver", 12_000))
        .await
        .expect("Failed to add property");
    assert_eq!(created.owner_id, owner.id);
    assert_eq!(created.cost_per_night, 12_000);

    book_and_review(&repo, &created, guest.id, day(1), 5).await;

    let rows = repo
        .get_all_properties(&PropertySearch::new().owner_id(owner.id), 10)
        .await
        .expect("Search failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property, created);
    assert_eq!(rows[0].average_rating, Some(dec!(5)));
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_unreviewed_property_not_returned() {
    let repo = test_repository().await;
    let owner = create_user(&repo, "quiet").await;
    repo.add_property(sample_property(owner.id, "Quietville", 5_000))
        .await
        .expect("Failed to add property");

    let rows = repo
        .get_all_properties(&PropertySearch::new().owner_id(owner.id), 10)
        .await
        .expect("Search failed");
    assert!(rows.is_empty());
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_city_price_and_rating_filters() {
    let repo = test_repository().await;
    let owner = create_user(&repo, "filters").await;
    let guest = create_user(&repo, "filters_guest").await;
    let city = unique_token("Vantown");

    let cheap = repo
        .add_property(sample_property(owner.id, &city, 4_000))
        .await
        .expect("Failed to add property");
    let mid = repo
        .add_property(sample_property(owner.id, &format!("North {city}"), 9_000))
        .await
        .expect("Failed to add property");
    let pricey = repo
        .add_property(sample_property(owner.id, &city, 30_000))
        .await
        .expect("Failed to add property");

    book_and_review(&repo, &cheap, guest.id, day(1), 5).await;
    book_and_review(&repo, &mid, guest.id, day(5), 3).await;
    book_and_review(&repo, &mid, guest.id, day(9), 4).await;
    book_and_review(&repo, &pricey, guest.id, day(13), 2).await;

    let by_city = repo
        .get_all_properties(&PropertySearch::new().city(city.to_lowercase()), 10)
        .await
        .expect("Search failed");
    let ids: Vec<i32> = by_city.iter().map(|row| row.property.id).collect();
    assert_eq!(ids, vec![cheap.id, mid.id, pricey.id]);

    let by_price = repo
        .get_all_properties(
            &PropertySearch::new()
                .owner_id(owner.id)
                .minimum_price_per_night(50)
                .maximum_price_per_night(150),
            10,
        )
        .await
        .expect("Search failed");
    assert_eq!(by_price.len(), 1);
    assert_eq!(by_price[0].property.id, mid.id);
    assert_eq!(by_price[0].average_rating, Some(dec!(3.5)));

    let by_rating = repo
        .get_all_properties(
            &PropertySearch::new()
                .owner_id(owner.id)
                .minimum_rating(dec!(4)),
            10,
        )
        .await
        .expect("Search failed");
    assert_eq!(by_rating.len(), 1);
    assert_eq!(by_rating[0].property.id, cheap.id);
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_search_limit() {
    let repo = test_repository().await;
    let owner = create_user(&repo, "limit").await;
    let guest = create_user(&repo, "limit_guest").await;
    for cost in [1_000, 2_000, 3_000] {
        let property = repo
            .add_property(sample_property(owner.id, "Limitburg", cost))
            .await
            .expect("Failed to add property");
        book_and_review(&repo, &property, guest.id, day(2), 4).await;
    }

    let rows = repo
        .get_all_properties(&PropertySearch::new().owner_id(owner.id), 2)
        .await
        .expect("Search failed");
    assert_eq!(rows.len(), 2);
    assert!(rows[0].property.cost_per_night <= rows[1].property.cost_per_night);
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_add_property_unknown_owner_fails() {
    let repo = test_repository().await;

    let err = repo
        .add_property(sample_property(i32::MAX, "Nowhere", 100))
        .await
        .expect_err("Foreign key should reject unknown owner");
    assert!(matches!(err, RepositoryError::Database(_)));
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_city_wildcard_characters_are_literal() {
    let repo = test_repository().await;
    let owner = create_user(&repo, "literal").await;
    let guest = create_user(&repo, "literal_guest").await;

    let plain = repo
        .add_property(sample_property(owner.id, "Victoria", 8_000))
        .await
        .expect("Failed to add property");
    let underscored = repo
        .add_property(sample_property(owner.id, "Port_Alberni", 9_000))
        .await
        .expect("Failed to add property");
    book_and_review(&repo, &plain, guest.id, day(20), 4).await;
    book_and_review(&repo, &underscored, guest.id, day(24), 4).await;

    let rows = repo
        .get_all_properties(&PropertySearch::new().owner_id(owner.id).city("_"), 10)
        .await
        .expect("Search failed");
    let ids: Vec<i32> = rows.iter().map(|row| row.property.id).collect();
    assert_eq!(ids, vec![underscored.id]);

    let rows = repo
        .get_all_properties(&PropertySearch::new().owner_id(owner.id).city("%"), 10)
        .await
        .expect("Search failed");
    assert!(rows.is_empty());
}
