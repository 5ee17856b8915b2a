//! User lookup and insert tests.

use lightbnb::db::NewUser;
use lightbnb::repository::Repository;
use lightbnb_tests::{create_user, test_repository, unique_token};

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_add_user_then_get_by_email() {
    let repo = test_repository().await;
    let token = unique_token("email");
    let email = format!("{token}@example.com");

    let created = repo
        .add_user(NewUser {
            name: "Kayla Greene".to_string(),
            email: email.clone(),
            password: "secret".to_string(),
        })
        .await
        .expect("Failed to add user");

    let fetched = repo
        .get_user_with_email(&email)
        .await
        .expect("Failed to look up user")
        .expect("User should exist");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Kayla Greene");
    assert_eq!(fetched.email, email);
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_get_user_by_id() {
    let repo = test_repository().await;
    let created = create_user(&repo, "byid").await;

    let fetched = repo
        .get_user_with_id(created.id)
        .await
        .expect("Failed to look up user");
    assert_eq!(fetched, Some(created));
}

#[tokio::test]
#[ignore = "requires LIGHTBNB_TEST_DATABASE_URL"]
async fn test_missing_user_is_none() {
    let repo = test_repository().await;

    let by_email = repo
        .get_user_with_email(&format!("{}@nowhere.invalid", unique_token("missing")))
        .await
        .expect("Lookup should not fail");
    assert!(by_email.is_none());

    let by_id = repo
        .get_user_with_id(i32::MAX)
        .await
        .expect("Lookup should not fail");
    assert!(by_id.is_none());
}
