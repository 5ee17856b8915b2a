//! Database schema types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Email address, used as the login key.
    pub email: String,
    /// Opaque credential hash.
    pub password: String,
}

/// Fields required to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Opaque credential hash.
    pub password: String,
}

/// Rental property listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Property {
    /// Unique identifier.
    pub id: i32,
    /// Owning user.
    pub owner_id: i32,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Small photo shown in result lists.
    pub thumbnail_photo_url: String,
    /// Large header photo.
    pub cover_photo_url: String,
    /// Price per night in cents.
    pub cost_per_night: i32,
    /// Street address.
    pub street: String,
    /// City name.
    pub city: String,
    /// Province or state.
    pub province: String,
    /// Postal code.
    pub post_code: String,
    /// Country name.
    pub country: String,
    /// Number of parking spaces.
    pub parking_spaces: i32,
    /// Number of bathrooms.
    pub number_of_bathrooms: i32,
    /// Number of bedrooms.
    pub number_of_bedrooms: i32,
}

impl Property {
    /// Nightly price in whole currency units, truncated the same way the
    /// store's integer division truncates `cost_per_night / 100`.
    #[must_use]
    pub fn nightly_price(&self) -> i32 {
        self.cost_per_night / 100
    }
}

/// Fields required to list a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    /// Owning user.
    pub owner_id: i32,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Small photo shown in result lists.
    pub thumbnail_photo_url: String,
    /// Large header photo.
    pub cover_photo_url: String,
    /// Price per night in cents.
    pub cost_per_night: i32,
    /// Street address.
    pub street: String,
    /// City name.
    pub city: String,
    /// Province or state.
    pub province: String,
    /// Postal code.
    pub post_code: String,
    /// Country name.
    pub country: String,
    /// Number of parking spaces.
    pub parking_spaces: i32,
    /// Number of bathrooms.
    pub number_of_bathrooms: i32,
    /// Number of bedrooms.
    pub number_of_bedrooms: i32,
}

impl NewProperty {
    /// Materializes the insert with the identifier the store assigned.
    #[must_use]
    pub fn into_property(self, id: i32) -> Property {
        Property {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            thumbnail_photo_url: self.thumbnail_photo_url,
            cover_photo_url: self.cover_photo_url,
            cost_per_night: self.cost_per_night,
            street: self.street,
            city: self.city,
            province: self.province,
            post_code: self.post_code,
            country: self.country,
            parking_spaces: self.parking_spaces,
            number_of_bathrooms: self.number_of_bathrooms,
            number_of_bedrooms: self.number_of_bedrooms,
        }
    }
}

/// Property search result: the property plus its mean review rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    /// The listed property.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// Mean of all review ratings for the property.
    pub average_rating: Option<Decimal>,
}

/// Booking of a property by a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique identifier.
    pub id: i32,
    /// First night.
    pub start_date: NaiveDate,
    /// Checkout day.
    pub end_date: NaiveDate,
    /// Booked property.
    pub property_id: i32,
    /// Guest who booked.
    pub guest_id: i32,
}

/// A guest's reservation joined with the reserved property and its rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GuestReservation {
    /// The reserved property.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// Reservation identifier.
    pub reservation_id: i32,
    /// First night.
    pub start_date: NaiveDate,
    /// Checkout day.
    pub end_date: NaiveDate,
    /// Guest who booked.
    pub guest_id: i32,
    /// Mean of all review ratings for the property.
    pub average_rating: Option<Decimal>,
}

/// Guest review of a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertyReview {
    /// Unique identifier.
    pub id: i32,
    /// Reviewing guest.
    pub guest_id: i32,
    /// Reviewed property.
    pub property_id: i32,
    /// Stay being reviewed.
    pub reservation_id: i32,
    /// Score, conventionally 1 to 5.
    pub rating: i16,
    /// Optional review text.
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_property() -> NewProperty {
        NewProperty {
            owner_id: 3,
            title: "Speed lamp".to_string(),
            description: "description".to_string(),
            thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
            cover_photo_url: "https://example.com/cover.jpg".to_string(),
            cost_per_night: 93_061,
            street: "536 Namsub Highway".to_string(),
            city: "Sotboske".to_string(),
            province: "Quebec".to_string(),
            post_code: "28142".to_string(),
            country: "Canada".to_string(),
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
        }
    }

    #[test]
    fn test_nightly_price_truncates() {
        let property = sample_new_property().into_property(1);
        assert_eq!(property.nightly_price(), 930);

        let cheap = NewProperty {
            cost_per_night: 199,
            ..sample_new_property()
        }
        .into_property(2);
        assert_eq!(cheap.nightly_price(), 1);
    }

    #[test]
    fn test_into_property_keeps_fields() {
        let property = sample_new_property().into_property(7);
        assert_eq!(property.id, 7);
        assert_eq!(property.owner_id, 3);
        assert_eq!(property.city, "Sotboske");
        assert_eq!(property.number_of_bedrooms, 8);
    }

    #[test]
    fn test_listing_serializes_flat() {
        let listing = PropertyListing {
            property: sample_new_property().into_property(1),
            average_rating: Some(Decimal::new(45, 1)),
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["city"], "Sotboske");
        assert!(json.get("property").is_none());
        assert!(json.get("average_rating").is_some());
    }
}
