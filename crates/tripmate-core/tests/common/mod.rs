#![allow(dead_code)]

use jiff::civil::{date, Date};
use tempfile::{NamedTempFile, TempDir};
use tripmate_core::{
    params::{PlaceDetails, TripDetails},
    Database, Itinerary, ItineraryBuilder,
};

pub const OWNER: u64 = 1;
pub const STRANGER: u64 = 2;

/// Routes `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helper function to create a temporary database for testing
pub fn create_test_db() -> (NamedTempFile, Database) {
    init_logging();
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Helper function to create a test itinerary
pub async fn create_test_itinerary() -> (TempDir, Itinerary) {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let itinerary = ItineraryBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create itinerary");
    (temp_dir, itinerary)
}

pub fn trip_details(start_date: Date, end_date: Date) -> TripDetails {
    TripDetails {
        region_id: 1,
        title: "Test Trip".to_string(),
        start_date,
        end_date,
    }
}

/// January 1st to 3rd, 2024.
pub fn three_day_trip() -> TripDetails {
    trip_details(date(2024, 1, 1), date(2024, 1, 3))
}

/// A search result for a place in Seoul.
pub fn place_details(external_ref: &str) -> PlaceDetails {
    PlaceDetails {
        name: format!("Place {external_ref}"),
        category: Some("attraction".to_string()),
        address: Some("Jongno-gu, Seoul".to_string()),
        lat: 37.5796,
        lng: 126.977,
        external_ref: external_ref.to_string(),
    }
}
