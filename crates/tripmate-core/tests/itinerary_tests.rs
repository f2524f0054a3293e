mod common;

use common::{
    create_test_itinerary, place_details, three_day_trip, trip_details, OWNER, STRANGER,
};
use jiff::civil::{date, datetime};
use tripmate_core::{
    params::{
        CreateScheduleItem, CreateTripDay, DayRef, ItemDetails, ItemRef, ListScheduleItems,
        ListTripDays, ListTrips, ReorderScheduleItem, ReorderTripDay, UpdateScheduleItem,
    },
    ErrorKind, ListRegions, PageRequest,
};

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_itinerary_workflow() {
    let (_temp_dir, itinerary) = create_test_itinerary().await;

    let trip = itinerary
        .create_trip(OWNER, &three_day_trip())
        .await
        .expect("Failed to create trip");
    assert_eq!(trip.day_count, 3);

    // Insert a day at position 2
    itinerary
        .create_trip_day(
            OWNER,
            &CreateTripDay {
                trip_id: trip.id,
                day_no: Some(2),
                memo: Some("Day trip".to_string()),
            },
        )
        .await
        .expect("Failed to insert day");

    let days = itinerary
        .list_trip_days(
            OWNER,
            &ListTripDays {
                trip_id: trip.id,
                page: PageRequest::default(),
            },
        )
        .await
        .expect("Failed to list days");
    assert_eq!(days.total, 4);
    assert_eq!(
        days.items.iter().map(|d| d.day_no).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(days.items[1].memo.as_deref(), Some("Day trip"));

    // Plan the first day
    let mut items = Vec::new();
    for (hour, memo) in [(9, "Breakfast"), (11, "Castle"), (13, "Lunch"), (15, "Market")] {
        let place = itinerary
            .save_place(&place_details(memo))
            .await
            .expect("Failed to save place");
        let item = itinerary
            .create_schedule_item(
                OWNER,
                &CreateScheduleItem {
                    trip_id: trip.id,
                    day_no: 1,
                    seq_no: None,
                    details: ItemDetails {
                        place_id: Some(place.id),
                        visit_time: Some(datetime(2024, 1, 1, hour, 0, 0, 0)),
                        memo: Some(memo.to_string()),
                    },
                },
            )
            .await
            .expect("Failed to create item");
        items.push(item);
    }
    assert_eq!(
        items.iter().map(|i| i.seq_no).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    // Market first
    let reordered = itinerary
        .reorder_schedule_item(
            OWNER,
            &ReorderScheduleItem {
                trip_id: trip.id,
                day_no: 1,
                item_id: items[3].id,
                new_seq_no: 1,
            },
        )
        .await
        .expect("Failed to reorder item");
    assert_eq!(
        reordered
            .iter()
            .map(|i| i.memo.as_deref().unwrap_or_default())
            .collect::<Vec<_>>(),
        vec!["Market", "Breakfast", "Castle", "Lunch"]
    );

    // Remove the inserted day again
    itinerary
        .delete_trip_day(
            OWNER,
            &DayRef {
                trip_id: trip.id,
                day_no: 2,
            },
        )
        .await
        .expect("Failed to delete day");
    let trip_after = itinerary
        .get_trip(OWNER, trip.id)
        .await
        .expect("Failed to get trip");
    assert_eq!(trip_after.day_count, 3);

    // Move the planned day to the end of the trip
    let days = itinerary
        .reorder_trip_day(
            OWNER,
            &ReorderTripDay {
                trip_id: trip.id,
                old_day_no: 1,
                new_day_no: 3,
            },
        )
        .await
        .expect("Failed to reorder day");
    assert_eq!(days.len(), 3);

    let moved = itinerary
        .list_all_schedule_items(
            OWNER,
            &DayRef {
                trip_id: trip.id,
                day_no: 3,
            },
        )
        .await
        .expect("Failed to list items");
    assert_eq!(moved.len(), 4);
    assert_eq!(moved[1].visit_time, Some(datetime(2024, 1, 3, 9, 0, 0, 0)));
    assert_eq!(
        trip_after.day_date(3),
        moved[1].visit_time.map(|time| time.date())
    );

    // Items now live under day 3
    let item_ref = ItemRef {
        trip_id: trip.id,
        day_no: 3,
        item_id: items[0].id,
    };
    let fetched = itinerary
        .get_schedule_item(OWNER, &item_ref)
        .await
        .expect("Failed to get item");
    assert_eq!(fetched.memo.as_deref(), Some("Breakfast"));
    let place = itinerary
        .get_place(fetched.place_id.expect("Item lost its place"))
        .await
        .expect("Failed to get place");
    assert_eq!(place.external_ref, "Breakfast");

    let updated = itinerary
        .update_schedule_item(
            OWNER,
            &UpdateScheduleItem {
                trip_id: trip.id,
                day_no: 3,
                item_id: items[0].id,
                visit_time: None,
                memo: Some("Late breakfast".to_string()),
            },
        )
        .await
        .expect("Failed to update item");
    assert_eq!(updated.visit_time, Some(datetime(2024, 1, 3, 9, 0, 0, 0)));

    itinerary
        .delete_schedule_item(OWNER, &item_ref)
        .await
        .expect("Failed to delete item");
    let page = itinerary
        .list_schedule_items(
            OWNER,
            &ListScheduleItems {
                trip_id: trip.id,
                day_no: 3,
                page: PageRequest::new(1, 2),
            },
        )
        .await
        .expect("Failed to list items");
    assert_eq!(page.total, 3);
    assert_eq!(page.last_page(), 2);
    assert_eq!(
        page.items.iter().map(|i| i.seq_no).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_distinct_positions() {
    let (_temp_dir, itinerary) = create_test_itinerary().await;
    let trip = itinerary
        .create_trip(OWNER, &trip_details(date(2024, 1, 1), date(2024, 1, 5)))
        .await
        .expect("Failed to create trip");

    let append = CreateTripDay {
        trip_id: trip.id,
        ..Default::default()
    };
    let (first, second) = tokio::join!(
        itinerary.create_trip_day(OWNER, &append),
        itinerary.create_trip_day(OWNER, &append)
    );

    let mut created = vec![
        first.expect("First append failed").day_no,
        second.expect("Second append failed").day_no,
    ];
    created.sort_unstable();
    assert_eq!(created, vec![6, 7]);

    let trip = itinerary
        .get_trip(OWNER, trip.id)
        .await
        .expect("Failed to get trip");
    assert_eq!(trip.day_count, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_item_inserts_stay_dense() {
    let (_temp_dir, itinerary) = create_test_itinerary().await;
    let trip = itinerary
        .create_trip(OWNER, &three_day_trip())
        .await
        .expect("Failed to create trip");

    let trip_id = trip.id;
    let mut handles = Vec::new();
    for n in 0..8_u32 {
        let itinerary = itinerary.clone();
        handles.push(tokio::spawn(async move {
            itinerary
                .create_schedule_item(
                    OWNER,
                    &CreateScheduleItem {
                        trip_id,
                        day_no: 2,
                        seq_no: Some(1),
                        details: ItemDetails {
                            memo: Some(format!("item {n}")),
                            ..Default::default()
                        },
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("Insert task panicked")
            .expect("Failed to insert item");
    }

    let items = itinerary
        .list_all_schedule_items(
            OWNER,
            &DayRef {
                trip_id: trip.id,
                day_no: 2,
            },
        )
        .await
        .expect("Failed to list items");
    assert_eq!(
        items.iter().map(|i| i.seq_no).collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_error_kinds_through_facade() {
    let (_temp_dir, itinerary) = create_test_itinerary().await;
    let trip = itinerary
        .create_trip(OWNER, &three_day_trip())
        .await
        .expect("Failed to create trip");

    let err = itinerary.get_trip(STRANGER, trip.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = itinerary.get_trip(OWNER, trip.id + 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = itinerary
        .get_trip_day(
            OWNER,
            &DayRef {
                trip_id: trip.id,
                day_no: 4,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = itinerary
        .create_trip_day(
            OWNER,
            &CreateTripDay {
                trip_id: trip.id,
                day_no: Some(5),
                memo: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPosition);

    let err = itinerary
        .list_trips(
            OWNER,
            &ListTrips {
                page: PageRequest::new(0, 10),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_catalog_through_facade() {
    let (_temp_dir, itinerary) = create_test_itinerary().await;

    let regions = itinerary
        .list_regions(&ListRegions {
            country_code: "KR".to_string(),
            query: Some("gyeongsang".to_string()),
        })
        .await
        .expect("Failed to search regions");
    assert_eq!(
        regions.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Gyeongsangbuk-do", "Gyeongsangnam-do"]
    );

    let trip = itinerary
        .create_trip(OWNER, &three_day_trip())
        .await
        .expect("Failed to create trip");
    let err = itinerary
        .create_schedule_item(
            OWNER,
            &CreateScheduleItem {
                trip_id: trip.id,
                day_no: 1,
                seq_no: None,
                details: ItemDetails {
                    place_id: Some(31337),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = itinerary.get_place(31337).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let mut bad = place_details("kakao:9");
    bad.lat = 120.0;
    let err = itinerary.save_place(&bad).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
