//! End-to-end behaviour of campground create, update, and delete, including
//! the deletion cascade and image bookkeeping.

#[allow(dead_code)]
mod support;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};

use backend::domain::listing::ListingId;
use backend::domain::ports::{ListingRepository, ReviewRepository, UserRepository};
use backend::domain::user::Username;
use backend::server;

use support::{
    Harness, PLACEHOLDER_URL, create_listing, listing_request, location, register_user,
};

#[actix_web::test]
async fn index_is_public() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/campgrounds").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn created_listing_belongs_to_its_creator_and_leads_with_the_placeholder() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let cookie = register_user(&app, "founder").await;
    let res = test::call_service(
        &app,
        listing_request(
            "/campgrounds",
            &cookie,
            "River Bend",
            &[("image", "view.jpg", b"jpegdata")],
            &[],
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let id_segment = location(&res).rsplit('/').next().expect("id").to_owned();
    let id = ListingId::parse(&id_segment).expect("listing id in redirect");
    let listing = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing stored");

    assert_eq!(listing.details().title.as_ref(), "River Bend");

    let username = Username::new("founder").expect("valid username");
    let creator = harness
        .users
        .find_by_username(&username)
        .await
        .expect("user lookup")
        .expect("creator stored");
    assert_eq!(listing.author(), creator.id());

    let images = listing.images();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].url, PLACEHOLDER_URL);
    assert!(images[1].filename.ends_with("view.jpg"));
}

#[actix_web::test]
async fn invalid_listing_reports_every_violation_and_stores_nothing() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let cookie = register_user(&app, "sloppy").await;
    let body = support::multipart_body(&[("description", "only this")], &[]);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/campgrounds")
            .insert_header((header::COOKIE, cookie))
            .insert_header((
                header::CONTENT_TYPE,
                format!(
                    "multipart/form-data; boundary={}",
                    support::MULTIPART_BOUNDARY
                ),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8 page");
    assert!(html.contains("title"));
    assert!(html.contains("price"));
    assert!(html.contains("location"));

    assert!(
        harness
            .listings
            .find_all()
            .await
            .expect("listing scan")
            .is_empty()
    );
}

#[actix_web::test]
async fn update_changes_fields_but_never_the_author() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let cookie = register_user(&app, "owner").await;
    let id_segment = create_listing(&app, &cookie, "Before").await;
    let id = ListingId::parse(&id_segment).expect("listing id");
    let original_author = *harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing stored")
        .author();

    let res = test::call_service(
        &app,
        listing_request(
            &format!("/campgrounds/{id_segment}/edit"),
            &cookie,
            "After",
            &[],
            &[],
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/campgrounds/{id_segment}"));

    let updated = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing kept");
    assert_eq!(updated.details().title.as_ref(), "After");
    assert_eq!(updated.author(), &original_author);
}

#[actix_web::test]
async fn update_can_add_and_remove_images() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let cookie = register_user(&app, "curator").await;
    let res = test::call_service(
        &app,
        listing_request(
            "/campgrounds",
            &cookie,
            "Gallery",
            &[("image", "old.jpg", b"old")],
            &[],
        ),
    )
    .await;
    let id_segment = location(&res).rsplit('/').next().expect("id").to_owned();
    let id = ListingId::parse(&id_segment).expect("listing id");
    let old_name = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing stored")
        .images()[1]
        .filename
        .to_owned();

    let res = test::call_service(
        &app,
        listing_request(
            &format!("/campgrounds/{id_segment}/edit"),
            &cookie,
            "Gallery",
            &[("image", "new.jpg", b"new")],
            &[("delete_image", old_name.as_str())],
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let updated = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing kept");
    let images = updated.images();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].url, PLACEHOLDER_URL);
    assert!(images[1].filename.ends_with("new.jpg"));
    assert_eq!(harness.media.released(), vec![old_name]);
}

#[actix_web::test]
async fn non_author_cannot_delete_a_listing() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let owner = register_user(&app, "landlord").await;
    let id_segment = create_listing(&app, &owner, "Coveted").await;
    let id = ListingId::parse(&id_segment).expect("listing id");

    let intruder = register_user(&app, "intruder").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/campgrounds/{id_segment}/delete"))
            .insert_header((header::COOKIE, intruder))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/campgrounds/{id_segment}"));

    assert!(
        harness
            .listings
            .find_by_id(&id)
            .await
            .expect("listing lookup")
            .is_some(),
        "the listing must survive a non-author deletion attempt"
    );
}

#[actix_web::test]
async fn author_deletion_cascades_to_reviews_and_images() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let owner = register_user(&app, "host").await;
    let res = test::call_service(
        &app,
        listing_request(
            "/campgrounds",
            &owner,
            "Doomed",
            &[("image", "img1.jpg", b"bits")],
            &[],
        ),
    )
    .await;
    let id_segment = location(&res).rsplit('/').next().expect("id").to_owned();
    let id = ListingId::parse(&id_segment).expect("listing id");

    // Two reviews from another account.
    let reviewer = register_user(&app, "critic").await;
    for body in ["Lovely spot", "Still lovely"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/campgrounds/{id_segment}/reviews"))
                .insert_header((header::COOKIE, reviewer.clone()))
                .set_form([("body", body.to_owned()), ("rating", "5".to_owned())])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    let review_ids = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing stored")
        .reviews()
        .to_vec();
    assert_eq!(review_ids.len(), 2);
    let uploaded_name = harness
        .listings
        .find_by_id(&id)
        .await
        .expect("listing lookup")
        .expect("listing stored")
        .images()[1]
        .filename
        .to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/campgrounds/{id_segment}/delete"))
            .insert_header((header::COOKIE, owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/campgrounds");

    assert!(
        harness
            .listings
            .find_by_id(&id)
            .await
            .expect("listing lookup")
            .is_none()
    );
    for review_id in &review_ids {
        assert!(
            harness
                .reviews
                .find_by_id(review_id)
                .await
                .expect("review lookup")
                .is_none(),
            "every dependent review must be deleted"
        );
    }
    let released = harness.media.released();
    assert_eq!(released, vec!["default".to_owned(), uploaded_name]);
}

#[actix_web::test]
async fn unknown_listing_id_redirects_to_the_index() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(support::test_session_middleware())
            .configure(server::routes),
    )
    .await;

    let cookie = register_user(&app, "browser").await;
    let missing = ListingId::random();
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/campgrounds/{missing}"))
            .insert_header((header::COOKIE, cookie))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/campgrounds");
}
