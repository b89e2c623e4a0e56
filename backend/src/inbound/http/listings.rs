//! Campground listing handlers.
//!
//! `PUT`/`DELETE` are the canonical mutation verbs; each also has a `POST`
//! alias so plain HTML forms can drive it. Guard order on every mutating
//! route: login first, then load-by-id (absence is not-found, never a
//! permission failure), then ownership.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::domain::listing::{ImageHandle, Listing, ListingId};
use crate::domain::review::Review;
use crate::domain::user::User;
use crate::domain::Error;

use super::error::PageResult;
use super::forms::ListingForm;
use super::guards::{self, see_other};
use super::session::SessionContext;
use super::state::HttpState;
use super::views;
use super::{map_media_error, map_store_error};

/// Multipart body shared by the create and update routes.
///
/// Every text field is optional; presence is checked by the form schema so
/// all violations are reported together. `image` repeats once per upload,
/// `delete_image` once per removal checkbox.
#[derive(MultipartForm)]
pub struct ListingUpload {
    pub title: Option<Text<String>>,
    pub price: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub location: Option<Text<String>>,
    #[multipart(rename = "image")]
    pub image: Vec<TempFile>,
    #[multipart(rename = "delete_image")]
    pub delete_image: Vec<Text<String>>,
}

impl ListingUpload {
    fn form(&self) -> ListingForm {
        ListingForm {
            title: self.title.as_ref().map(|t| t.0.clone()),
            price: self.price.as_ref().map(|t| t.0.clone()),
            description: self.description.as_ref().map(|t| t.0.clone()),
            location: self.location.as_ref().map(|t| t.0.clone()),
        }
    }

    fn deleted_filenames(&self) -> Vec<String> {
        self.delete_image.iter().map(|t| t.0.clone()).collect()
    }
}

fn page(html: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(html)
}

/// Keep only characters that survive a URL path segment unescaped.
fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

/// Upload each submitted file to the media store under a unique filename.
async fn upload_images(
    state: &HttpState,
    files: Vec<TempFile>,
) -> Result<Vec<ImageHandle>, Error> {
    let mut handles = Vec::new();
    for file in files {
        if file.size == 0 {
            continue;
        }
        let original = file
            .file_name
            .as_deref()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "upload".to_owned());
        let filename = format!("{}-{original}", Uuid::new_v4().simple());
        let bytes = tokio::fs::read(file.file.path())
            .await
            .map_err(|error| Error::internal(format!("failed to read upload: {error}")))?;
        let handle = state
            .media
            .store(&filename, bytes)
            .await
            .map_err(map_media_error)?;
        handles.push(handle);
    }
    Ok(handles)
}

/// Resolve the authors shown on a detail page.
async fn load_detail(
    state: &HttpState,
    listing: &Listing,
) -> Result<(Option<User>, Vec<(Review, Option<User>)>), Error> {
    let author = state
        .users
        .find_by_id(listing.author())
        .await
        .map_err(map_store_error)?;
    let reviews = state
        .reviews
        .find_many(listing.reviews())
        .await
        .map_err(map_store_error)?;
    let mut detailed = Vec::with_capacity(reviews.len());
    for review in reviews {
        let reviewer = state
            .users
            .find_by_id(review.author())
            .await
            .map_err(map_store_error)?;
        detailed.push((review, reviewer));
    }
    Ok((author, detailed))
}

/// Public index of all campgrounds.
#[get("/campgrounds")]
pub async fn index(session: SessionContext, state: web::Data<HttpState>) -> PageResult {
    let mut listings = state.listings.find_all().await.map_err(map_store_error)?;
    listings.sort_by(|a, b| a.details().title.as_ref().cmp(b.details().title.as_ref()));
    Ok(page(views::listing_index(
        session.identity().as_ref(),
        &session.take_flash(),
        &listings,
    )))
}

/// Creation form.
#[get("/campgrounds/new")]
pub async fn new_form(session: SessionContext, req: HttpRequest) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    Ok(page(views::listing_new(
        Some(&identity),
        &session.take_flash(),
    )))
}

/// Create a campground owned by the signed-in user.
#[post("/campgrounds")]
pub async fn create(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    upload: MultipartForm<ListingUpload>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let upload = upload.into_inner();
    // Schema validation happens before any upload or store mutation.
    let details = upload.form().validate()?;
    let uploaded = upload_images(&state, upload.image).await?;

    let listing = Listing::create(
        details,
        *identity.id(),
        state.cascade.placeholder(),
        uploaded,
    );
    state
        .listings
        .insert(&listing)
        .await
        .map_err(map_store_error)?;

    session.flash_success("Successfully created a new campground!");
    Ok(see_other(&format!("/campgrounds/{}", listing.id())))
}

/// Detail page with authors and reviews populated.
#[get("/campgrounds/{id}")]
pub async fn show(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let Ok(id) = ListingId::parse(path.as_str()) else {
        return Ok(guards::listing_not_found(&session));
    };
    let Some(listing) = state.listings.find_by_id(&id).await.map_err(map_store_error)? else {
        return Ok(guards::listing_not_found(&session));
    };
    let (author, reviews) = load_detail(&state, &listing).await?;
    Ok(page(views::listing_detail(
        Some(&identity),
        &session.take_flash(),
        &listing,
        author.as_ref(),
        &reviews,
    )))
}

/// Edit form, owners only.
#[get("/campgrounds/{id}/edit")]
pub async fn edit_form(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let Ok(id) = ListingId::parse(path.as_str()) else {
        return Ok(guards::listing_not_found(&session));
    };
    let Some(listing) = state.listings.find_by_id(&id).await.map_err(map_store_error)? else {
        return Ok(guards::listing_not_found(&session));
    };
    if let Err(deny) = guards::require_owner(&session, &identity, &listing, &id) {
        return Ok(deny);
    }
    Ok(page(views::listing_edit(
        Some(&identity),
        &session.take_flash(),
        &listing,
    )))
}

async fn apply_update(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    upload: MultipartForm<ListingUpload>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let Ok(id) = ListingId::parse(path.as_str()) else {
        return Ok(guards::listing_not_found(&session));
    };
    let Some(mut listing) = state.listings.find_by_id(&id).await.map_err(map_store_error)?
    else {
        return Ok(guards::listing_not_found(&session));
    };
    if let Err(deny) = guards::require_owner(&session, &identity, &listing, &id) {
        return Ok(deny);
    }

    let upload = upload.into_inner();
    let details = upload.form().validate()?;
    let deleted = upload.deleted_filenames();
    let added = upload_images(&state, upload.image).await?;

    listing.apply_details(details);
    state
        .cascade
        .update_listing_images(&mut listing, added, &deleted)
        .await?;

    session.flash_success("Successfully updated campground!");
    Ok(see_other(&format!("/campgrounds/{id}")))
}

/// Update a campground (canonical verb).
#[put("/campgrounds/{id}")]
pub async fn update(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    upload: MultipartForm<ListingUpload>,
) -> PageResult {
    apply_update(session, state, req, path, upload).await
}

/// Update a campground (HTML form alias).
#[post("/campgrounds/{id}/edit")]
pub async fn update_via_form(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    upload: MultipartForm<ListingUpload>,
) -> PageResult {
    apply_update(session, state, req, path, upload).await
}

async fn apply_destroy(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let Ok(id) = ListingId::parse(path.as_str()) else {
        return Ok(guards::listing_not_found(&session));
    };
    let Some(listing) = state.listings.find_by_id(&id).await.map_err(map_store_error)? else {
        return Ok(guards::listing_not_found(&session));
    };
    if let Err(deny) = guards::require_owner(&session, &identity, &listing, &id) {
        return Ok(deny);
    }

    state.cascade.delete_listing(&id).await?;
    session.flash_success("Successfully deleted campground!");
    Ok(see_other("/campgrounds"))
}

/// Delete a campground and cascade to its dependents (canonical verb).
#[delete("/campgrounds/{id}")]
pub async fn destroy(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> PageResult {
    apply_destroy(session, state, req, path).await
}

/// Delete a campground (HTML form alias).
#[post("/campgrounds/{id}/delete")]
pub async fn destroy_via_form(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> PageResult {
    apply_destroy(session, state, req, path).await
}
