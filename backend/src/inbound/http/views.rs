//! Minimal server-rendered pages.
//!
//! Presentation is deliberately bare: enough HTML for every route to have a
//! render target, with flash notices and the signed-in user threaded through
//! a shared layout. All interpolated content is escaped.

use crate::domain::{Identity, Listing, Review, User};

use super::session::{FlashKind, FlashMessage};

/// Escape text for safe interpolation into HTML.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn flash_block(flash: &[FlashMessage]) -> String {
    flash
        .iter()
        .map(|notice| {
            let class = match notice.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error => "flash-error",
            };
            format!("<p class=\"{class}\">{}</p>\n", escape(&notice.text))
        })
        .collect()
}

fn nav(identity: Option<&Identity>) -> String {
    match identity {
        Some(identity) => format!(
            "<nav><a href=\"/campgrounds\">Campgrounds</a> <span>{}</span> \
             <a href=\"/logout\">Log out</a></nav>",
            escape(identity.username().as_ref())
        ),
        None => "<nav><a href=\"/campgrounds\">Campgrounds</a> \
                 <a href=\"/login\">Log in</a> <a href=\"/register\">Register</a></nav>"
            .to_owned(),
    }
}

/// Shared page chrome.
pub fn layout(
    title: &str,
    identity: Option<&Identity>,
    flash: &[FlashMessage],
    body: &str,
) -> String {
    format!(
        "<!doctype html>\n<html><head><title>{title} | Basecamp</title></head>\n<body>\n{nav}\n{flash}\n{body}\n</body></html>\n",
        title = escape(title),
        nav = nav(identity),
        flash = flash_block(flash),
        body = body,
    )
}

/// Landing page.
pub fn home(identity: Option<&Identity>, flash: &[FlashMessage]) -> String {
    layout(
        "Welcome",
        identity,
        flash,
        "<h1>Basecamp</h1><p><a href=\"/campgrounds\">Browse campgrounds</a></p>",
    )
}

/// Campground index.
pub fn listing_index(
    identity: Option<&Identity>,
    flash: &[FlashMessage],
    listings: &[Listing],
) -> String {
    let mut items = String::new();
    for listing in listings {
        items.push_str(&format!(
            "<li><a href=\"/campgrounds/{id}\">{title}</a> - {location}</li>\n",
            id = listing.id(),
            title = escape(listing.details().title.as_ref()),
            location = escape(&listing.details().location),
        ));
    }
    let body = format!(
        "<h1>All Campgrounds</h1>\n<p><a href=\"/campgrounds/new\">New campground</a></p>\n<ul>\n{items}</ul>"
    );
    layout("Campgrounds", identity, flash, &body)
}

/// Campground detail page with its reviews and their authors.
pub fn listing_detail(
    identity: Option<&Identity>,
    flash: &[FlashMessage],
    listing: &Listing,
    author: Option<&User>,
    reviews: &[(Review, Option<User>)],
) -> String {
    let mut images = String::new();
    for handle in listing.images() {
        images.push_str(&format!(
            "<img src=\"{url}\" alt=\"{filename}\">\n",
            url = escape(&handle.url),
            filename = escape(&handle.filename),
        ));
    }

    let author_name = author
        .map(|user| escape(user.username().as_ref()))
        .unwrap_or_else(|| "unknown".to_owned());

    let is_owner = identity.is_some_and(|acting| acting.id() == listing.author());
    let owner_controls = if is_owner {
        format!(
            "<p><a href=\"/campgrounds/{id}/edit\">Edit</a></p>\n\
             <form method=\"post\" action=\"/campgrounds/{id}/delete\"><button>Delete</button></form>\n",
            id = listing.id()
        )
    } else {
        String::new()
    };

    let mut review_items = String::new();
    for (review, reviewer) in reviews {
        let reviewer_name = reviewer
            .as_ref()
            .map(|user| escape(user.username().as_ref()))
            .unwrap_or_else(|| "unknown".to_owned());
        let delete_control = if identity.is_some_and(|acting| acting.id() == review.author()) {
            format!(
                " <form method=\"post\" action=\"/campgrounds/{listing_id}/reviews/{review_id}/delete\"><button>Delete</button></form>",
                listing_id = listing.id(),
                review_id = review.id(),
            )
        } else {
            String::new()
        };
        review_items.push_str(&format!(
            "<li>{rating}/5 - {body} <em>by {reviewer_name}</em>{delete_control}</li>\n",
            rating = review.rating(),
            body = escape(review.body().as_ref()),
        ));
    }

    let review_form = if identity.is_some() {
        format!(
            "<form method=\"post\" action=\"/campgrounds/{id}/reviews\">\n\
             <textarea name=\"body\"></textarea>\n\
             <input name=\"rating\" type=\"number\" min=\"1\" max=\"5\">\n\
             <button>Add review</button>\n</form>\n",
            id = listing.id()
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h1>{title}</h1>\n{images}<p>{location} - ${price} / night</p>\n<p>{description}</p>\n\
         <p>Listed by {author_name}</p>\n{owner_controls}\
         <h2>Reviews</h2>\n<ul>\n{review_items}</ul>\n{review_form}",
        title = escape(listing.details().title.as_ref()),
        location = escape(&listing.details().location),
        price = listing.details().price,
        description = escape(&listing.details().description),
    );
    layout(listing.details().title.as_ref(), identity, flash, &body)
}

fn listing_fields(listing: Option<&Listing>) -> String {
    let (title, price, description, location) = match listing {
        Some(listing) => (
            escape(listing.details().title.as_ref()),
            listing.details().price.to_string(),
            escape(&listing.details().description),
            escape(&listing.details().location),
        ),
        None => Default::default(),
    };
    format!(
        "<label>Title <input name=\"title\" value=\"{title}\"></label>\n\
         <label>Price <input name=\"price\" value=\"{price}\"></label>\n\
         <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
         <label>Location <input name=\"location\" value=\"{location}\"></label>\n\
         <label>Images <input name=\"image\" type=\"file\" multiple></label>\n"
    )
}

/// Creation form.
pub fn listing_new(identity: Option<&Identity>, flash: &[FlashMessage]) -> String {
    let body = format!(
        "<h1>New Campground</h1>\n\
         <form method=\"post\" action=\"/campgrounds\" enctype=\"multipart/form-data\">\n{fields}\
         <button>Create</button>\n</form>",
        fields = listing_fields(None)
    );
    layout("New Campground", identity, flash, &body)
}

/// Edit form, including per-image delete checkboxes.
pub fn listing_edit(
    identity: Option<&Identity>,
    flash: &[FlashMessage],
    listing: &Listing,
) -> String {
    let mut deletions = String::new();
    for handle in listing.images().iter().skip(1) {
        deletions.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"delete_image\" value=\"{filename}\"> remove {filename}</label>\n",
            filename = escape(&handle.filename)
        ));
    }
    let body = format!(
        "<h1>Edit Campground</h1>\n\
         <form method=\"post\" action=\"/campgrounds/{id}/edit\" enctype=\"multipart/form-data\">\n{fields}{deletions}\
         <button>Update</button>\n</form>",
        id = listing.id(),
        fields = listing_fields(Some(listing)),
    );
    layout("Edit Campground", identity, flash, &body)
}

/// Registration form.
pub fn register(identity: Option<&Identity>, flash: &[FlashMessage]) -> String {
    layout(
        "Register",
        identity,
        flash,
        "<h1>Register</h1>\n<form method=\"post\" action=\"/register\">\n\
         <label>Email <input name=\"email\" type=\"email\"></label>\n\
         <label>Username <input name=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\"></label>\n\
         <button>Register</button>\n</form>",
    )
}

/// Login form.
pub fn login(identity: Option<&Identity>, flash: &[FlashMessage]) -> String {
    layout(
        "Log in",
        identity,
        flash,
        "<h1>Log in</h1>\n<form method=\"post\" action=\"/login\">\n\
         <label>Username <input name=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\"></label>\n\
         <button>Log in</button>\n</form>",
    )
}

/// Generic failure page used by the centralized error mapping.
pub fn error_page(status: u16, message: &str) -> String {
    layout(
        "Something went wrong",
        None,
        &[],
        &format!("<h1>{status}</h1>\n<p>{}</p>", escape(message)),
    )
}
