use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::models::{
    AboutPage, ContactForm, ContactFormPage, ContactPage, HomePage, MessageResponse,
    SubscribeForm,
};
use crate::routes;
use crate::state::AppState;
use crate::store::ProductSort;
use axum::{extract::State, http::StatusCode, Json};

/// GET / handler - Store landing page
#[utoipa::path(
    get,
    path = routes::STORE_HOME,
    responses(
        (status = 200, description = "Home page", body = HomePage)
    ),
    tag = "pages"
)]
pub async fn home(State(state): State<AppState>) -> Json<HomePage> {
    let featured_products = state
        .store
        .list_products(None, ProductSort::Newest)
        .into_iter()
        .take(state.config.featured_product_count)
        .collect();

    Json(HomePage {
        store_name: state.config.store_name.clone(),
        categories: state.store.categories(),
        featured_products,
    })
}

/// GET /about/ handler
#[utoipa::path(
    get,
    path = routes::ABOUT,
    responses(
        (status = 200, description = "About page", body = AboutPage)
    ),
    tag = "pages"
)]
pub async fn about(State(state): State<AppState>) -> Json<AboutPage> {
    Json(AboutPage {
        store_name: state.config.store_name.clone(),
        description: format!(
            "{} sells outdoor footwear, clothing, accessories and books.",
            state.config.store_name
        ),
    })
}

/// GET /contact/ handler - Store contact details
#[utoipa::path(
    get,
    path = routes::CONTACT,
    responses(
        (status = 200, description = "Contact details", body = ContactPage)
    ),
    tag = "pages"
)]
pub async fn contact(State(state): State<AppState>) -> Json<ContactPage> {
    Json(ContactPage {
        store_name: state.config.store_name.clone(),
        email: state.config.contact_email.clone(),
        phone: state.config.contact_phone.clone(),
    })
}

/// GET /contact_us/ handler - Contact form description
#[utoipa::path(
    get,
    path = routes::CONTACT_US,
    responses(
        (status = 200, description = "Contact form fields", body = ContactFormPage)
    ),
    tag = "pages"
)]
pub async fn contact_us_form() -> Json<ContactFormPage> {
    Json(ContactFormPage {
        fields: ["name", "email", "subject", "message"]
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// POST /contact_us/ handler - Submit a contact message
#[utoipa::path(
    post,
    path = routes::CONTACT_US,
    request_body = ContactForm,
    responses(
        (status = 201, description = "Message received", body = MessageResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn contact_us_submit(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state
        .store
        .add_contact_message(form.name, form.email, form.subject, form.message);

    tracing::info!("Stored contact message with id: {}", message.id);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Thanks for reaching out, we will get back to you soon.".to_string(),
        }),
    ))
}

/// POST /subscribe/ handler - Newsletter sign-up
#[utoipa::path(
    post,
    path = routes::SUBSCRIBE,
    request_body = SubscribeForm,
    responses(
        (status = 201, description = "Subscribed", body = MessageResponse),
        (status = 200, description = "Already subscribed", body = MessageResponse),
        (status = 400, description = "Invalid email", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<SubscribeForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if state.store.subscribe(&form.email) {
        tracing::info!("New newsletter subscriber");
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Subscribed to the newsletter.".to_string(),
            }),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "Already subscribed.".to_string(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, post, setup_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_home_lists_categories_and_featured_products() {
        let (app, _) = setup_test_app();

        let response = get(&app, "/", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["store_name"], "Storefront");
        assert_eq!(response.body["categories"].as_array().unwrap().len(), 4);
        assert_eq!(response.body["featured_products"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_about_and_contact_pages() {
        let (app, _) = setup_test_app();

        let about = get(&app, "/about/", None).await;
        assert_eq!(about.status, StatusCode::OK);
        assert!(about.body["description"].as_str().unwrap().contains("Storefront"));

        let contact = get(&app, "/contact/", None).await;
        assert_eq!(contact.status, StatusCode::OK);
        assert_eq!(contact.body["email"], "support@example.com");
    }

    #[tokio::test]
    async fn test_contact_us_stores_message() {
        let (app, state) = setup_test_app();

        let form = get(&app, "/contact_us/", None).await;
        assert_eq!(form.status, StatusCode::OK);
        assert_eq!(form.body["fields"][0], "name");

        let response = post(
            &app,
            "/contact_us/",
            None,
            Some(json!({
                "name": "Dana",
                "email": "dana@example.com",
                "subject": "Sizing",
                "message": "Do the trail runners fit narrow?"
            })),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
        let messages = state.store.contact_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "Sizing");
    }

    #[tokio::test]
    async fn test_contact_us_rejects_bad_email() {
        let (app, state) = setup_test_app();

        let response = post(
            &app,
            "/contact_us/",
            None,
            Some(json!({ "name": "Dana", "email": "nope", "message": "hi" })),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.error().contains("Validation failed"));
        assert!(state.store.contact_messages().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_twice() {
        let (app, _) = setup_test_app();
        let body = json!({ "email": "reader@example.com" });

        let first = post(&app, "/subscribe/", None, Some(body.clone())).await;
        assert_eq!(first.status, StatusCode::CREATED);

        let second = post(&app, "/subscribe/", None, Some(body)).await;
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body["message"], "Already subscribed.");
    }
}
