//! Homepage banner route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::rows::{BannerPayload, BannerRow};
use luxe_backend::tables::BannerRepository;
use luxe_core::BannerId;
use luxe_core::forms::BannerForm;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminPage, Flash};
use crate::state::AppState;

/// Banner list, in display order.
#[derive(Template, WebTemplate)]
#[template(path = "banners/index.html")]
pub struct BannersIndexTemplate {
    pub page: AdminPage,
    pub banners: Vec<BannerRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "banners/form.html")]
pub struct BannerFormTemplate {
    pub page: AdminPage,
    pub form: BannerForm,
    pub banner_id: Option<BannerId>,
}

fn form_from_banner(banner: &BannerRow) -> BannerForm {
    BannerForm {
        title: banner.title.clone(),
        subtitle: banner.subtitle.clone(),
        image_url: banner.image_url.clone(),
        link_url: banner.link_url.clone(),
        is_active: banner.is_active.then(|| "on".to_string()),
        display_order: Some(banner.display_order.to_string()),
    }
}

fn form_error(
    mut page: AdminPage,
    form: BannerForm,
    banner_id: Option<BannerId>,
    status: StatusCode,
    message: String,
) -> Response {
    page.flash = Some(Flash::error(message));
    (
        status,
        BannerFormTemplate {
            page,
            form,
            banner_id,
        },
    )
        .into_response()
}

/// GET /banners
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> Result<BannersIndexTemplate> {
    let banners = BannerRepository::new(state.backend(), Some(admin.token()))
        .list_all()
        .await?;
    Ok(BannersIndexTemplate { page, banners })
}

/// GET /banners/new
pub async fn new_banner(RequireAdminAuth(_admin): RequireAdminAuth, page: AdminPage) -> BannerFormTemplate {
    BannerFormTemplate {
        page,
        form: BannerForm {
            is_active: Some("on".to_string()),
            display_order: Some("0".to_string()),
            ..BannerForm::default()
        },
        banner_id: None,
    }
}

/// POST /banners
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Form(form): Form<BannerForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(page, form, None, StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match BannerRepository::new(state.backend(), Some(admin.token()))
        .create(&BannerPayload::from(draft))
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Banner created successfully").set(&session).await;
            Redirect::to("/banners").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create banner: {e}");
            form_error(
                page,
                form,
                None,
                StatusCode::BAD_GATEWAY,
                format!("Failed to create banner: {}", e.user_message()),
            )
        }
    }
}

/// GET /banners/{id}/edit
#[instrument(skip(state, admin, page))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
    Path(id): Path<BannerId>,
) -> Result<BannerFormTemplate> {
    let banner = BannerRepository::new(state.backend(), Some(admin.token()))
        .get(id)
        .await?;
    Ok(BannerFormTemplate {
        page,
        form: form_from_banner(&banner),
        banner_id: Some(id),
    })
}

/// POST /banners/{id}
#[instrument(skip(state, admin, session, page, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Path(id): Path<BannerId>,
    Form(form): Form<BannerForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(page, form, Some(id), StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match BannerRepository::new(state.backend(), Some(admin.token()))
        .update(id, &BannerPayload::from(draft))
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Banner updated successfully").set(&session).await;
            Redirect::to("/banners").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to update banner: {e}");
            form_error(
                page,
                form,
                Some(id),
                StatusCode::BAD_GATEWAY,
                format!("Failed to update banner: {}", e.user_message()),
            )
        }
    }
}

/// POST /banners/{id}/delete
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<BannerId>,
) -> Redirect {
    match BannerRepository::new(state.backend(), Some(admin.token()))
        .delete(id)
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Banner deleted").set(&session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to delete banner: {e}");
            Flash::error(format!("Failed to delete banner: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/banners")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn banner() -> BannerRow {
        BannerRow {
            id: BannerId::new(Uuid::from_u128(3)),
            title: "Autumn Collection".to_string(),
            subtitle: Some("Layers for the season".to_string()),
            image_url: "https://cdn.luxe.test/autumn.jpg".to_string(),
            link_url: Some("/products".to_string()),
            is_active: false,
            display_order: 2,
            created_at: None,
        }
    }

    #[test]
    fn test_banner_rows_show_order_and_state() {
        let html = BannersIndexTemplate {
            page: AdminPage::new("Ada", "/banners", None),
            banners: vec![banner()],
        }
        .render()
        .unwrap();
        assert!(html.contains("Manage homepage hero banners"));
        assert!(html.contains("Autumn Collection"));
        assert!(html.contains("Order: 2"));
        assert!(html.contains("Inactive"));
    }

    #[test]
    fn test_empty_banners() {
        let html = BannersIndexTemplate {
            page: AdminPage::new("Ada", "/banners", None),
            banners: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("No banners yet"));
    }

    #[test]
    fn test_prefilled_form_keeps_display_order() {
        let form = form_from_banner(&banner());
        assert_eq!(form.display_order.as_deref(), Some("2"));
        assert!(form.is_active.is_none());

        let draft = form.parse().unwrap();
        assert_eq!(draft.display_order, 2);
        assert_eq!(draft.link_url.as_deref(), Some("/products"));
    }

    #[test]
    fn test_validation_error_is_flashed_on_form() {
        let html = BannerFormTemplate {
            page: AdminPage::new("Ada", "/banners", Some(Flash::error("image_url: is required"))),
            form: BannerForm {
                title: "Spring".to_string(),
                ..BannerForm::default()
            },
            banner_id: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("Add New Banner"));
        assert!(html.contains("image_url: is required"));
        assert!(html.contains("value=\"Spring\""));
    }
}
