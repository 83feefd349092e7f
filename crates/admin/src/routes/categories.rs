//! Category management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::rows::{CategoryPayload, CategoryRow};
use luxe_backend::tables::CategoryRepository;
use luxe_core::CategoryId;
use luxe_core::forms::CategoryForm;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminPage, Flash};
use crate::state::AppState;

/// Category card grid.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub page: AdminPage,
    pub categories: Vec<CategoryRow>,
}

/// Create / edit form.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub page: AdminPage,
    pub form: CategoryForm,
    pub category_id: Option<CategoryId>,
}

fn form_from_category(category: &CategoryRow) -> CategoryForm {
    CategoryForm {
        name: category.name.clone(),
        slug: Some(category.slug.clone()),
        description: category.description.clone(),
        image_url: category.image_url.clone(),
        is_active: category.is_active.then(|| "on".to_string()),
    }
}

fn form_error(
    mut page: AdminPage,
    form: CategoryForm,
    category_id: Option<CategoryId>,
    status: StatusCode,
    message: String,
) -> Response {
    page.flash = Some(Flash::error(message));
    (
        status,
        CategoryFormTemplate {
            page,
            form,
            category_id,
        },
    )
        .into_response()
}

/// GET /categories
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> Result<CategoriesIndexTemplate> {
    let categories = CategoryRepository::new(state.backend(), Some(admin.token()))
        .list_all()
        .await?;
    Ok(CategoriesIndexTemplate { page, categories })
}

/// GET /categories/new
pub async fn new_category(RequireAdminAuth(_admin): RequireAdminAuth, page: AdminPage) -> CategoryFormTemplate {
    CategoryFormTemplate {
        page,
        form: CategoryForm {
            is_active: Some("on".to_string()),
            ..CategoryForm::default()
        },
        category_id: None,
    }
}

/// POST /categories
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Form(form): Form<CategoryForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(page, form, None, StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match CategoryRepository::new(state.backend(), Some(admin.token()))
        .create(&CategoryPayload::from(draft))
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Category created successfully").set(&session).await;
            Redirect::to("/categories").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create category: {e}");
            form_error(
                page,
                form,
                None,
                StatusCode::BAD_GATEWAY,
                format!("Failed to create category: {}", e.user_message()),
            )
        }
    }
}

/// GET /categories/{id}/edit
#[instrument(skip(state, admin, page))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
    Path(id): Path<CategoryId>,
) -> Result<CategoryFormTemplate> {
    let category = CategoryRepository::new(state.backend(), Some(admin.token()))
        .get(id)
        .await?;
    Ok(CategoryFormTemplate {
        page,
        form: form_from_category(&category),
        category_id: Some(id),
    })
}

/// POST /categories/{id}
#[instrument(skip(state, admin, session, page, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(page, form, Some(id), StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match CategoryRepository::new(state.backend(), Some(admin.token()))
        .update(id, &CategoryPayload::from(draft))
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Category updated successfully").set(&session).await;
            Redirect::to("/categories").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to update category: {e}");
            form_error(
                page,
                form,
                Some(id),
                StatusCode::BAD_GATEWAY,
                format!("Failed to update category: {}", e.user_message()),
            )
        }
    }
}

/// Delete a category. Its products stay, uncategorized.
///
/// POST /categories/{id}/delete
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Redirect {
    match CategoryRepository::new(state.backend(), Some(admin.token()))
        .delete(id)
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Category deleted").set(&session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to delete category: {e}");
            Flash::error(format!("Failed to delete category: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/categories")
}
