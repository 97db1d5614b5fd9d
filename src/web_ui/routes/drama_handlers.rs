//! Drama CRUD route handlers.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::Response,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tera::Context;

use super::utils::{
    format_relative_time, non_empty, now_timestamp, parse_owner, redirect_flash,
    render_template, StatusQuery,
};
use crate::db::entities::{drama, user};
use crate::error::{AppError, Result};
use crate::intensity::{emoji_for, parse_intensity};
use crate::state::AppState;

/// Drama form data (create and edit)
#[derive(serde::Deserialize)]
pub struct DramaForm {
    pub title: String,
    pub description: String,
    pub intensity: Option<String>,
    pub user_id: Option<String>,
}

/// Validated and normalized drama fields; `None` when a required
/// field is missing.
pub(crate) struct NewDrama {
    pub title: String,
    pub description: String,
    pub intensity: i32,
    pub user_id: Option<i32>,
}

impl NewDrama {
    pub(crate) fn from_form(form: &DramaForm) -> Option<Self> {
        Some(Self {
            title: non_empty(&form.title)?,
            description: non_empty(&form.description)?,
            intensity: parse_intensity(form.intensity.as_deref().unwrap_or("")),
            user_id: parse_owner(form.user_id.as_deref().unwrap_or("")),
        })
    }
}

/// Query params for the drama list
#[derive(serde::Deserialize, Default)]
pub struct DramasListQuery {
    pub q: Option<String>,
    pub user_id: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

/// Drama row for templates
#[derive(serde::Serialize)]
struct DramaInfo {
    id: i32,
    title: String,
    description: String,
    intensity: i32,
    emoji: &'static str,
    user_id: Option<i32>,
    author: Option<String>,
    created: String,
}

/// Owner option for the filter/owner selectors
#[derive(serde::Serialize)]
struct OwnerOption {
    id: i32,
    nickname: String,
}

/// Case-insensitive substring search over title or description, plus an
/// optional exact owner filter. Newest dramas first.
pub(crate) async fn search_dramas(
    db: &DatabaseConnection,
    q: Option<&str>,
    owner: Option<i32>,
) -> std::result::Result<Vec<(drama::Model, Option<user::Model>)>, DbErr> {
    let mut query = drama::Entity::find().find_also_related(user::Entity);
    if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(drama::Column::Title.contains(q))
                .add(drama::Column::Description.contains(q)),
        );
    }
    if let Some(owner) = owner {
        query = query.filter(drama::Column::UserId.eq(owner));
    }
    query
        .order_by_desc(drama::Column::CreatedAt)
        .all(db)
        .await
}

/// All users ordered by nickname, for the owner selector.
async fn owner_options(
    db: &DatabaseConnection,
) -> std::result::Result<Vec<OwnerOption>, DbErr> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Nickname)
        .all(db)
        .await?;
    Ok(users
        .into_iter()
        .map(|u| OwnerOption {
            id: u.id,
            nickname: u.nickname,
        })
        .collect())
}

pub(crate) async fn insert_drama(
    db: &DatabaseConnection,
    new: NewDrama,
) -> std::result::Result<drama::Model, DbErr> {
    let txn = db.begin().await?;
    let inserted = drama::ActiveModel {
        title: Set(new.title),
        description: Set(new.description),
        intensity: Set(new.intensity),
        user_id: Set(new.user_id),
        created_at: Set(now_timestamp()),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    match inserted {
        Ok(created) => {
            txn.commit().await?;
            Ok(created)
        }
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

pub(crate) async fn update_drama(
    db: &DatabaseConnection,
    existing: drama::Model,
    new: NewDrama,
) -> std::result::Result<(), DbErr> {
    let txn = db.begin().await?;
    let mut active: drama::ActiveModel = existing.into();
    active.title = Set(new.title);
    active.description = Set(new.description);
    active.intensity = Set(new.intensity);
    active.user_id = Set(new.user_id);

    match active.update(&txn).await {
        Ok(_) => txn.commit().await,
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

pub(crate) async fn delete_drama(
    db: &DatabaseConnection,
    id: i32,
) -> std::result::Result<(), DbErr> {
    let txn = db.begin().await?;
    match drama::Entity::delete_by_id(id).exec(&txn).await {
        Ok(_) => txn.commit().await,
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

async fn load_drama(db: &DatabaseConnection, id: i32) -> Result<drama::Model> {
    drama::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Drama {} não encontrado", id)))
}

fn drama_info(d: drama::Model, author: Option<user::Model>) -> DramaInfo {
    DramaInfo {
        id: d.id,
        title: d.title,
        description: d.description,
        intensity: d.intensity,
        emoji: emoji_for(d.intensity),
        user_id: d.user_id,
        author: author.map(|u| u.nickname),
        created: format_relative_time(d.created_at),
    }
}

/// List/search/filter dramas (GET)
pub async fn dramas_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DramasListQuery>,
) -> Result<Response> {
    let owner = parse_owner(query.user_id.as_deref().unwrap_or(""));
    let dramas = search_dramas(&state.db, query.q.as_deref(), owner).await?;

    let dramas: Vec<DramaInfo> = dramas
        .into_iter()
        .map(|(d, author)| drama_info(d, author))
        .collect();

    let mut context = Context::new();
    context.insert("dramas", &dramas);
    context.insert("users", &owner_options(&state.db).await?);
    context.insert("q", &query.q.unwrap_or_default());
    context.insert("uid", &owner);
    if let Some(success) = &query.success {
        context.insert("success", success);
    }
    if let Some(warning) = &query.warning {
        context.insert("warning", warning);
    }
    if let Some(error) = &query.error {
        context.insert("error", error);
    }
    if let Some(info) = &query.info {
        context.insert("info", info);
    }

    Ok(render_template("dramas_list.html", &context))
}

/// New drama form (GET)
pub async fn dramas_new_page(
    State(state): State<Arc<AppState>>,
    Query(status): Query<StatusQuery>,
) -> Result<Response> {
    let mut context = Context::new();
    context.insert("users", &owner_options(&state.db).await?);
    status.apply(&mut context);

    Ok(render_template("drama_new.html", &context))
}

/// Create drama (POST)
pub async fn dramas_create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DramaForm>,
) -> Result<Response> {
    let Some(new) = NewDrama::from_form(&form) else {
        return Ok(redirect_flash(
            "/dramas/novo",
            "warning",
            "Drama e descrição são obrigatórios.",
        ));
    };

    match insert_drama(&state.db, new).await {
        Ok(_) => Ok(redirect_flash("/dramas", "success", "Drama registrado 👌")),
        Err(e) => {
            tracing::error!("Failed to create drama: {:?}", e);
            Ok(redirect_flash("/dramas/novo", "error", "Erro ao registrar drama."))
        }
    }
}

/// Edit drama form (GET)
pub async fn dramas_edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(status): Query<StatusQuery>,
) -> Result<Response> {
    let existing = load_drama(&state.db, id).await?;

    let mut context = Context::new();
    context.insert("d", &drama_info(existing, None));
    context.insert("users", &owner_options(&state.db).await?);
    status.apply(&mut context);

    Ok(render_template("drama_edit.html", &context))
}

/// Update drama (POST)
pub async fn dramas_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<DramaForm>,
) -> Result<Response> {
    let existing = load_drama(&state.db, id).await?;

    let edit_path = format!("/dramas/{}/editar", id);
    let Some(new) = NewDrama::from_form(&form) else {
        return Ok(redirect_flash(
            &edit_path,
            "warning",
            "Drama e descrição são obrigatórios.",
        ));
    };

    match update_drama(&state.db, existing, new).await {
        Ok(()) => Ok(redirect_flash("/dramas", "success", "Drama atualizado!")),
        Err(e) => {
            tracing::error!("Failed to update drama {}: {:?}", id, e);
            Ok(redirect_flash(&edit_path, "error", "Erro ao atualizar drama."))
        }
    }
}

/// Delete drama (POST)
pub async fn dramas_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    load_drama(&state.db, id).await?;

    match delete_drama(&state.db, id).await {
        Ok(()) => Ok(redirect_flash("/dramas", "info", "Drama excluído.")),
        Err(e) => {
            tracing::error!("Failed to delete drama {}: {:?}", id, e);
            Ok(redirect_flash("/dramas", "error", "Erro ao excluir drama."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::user_handlers::{insert_user, NewUser, UserForm};
    use sea_orm::PaginatorTrait;

    fn form(title: &str, description: &str, intensity: &str, user_id: &str) -> DramaForm {
        DramaForm {
            title: title.to_string(),
            description: description.to_string(),
            intensity: Some(intensity.to_string()),
            user_id: Some(user_id.to_string()),
        }
    }

    async fn add_user(db: &DatabaseConnection, name: &str, nickname: &str) -> user::Model {
        let new = NewUser::from_form(&UserForm {
            name: name.to_string(),
            nickname: nickname.to_string(),
        })
        .unwrap();
        insert_user(db, new).await.unwrap()
    }

    #[test]
    fn form_rejects_missing_title_or_description() {
        assert!(NewDrama::from_form(&form("", "algo aconteceu", "5", "")).is_none());
        assert!(NewDrama::from_form(&form("Café derramado", "  ", "5", "")).is_none());
    }

    #[test]
    fn form_normalizes_intensity_and_owner() {
        let new = NewDrama::from_form(&form("Café derramado", "no teclado", "15", "")).unwrap();
        assert_eq!(new.intensity, 10);
        assert_eq!(new.user_id, None);

        let new = NewDrama::from_form(&form("t", "d", "abc", "3")).unwrap();
        assert_eq!(new.intensity, 0);
        assert_eq!(new.user_id, Some(3));

        // Missing intensity field defaults to 0
        let no_intensity = DramaForm {
            title: "t".to_string(),
            description: "d".to_string(),
            intensity: None,
            user_id: None,
        };
        assert_eq!(NewDrama::from_form(&no_intensity).unwrap().intensity, 0);
    }

    #[tokio::test]
    async fn invalid_form_persists_nothing() {
        let db = crate::db::test_database().await;

        // Same gate the create handler applies before touching the database
        if let Some(new) = NewDrama::from_form(&form("", "", "5", "")) {
            insert_drama(&db, new).await.unwrap();
        }

        assert_eq!(drama::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stored_intensity_is_always_clamped() {
        let db = crate::db::test_database().await;

        let stored = insert_drama(
            &db,
            NewDrama::from_form(&form("Café derramado", "...", "15", "")).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(stored.intensity, 10);

        let stored = insert_drama(
            &db,
            NewDrama::from_form(&form("Outro", "...", "abc", "")).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(stored.intensity, 0);
    }

    #[tokio::test]
    async fn search_filters_by_text_and_owner() {
        let db = crate::db::test_database().await;
        let ana = add_user(&db, "Ana", "ana").await;
        let bruno = add_user(&db, "Bruno", "bru").await;

        insert_drama(
            &db,
            NewDrama::from_form(&form("Café derramado", "no teclado", "7", &ana.id.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
        insert_drama(
            &db,
            NewDrama::from_form(&form("Wi-Fi caiu", "bem na reunião", "9", &bruno.id.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
        insert_drama(
            &db,
            NewDrama::from_form(&form("Sem café", "a máquina quebrou", "4", "")).unwrap(),
        )
        .await
        .unwrap();

        // Substring over title or description, case-insensitive
        let hits = search_dramas(&db, Some("CAF"), None).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = search_dramas(&db, Some("reunião"), None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.title, "Wi-Fi caiu");

        // Exact owner filter
        let hits = search_dramas(&db, None, Some(ana.id)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.title, "Café derramado");
        assert_eq!(hits[0].1.as_ref().map(|u| u.nickname.as_str()), Some("ana"));
    }

    #[tokio::test]
    async fn edit_can_clear_the_owner() {
        let db = crate::db::test_database().await;
        let ana = add_user(&db, "Ana", "ana").await;

        let existing = insert_drama(
            &db,
            NewDrama::from_form(&form("Café derramado", "...", "5", &ana.id.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

        update_drama(
            &db,
            existing.clone(),
            NewDrama::from_form(&form("Café derramado", "...", "5", "")).unwrap(),
        )
        .await
        .unwrap();

        let reloaded = drama::Entity::find_by_id(existing.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.user_id, None);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target_drama() {
        let db = crate::db::test_database().await;
        let first = insert_drama(
            &db,
            NewDrama::from_form(&form("Primeiro", "...", "1", "")).unwrap(),
        )
        .await
        .unwrap();
        insert_drama(
            &db,
            NewDrama::from_form(&form("Segundo", "...", "2", "")).unwrap(),
        )
        .await
        .unwrap();

        delete_drama(&db, first.id).await.unwrap();

        let remaining = drama::Entity::find().all(&db).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Segundo");
    }
}
