//! User CRUD route handlers.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::Response,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tera::Context;

use super::utils::{
    format_relative_time, non_empty, now_timestamp, redirect_flash, render_template, StatusQuery,
};
use crate::db::entities::{drama, user};
use crate::error::{is_unique_violation, AppError, Result};
use crate::state::AppState;

/// User form data (create and edit)
#[derive(serde::Deserialize)]
pub struct UserForm {
    pub name: String,
    pub nickname: String,
}

/// Validated user fields; `None` when a required field is missing.
pub(crate) struct NewUser {
    pub name: String,
    pub nickname: String,
}

impl NewUser {
    pub(crate) fn from_form(form: &UserForm) -> Option<Self> {
        Some(Self {
            name: non_empty(&form.name)?,
            nickname: non_empty(&form.nickname)?,
        })
    }
}

/// Query params for the user list
#[derive(serde::Deserialize, Default)]
pub struct UsersListQuery {
    pub q: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

/// User row for templates
#[derive(serde::Serialize)]
struct UserInfo {
    id: i32,
    name: String,
    nickname: String,
    created: String,
}

/// Case-insensitive substring search over name or nickname,
/// newest users first.
pub(crate) async fn search_users(
    db: &DatabaseConnection,
    q: Option<&str>,
) -> std::result::Result<Vec<user::Model>, DbErr> {
    let mut query = user::Entity::find();
    if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(user::Column::Name.contains(q))
                .add(user::Column::Nickname.contains(q)),
        );
    }
    query.order_by_desc(user::Column::CreatedAt).all(db).await
}

pub(crate) async fn insert_user(
    db: &DatabaseConnection,
    new: NewUser,
) -> std::result::Result<user::Model, DbErr> {
    let txn = db.begin().await?;
    let inserted = user::ActiveModel {
        name: Set(new.name),
        nickname: Set(new.nickname),
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

pub(crate) async fn update_user(
    db: &DatabaseConnection,
    existing: user::Model,
    new: NewUser,
) -> std::result::Result<(), DbErr> {
    let txn = db.begin().await?;
    let mut active: user::ActiveModel = existing.into();
    active.name = Set(new.name);
    active.nickname = Set(new.nickname);

    match active.update(&txn).await {
        Ok(_) => txn.commit().await,
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

/// Delete a user, orphaning their dramas rather than deleting them.
/// Both statements run in one transaction.
pub(crate) async fn delete_user(
    db: &DatabaseConnection,
    id: i32,
) -> std::result::Result<(), DbErr> {
    let txn = db.begin().await?;

    let result = async {
        drama::Entity::update_many()
            .col_expr(drama::Column::UserId, Expr::value(Option::<i32>::None))
            .filter(drama::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;
        Ok::<(), DbErr>(())
    }
    .await;

    match result {
        Ok(()) => txn.commit().await,
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

async fn load_user(db: &DatabaseConnection, id: i32) -> Result<user::Model> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Usuário {} não encontrado", id)))
}

/// List/search users (GET)
pub async fn users_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersListQuery>,
) -> Result<Response> {
    let users = search_users(&state.db, query.q.as_deref()).await?;

    let users: Vec<UserInfo> = users
        .into_iter()
        .map(|u| UserInfo {
            id: u.id,
            name: u.name,
            nickname: u.nickname,
            created: format_relative_time(u.created_at),
        })
        .collect();

    let mut context = Context::new();
    context.insert("users", &users);
    context.insert("q", &query.q.unwrap_or_default());
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

    Ok(render_template("users_list.html", &context))
}

/// New user form (GET)
pub async fn users_new_page(Query(status): Query<StatusQuery>) -> Response {
    let mut context = Context::new();
    status.apply(&mut context);
    render_template("user_new.html", &context)
}

/// Create user (POST)
pub async fn users_create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let Some(new) = NewUser::from_form(&form) else {
        return Ok(redirect_flash(
            "/usuarios/novo",
            "warning",
            "Nome e Apelido são obrigatórios.",
        ));
    };

    match insert_user(&state.db, new).await {
        Ok(_) => Ok(redirect_flash(
            "/usuarios",
            "success",
            "Usuário criado com sucesso!",
        )),
        Err(e) if is_unique_violation(&e) => Ok(redirect_flash(
            "/usuarios/novo",
            "error",
            "Erro ao criar usuário. Verifique se o apelido é único.",
        )),
        Err(e) => {
            tracing::error!("Failed to create user: {:?}", e);
            Ok(redirect_flash(
                "/usuarios/novo",
                "error",
                "Erro ao criar usuário.",
            ))
        }
    }
}

/// Edit user form (GET)
pub async fn users_edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(status): Query<StatusQuery>,
) -> Result<Response> {
    let existing = load_user(&state.db, id).await?;

    let mut context = Context::new();
    context.insert(
        "u",
        &UserInfo {
            id: existing.id,
            name: existing.name,
            nickname: existing.nickname,
            created: format_relative_time(existing.created_at),
        },
    );
    status.apply(&mut context);

    Ok(render_template("user_edit.html", &context))
}

/// Update user (POST)
pub async fn users_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let existing = load_user(&state.db, id).await?;

    let edit_path = format!("/usuarios/{}/editar", id);
    let Some(new) = NewUser::from_form(&form) else {
        return Ok(redirect_flash(
            &edit_path,
            "warning",
            "Nome e Apelido são obrigatórios.",
        ));
    };

    match update_user(&state.db, existing, new).await {
        Ok(()) => Ok(redirect_flash(
            "/usuarios",
            "success",
            "Usuário atualizado!",
        )),
        Err(e) if is_unique_violation(&e) => Ok(redirect_flash(
            &edit_path,
            "error",
            "Erro ao atualizar usuário. Verifique se o apelido é único.",
        )),
        Err(e) => {
            tracing::error!("Failed to update user {}: {:?}", id, e);
            Ok(redirect_flash(&edit_path, "error", "Erro ao atualizar usuário."))
        }
    }
}

/// Delete user (POST)
pub async fn users_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response> {
    load_user(&state.db, id).await?;

    match delete_user(&state.db, id).await {
        Ok(()) => Ok(redirect_flash("/usuarios", "info", "Usuário excluído.")),
        Err(e) => {
            tracing::error!("Failed to delete user {}: {:?}", id, e);
            Ok(redirect_flash("/usuarios", "error", "Erro ao excluir usuário."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::PaginatorTrait;

    fn new_user(name: &str, nickname: &str) -> NewUser {
        NewUser::from_form(&UserForm {
            name: name.to_string(),
            nickname: nickname.to_string(),
        })
        .expect("valid user form")
    }

    #[test]
    fn form_rejects_blank_required_fields() {
        let missing_name = UserForm {
            name: "   ".to_string(),
            nickname: "ana".to_string(),
        };
        assert!(NewUser::from_form(&missing_name).is_none());

        let missing_nickname = UserForm {
            name: "Ana Silva".to_string(),
            nickname: "".to_string(),
        };
        assert!(NewUser::from_form(&missing_nickname).is_none());
    }

    #[test]
    fn form_trims_fields() {
        let new = NewUser::from_form(&UserForm {
            name: "  Ana Silva ".to_string(),
            nickname: " ana ".to_string(),
        })
        .unwrap();
        assert_eq!(new.name, "Ana Silva");
        assert_eq!(new.nickname, "ana");
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected_and_count_unchanged() {
        let db = crate::db::test_database().await;

        insert_user(&db, new_user("Ana Silva", "ana")).await.unwrap();

        let err = insert_user(&db, new_user("Outra Ana", "ana"))
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));

        let count = user::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn search_matches_name_or_nickname_case_insensitively() {
        let db = crate::db::test_database().await;
        insert_user(&db, new_user("Ana Silva", "aninha")).await.unwrap();
        insert_user(&db, new_user("Bruno Costa", "bru")).await.unwrap();
        insert_user(&db, new_user("Carla", "silvinha")).await.unwrap();

        let hits = search_users(&db, Some("SILV")).await.unwrap();
        let nicknames: Vec<_> = hits.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(nicknames.len(), 2);
        assert!(nicknames.contains(&"aninha")); // matched by name
        assert!(nicknames.contains(&"silvinha")); // matched by nickname

        let all = search_users(&db, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn deleting_user_orphans_their_dramas() {
        let db = crate::db::test_database().await;
        let owner = insert_user(&db, new_user("Ana Silva", "ana")).await.unwrap();

        for title in ["Café derramado", "Wi-Fi caiu"] {
            drama::ActiveModel {
                title: Set(title.to_string()),
                description: Set("...".to_string()),
                intensity: Set(5),
                user_id: Set(Some(owner.id)),
                created_at: Set(now_timestamp()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }

        delete_user(&db, owner.id).await.unwrap();

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
        let dramas = drama::Entity::find().all(&db).await.unwrap();
        assert_eq!(dramas.len(), 2);
        assert!(dramas.iter().all(|d| d.user_id.is_none()));
    }

    #[tokio::test]
    async fn edit_can_change_name_keeping_nickname() {
        let db = crate::db::test_database().await;
        let existing = insert_user(&db, new_user("Ana", "ana")).await.unwrap();

        update_user(&db, existing.clone(), new_user("Ana Silva", "ana"))
            .await
            .unwrap();

        let reloaded = user::Entity::find_by_id(existing.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.name, "Ana Silva");
        assert_eq!(reloaded.nickname, "ana");
    }
}
