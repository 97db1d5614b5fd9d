//! Dashboard handler: aggregate counts and the recent-dramas feed.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};
use tera::Context;

use super::utils::{format_relative_time, render_template, StatusQuery};
use crate::db::entities::{drama, user};
use crate::error::Result;
use crate::intensity::emoji_for;
use crate::state::AppState;

/// Recent drama row for the dashboard template
#[derive(serde::Serialize)]
struct RecentDrama {
    id: i32,
    title: String,
    intensity: i32,
    emoji: &'static str,
    author: Option<String>,
    created: String,
}

/// Aggregate totals shown on the dashboard. Read-only.
pub(crate) async fn dashboard_totals(
    db: &DatabaseConnection,
) -> std::result::Result<(u64, u64, Option<f64>), DbErr> {
    let total_users = user::Entity::find().count(db).await?;
    let total_dramas = drama::Entity::find().count(db).await?;

    // Average is undefined when there are no dramas
    let avg_intensity = if total_dramas == 0 {
        None
    } else {
        let intensities: Vec<i32> = drama::Entity::find()
            .select_only()
            .column(drama::Column::Intensity)
            .into_tuple()
            .all(db)
            .await?;
        let sum: i64 = intensities.iter().map(|i| *i as i64).sum();
        Some(sum as f64 / intensities.len() as f64)
    };

    Ok((total_users, total_dramas, avg_intensity))
}

/// Dashboard page
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(status): Query<StatusQuery>,
) -> Result<Response> {
    let (total_users, total_dramas, avg_intensity) = dashboard_totals(&state.db).await?;

    let recent = drama::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(drama::Column::CreatedAt)
        .limit(5)
        .all(&state.db)
        .await?;

    let recent: Vec<RecentDrama> = recent
        .into_iter()
        .map(|(d, author)| RecentDrama {
            id: d.id,
            title: d.title,
            intensity: d.intensity,
            emoji: emoji_for(d.intensity),
            author: author.map(|u| u.nickname),
            created: format_relative_time(d.created_at),
        })
        .collect();

    let mut context = Context::new();
    context.insert("total_users", &total_users);
    context.insert("total_dramas", &total_dramas);
    context.insert("avg_intensity", &avg_intensity.map(|a| format!("{:.1}", a)));
    if let Some(avg) = avg_intensity {
        context.insert("avg_emoji", &emoji_for(avg.round() as i32));
    }
    context.insert("recent", &recent);
    status.apply(&mut context);

    Ok(render_template("index.html", &context))
}
