//! SQL renditions of the post listing filters.
//!
//! Both conditions expect `posts` to be LEFT JOINed with `categories` and
//! `locations` (see [`joined_posts`]).

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition, EntityTrait, JoinType, QuerySelect, RelationTrait, Select};
use uuid::Uuid;

use blogicum_core::ports::{AdminPostFilter, PostScope};

use super::entity::{category, location, post};

/// `posts LEFT JOIN categories LEFT JOIN locations`.
pub fn joined_posts() -> Select<post::Entity> {
    post::Entity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
}

/// Posts an anonymous reader may see at `now`.
pub fn public_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(category::Column::Id.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
        .add(
            Condition::any()
                .add(location::Column::Id.is_null())
                .add(location::Column::IsPublished.eq(true)),
        )
}

/// Posts `viewer` may see at `now`: public ones plus their own.
pub fn visibility_condition(viewer: Option<Uuid>, now: DateTime<Utc>) -> Condition {
    match viewer {
        Some(viewer) => Condition::any()
            .add(public_condition(now))
            .add(post::Column::AuthorId.eq(viewer)),
        None => public_condition(now),
    }
}

pub fn scope_condition(scope: PostScope) -> Condition {
    match scope {
        PostScope::All => Condition::all(),
        PostScope::Category(id) => Condition::all().add(post::Column::CategoryId.eq(id)),
        PostScope::Author(id) => Condition::all().add(post::Column::AuthorId.eq(id)),
    }
}

pub fn admin_condition(filter: &AdminPostFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Title)))).like(pattern),
        );
    }
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    if let Some(location_id) = filter.location_id {
        condition = condition.add(post::Column::LocationId.eq(location_id));
    }
    if let Some(is_published) = filter.is_published {
        condition = condition.add(post::Column::IsPublished.eq(is_published));
    }
    condition
}
