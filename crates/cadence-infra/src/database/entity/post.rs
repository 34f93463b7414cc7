//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub share_now: Option<bool>,
    pub share_at: Option<DateTimeWithTimeZone>,
    pub share_start_at: Option<DateTimeWithTimeZone>,
    pub share_complete_at: Option<DateTimeWithTimeZone>,
    pub share_on_linkedin: bool,
    pub shared_at_linkedin: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for cadence_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            content: model.content,
            share_now: model.share_now,
            share_at: model.share_at.map(Into::into),
            share_start_at: model.share_start_at.map(Into::into),
            share_complete_at: model.share_complete_at.map(Into::into),
            share_on_linkedin: model.share_on_linkedin,
            shared_at_linkedin: model.shared_at_linkedin.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<cadence_core::domain::Post> for ActiveModel {
    fn from(post: cadence_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            content: Set(post.content),
            share_now: Set(post.share_now),
            share_at: Set(post.share_at.map(Into::into)),
            share_start_at: Set(post.share_start_at.map(Into::into)),
            share_complete_at: Set(post.share_complete_at.map(Into::into)),
            share_on_linkedin: Set(post.share_on_linkedin),
            shared_at_linkedin: Set(post.shared_at_linkedin.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
