use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;

use crate::domain::{
    ActivityLogEntry, ActivityLogRepositoryInterface, ActivityType, DomainResult,
};
use crate::infrastructure::database::entities::activity_log;

pub struct SeaOrmActivityLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmActivityLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn entry_model_to_domain(model: activity_log::Model) -> Option<ActivityLogEntry> {
    match model.activity_type.parse::<ActivityType>() {
        Ok(activity_type) => Some(ActivityLogEntry {
            id: model.id,
            user_id: model.user_id,
            activity_type,
            description: model.description,
            created_at: model.created_at,
        }),
        Err(e) => {
            warn!(entry_id = model.id, "Skipping activity log entry: {}", e);
            None
        }
    }
}

#[async_trait]
impl ActivityLogRepositoryInterface for SeaOrmActivityLogRepository {
    async fn append(
        &self,
        user_id: &str,
        activity_type: ActivityType,
        description: &str,
    ) -> DomainResult<()> {
        activity_log::ActiveModel {
            id: NotSet,
            user_id: Set(user_id.to_string()),
            activity_type: Set(activity_type.as_str().to_string()),
            description: Set(description.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ActivityLogEntry>> {
        let models = activity_log::Entity::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_asc(activity_log::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().filter_map(entry_model_to_domain).collect())
    }
}
