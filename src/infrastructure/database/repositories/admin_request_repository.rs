use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{debug, warn};

use crate::domain::{
    AdminRequest, AdminRequestRepositoryInterface, CreateAdminRequestDto, DomainResult,
};
use crate::infrastructure::database::entities::admin_request;
use crate::shared::PageRequest;

pub struct SeaOrmAdminRequestRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdminRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn request_model_to_domain(model: admin_request::Model) -> AdminRequest {
    AdminRequest {
        id: model.id,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        is_validated: model.is_validated,
        created_at: model.created_at,
        deleted_at: model.deleted_at,
    }
}

#[async_trait]
impl AdminRequestRepositoryInterface for SeaOrmAdminRequestRepository {
    async fn create(&self, dto: CreateAdminRequestDto) -> DomainResult<AdminRequest> {
        let id = uuid::Uuid::new_v4().to_string();
        debug!(request_id = %id, username = %dto.username, "Inserting admin request");

        let model = admin_request::ActiveModel {
            id: Set(id),
            username: Set(dto.username),
            email: Set(dto.email),
            full_name: Set(dto.full_name),
            password_hash: Set(dto.password_hash),
            is_validated: Set(false),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        Ok(request_model_to_domain(model))
    }

    async fn find_pending(&self, id: &str) -> DomainResult<Option<AdminRequest>> {
        let model = admin_request::Entity::find_by_id(id.to_string())
            .filter(admin_request::Column::IsValidated.eq(false))
            .filter(admin_request::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(model.map(request_model_to_domain))
    }

    async fn list_pending(&self, page: PageRequest) -> DomainResult<Vec<AdminRequest>> {
        let models = admin_request::Entity::find()
            .filter(admin_request::Column::IsValidated.eq(false))
            .filter(admin_request::Column::DeletedAt.is_null())
            .order_by_desc(admin_request::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(request_model_to_domain).collect())
    }

    async fn mark_validated(&self, id: &str) -> DomainResult<bool> {
        let result = admin_request::Entity::update_many()
            .col_expr(admin_request::Column::IsValidated, Expr::value(true))
            .filter(admin_request::Column::Id.eq(id))
            .filter(admin_request::Column::IsValidated.eq(false))
            .filter(admin_request::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn unmark_validated(&self, id: &str) -> DomainResult<()> {
        let result = admin_request::Entity::update_many()
            .col_expr(admin_request::Column::IsValidated, Expr::value(false))
            .filter(admin_request::Column::Id.eq(id))
            .filter(admin_request::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            warn!(request_id = %id, "Admin request vanished before it could be reopened");
        }
        Ok(())
    }

    async fn soft_delete_pending(&self, id: &str) -> DomainResult<bool> {
        let result = admin_request::Entity::update_many()
            .col_expr(admin_request::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(admin_request::Column::Id.eq(id))
            .filter(admin_request::Column::IsValidated.eq(false))
            .filter(admin_request::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
