use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use tracing::debug;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateProfileDto, User, UserRepositoryInterface,
    UserRole,
};
use crate::infrastructure::database::entities::user;
use crate::shared::InfraError;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active(&self, condition: Condition) -> DomainResult<Option<user::Model>> {
        user::Entity::find()
            .filter(condition)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InfraError::Database(e).into())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Regular => UserRole::Regular,
        user::UserRole::Paid => UserRole::Paid,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Regular => user::UserRole::Regular,
        UserRole::Paid => user::UserRole::Paid,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        date_of_birth: model.date_of_birth,
        profile_picture: model.profile_picture,
        phone_number: model.phone_number,
        address: model.address,
        timezone: model.timezone,
        language_preference: model.language_preference,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

/// Unique index violations become `Conflict`; everything else is unexpected.
fn write_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict("User already exists".to_string())
        }
        _ => InfraError::Database(e).into(),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        debug!(user_id = %id, username = %dto.username, "Inserting user");

        let new_user = user::ActiveModel {
            id: Set(id),
            username: Set(dto.username),
            email: Set(dto.email),
            full_name: Set(dto.full_name),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            date_of_birth: Set(None),
            profile_picture: Set(None),
            phone_number: Set(None),
            address: Set(None),
            timezone: Set(None),
            language_preference: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(write_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn find_active_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = self
            .find_active(Condition::all().add(user::Column::Id.eq(id)))
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_active_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = self
            .find_active(Condition::all().add(user::Column::Email.eq(email)))
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn exists_active_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> DomainResult<bool> {
        let count = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .filter(user::Column::DeletedAt.is_null())
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
        let existing = self
            .find_active(Condition::all().add(user::Column::Id.eq(id)))
            .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(username) = dto.username {
            active.username = Set(username);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(full_name) = dto.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(date_of_birth) = dto.date_of_birth {
            active.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(profile_picture) = dto.profile_picture {
            active.profile_picture = Set(Some(profile_picture));
        }
        if let Some(phone_number) = dto.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(address) = dto.address {
            active.address = Set(Some(address));
        }
        if let Some(timezone) = dto.timezone {
            active.timezone = Set(Some(timezone));
        }
        if let Some(language_preference) = dto.language_preference {
            active.language_preference = Set(Some(language_preference));
        }

        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(write_err)?;

        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<bool> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn set_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Role, Expr::value(role.as_str()))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_active_by_id(id).await
    }

    async fn soft_delete(&self, id: &str) -> DomainResult<bool> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connect_in_memory;

    fn new_user(username: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            email: email.into(),
            full_name: None,
            password_hash: "$2b$10$notarealhash".into(),
            role: UserRole::Regular,
        }
    }

    #[tokio::test]
    async fn duplicate_active_username_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(connect_in_memory().await.unwrap());
        repo.create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = repo
            .create_user(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn tombstoned_user_is_invisible_and_frees_identity() {
        let repo = SeaOrmUserRepository::new(connect_in_memory().await.unwrap());
        let alice = repo
            .create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(repo.soft_delete(&alice.id).await.unwrap());
        assert!(!repo.soft_delete(&alice.id).await.unwrap());
        assert!(repo.find_active_by_id(&alice.id).await.unwrap().is_none());
        assert!(repo
            .find_active_by_email("alice@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(!repo
            .exists_active_with_email_or_username("alice@example.com", "alice")
            .await
            .unwrap());
        assert!(repo.set_role(&alice.id, UserRole::Admin).await.unwrap().is_none());

        // Same identity can be registered again
        repo.create_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_role_updates_role_and_timestamp() {
        let repo = SeaOrmUserRepository::new(connect_in_memory().await.unwrap());
        let bob = repo
            .create_user(new_user("bob", "bob@example.com"))
            .await
            .unwrap();

        let updated = repo.set_role(&bob.id, UserRole::Paid).await.unwrap().unwrap();
        assert_eq!(updated.role, UserRole::Paid);
        assert!(updated.updated_at >= bob.updated_at);
    }

    #[tokio::test]
    async fn update_profile_keeps_absent_fields() {
        let repo = SeaOrmUserRepository::new(connect_in_memory().await.unwrap());
        let carol = repo
            .create_user(new_user("carol", "carol@example.com"))
            .await
            .unwrap();

        let updated = repo
            .update_profile(
                &carol.id,
                UpdateProfileDto {
                    full_name: Some("Carol C".into()),
                    timezone: Some("Europe/Paris".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.username, "carol");
        assert_eq!(updated.email, "carol@example.com");
        assert_eq!(updated.full_name.as_deref(), Some("Carol C"));
        assert_eq!(updated.timezone.as_deref(), Some("Europe/Paris"));
        assert!(updated.phone_number.is_none());
    }
}
