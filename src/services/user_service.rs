use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{user::normalize_email, SoftDeletable, User},
        dto::{
            request::{CreateUserRequest, UpdateUserRequest},
            response::UserDto,
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    async fn fetch(&self, id: &str, active: Option<bool>) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|user| user.matches_active(active))
            .ok_or_else(|| AppError::not_found("User", id))
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&str>) -> AppResult<()> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(existing.id.as_str()) != owner => Err(AppError::Conflict(
                format!("User with email '{}' already exists", email),
            )),
            _ => Ok(()),
        }
    }

    pub async fn list_users(&self, active: bool) -> AppResult<Vec<UserDto>> {
        let users = self.repository.find_all(Some(active)).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get_user(&self, id: &str, active: bool) -> AppResult<UserDto> {
        Ok(self.fetch(id, Some(active)).await?.into())
    }

    pub async fn create_user(&self, request: CreateUserRequest, actor: &str) -> AppResult<UserDto> {
        request.validate()?;

        let email = normalize_email(&request.email);
        self.ensure_email_free(&email, None).await?;

        let user = User::new(
            request.name.trim(),
            &email,
            &request.password,
            request.role,
            actor,
            Utc::now(),
        );
        let user = self.repository.create(user).await?;

        log::info!("User '{}' created by {}", user.id, actor);
        Ok(user.into())
    }

    pub async fn update_user(
        &self,
        id: &str,
        request: UpdateUserRequest,
        actor: &str,
    ) -> AppResult<UserDto> {
        request.validate()?;
        let mut user = self.fetch(id, None).await?;

        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            let email = normalize_email(&email);
            if email != user.email {
                self.ensure_email_free(&email, Some(&user.id)).await?;
                user.email = email;
            }
        }
        if let Some(password) = request.password {
            user.set_password(&password);
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }

        user.audit.touch(actor, Utc::now());
        let user = self.repository.update(user).await?;
        Ok(user.into())
    }

    /// Answers and attempts of the user are kept.
    pub async fn delete_user(&self, id: &str, actor: &str) -> AppResult<()> {
        let mut user = self.fetch(id, None).await?;
        user.deactivate(actor, Utc::now());
        self.repository.update(user).await?;

        log::info!("User '{}' deleted by {}", id, actor);
        Ok(())
    }
}
