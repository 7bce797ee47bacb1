//! Create User Use Case
//!
//! Registers a new account.

use std::sync::Arc;

use platform::clock::Clock;
use platform::idgen::IdGenerator;
use platform::password::PasswordEncryptor;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_id::UserId;
use crate::domain::value_object::user_name::UserName;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Create user input
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Create user output
pub struct CreateUserOutput {
    pub user: User,
}

/// Create user use case
pub struct CreateUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    encryptor: Arc<PasswordEncryptor>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<U> CreateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        encryptor: Arc<PasswordEncryptor>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            encryptor,
            id_generator,
            clock,
        }
    }

    pub async fn execute(&self, input: CreateUserInput) -> AuthResult<CreateUserOutput> {
        let username = UserName::new(input.username)?;
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        // Email is checked before username; a request that collides on
        // both reports the email conflict.
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        if self.user_repo.exists_by_username(&username).await? {
            return Err(AuthError::UsernameAlreadyExists);
        }

        let password = UserPassword::from_raw(&raw_password, &self.encryptor)?;

        let user = User::new(
            UserId::from_uuid(self.id_generator.generate()),
            username,
            email,
            password,
            self.clock.now(),
        );

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User created"
        );

        Ok(CreateUserOutput { user })
    }
}
