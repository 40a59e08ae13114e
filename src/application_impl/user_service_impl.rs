use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

impl From<UserRepoError> for UserError {
    fn from(error: UserRepoError) -> Self {
        match error {
            UserRepoError::AlreadyExists => UserError::UserAlreadyExists,
            UserRepoError::Store(e) => UserError::Internal(e),
        }
    }
}

const EMAIL_LEN: std::ops::RangeInclusive<usize> = 3..=32;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=32;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            credential_hasher,
        }
    }

    fn validate(email: &str, password: &str) -> Result<(), UserError> {
        let mut problems = Vec::new();

        if !EMAIL_LEN.contains(&email.chars().count()) {
            problems.push("the field email must be 3 to 32 characters");
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => problems.push("the field email is not valid"),
        }
        if !PASSWORD_LEN.contains(&password.chars().count()) {
            problems.push("the field password must be 8 to 32 characters");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(UserError::Validation(problems.join("; ")))
        }
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn register(&self, email: &str, password: &str) -> Result<UserId, UserError> {
        Self::validate(email, password)?;

        let password_hash = self.credential_hasher.hash_password(password).await?;
        let user_id = self.user_repo.create_user(email, &password_hash).await?;

        info!(%user_id, "user registered");
        Ok(user_id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserId, UserError> {
        Self::validate(email, password)?;

        let rec = self
            .user_repo
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let ok = self
            .credential_hasher
            .verify_password(password, &rec.password_hash)
            .await?;
        if !ok {
            return Err(UserError::InvalidCredentials);
        }

        Ok(rec.user_id)
    }

    async fn user(&self, user_id: UserId) -> Result<UserData, UserError> {
        let rec = self
            .user_repo
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        Ok(UserData {
            user_id: rec.user_id,
            email: rec.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryUserRepo;

    struct PlainHasher;

    #[async_trait::async_trait]
    impl CredentialHasher for PlainHasher {
        async fn hash_password(&self, password: &str) -> Result<String, UserError> {
            Ok(format!("plain:{}", password))
        }

        async fn verify_password(
            &self,
            password: &str,
            password_hash: &str,
        ) -> Result<bool, UserError> {
            Ok(password_hash == format!("plain:{}", password))
        }
    }

    fn service() -> (RealUserService, Arc<MemoryUserRepo>) {
        let repo = Arc::new(MemoryUserRepo::new());
        (RealUserService::new(repo.clone(), Arc::new(PlainHasher)), repo)
    }

    #[tokio::test]
    async fn register_then_login() {
        let (service, repo) = service();

        let id = service.register("gamer@club.test", "hunter22!").await.unwrap();
        assert_eq!(service.login("gamer@club.test", "hunter22!").await, Ok(id));

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "plain:hunter22!");
        assert_eq!(stored.refresh_token_version, 0);
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let (service, _) = service();
        service.register("gamer@club.test", "hunter22!").await.unwrap();

        assert_eq!(
            service.register("gamer@club.test", "another-pw").await,
            Err(UserError::UserAlreadyExists)
        );
    }

    #[tokio::test]
    async fn bad_password_and_unknown_email_look_the_same() {
        let (service, _) = service();
        service.register("gamer@club.test", "hunter22!").await.unwrap();

        assert_eq!(
            service.login("gamer@club.test", "hunter23!").await,
            Err(UserError::InvalidCredentials)
        );
        assert_eq!(
            service.login("nobody@club.test", "hunter22!").await,
            Err(UserError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn invalid_input_is_reported_per_field() {
        let (service, _) = service();

        let Err(UserError::Validation(msg)) = service.register("nope", "short").await else {
            panic!("expected validation error");
        };
        assert!(msg.contains("email is not valid"));
        assert!(msg.contains("password must be 8 to 32"));

        assert!(matches!(
            service.register("@club.test", "hunter22!").await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn user_returns_public_data() {
        let (service, _) = service();
        let id = service.register("gamer@club.test", "hunter22!").await.unwrap();

        assert_eq!(
            service.user(id).await,
            Ok(UserData {
                user_id: id,
                email: "gamer@club.test".to_string(),
            })
        );
        assert_eq!(
            service.user(UserId(9_999)).await,
            Err(UserError::UserNotFound)
        );
    }
}
