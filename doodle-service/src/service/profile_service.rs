use shared::{ProfileData, Result, UserId};

use crate::repository::UserRepository;

pub struct ProfileService {
    user_repo: UserRepository,
}

impl ProfileService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn get_profile(&self, user_id: &UserId) -> Result<ProfileData> {
        self.user_repo.get_profile(user_id).await
    }
}
