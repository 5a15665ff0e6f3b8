use std::sync::Arc;

use adapter::memory::InMemoryStore;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::memory::{
    InMemoryHealthCheckRepository, InMemoryTaskRepository, InMemoryUserRepository,
};
use adapter::repository::task::TaskRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use adapter::database::ConnectionPool;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::task::TaskRepository;
use kernel::repository::user::UserRepository;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    task_repository: Arc<dyn TaskRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let task_repository = Arc::new(TaskRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            task_repository,
            user_repository,
        }
    }

    // プロセス内のドキュメントストアを使う構成（開発・テスト用）
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            health_check_repository: Arc::new(InMemoryHealthCheckRepository),
            task_repository: Arc::new(InMemoryTaskRepository::new(store.clone())),
            user_repository: Arc::new(InMemoryUserRepository::new(store)),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn task_repository(&self) -> Arc<dyn TaskRepository> {
        self.task_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }
}
