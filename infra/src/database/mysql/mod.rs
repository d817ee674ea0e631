//! MySQL repository implementations

mod rows;

pub mod group_repository_impl;
pub mod task_repository_impl;
pub mod user_repository_impl;

pub use group_repository_impl::MySqlGroupRepository;
pub use task_repository_impl::MySqlTaskRepository;
pub use user_repository_impl::MySqlUserRepository;
