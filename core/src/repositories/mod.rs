pub mod group;
pub mod task;
pub mod user;

pub use group::GroupRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use group::MockGroupRepository;
#[cfg(test)]
pub use task::MockTaskRepository;
#[cfg(test)]
pub use user::MockUserRepository;
