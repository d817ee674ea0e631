//! Task service module

mod service;


pub use service::TaskService;
