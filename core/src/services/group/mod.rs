//! Group service module

mod service;


pub use service::GroupService;
