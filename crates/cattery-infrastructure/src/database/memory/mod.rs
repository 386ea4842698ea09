//! In-process repository implementations

pub mod cat_repo_impl;

pub use cat_repo_impl::MemoryCatRepository;
