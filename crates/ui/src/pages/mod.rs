//! Page Components for Atelier
//!
//! ## Available Pages
//!
//! - **HomePage**: overview of every resource
//! - **ResourceListPage**: data table and actions for one resource

pub mod home;
pub mod resource_list;

pub use home::HomePage;
pub use resource_list::ResourceListPage;
