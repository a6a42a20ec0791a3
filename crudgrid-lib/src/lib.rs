//! crudgrid component library
//!
//! A reusable CRUD grid toolkit for admin screens: a stateful controller
//! over a declaratively configured data source, a declarative column model
//! with field-type → widget dispatch, and a modal form model wired to the
//! controller's create/update operations.

pub mod controller;
pub mod error;
pub mod model;
pub mod query;
pub mod render;
pub mod source;

pub use controller::*;
