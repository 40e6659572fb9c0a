//! Domain types shared by the editor and article facades.

pub mod errors;
pub mod model;
