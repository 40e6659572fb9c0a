//! Application layer: the facades and what they are built from.

pub mod article;
pub mod asset;
pub mod catalog;
pub mod editor;
pub mod messages;
pub mod selection;
