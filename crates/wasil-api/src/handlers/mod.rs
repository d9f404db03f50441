//! HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod dependant;
pub mod dispatcher;
pub mod health;
pub mod media;
pub mod notification;
pub mod request;
pub mod ws;
