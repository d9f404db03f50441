//! # wasil-entity
//!
//! Domain entity models for Wasil. Every struct in this crate represents a
//! stored record or a domain value object. Entities carry no storage
//! annotations; the database adapters parse rows into these types.

pub mod catalog;
pub mod dependant;
pub mod dispatcher;
pub mod notification;
pub mod request;
pub mod user;
