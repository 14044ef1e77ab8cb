//! API Routes
//!
//! Route handlers organized by widget.

pub mod chat;
pub mod clone;
pub mod data;
pub mod email;
pub mod employees;
pub mod health;
pub mod mood;
pub mod movies;
pub mod networth;
pub mod photos;
pub mod preferences;
pub mod shopping;
pub mod sms;
pub mod sms_api;
pub mod users;
