//! Domain logic for the homework status bot.
//!
//! Everything in this crate is pure: the status enumeration with its
//! verdict table, response-shape validation, and notification
//! rendering. Network clients and the polling loop live in the
//! `statusbot` crate.

pub mod error;
pub mod homework;

pub use error::ContractError;
pub use homework::{
    extract_homeworks, render_status_change, render_update, HomeworkStatus, NO_NEW_STATUS_MESSAGE,
};
