//! Task client view: the form-and-list front end of the to-do service.
//!
//! [`view::TodoView`] keeps a local mirror of the signed-in user's tasks and
//! talks to the server through a [`api::TaskApi`]. Outcomes are surfaced as
//! [`notify::Toast`]s through a [`notify::Notifier`].

pub mod api;
pub mod error;
pub mod model;
pub mod notify;
pub mod session;
pub mod view;
