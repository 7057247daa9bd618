//! # MindEase client core
//!
//! The non-visual half of the MindEase client: everything a screen needs to
//! read or mutate, with rendering left to whichever frontend mounts it.
//!
//! - [`gateway`] - uniform async access to the mood/user store, whether that
//!   is the HTTP backend or a local on-device store
//! - [`session`] - the authoritative in-memory session state
//! - [`timer`] - countdown/phase-cycling engines for the guided exercises
//! - [`insights`] - pure derivations over the mood history
//! - [`chat`] - the scripted chat companion

pub mod chat;
pub mod gateway;
pub mod insights;
pub mod session;
pub mod timer;
