//! Timelens - timestamp comment timelines for video pages
//!
//! Timelens is a CLI tool and library that scrapes timestamp-bearing
//! comments from a video page's comment section, normalizes them to
//! canonical durations, and keeps a deduplicated, ordered timeline in sync
//! with the live page. The timeline can drive playback: jumping to an
//! entry, nudging around it, and highlighting whatever is currently
//! playing.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (extract / scan / watch / init)
//! - `collect`: Parse passes, the per-page session and its scheduler
//! - `config`: Configuration file loading and selector compilation
//! - `diag`: Failure taxonomy and statistics
//! - `dom`: Page capability interface and the fixture-backed page
//! - `extract`: Timestamp pattern battery
//! - `playback`: Media control surface, seeking and highlighting
//! - `timeline`: The derived timed-comment list
//! - `widget`: Widget position persistence

pub mod cli;
pub mod collect;
pub mod config;
pub mod diag;
pub mod dom;
pub mod extract;
pub mod playback;
pub mod timeline;
pub mod widget;
