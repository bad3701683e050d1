//! The block-layer collaborator the buffer pool sits on top of.
//!
//! This module is deliberately thin: a page-sized random-access file wrapper
//! and nothing more. Caching, scheduling, and write-back policy all belong to
//! [`crate::buffer`], not here.

pub mod disk;

pub use disk::{DiskManager, PageFile};
