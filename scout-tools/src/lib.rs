//! scout-tools library interface
//!
//! Shared logic for the downstream snapshot consumers: record filtering,
//! static HTML rendering, and the email digest. All three tools read a
//! snapshot JSON file and never write back to it.

pub mod email;
pub mod filter;
pub mod html;
