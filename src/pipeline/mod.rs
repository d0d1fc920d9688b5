//! Pipeline stages for page-image captioning.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different markup parser) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ resolve ──▶ filter ──▶ fetch ──▶ filter ──▶ caption
//! (markup)    (raw→URL)   (vector)   (decode)  (min area)  (model)
//! ```
//!
//! 1. [`extract`] — walk the markup's `<img>` elements and collect raw
//!    references in document order
//! 2. [`resolve`] — normalise each raw reference to an absolute http(s) URL
//!    or drop it
//! 3. [`filter`]  — the cheap discards: vector formats before fetch, pixel
//!    area after decode
//! 4. [`fetch`]   — bounded GET per candidate, decode to 3-channel RGB
//! 5. [`caption`] — one vision-model call per surviving image; the only
//!    stage that talks to the model
//!
//! Every stage is a partial function over its candidate: failure anywhere
//! ends that candidate's journey and nothing else.

pub mod caption;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod resolve;
