//! Resources shared across the scene.
//!
//! Long-lived data inserted into the world and read by the systems.
//!
//! Overview
//! - `activestate` – the state driven by the frame loop and any pending switch
//! - `engineconfig` – INI-backed engine settings
//! - `input` – polled pointer state
//! - `random` – seedable random generator and id source
//! - `rendertarget` – draw surface abstraction and a recording surface
//! - `texturestore` – texture descriptors keyed by string ids
//! - `worldtime` – simulation time and delta
pub mod activestate;
pub mod engineconfig;
pub mod input;
pub mod random;
pub mod rendertarget;
pub mod texturestore;
pub mod worldtime;
