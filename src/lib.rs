//! Scroll-reactive cloth banners.
//!
//! [`cloth`] holds the simulation itself: a Verlet particle grid pinned
//! along its top edge, relaxed with distance constraints and blown out of
//! its plane by wind derived from page scrolling. [`simulation`] wires it
//! into Bevy as a plugin that supplies scroll input, frame ticks and a
//! renderer.

pub mod cloth;
pub mod simulation;
