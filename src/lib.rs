//! Terminal population dashboard: a braille world choropleth and
//! per-country and world population charts, navigated by hash routes.

pub mod app;
pub mod braille;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod loader;
pub mod map;
pub mod router;
pub mod series;
pub mod source;
pub mod ui;
pub mod views;
