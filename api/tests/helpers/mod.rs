#![allow(dead_code)]

pub mod app;
pub mod ws;

pub use app::{TestCtx, make_test_app, seed};
pub use ws::{connect_ws, spawn_server};
