pub mod api;
pub mod config;
pub mod controller;
pub mod demo;
pub mod domain;
pub mod repo;
pub mod rotation;
pub mod telemetry;
