// Library for tests to access modules

pub mod buffer;
pub mod cadvisor;
pub mod config;
pub mod influx;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod translate;
pub mod worker;
