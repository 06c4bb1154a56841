mod common;
mod photos;
mod service;
