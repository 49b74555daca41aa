mod common;
mod filtering;
mod properties;
mod ranking;
