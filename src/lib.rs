#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod collection;
pub mod error;
pub mod index_set;
pub mod planner;
pub mod position;
pub mod types;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;
