//! Backend bridge: command queue types and the worker runtime that executes them.

pub mod commands;
pub mod runtime;
