// lib.rs - Library root for the qed editor core

pub mod buffer;
pub mod cli;
pub mod command;
pub mod config;
pub mod editor;
pub mod keymap;
pub mod motion;
