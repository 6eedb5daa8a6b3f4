//! # Seoul Favorites Telegram Bot
//!
//! A Telegram bot that greets users in Korean, offers a menu of Seoul
//! districts and answers with the most visited restaurants of the chosen
//! district, each with a web search link.

pub mod bot;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod district;
pub mod errors;
pub mod favorites;
pub mod ingest;
pub mod logging;
pub mod messages;
pub mod ranking;
pub mod router;
