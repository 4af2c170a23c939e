//! Request extractors guarding protected routes.

pub mod cron_auth;
