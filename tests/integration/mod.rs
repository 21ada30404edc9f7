//! End-to-end release scenarios against temporary git repositories.

mod helpers;

mod canary_test;
mod cli_test;
mod comment_test;
mod ship_test;
