//! Provider tests that touch files and the process environment

mod precedence;
