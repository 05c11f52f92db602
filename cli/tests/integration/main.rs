//! Integration tests for moemail-deploy
//!
//! These tests spawn the actual binary and stop it before any browser or
//! prompt is needed.
