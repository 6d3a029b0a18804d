//! Tests for the shardkv-engine crate.

mod helpers;

mod basic;
