//! Unit tests for cached-code bookkeeping.
