//! Unit tests for annotation interchange.
