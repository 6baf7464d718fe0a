//! Protocol test suite

mod decoder_tests;
