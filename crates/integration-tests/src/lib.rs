//! Empty library target; the crate exists for its `tests/` directory
